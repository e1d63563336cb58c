//! First-match-wins lookup over alternative page titles
//!
//! Several phrasings of the same question ("Politics of X", "X politics")
//! are tried in order. The earliest one whose summary is long enough wins,
//! even if a later candidate would have returned more text.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::encyclopedia::SummarySource;

/// Sentinel for an exhausted politics lookup
pub const NO_POLITICS: &str = "No notable political information found for this place.";
/// Sentinel for an exhausted culture lookup
pub const NO_CULTURE: &str = "No cultural or historical information found for this place.";
/// Sentinel for missing education text
pub const NO_EDUCATION: &str = "No detailed educational info available.";
/// Sentinel for missing tourism text
pub const NO_TOURISM: &str = "No tourist info found.";

/// Ordered page titles and the minimum length a summary must exceed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateList {
    pub titles: Vec<String>,
    pub min_length: usize,
}

impl CandidateList {
    pub fn new<I, S>(titles: I, min_length: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            titles: titles.into_iter().map(Into::into).collect(),
            min_length,
        }
    }

    #[must_use]
    pub fn politics(place: &str) -> Self {
        Self::new(
            [
                format!("Politics of {place}"),
                format!("{place} politics"),
                format!("{place} (Lok Sabha constituency)"),
                format!("Political history of {place}"),
                format!("History of {place}"),
            ],
            50,
        )
    }

    #[must_use]
    pub fn culture(place: &str) -> Self {
        Self::new(
            [format!("Culture of {place}"), format!("History of {place}")],
            30,
        )
    }

    /// Any non-empty text qualifies; fragments are filtered afterwards
    #[must_use]
    pub fn education(place: &str) -> Self {
        Self::new(
            [format!("Education in {place}"), format!("Colleges in {place}")],
            0,
        )
    }

    #[must_use]
    pub fn tourism(place: &str) -> Self {
        Self::new([format!("Tourist attractions in {place}")], 0)
    }

    /// Non-empty and strictly longer than `min_length` characters
    #[must_use]
    pub fn accepts(&self, text: &str) -> bool {
        !text.is_empty() && text.chars().count() > self.min_length
    }
}

/// Outcome of trying a candidate list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found { title: String, text: String },
    Exhausted,
}

impl Resolution {
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Resolution::Found { text, .. } => Some(text),
            Resolution::Exhausted => None,
        }
    }

    /// The found text, or `sentinel` when nothing qualified
    #[must_use]
    pub fn or_sentinel(self, sentinel: &str) -> String {
        match self {
            Resolution::Found { text, .. } => text,
            Resolution::Exhausted => sentinel.to_string(),
        }
    }
}

/// Try each candidate in order and stop at the first acceptable summary.
/// Failed lookups only remove that candidate; they never abort the search.
pub async fn resolve<S: SummarySource + ?Sized>(
    source: &S,
    candidates: &CandidateList,
) -> Resolution {
    for title in &candidates.titles {
        match source.fetch_summary(title).await {
            Ok(text) if candidates.accepts(&text) => {
                debug!("Candidate '{}' accepted", title);
                return Resolution::Found {
                    title: title.clone(),
                    text,
                };
            }
            Ok(text) => {
                debug!(
                    "Candidate '{}' too short ({} chars, need more than {})",
                    title,
                    text.chars().count(),
                    candidates.min_length
                );
            }
            Err(e) => {
                debug!("Candidate '{}' unavailable: {}", title, e);
            }
        }
    }

    Resolution::Exhausted
}
