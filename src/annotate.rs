//! Proper-noun extraction and hyperlinking
//!
//! Runs of one to four capitalized words are treated as names of places
//! worth linking. The first occurrence of each becomes a markdown link to
//! its encyclopedia article. The heuristic over- and under-extracts
//! (sentence-initial words, abbreviations) and that is accepted.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Default article base for generated links
pub const WIKI_BASE_URL: &str = "https://en.wikipedia.org/wiki/";

static PROPER_NOUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[A-Z][a-z]+\s?){1,4}").expect("proper noun pattern is valid")
});

/// Source text together with the phrases found in it and the linked result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedText {
    pub source: String,
    /// Extracted phrases, longest first
    pub phrases: Vec<String>,
    pub annotated: String,
}

/// Unique capitalized-word phrases of `text`, in no particular order
#[must_use]
pub fn extract_proper_nouns(text: &str) -> Vec<String> {
    PROPER_NOUN
        .find_iter(text)
        .map(|m| m.as_str().trim_end().to_string())
        .filter(|phrase| !phrase.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Link the first occurrence of every proper noun in `text`
#[must_use]
pub fn annotate(text: &str) -> String {
    annotate_with_base(text, WIKI_BASE_URL).annotated
}

/// Link the first occurrence of every proper noun, pointing at `wiki_base`
#[must_use]
pub fn annotate_with_base(text: &str, wiki_base: &str) -> AnnotatedText {
    let mut phrases = extract_proper_nouns(text);
    phrases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut segments = vec![Segment::Plain(text.to_string())];
    for phrase in &phrases {
        link_first(&mut segments, phrase, wiki_base);
    }

    let annotated = segments.iter().map(Segment::as_str).collect();

    AnnotatedText {
        source: text.to_string(),
        phrases,
        annotated,
    }
}

/// Markdown link for a phrase, spaces in the target become underscores
#[must_use]
pub fn link(phrase: &str, wiki_base: &str) -> String {
    format!("[{phrase}]({wiki_base}{})", phrase.replace(' ', "_"))
}

// Linked spans are kept apart so that later, shorter phrases never match
// inside a label or URL produced by an earlier replacement.
enum Segment {
    Plain(String),
    Linked(String),
}

impl Segment {
    fn as_str(&self) -> &str {
        match self {
            Segment::Plain(s) | Segment::Linked(s) => s,
        }
    }
}

fn link_first(segments: &mut Vec<Segment>, phrase: &str, wiki_base: &str) {
    let hit = segments.iter().enumerate().find_map(|(i, segment)| match segment {
        Segment::Plain(text) => text.find(phrase).map(|at| (i, at)),
        Segment::Linked(_) => None,
    });

    let Some((index, at)) = hit else {
        return;
    };
    let Segment::Plain(text) = &segments[index] else {
        return;
    };

    let before = &text[..at];
    let after = &text[at + phrase.len()..];

    let mut replacement = Vec::with_capacity(3);
    if !before.is_empty() {
        replacement.push(Segment::Plain(before.to_string()));
    }
    replacement.push(Segment::Linked(link(phrase, wiki_base)));
    if !after.is_empty() {
        replacement.push(Segment::Plain(after.to_string()));
    }

    segments.splice(index..=index, replacement);
}
