//! The knowledge card shown for a place and its downloadable export

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::annotate::AnnotatedText;
use crate::languages;
use crate::models::Language;
use crate::resolver::{NO_EDUCATION, NO_TOURISM};

/// MIME type of the exported document
pub const EXPORT_MIME_TYPE: &str = "text/plain";

/// Everything gathered about one place. Built once per explore action and
/// never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeCard {
    /// Place name as requested
    pub place: String,
    /// Title-cased place name
    pub title: String,
    pub language: Language,
    pub image_url: Option<String>,
    /// Base summary with the language tag applied
    pub summary: String,
    pub famous_for: String,
    pub tourist_attractions: Option<AnnotatedText>,
    pub culture: String,
    /// Sentence fragments about educational institutions
    pub education: Vec<String>,
    pub politics: String,
    pub languages: Vec<Language>,
    pub generated_at: DateTime<Utc>,
}

impl KnowledgeCard {
    /// Tourism text as fetched, without links
    #[must_use]
    pub fn tourism_text(&self) -> &str {
        self.tourist_attractions
            .as_ref()
            .map_or(NO_TOURISM, |tourism| tourism.source.as_str())
    }

    /// Tourism text with proper nouns linked
    #[must_use]
    pub fn tourism_markup(&self) -> &str {
        self.tourist_attractions
            .as_ref()
            .map_or(NO_TOURISM, |tourism| tourism.annotated.as_str())
    }

    #[must_use]
    pub fn languages_spoken(&self) -> String {
        languages::join(&self.languages)
    }

    /// File name offered for the download, `<place>_summary.txt`. Path
    /// separators and control characters become `_`.
    #[must_use]
    pub fn export_file_name(&self) -> String {
        let safe_place: String = self
            .place
            .chars()
            .map(|c| {
                if matches!(c, '/' | '\\') || c.is_control() {
                    '_'
                } else {
                    c
                }
            })
            .collect();
        format!("{safe_place}_summary.txt")
    }

    /// Flat text document combining all sections under fixed headers
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        text.push_str(&format!(
            "{} - Cultural Summary ({})\n\n{}\n\n---\n",
            self.title, self.language, self.summary
        ));
        push_section(&mut text, "📌 Famous For:", &self.famous_for);
        push_section(&mut text, "🗺️ Tourist Attractions:", self.tourism_text());
        push_section(&mut text, "🏛️ Cultural Importance:", &self.culture);

        let education = if self.education.is_empty() {
            NO_EDUCATION.to_string()
        } else {
            self.education
                .iter()
                .map(|point| format!("- {point}"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        push_section(&mut text, "🎓 Educational Institutions:", &education);
        push_section(&mut text, "🏛️ Political Significance:", &self.politics);
        push_section(&mut text, "🗣️ Languages Spoken:", &self.languages_spoken());
        text.push_str("Source: Wikipedia/Wikimedia\n");
        text
    }
}

fn push_section(text: &mut String, header: &str, body: &str) {
    text.push_str(header);
    text.push('\n');
    text.push_str(body);
    text.push_str("\n\n");
}

impl fmt::Display for KnowledgeCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🧾 Knowledge Card: {}", self.title)?;
        if let Some(image_url) = &self.image_url {
            writeln!(f, "   🖼️ {image_url}")?;
        }
        writeln!(f, "{}", self.summary)?;
        writeln!(f)?;

        writeln!(f, "📌 What is this place famous for?")?;
        writeln!(f, "{}", self.famous_for)?;
        writeln!(f)?;

        writeln!(f, "🗺️ Popular Tourist Attractions")?;
        writeln!(f, "{}", self.tourism_markup())?;
        writeln!(f)?;

        writeln!(f, "🏛️ Cultural or Historical Importance")?;
        writeln!(f, "{}", self.culture)?;
        writeln!(f)?;

        writeln!(f, "🎓 Educational Institutions")?;
        if self.education.is_empty() {
            writeln!(f, "{NO_EDUCATION}")?;
        }
        for point in &self.education {
            writeln!(f, "- {point}.")?;
        }
        writeln!(f)?;

        writeln!(f, "🏛️ Political Significance")?;
        writeln!(f, "{}", self.politics)?;
        writeln!(f)?;

        writeln!(f, "🗣️ Languages Commonly Spoken")?;
        writeln!(f, "{}", self.languages_spoken())
    }
}
