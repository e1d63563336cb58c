//! Place queries and display languages

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ExplorerError;

/// Languages a knowledge card can be requested in, and the languages
/// reported as commonly spoken
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Hindi,
    Telugu,
}

impl Language {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Telugu => "Telugu",
        }
    }

    /// Marker put in front of "translated" text. Not a real translation.
    #[must_use]
    pub fn tag_prefix(self) -> &'static str {
        match self {
            Language::English => "",
            Language::Hindi => "[HI] ",
            Language::Telugu => "[TE] ",
        }
    }

    #[must_use]
    pub fn tag(self, text: &str) -> String {
        format!("{}{}", self.tag_prefix(), text)
    }
}

impl FromStr for Language {
    type Err = ExplorerError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "hindi" | "hi" => Ok(Language::Hindi),
            "telugu" | "te" => Ok(Language::Telugu),
            other => Err(ExplorerError::validation(format!(
                "Unsupported language '{other}'. Choose English, Telugu or Hindi"
            ))),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated request to explore a place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceQuery {
    pub name: String,
    pub language: Language,
}

impl PlaceQuery {
    pub fn new(name: &str, language: Language) -> crate::Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ExplorerError::validation("Please enter a place name."));
        }

        Ok(Self {
            name: name.to_string(),
            language,
        })
    }

    /// Heading shown on the card, e.g. "new delhi" becomes "New Delhi"
    #[must_use]
    pub fn title(&self) -> String {
        title_case(&self.name)
    }
}

/// Capitalize the first letter of every word and lowercase the rest.
/// A word starts after any non-alphabetic character.
#[must_use]
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_letter = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("English", Language::English)]
    #[case("te", Language::Telugu)]
    #[case(" HINDI ", Language::Hindi)]
    fn test_language_parsing(#[case] input: &str, #[case] expected: Language) {
        assert_eq!(input.parse::<Language>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        assert!("tamil".parse::<Language>().is_err());
    }

    #[test]
    fn test_tag_prefix_is_a_placeholder() {
        assert_eq!(Language::English.tag("Hello"), "Hello");
        assert_eq!(Language::Telugu.tag("Hello"), "[TE] Hello");
        assert_eq!(Language::Hindi.tag("Hello"), "[HI] Hello");
    }

    #[test]
    fn test_place_query_requires_a_name() {
        let err = PlaceQuery::new("   ", Language::English).unwrap_err();
        assert!(err.to_string().contains("Please enter a place name."));

        let query = PlaceQuery::new("  Warangal ", Language::Telugu).unwrap();
        assert_eq!(query.name, "Warangal");
    }

    #[rstest]
    #[case("new delhi", "New Delhi")]
    #[case("HYDERABAD", "Hyderabad")]
    #[case("visakhapatnam-vizag", "Visakhapatnam-Vizag")]
    #[case("o'neil town", "O'Neil Town")]
    fn test_title_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(title_case(input), expected);
    }
}
