//! Keyword-based guess of the languages spoken at a place
//!
//! A place is matched by lowercase substring against regional markers.
//! False positives from embedded keywords are accepted.

use std::collections::BTreeSet;

use crate::models::Language;

const TELUGU_REGIONS: &[&str] = &[
    "andhra",
    "telangana",
    "hyderabad",
    "visakhapatnam",
    "vijayawada",
    "warangal",
];

const HINDI_REGIONS: &[&str] = &[
    "uttar",
    "madhya",
    "bihar",
    "rajasthan",
    "delhi",
    "lucknow",
    "patna",
];

/// Regional keyword sets and the language each one implies
pub const REGIONAL_LANGUAGES: &[(Language, &[&str])] = &[
    (Language::Telugu, TELUGU_REGIONS),
    (Language::Hindi, HINDI_REGIONS),
];

/// Languages commonly spoken at `place`, sorted by name. Always contains English.
#[must_use]
pub fn detect(place: &str) -> Vec<Language> {
    detect_with(place, REGIONAL_LANGUAGES)
}

/// Same as [`detect`], joined as "English, Telugu"
#[must_use]
pub fn detect_joined(place: &str) -> String {
    join(&detect(place))
}

#[must_use]
pub fn join(languages: &[Language]) -> String {
    languages
        .iter()
        .map(|language| language.name())
        .collect::<Vec<_>>()
        .join(", ")
}

fn detect_with(place: &str, regions: &[(Language, &[&str])]) -> Vec<Language> {
    let place = place.to_lowercase();
    let mut languages = BTreeSet::from([Language::English]);

    for (language, keywords) in regions {
        if keywords.iter().any(|keyword| place.contains(*keyword)) {
            languages.insert(*language);
        }
    }

    languages.into_iter().collect()
}
