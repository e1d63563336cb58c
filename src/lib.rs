//! JanmaBhoomi - local stories of Indian places
//!
//! This library looks a place up on Wikipedia and assembles a knowledge
//! card: summary, tourist attractions with article links, culture,
//! education, politics and the languages spoken there.

pub mod annotate;
pub mod api;
pub mod config;
pub mod encyclopedia;
pub mod error;
pub mod explorer;
pub mod geocoding;
pub mod languages;
pub mod location_resolver;
pub mod logging;
pub mod models;
pub mod resolver;
pub mod session;
pub mod web;

#[cfg(test)]
mod testing;

// Re-export core types for public API
pub use annotate::{AnnotatedText, annotate, extract_proper_nouns};
pub use config::ExplorerConfig;
pub use encyclopedia::{ImageSource, SummarySource, WikipediaClient};
pub use error::ExplorerError;
pub use explorer::Explorer;
pub use geocoding::{NominatimClient, ReverseGeocoder};
pub use location_resolver::{LocationInput, LocationResolver, UNKNOWN_PLACE};
pub use models::{Coordinates, KnowledgeCard, Language, PlaceQuery};
pub use resolver::{CandidateList, Resolution};
pub use session::{Session, SessionEvent};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ExplorerError>;
