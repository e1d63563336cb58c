//! Data models for the JanmaBhoomi explorer
//!
//! - Location: coordinates picked on the map or detected from GPS
//! - Place: place queries and languages
//! - Card: the assembled knowledge card and its export

pub mod card;
pub mod location;
pub mod place;

// Re-export all public types for convenient access
pub use card::{EXPORT_MIME_TYPE, KnowledgeCard};
pub use location::{Coordinates, INDIA_CENTER};
pub use place::{Language, PlaceQuery, title_case};
