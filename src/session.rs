//! Per-user session state: the selected location, its city and whether
//! the map picker is shown. Transitions are pure; geocoding happens before
//! an event is applied.

use serde::{Deserialize, Serialize};

use crate::location_resolver::is_unknown;
use crate::models::{Coordinates, INDIA_CENTER};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub location: Option<Coordinates>,
    pub city: Option<String>,
    pub show_map: bool,
}

/// User actions that change the session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// "Detect my city" from the device position
    DetectCity { location: Coordinates, city: String },
    /// A click on the map picker
    MapClicked { location: Coordinates, city: String },
    ShowMap,
    HideMap,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event and return the resulting session
    #[must_use]
    pub fn apply(self, event: SessionEvent) -> Self {
        match event {
            SessionEvent::DetectCity { location, city } => Self {
                location: Some(location),
                city: Some(city),
                ..self
            },
            SessionEvent::MapClicked { location, city } if self.show_map => Self {
                location: Some(location),
                city: Some(city),
                ..self
            },
            SessionEvent::MapClicked { .. } => self,
            SessionEvent::ShowMap => Self {
                show_map: true,
                ..self
            },
            SessionEvent::HideMap => Self {
                show_map: false,
                ..self
            },
        }
    }

    /// Where the map opens: the selected location, else the centre of India
    #[must_use]
    pub fn map_center(&self) -> Coordinates {
        self.location.unwrap_or(INDIA_CENTER)
    }

    /// Place name to pre-fill, if the selected city is usable
    #[must_use]
    pub fn suggested_place(&self) -> Option<&str> {
        self.city
            .as_deref()
            .filter(|city| !city.trim().is_empty() && !is_unknown(city))
    }
}
