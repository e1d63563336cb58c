//! Location Resolution Module
//!
//! This module turns explicit place names or coordinates into the place
//! name a knowledge card is built for.

use tracing::debug;

use crate::geocoding::ReverseGeocoder;
use crate::models::Coordinates;
use crate::{ExplorerError, Result};

/// Name reported when coordinates could not be resolved
pub const UNKNOWN_PLACE: &str = "Unknown";

/// Where the place to explore comes from
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    /// A place name typed by the user
    Name(String),
    /// Coordinates from GPS or a map click
    Coordinates(Coordinates),
}

/// Service for resolving location inputs
pub struct LocationResolver;

impl LocationResolver {
    /// City name for coordinates, or [`UNKNOWN_PLACE`] when the lookup fails
    pub async fn city_name<G: ReverseGeocoder + ?Sized>(
        geocoder: &G,
        coordinates: Coordinates,
    ) -> String {
        match geocoder.reverse_geocode(coordinates).await {
            Ok(name) => name,
            Err(e) => {
                debug!("Reverse geocoding failed: {}, reporting {}", e, UNKNOWN_PLACE);
                UNKNOWN_PLACE.to_string()
            }
        }
    }

    /// Resolve an input into a usable place name
    pub async fn resolve_place<G: ReverseGeocoder + ?Sized>(
        geocoder: &G,
        input: LocationInput,
    ) -> Result<String> {
        debug!("Resolving location input: {:?}", input);

        match input {
            LocationInput::Name(name) => Ok(name),
            LocationInput::Coordinates(coordinates) => {
                let name = Self::city_name(geocoder, coordinates).await;
                if is_unknown(&name) {
                    Err(ExplorerError::not_found(format!(
                        "No place name found near {coordinates}"
                    )))
                } else {
                    Ok(name)
                }
            }
        }
    }
}

/// True for the sentinel that stands in for "no usable name"
#[must_use]
pub fn is_unknown(name: &str) -> bool {
    name == UNKNOWN_PLACE
}
