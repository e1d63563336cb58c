//! Reverse geocoding through Nominatim (OpenStreetMap)

use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::GeocodingConfig;
use crate::models::Coordinates;
use crate::{ExplorerError, Result};

/// Turns coordinates into a human-readable place name
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<String>;
}

/// Nominatim reverse geocoding client
pub struct NominatimClient {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl NominatimClient {
    /// Create a new client
    pub fn new(config: &GeocodingConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
        })
    }

    fn reverse_url(&self, coordinates: Coordinates) -> String {
        format!(
            "{}/reverse?format=jsonv2&lat={}&lon={}",
            self.base_url, coordinates.latitude, coordinates.longitude
        )
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    #[instrument(skip(self, coordinates), fields(lat = coordinates.latitude, lon = coordinates.longitude))]
    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<String> {
        let start = Instant::now();

        let response = self
            .client
            .get(self.reverse_url(coordinates))
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .await
            .map_err(|e| {
                warn!("Reverse geocoding request failed: {}", e);
                ExplorerError::network(format!("Reverse geocoding request failed: {e}"))
            })?;

        if !response.status().is_success() {
            return Err(ExplorerError::network(format!(
                "Reverse geocoding returned HTTP {}",
                response.status()
            )));
        }

        let reverse: ReverseResponse = response.json().await.map_err(|e| {
            ExplorerError::network(format!("Invalid reverse geocoding data: {e}"))
        })?;

        debug!(
            "Reverse geocoding answered in {:.3}s",
            start.elapsed().as_secs_f64()
        );

        let name = reverse
            .address
            .and_then(Address::preferred_name)
            .ok_or_else(|| {
                ExplorerError::not_found(format!("No place name near {coordinates}"))
            })?;

        info!("Coordinates {} resolved to {}", coordinates, name);
        Ok(name)
    }
}

/// `GET /reverse?format=jsonv2`
#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<Address>,
}

#[derive(Debug, Default, Deserialize)]
struct Address {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
}

impl Address {
    /// First non-empty of city, town, village, state
    fn preferred_name(self) -> Option<String> {
        [self.city, self.town, self.village, self.state]
            .into_iter()
            .flatten()
            .find(|name| !name.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExplorerConfig;

    #[test]
    fn test_reverse_url() {
        let client = NominatimClient::new(&ExplorerConfig::default().geocoding).unwrap();
        let coordinates = Coordinates::new(17.385, 78.4867).unwrap();
        assert_eq!(
            client.reverse_url(coordinates),
            "https://nominatim.openstreetmap.org/reverse?format=jsonv2&lat=17.385&lon=78.4867"
        );
    }

    #[test]
    fn test_city_is_preferred() {
        let json = r#"{"address": {"city": "Hyderabad", "state": "Telangana", "country": "India"}}"#;
        let response: ReverseResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.address.and_then(Address::preferred_name).as_deref(),
            Some("Hyderabad")
        );
    }

    #[test]
    fn test_falls_back_through_town_village_state() {
        let town = Address {
            town: Some("Bhongir".into()),
            state: Some("Telangana".into()),
            ..Default::default()
        };
        assert_eq!(town.preferred_name().as_deref(), Some("Bhongir"));

        let village = Address {
            city: Some(String::new()),
            village: Some("Pochampally".into()),
            ..Default::default()
        };
        assert_eq!(village.preferred_name().as_deref(), Some("Pochampally"));

        let state = Address {
            state: Some("Telangana".into()),
            ..Default::default()
        };
        assert_eq!(state.preferred_name().as_deref(), Some("Telangana"));

        assert!(Address::default().preferred_name().is_none());
    }

    #[test]
    fn test_missing_address() {
        let response: ReverseResponse =
            serde_json::from_str(r#"{"error": "Unable to geocode"}"#).unwrap();
        assert!(response.address.is_none());
    }

    mod http {
        use std::collections::HashMap;

        use axum::Router;
        use axum::extract::Query;
        use axum::http::{HeaderMap, StatusCode};
        use axum::response::{IntoResponse, Response};
        use axum::routing::get;
        use serde_json::json;

        use super::super::*;
        use crate::config::GeocodingConfig;
        use crate::testing::serve;

        const AGENT: &str = "JanmaBhoomi-test/1.0";

        async fn reverse(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> Response {
            if headers.get(USER_AGENT).and_then(|value| value.to_str().ok()) != Some(AGENT) {
                return StatusCode::FORBIDDEN.into_response();
            }
            match params.get("lat").map(String::as_str) {
                Some("17.385") => {
                    axum::Json(json!({ "address": { "city": "Hyderabad", "state": "Telangana" } }))
                        .into_response()
                }
                Some("0") => StatusCode::SERVICE_UNAVAILABLE.into_response(),
                _ => axum::Json(json!({ "error": "Unable to geocode" })).into_response(),
            }
        }

        async fn client(user_agent: &str) -> NominatimClient {
            let base = serve(Router::new().route("/reverse", get(reverse))).await;
            NominatimClient::new(&GeocodingConfig {
                base_url: base,
                user_agent: user_agent.to_string(),
                ..GeocodingConfig::default()
            })
            .unwrap()
        }

        #[tokio::test]
        async fn test_reverse_geocode_sends_user_agent() {
            let hyderabad = Coordinates::new(17.385, 78.4867).unwrap();
            let name = client(AGENT).await.reverse_geocode(hyderabad).await.unwrap();
            assert_eq!(name, "Hyderabad");

            let err = client("curl/8.0").await.reverse_geocode(hyderabad).await.unwrap_err();
            assert!(err.is_network());
        }

        #[tokio::test]
        async fn test_server_error_is_a_network_error() {
            let err = client(AGENT)
                .await
                .reverse_geocode(Coordinates::new(0.0, 0.0).unwrap())
                .await
                .unwrap_err();
            assert!(err.is_network());
            assert!(err.to_string().contains("503"));
        }

        #[tokio::test]
        async fn test_no_address_is_not_found() {
            let err = client(AGENT)
                .await
                .reverse_geocode(Coordinates::new(-60.0, 10.0).unwrap())
                .await
                .unwrap_err();
            assert!(matches!(err, ExplorerError::NotFound { .. }));
        }
    }
}
