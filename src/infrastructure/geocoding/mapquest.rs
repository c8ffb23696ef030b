//! MapQuest geocoding client
//!
//! Calls `GET {base_url}/geocoding/v1/address?key=..&location=..` and takes
//! the first location of the first result as the best match.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;

use crate::domain::bootcamp::Location;
use crate::domain::geo::GeoPoint;
use crate::domain::{GeocodeError, Geocoder};

pub const DEFAULT_BASE_URL: &str = "https://www.mapquestapi.com";

#[derive(Debug, Deserialize)]
struct AddressResponse {
    #[serde(default)]
    info: Option<ResponseInfo>,
    #[serde(default)]
    results: Vec<AddressResult>,
}

#[derive(Debug, Deserialize)]
struct ResponseInfo {
    statuscode: i32,
    #[serde(default)]
    messages: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AddressResult {
    #[serde(default)]
    locations: Vec<MatchedLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchedLocation {
    lat_lng: LatLng,
    #[serde(default)]
    street: Option<String>,
    #[serde(default)]
    admin_area5: Option<String>,
    #[serde(default)]
    admin_area3: Option<String>,
    #[serde(default)]
    admin_area1: Option<String>,
    #[serde(default)]
    postal_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl MatchedLocation {
    fn into_location(self) -> Location {
        let street = non_empty(self.street);
        let city = non_empty(self.admin_area5);
        let state = non_empty(self.admin_area3);
        let zipcode = non_empty(self.postal_code);
        let country = non_empty(self.admin_area1);

        let formatted = [&street, &city, &state, &zipcode, &country]
            .into_iter()
            .flatten()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");

        Location {
            point: Some(GeoPoint::new(self.lat_lng.lng, self.lat_lng.lat)),
            formatted_address: (!formatted.is_empty()).then_some(formatted),
            street,
            city,
            state,
            zipcode,
            country,
        }
    }
}

/// Extract the best match from a decoded response body
fn best_match(query: &str, body: AddressResponse) -> Result<Location, GeocodeError> {
    if let Some(info) = &body.info {
        if info.statuscode != 0 {
            return Err(GeocodeError::Provider(format!(
                "status {}: {}",
                info.statuscode,
                info.messages.join("; ")
            )));
        }
    }
    body.results
        .into_iter()
        .flat_map(|r| r.locations)
        .next()
        .map(MatchedLocation::into_location)
        .ok_or_else(|| GeocodeError::NoMatch(query.to_string()))
}

/// MapQuest-backed [`Geocoder`]
pub struct MapQuestGeocoder {
    client: Client,
    base_url: String,
    api_key: String,
}

impl MapQuestGeocoder {
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeocodeError::Provider(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl Geocoder for MapQuestGeocoder {
    async fn geocode(&self, query: &str) -> Result<Location, GeocodeError> {
        let url = format!("{}/geocoding/v1/address", self.base_url);
        debug!("Geocoding '{}' via MapQuest", query);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("location", query)])
            .send()
            .await
            .map_err(|e| GeocodeError::Provider(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("MapQuest answered {} for '{}'", status, query);
            return Err(GeocodeError::Provider(format!("HTTP {}", status)));
        }

        let body: AddressResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Provider(format!("invalid response: {}", e)))?;

        best_match(query, body)
    }
}
