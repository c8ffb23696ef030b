//! Fixed-table geocoder for offline development and tests

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::bootcamp::Location;
use crate::domain::geo::GeoPoint;
use crate::domain::{GeocodeError, Geocoder};

/// One known address or postal code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticPlace {
    /// Lookup key, compared case-insensitively after trimming
    pub query: String,
    pub lng: f64,
    pub lat: f64,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zipcode: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl StaticPlace {
    pub fn new(query: impl Into<String>, lng: f64, lat: f64) -> Self {
        Self {
            query: query.into(),
            lng,
            lat,
            street: None,
            city: None,
            state: None,
            zipcode: None,
            country: None,
        }
    }

    fn to_location(&self) -> Location {
        let formatted = [&self.street, &self.city, &self.state, &self.zipcode, &self.country]
            .into_iter()
            .flatten()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        Location {
            point: Some(GeoPoint::new(self.lng, self.lat)),
            formatted_address: Some(if formatted.is_empty() {
                self.query.clone()
            } else {
                formatted
            }),
            street: self.street.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zipcode: self.zipcode.clone(),
            country: self.country.clone(),
        }
    }
}

/// Resolves queries against a fixed in-memory table
pub struct StaticGeocoder {
    places: HashMap<String, Location>,
}

impl StaticGeocoder {
    pub fn new(places: impl IntoIterator<Item = StaticPlace>) -> Self {
        Self {
            places: places
                .into_iter()
                .map(|p| (normalize(&p.query), p.to_location()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, query: &str) -> Result<Location, GeocodeError> {
        self.places
            .get(&normalize(query))
            .cloned()
            .ok_or_else(|| GeocodeError::NoMatch(query.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn looks_up_case_insensitively() {
        let mut place = StaticPlace::new("02215", -71.1, 42.35);
        place.city = Some("Boston".into());
        place.state = Some("MA".into());
        let geocoder = StaticGeocoder::new([place]);

        let location = geocoder.geocode(" 02215 ").await.unwrap();
        assert_eq!(location.point, Some(GeoPoint::new(-71.1, 42.35)));
        assert_eq!(location.formatted_address.as_deref(), Some("Boston, MA"));
    }

    #[tokio::test]
    async fn unknown_query_is_no_match() {
        let geocoder = StaticGeocoder::new(Vec::new());
        assert!(geocoder.is_empty());
        assert!(matches!(
            geocoder.geocode("nowhere").await,
            Err(GeocodeError::NoMatch(q)) if q == "nowhere"
        ));
    }
}
