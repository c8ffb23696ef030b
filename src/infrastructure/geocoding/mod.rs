//! Geocoder adapters

pub mod mapquest;
pub mod static_table;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::GeocoderConfig;
use crate::domain::{GeocodeError, Geocoder};

pub use mapquest::MapQuestGeocoder;
pub use static_table::{StaticGeocoder, StaticPlace};

/// Build the configured geocoder (`mapquest` or `static`)
pub fn build_geocoder(config: &GeocoderConfig) -> Result<Arc<dyn Geocoder>, GeocodeError> {
    match config.provider.trim().to_lowercase().as_str() {
        "mapquest" => {
            let api_key = config
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| {
                    GeocodeError::Provider("geocoder.api_key is required for mapquest".into())
                })?;
            let geocoder = MapQuestGeocoder::new(
                api_key,
                config.base_url.clone(),
                Duration::from_secs(config.timeout_secs),
            )?;
            info!("Geocoder: mapquest");
            Ok(Arc::new(geocoder))
        }
        "static" => {
            let geocoder = StaticGeocoder::new(config.places.clone());
            info!("Geocoder: static table ({} places)", geocoder.len());
            Ok(Arc::new(geocoder))
        }
        other => Err(GeocodeError::Provider(format!(
            "Unknown geocoder provider '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapquest_requires_an_api_key() {
        let config = GeocoderConfig {
            provider: "mapquest".into(),
            api_key: Some("  ".into()),
            ..Default::default()
        };
        assert!(build_geocoder(&config).is_err());
    }

    #[test]
    fn rejects_unknown_provider() {
        let config = GeocoderConfig {
            provider: "carrier-pigeon".into(),
            ..Default::default()
        };
        assert!(matches!(build_geocoder(&config), Err(GeocodeError::Provider(_))));
    }

    #[tokio::test]
    async fn static_provider_uses_configured_places() {
        let config = GeocoderConfig {
            provider: "static".into(),
            places: vec![StaticPlace::new("10001", -73.99, 40.75)],
            ..Default::default()
        };
        let geocoder = build_geocoder(&config).unwrap();
        assert!(geocoder.geocode("10001").await.is_ok());
    }
}
