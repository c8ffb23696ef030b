//! Geocoding port

use async_trait::async_trait;

use super::bootcamp::Location;
use super::error::GeocodeError;

/// Resolves a free-form address or postal code to its best match.
///
/// Implementations must return a [`Location`] with `point` set, or
/// [`GeocodeError::NoMatch`].
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<Location, GeocodeError>;
}
