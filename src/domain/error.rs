//! Domain errors

use thiserror::Error;

/// Failure to turn a free-form address or postal code into coordinates
#[derive(Debug, Clone, Error)]
pub enum GeocodeError {
    /// The provider answered but had no usable match
    #[error("Could not resolve a location for '{0}'")]
    NoMatch(String),

    /// The provider could not be reached or returned garbage
    #[error("Geocoding provider failed: {0}")]
    Provider(String),
}

#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error("{entity} not found with id of {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    Validation(String),

    /// A value (path id, filter or sort field) that cannot be interpreted
    #[error("Invalid value '{value}' for {field}")]
    Cast { field: String, value: String },

    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn cast(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Cast {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
