//! Centralized error responder
//!
//! Every handler returns `Result<_, ApiError>`; this is the only place where
//! failures become HTTP statuses and `{success: false, error}` bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

use super::ApiResponse;
use crate::domain::{DomainError, GeocodeError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Body could not be read or parsed as JSON
    #[error("{0}")]
    BadRequest(String),

    /// Body parsed but failed field validation
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Domain(e) => match e {
                DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
                DomainError::Validation(_) | DomainError::Cast { .. } => StatusCode::BAD_REQUEST,
                DomainError::Geocode(GeocodeError::NoMatch(_)) => StatusCode::BAD_REQUEST,
                DomainError::Geocode(GeocodeError::Provider(_)) => StatusCode::BAD_GATEWAY,
                DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Client-facing message; storage details stay in the logs
    pub fn message(&self) -> String {
        match self {
            Self::Domain(DomainError::Storage(_)) => "Server Error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), "Request failed: {}", self);
        } else {
            warn!(status = status.as_u16(), "Request rejected: {}", self);
        }
        (status, Json(ApiResponse::<()>::error(self.message()))).into_response()
    }
}
