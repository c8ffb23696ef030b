//! HTTP REST API interfaces
//!
//! - `common`: envelopes, the error responder and request extractors
//! - `modules`: handlers per resource plus request-level middleware
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, AppState, RouterOptions};
