//! Liveness and storage health endpoint

pub mod handlers;

pub use handlers::*;
