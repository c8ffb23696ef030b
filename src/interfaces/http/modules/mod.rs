//! HTTP resource modules, one per route group

pub mod bootcamps;
pub mod health;
pub mod metrics;
pub mod request_id;
