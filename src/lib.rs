//! # DevCamper API
//!
//! REST API for coding bootcamps: filtered and paginated listings, CRUD and
//! radius search around a geocoded postal code.
//!
//! ## Architecture
//!
//! - **domain**: the bootcamp entity, query model (filters, sorting,
//!   pagination, projection), spherical geometry and ports
//! - **application**: bootcamp use cases
//! - **infrastructure**: SeaORM and in-memory storage, geocoders, shutdown
//! - **interfaces**: axum router, handlers and the error responder
//! - **server**: process runtime shared by the CLI and tests

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig, SeaOrmBootcampRepository};

pub use interfaces::create_api_router;
