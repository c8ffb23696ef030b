//! Infrastructure layer - external concerns

pub mod database;
pub mod geocoding;
pub mod server;
pub mod storage;

pub use database::{init_database, DatabaseConfig, DatabasePool, SeaOrmBootcampRepository};
pub use geocoding::build_geocoder;
pub use server::{ShutdownCoordinator, ShutdownReason, ShutdownSignal};
pub use storage::InMemoryBootcampRepository;
