//! Database repository implementations

pub mod bootcamp_repository;

pub use bootcamp_repository::SeaOrmBootcampRepository;
