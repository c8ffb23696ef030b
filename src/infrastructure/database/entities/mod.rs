//! Database entities module

pub mod bootcamp;

pub use bootcamp::Entity as Bootcamp;
