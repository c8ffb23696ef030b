//! Application layer: use cases orchestrating the domain ports

pub mod bootcamps;

pub use bootcamps::{BootcampPage, BootcampService};
