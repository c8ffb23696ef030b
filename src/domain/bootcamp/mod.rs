//! Bootcamp aggregate
//!
//! Contains the Bootcamp entity, its queryable fields and the repository port.

pub mod fields;
pub mod model;
pub mod repository;

pub use fields::{BootcampField, FieldKind, FieldValue};
pub use model::{
    parse_bootcamp_id, slugify, Bootcamp, BootcampChanges, Career, Location, NewBootcamp,
    DEFAULT_PHOTO,
};
pub use repository::BootcampRepository;
