//! In-process storage implementations

mod memory;

pub use memory::InMemoryBootcampRepository;
pub(crate) use memory::{compare_by, duplicate_name};
