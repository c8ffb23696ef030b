//! Domain layer: the bootcamp entity, query model, geometry and ports

pub mod bootcamp;
pub mod error;
pub mod geo;
pub mod geocoding;
pub mod query;

pub use bootcamp::{Bootcamp, BootcampChanges, BootcampRepository, Career, Location, NewBootcamp};
pub use error::{DomainError, DomainResult, GeocodeError};
pub use geo::{DistanceUnit, GeoPoint, SphereRegion};
pub use geocoding::Geocoder;
pub use query::{CountScope, Filter, FilterMap, ListQuery, Pagination, QueryOptions};
