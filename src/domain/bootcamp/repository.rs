//! Bootcamp persistence port

use async_trait::async_trait;
use uuid::Uuid;

use super::model::Bootcamp;
use crate::domain::error::DomainResult;
use crate::domain::geo::SphereRegion;
use crate::domain::query::{Filter, ListQuery};

#[async_trait]
pub trait BootcampRepository: Send + Sync {
    /// Filter, sort and slice in one round trip
    async fn find(&self, query: &ListQuery) -> DomainResult<Vec<Bootcamp>>;

    /// Number of records matching `filter`; an empty filter counts the collection
    async fn count(&self, filter: &Filter) -> DomainResult<u64>;

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Bootcamp>>;

    /// Records whose location lies inside `region`, in natural order
    async fn find_within(&self, region: &SphereRegion) -> DomainResult<Vec<Bootcamp>>;

    async fn insert(&self, bootcamp: Bootcamp) -> DomainResult<Bootcamp>;

    /// Replace a stored record; `NotFound` if it no longer exists
    async fn update(&self, bootcamp: Bootcamp) -> DomainResult<Bootcamp>;

    async fn delete(&self, id: Uuid) -> DomainResult<()>;

    /// Cheap liveness check for `/health`
    async fn ping(&self) -> DomainResult<()>;
}
