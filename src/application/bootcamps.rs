//! Bootcamp use cases: listing, CRUD and radius search

use std::sync::Arc;

use log::info;
use uuid::Uuid;

use crate::domain::bootcamp::{Bootcamp, BootcampChanges, BootcampRepository, Location, NewBootcamp};
use crate::domain::geo::{DistanceUnit, SphereRegion};
use crate::domain::query::{CountScope, Filter, FilterMap, ListQuery, Pagination, QueryOptions};
use crate::domain::{DomainError, DomainResult, GeocodeError, Geocoder};

/// One page of a list query
#[derive(Debug, Clone)]
pub struct BootcampPage {
    pub items: Vec<Bootcamp>,
    pub total: u64,
    pub pagination: Pagination,
}

/// Service for bootcamp operations
pub struct BootcampService {
    repo: Arc<dyn BootcampRepository>,
    geocoder: Arc<dyn Geocoder>,
    count_scope: CountScope,
}

impl BootcampService {
    pub fn new(repo: Arc<dyn BootcampRepository>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            repo,
            geocoder,
            count_scope: CountScope::default(),
        }
    }

    pub fn with_count_scope(mut self, scope: CountScope) -> Self {
        self.count_scope = scope;
        self
    }

    pub fn repository(&self) -> &Arc<dyn BootcampRepository> {
        &self.repo
    }

    /// Filter, sort and page the collection.
    ///
    /// Issues the page query and exactly one count query.
    pub async fn list(&self, filter: &FilterMap, options: QueryOptions) -> DomainResult<BootcampPage> {
        let query = ListQuery {
            filter: Filter::from_map(filter)?,
            options,
        };

        let count_filter = match self.count_scope {
            CountScope::Filtered => query.filter.clone(),
            CountScope::Collection => Filter::all(),
        };

        let (items, total) = tokio::try_join!(self.repo.find(&query), self.repo.count(&count_filter))?;
        let pagination = Pagination::compute(query.options.page, query.options.limit, total);

        Ok(BootcampPage {
            items,
            total,
            pagination,
        })
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<Bootcamp> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Bootcamp", id))
    }

    pub async fn create(&self, input: NewBootcamp) -> DomainResult<Bootcamp> {
        ensure_named(&input.name)?;
        let location = self.locate(&input.address).await?;
        let bootcamp = self.repo.insert(Bootcamp::create(input, location)).await?;
        info!("Bootcamp created: {} ({})", bootcamp.name, bootcamp.id);
        Ok(bootcamp)
    }

    /// Partial update; a new `address` is geocoded again
    pub async fn update(&self, id: Uuid, changes: BootcampChanges) -> DomainResult<Bootcamp> {
        if let Some(name) = changes.name.as_deref() {
            ensure_named(name)?;
        }
        let mut bootcamp = self.get(id).await?;
        let location = match changes.address.as_deref() {
            Some(address) => Some(self.locate(address).await?),
            None => None,
        };
        bootcamp.apply(changes, location);
        let bootcamp = self.repo.update(bootcamp).await?;
        info!("Bootcamp updated: {}", bootcamp.id);
        Ok(bootcamp)
    }

    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.repo.delete(id).await?;
        info!("Bootcamp deleted: {}", id);
        Ok(())
    }

    /// Bootcamps within `distance` of the place a postal code resolves to
    pub async fn within_radius(
        &self,
        zipcode: &str,
        distance: f64,
        unit: DistanceUnit,
    ) -> DomainResult<Vec<Bootcamp>> {
        let center = self
            .locate(zipcode)
            .await?
            .point
            .ok_or_else(|| GeocodeError::NoMatch(zipcode.to_string()))?;
        let region = SphereRegion::from_distance(center, distance, unit)?;
        self.repo.find_within(&region).await
    }

    async fn locate(&self, query: &str) -> DomainResult<Location> {
        let location = self.geocoder.geocode(query).await?;
        if location.point.is_none() {
            return Err(GeocodeError::NoMatch(query.to_string()).into());
        }
        Ok(location)
    }
}

fn ensure_named(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::Validation("Please add a name".to_string()));
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────
