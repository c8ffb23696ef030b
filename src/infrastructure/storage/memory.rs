//! In-memory bootcamp repository

use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::bootcamp::{Bootcamp, BootcampRepository};
use crate::domain::geo::SphereRegion;
use crate::domain::query::{Filter, ListQuery, SortDirection, SortKey};
use crate::domain::{DomainError, DomainResult};

/// In-memory storage for development and testing
///
/// Evaluates the same typed [`Filter`] as the SQL repository, so handler
/// tests exercise real query semantics without a database.
pub struct InMemoryBootcampRepository {
    bootcamps: DashMap<Uuid, (u64, Bootcamp)>,
    sequence: AtomicU64,
    /// Held across the name check and the write
    writes: Mutex<()>,
}

impl InMemoryBootcampRepository {
    pub fn new() -> Self {
        Self {
            bootcamps: DashMap::new(),
            sequence: AtomicU64::new(0),
            writes: Mutex::new(()),
        }
    }

    /// Snapshot in insertion order
    fn snapshot(&self) -> Vec<Bootcamp> {
        let mut rows: Vec<(u64, Bootcamp)> = self
            .bootcamps
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|(seq, _)| *seq);
        rows.into_iter().map(|(_, b)| b).collect()
    }

    fn ensure_unique_name(&self, bootcamp: &Bootcamp) -> DomainResult<()> {
        let taken = self
            .bootcamps
            .iter()
            .any(|e| e.key() != &bootcamp.id && e.value().1.name == bootcamp.name);
        if taken {
            return Err(duplicate_name(&bootcamp.name));
        }
        Ok(())
    }
}

impl Default for InMemoryBootcampRepository {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn duplicate_name(name: &str) -> DomainError {
    DomainError::Validation(format!("Duplicate field value entered: name '{}'", name))
}

/// Order two records by the sort keys, then by id for a total order.
/// Unset values sort first ascending, last descending.
pub(crate) fn compare_by(keys: &[SortKey], a: &Bootcamp, b: &Bootcamp) -> Ordering {
    for key in keys {
        let left = a.values(key.field).into_iter().next();
        let right = b.values(key.field).into_iter().next();
        let ord = match (left, right) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => x.compare(&y).unwrap_or(Ordering::Equal),
        };
        let ord = match key.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.id.cmp(&b.id)
}

#[async_trait]
impl BootcampRepository for InMemoryBootcampRepository {
    async fn find(&self, query: &ListQuery) -> DomainResult<Vec<Bootcamp>> {
        let mut rows: Vec<Bootcamp> = self
            .snapshot()
            .into_iter()
            .filter(|b| query.filter.matches(b))
            .collect();

        let keys = query.options.effective_sort();
        rows.sort_by(|a, b| compare_by(&keys, a, b));

        Ok(rows
            .into_iter()
            .skip(usize::try_from(query.options.skip()).unwrap_or(usize::MAX))
            .take(usize::try_from(query.options.take()).unwrap_or(usize::MAX))
            .collect())
    }

    async fn count(&self, filter: &Filter) -> DomainResult<u64> {
        if filter.is_empty() {
            return Ok(self.bootcamps.len() as u64);
        }
        Ok(self
            .bootcamps
            .iter()
            .filter(|e| filter.matches(&e.value().1))
            .count() as u64)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Bootcamp>> {
        Ok(self.bootcamps.get(&id).map(|e| e.value().1.clone()))
    }

    async fn find_within(&self, region: &SphereRegion) -> DomainResult<Vec<Bootcamp>> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|b| b.location.point.map(|p| region.contains(&p)).unwrap_or(false))
            .collect())
    }

    async fn insert(&self, bootcamp: Bootcamp) -> DomainResult<Bootcamp> {
        let _guard = self.writes.lock().await;
        self.ensure_unique_name(&bootcamp)?;
        let seq = self.sequence.fetch_add(1, AtomicOrdering::SeqCst);
        self.bootcamps.insert(bootcamp.id, (seq, bootcamp.clone()));
        Ok(bootcamp)
    }

    async fn update(&self, bootcamp: Bootcamp) -> DomainResult<Bootcamp> {
        let _guard = self.writes.lock().await;
        self.ensure_unique_name(&bootcamp)?;
        match self.bootcamps.get_mut(&bootcamp.id) {
            Some(mut entry) => {
                entry.value_mut().1 = bootcamp.clone();
                Ok(bootcamp)
            }
            None => Err(DomainError::not_found("Bootcamp", bootcamp.id)),
        }
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.bootcamps
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Bootcamp", id))
    }

    async fn ping(&self) -> DomainResult<()> {
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bootcamp::{BootcampField, Location, NewBootcamp};
    use crate::domain::geo::{DistanceUnit, GeoPoint};
    use crate::domain::query::QueryOptions;

    fn camp(name: &str, cost: f64, point: GeoPoint) -> Bootcamp {
        let mut b = Bootcamp::create(
            NewBootcamp {
                name: name.into(),
                description: "d".into(),
                ..Default::default()
            },
            Location::at(point),
        );
        b.average_cost = Some(cost);
        b
    }

    #[tokio::test]
    async fn sorts_pages_and_counts() {
        let repo = InMemoryBootcampRepository::new();
        for i in 0..7 {
            repo.insert(camp(&format!("Camp {}", i), i as f64 * 1000.0, GeoPoint::new(0.0, 0.0)))
                .await
                .unwrap();
        }

        let query = ListQuery {
            filter: Filter::all(),
            options: QueryOptions {
                sort: vec![SortKey::desc(BootcampField::AverageCost)],
                page: 2,
                limit: 3,
                ..Default::default()
            },
        };
        let page = repo.find(&query).await.unwrap();
        let costs: Vec<f64> = page.iter().filter_map(|b| b.average_cost).collect();
        assert_eq!(costs, vec![3000.0, 2000.0, 1000.0]);
        assert_eq!(repo.count(&Filter::all()).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn duplicate_names_are_rejected() {
        let repo = InMemoryBootcampRepository::new();
        repo.insert(camp("Devworks", 1.0, GeoPoint::new(0.0, 0.0))).await.unwrap();
        let err = repo
            .insert(camp("Devworks", 2.0, GeoPoint::new(0.0, 0.0)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_keep_names_unique() {
        let repo = std::sync::Arc::new(InMemoryBootcampRepository::new());
        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.insert(camp("Devworks", i as f64, GeoPoint::new(0.0, 0.0))).await
                })
            })
            .collect();

        let mut created = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(repo.count(&Filter::all()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn update_and_delete_missing_records_are_not_found() {
        let repo = InMemoryBootcampRepository::new();
        let ghost = camp("Ghost", 1.0, GeoPoint::new(0.0, 0.0));
        assert!(matches!(
            repo.update(ghost.clone()).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            repo.delete(ghost.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn finds_within_region_in_insertion_order() {
        let repo = InMemoryBootcampRepository::new();
        let boston = GeoPoint::new(-71.0589, 42.3601);
        repo.insert(camp("Near B", 1.0, GeoPoint::new(-71.1097, 42.3736))).await.unwrap();
        repo.insert(camp("Far", 1.0, GeoPoint::new(-74.0060, 40.7128))).await.unwrap();
        repo.insert(camp("Near A", 1.0, boston)).await.unwrap();

        let region = SphereRegion::from_distance(boston, 10.0, DistanceUnit::Miles).unwrap();
        let names: Vec<String> = repo
            .find_within(&region)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["Near B", "Near A"]);
    }
}
