//! SeaORM implementation of BootcampRepository

use async_trait::async_trait;
use log::{debug, info};
use sea_orm::sea_query::SimpleExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, Value,
};
use uuid::Uuid;

use crate::domain::bootcamp::{Bootcamp, BootcampField, BootcampRepository, Career, FieldValue, Location};
use crate::domain::geo::{GeoPoint, SphereRegion};
use crate::domain::query::{ComparisonOp, FieldFilter, Filter, ListQuery, Predicate, SortDirection};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::bootcamp;
use crate::infrastructure::storage::duplicate_name;

// ── Conversion helpers ──────────────────────────────────────────

fn db_err(e: DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

/// Like [`db_err`] but reports a unique index hit as a duplicate name
fn write_err(e: DbErr, name: &str) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => duplicate_name(name),
        _ => db_err(e),
    }
}

fn entity_to_domain(m: bootcamp::Model) -> DomainResult<Bootcamp> {
    let id = Uuid::parse_str(&m.id)
        .map_err(|_| DomainError::Storage(format!("Malformed bootcamp id '{}'", m.id)))?;
    let careers: Vec<Career> = serde_json::from_str(&m.careers)
        .map_err(|e| DomainError::Storage(format!("Malformed careers for {}: {}", m.id, e)))?;
    let point = match (m.longitude, m.latitude) {
        (Some(lng), Some(lat)) => Some(GeoPoint::new(lng, lat)),
        _ => None,
    };

    Ok(Bootcamp {
        id,
        name: m.name,
        slug: m.slug,
        description: m.description,
        website: m.website,
        phone: m.phone,
        email: m.email,
        location: Location {
            point,
            formatted_address: m.formatted_address,
            street: m.street,
            city: m.city,
            state: m.state,
            zipcode: m.zipcode,
            country: m.country,
        },
        careers,
        average_rating: m.average_rating,
        average_cost: m.average_cost,
        photo: m.photo,
        housing: m.housing,
        job_assistance: m.job_assistance,
        job_guarantee: m.job_guarantee,
        accept_gi: m.accept_gi,
        created_at: m.created_at,
    })
}

fn domain_to_active(b: &Bootcamp) -> DomainResult<bootcamp::ActiveModel> {
    let careers = serde_json::to_string(&b.careers)
        .map_err(|e| DomainError::Storage(format!("Failed to encode careers: {}", e)))?;
    let point = b.location.point;

    Ok(bootcamp::ActiveModel {
        id: Set(b.id.to_string()),
        name: Set(b.name.clone()),
        slug: Set(b.slug.clone()),
        description: Set(b.description.clone()),
        website: Set(b.website.clone()),
        phone: Set(b.phone.clone()),
        email: Set(b.email.clone()),
        longitude: Set(point.map(|p| p.lng)),
        latitude: Set(point.map(|p| p.lat)),
        formatted_address: Set(b.location.formatted_address.clone()),
        street: Set(b.location.street.clone()),
        city: Set(b.location.city.clone()),
        state: Set(b.location.state.clone()),
        zipcode: Set(b.location.zipcode.clone()),
        country: Set(b.location.country.clone()),
        careers: Set(careers),
        average_rating: Set(b.average_rating),
        average_cost: Set(b.average_cost),
        photo: Set(b.photo.clone()),
        housing: Set(b.housing),
        job_assistance: Set(b.job_assistance),
        job_guarantee: Set(b.job_guarantee),
        accept_gi: Set(b.accept_gi),
        created_at: Set(b.created_at),
    })
}

fn column(field: BootcampField) -> bootcamp::Column {
    use bootcamp::Column;
    match field {
        BootcampField::Id => Column::Id,
        BootcampField::Name => Column::Name,
        BootcampField::Slug => Column::Slug,
        BootcampField::Description => Column::Description,
        BootcampField::Website => Column::Website,
        BootcampField::Phone => Column::Phone,
        BootcampField::Email => Column::Email,
        BootcampField::Careers => Column::Careers,
        BootcampField::AverageRating => Column::AverageRating,
        BootcampField::AverageCost => Column::AverageCost,
        BootcampField::Photo => Column::Photo,
        BootcampField::Housing => Column::Housing,
        BootcampField::JobAssistance => Column::JobAssistance,
        BootcampField::JobGuarantee => Column::JobGuarantee,
        BootcampField::AcceptGi => Column::AcceptGi,
        BootcampField::CreatedAt => Column::CreatedAt,
        BootcampField::City => Column::City,
        BootcampField::State => Column::State,
        BootcampField::Zipcode => Column::Zipcode,
        BootcampField::Country => Column::Country,
    }
}

fn to_value(v: &FieldValue) -> Value {
    match v {
        FieldValue::Id(id) => id.to_string().into(),
        FieldValue::Text(s) => s.clone().into(),
        FieldValue::Number(n) => (*n).into(),
        FieldValue::Bool(b) => (*b).into(),
        FieldValue::Timestamp(ts) => (*ts).into(),
    }
}

/// `careers` holds a JSON array; membership is a match on the quoted label
fn career_match(label: &FieldValue) -> SimpleExpr {
    let needle = match label {
        FieldValue::Text(s) => s.as_str(),
        _ => "",
    };
    bootcamp::Column::Careers.like(format!("%\"{}\"%", needle))
}

fn clause_condition(clause: &FieldFilter) -> Condition {
    let col = column(clause.field);
    let careers = clause.field == BootcampField::Careers;
    match &clause.predicate {
        Predicate::Eq(v) if careers => Condition::all().add(career_match(v)),
        Predicate::Eq(v) => Condition::all().add(col.eq(to_value(v))),
        Predicate::In(values) if careers => values
            .iter()
            .fold(Condition::any(), |cond, v| cond.add(career_match(v))),
        Predicate::In(values) => Condition::all().add(col.is_in(values.iter().map(to_value))),
        Predicate::Compare(op, v) => {
            let v = to_value(v);
            let expr = match op {
                ComparisonOp::Gt => col.gt(v),
                ComparisonOp::Gte => col.gte(v),
                ComparisonOp::Lt => col.lt(v),
                ComparisonOp::Lte => col.lte(v),
            };
            Condition::all().add(expr)
        }
    }
}

fn filter_condition(filter: &Filter) -> Condition {
    filter
        .clauses()
        .iter()
        .fold(Condition::all(), |cond, clause| cond.add(clause_condition(clause)))
}

// ── SeaOrmBootcampRepository ────────────────────────────────────

pub struct SeaOrmBootcampRepository {
    db: DatabaseConnection,
}

impl SeaOrmBootcampRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BootcampRepository for SeaOrmBootcampRepository {
    async fn find(&self, query: &ListQuery) -> DomainResult<Vec<Bootcamp>> {
        let mut select = bootcamp::Entity::find().filter(filter_condition(&query.filter));
        for key in query.options.effective_sort() {
            let order = match key.direction {
                SortDirection::Ascending => Order::Asc,
                SortDirection::Descending => Order::Desc,
            };
            select = select.order_by(column(key.field), order);
        }

        let models = select
            .order_by_asc(bootcamp::Column::Id)
            .offset(query.options.skip())
            .limit(query.options.take())
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(entity_to_domain).collect()
    }

    async fn count(&self, filter: &Filter) -> DomainResult<u64> {
        bootcamp::Entity::find()
            .filter(filter_condition(filter))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Bootcamp>> {
        let model = bootcamp::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(entity_to_domain).transpose()
    }

    async fn find_within(&self, region: &SphereRegion) -> DomainResult<Vec<Bootcamp>> {
        let bbox = region.bounding_box();
        let mut cond = Condition::all().add(bootcamp::Column::Latitude.between(bbox.min_lat, bbox.max_lat));
        if let Some((min_lng, max_lng)) = bbox.lng {
            cond = cond.add(bootcamp::Column::Longitude.between(min_lng, max_lng));
        } else {
            cond = cond.add(bootcamp::Column::Longitude.is_not_null());
        }

        let candidates = bootcamp::Entity::find()
            .filter(cond)
            .order_by_asc(bootcamp::Column::CreatedAt)
            .order_by_asc(bootcamp::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        debug!("Radius pre-filter matched {} rows", candidates.len());

        let mut hits = Vec::new();
        for model in candidates {
            let bootcamp = entity_to_domain(model)?;
            if bootcamp.location.point.map(|p| region.contains(&p)).unwrap_or(false) {
                hits.push(bootcamp);
            }
        }
        Ok(hits)
    }

    async fn insert(&self, b: Bootcamp) -> DomainResult<Bootcamp> {
        let model = domain_to_active(&b)?;
        let result = model.insert(&self.db).await.map_err(|e| write_err(e, &b.name))?;
        info!("Bootcamp saved: {} ({})", result.name, result.id);
        entity_to_domain(result)
    }

    async fn update(&self, b: Bootcamp) -> DomainResult<Bootcamp> {
        let model = domain_to_active(&b)?;
        match model.update(&self.db).await {
            Ok(result) => entity_to_domain(result),
            Err(DbErr::RecordNotUpdated) => Err(DomainError::not_found("Bootcamp", b.id)),
            Err(e) => Err(write_err(e, &b.name)),
        }
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = bootcamp::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Bootcamp", id));
        }
        Ok(())
    }

    async fn ping(&self) -> DomainResult<()> {
        self.db.ping().await.map_err(db_err)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bootcamp::NewBootcamp;
    use crate::domain::geo::DistanceUnit;
    use crate::domain::query::{FilterMap, FilterNode, QueryOptions, SortKey};
    use crate::infrastructure::database::{init_database, DatabaseConfig};
    use crate::infrastructure::database::migrator::Migrator;
    use sea_orm_migration::MigratorTrait;

    async fn repo() -> SeaOrmBootcampRepository {
        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SeaOrmBootcampRepository::new(db)
    }

    fn camp(name: &str, careers: Vec<Career>, cost: Option<f64>, point: GeoPoint) -> Bootcamp {
        let mut location = Location::at(point);
        location.city = Some("Boston".into());
        let mut b = Bootcamp::create(
            NewBootcamp {
                name: name.into(),
                description: "d".into(),
                careers,
                ..Default::default()
            },
            location,
        );
        b.average_cost = cost;
        b
    }

    fn filter(pairs: &[(&str, FilterNode)]) -> Filter {
        let map: FilterMap = pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        Filter::from_map(&map).unwrap()
    }

    fn op(op: &str, value: &str) -> FilterNode {
        let mut inner = FilterMap::new();
        inner.insert(op.into(), FilterNode::Value(value.into()));
        FilterNode::Map(inner)
    }

    #[tokio::test]
    async fn round_trips_a_record() {
        let repo = repo().await;
        let b = camp("Devworks", vec![Career::UiUx, Career::Business], Some(10000.0), GeoPoint::new(-71.1, 42.3));
        repo.insert(b.clone()).await.unwrap();

        let found = repo.find_by_id(b.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Devworks");
        assert_eq!(found.careers, vec![Career::UiUx, Career::Business]);
        assert_eq!(found.location.point, Some(GeoPoint::new(-71.1, 42.3)));
        assert_eq!(found.location.city.as_deref(), Some("Boston"));
        assert_eq!(found.created_at, b.created_at);
    }

    #[tokio::test]
    async fn filters_by_comparison_and_career() {
        let repo = repo().await;
        let origin = GeoPoint::new(0.0, 0.0);
        repo.insert(camp("A", vec![Career::WebDevelopment], Some(5000.0), origin)).await.unwrap();
        repo.insert(camp("B", vec![Career::UiUx], Some(12000.0), origin)).await.unwrap();
        repo.insert(camp("C", vec![Career::UiUx, Career::Business], None, origin)).await.unwrap();

        let pricey = filter(&[("averageCost", op("gt", "6000"))]);
        assert_eq!(repo.count(&pricey).await.unwrap(), 1);

        let design = filter(&[("careers", FilterNode::Value("UI/UX".into()))]);
        assert_eq!(repo.count(&design).await.unwrap(), 2);

        let either = filter(&[("careers", op("in", "Business,Web Development"))]);
        assert_eq!(repo.count(&either).await.unwrap(), 2);

        let city = filter(&[("location", {
            let mut inner = FilterMap::new();
            inner.insert("city".into(), FilterNode::Value("Boston".into()));
            FilterNode::Map(inner)
        })]);
        assert_eq!(repo.count(&city).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn sorts_and_pages_like_the_memory_store() {
        let repo = repo().await;
        let memory = crate::infrastructure::storage::InMemoryBootcampRepository::new();
        for (i, cost) in [300.0, 100.0, 300.0, 200.0, 500.0].into_iter().enumerate() {
            let b = camp(&format!("Camp {}", i), vec![Career::Other], Some(cost), GeoPoint::new(0.0, 0.0));
            repo.insert(b.clone()).await.unwrap();
            memory.insert(b).await.unwrap();
        }

        for page in 1..=3 {
            let query = ListQuery {
                filter: Filter::all(),
                options: QueryOptions {
                    sort: vec![SortKey::desc(BootcampField::AverageCost)],
                    page,
                    limit: 2,
                    ..Default::default()
                },
            };
            let sql: Vec<Uuid> = repo.find(&query).await.unwrap().iter().map(|b| b.id).collect();
            let mem: Vec<Uuid> = memory.find(&query).await.unwrap().iter().map(|b| b.id).collect();
            assert_eq!(sql, mem, "page {}", page);
        }
    }

    #[tokio::test]
    async fn huge_page_or_limit_does_not_overflow_the_binding() {
        let repo = repo().await;
        for name in ["A", "B", "C"] {
            repo.insert(camp(name, vec![Career::Other], None, GeoPoint::new(0.0, 0.0)))
                .await
                .unwrap();
        }
        let query = |page: Option<&str>, limit: Option<&str>| ListQuery {
            filter: Filter::all(),
            options: QueryOptions::from_raw(None, None, page, limit, 25).unwrap(),
        };

        let far = repo.find(&query(Some("18446744073709551615"), None)).await.unwrap();
        assert!(far.is_empty());

        let wide = repo.find(&query(None, Some("18446744073709551615"))).await.unwrap();
        assert_eq!(wide.len(), 3);

        let both = query(Some("4294967296"), Some("4294967296"));
        assert!(repo.find(&both).await.unwrap().is_empty());

        let raw = ListQuery {
            filter: Filter::all(),
            options: QueryOptions {
                page: u64::MAX,
                limit: u64::MAX,
                ..Default::default()
            },
        };
        assert!(repo.find(&raw).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_name_is_a_validation_error() {
        let repo = repo().await;
        let origin = GeoPoint::new(0.0, 0.0);
        repo.insert(camp("Devworks", vec![Career::Other], None, origin)).await.unwrap();
        let err = repo
            .insert(camp("Devworks", vec![Career::Other], None, origin))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let repo = repo().await;
        let ghost = camp("Ghost", vec![Career::Other], None, GeoPoint::new(0.0, 0.0));
        assert!(matches!(repo.update(ghost.clone()).await, Err(DomainError::NotFound { .. })));
        assert!(matches!(repo.delete(ghost.id).await, Err(DomainError::NotFound { .. })));

        repo.insert(ghost.clone()).await.unwrap();
        repo.delete(ghost.id).await.unwrap();
        assert!(repo.find_by_id(ghost.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn radius_query_applies_exact_distance_after_the_box() {
        let repo = repo().await;
        let boston = GeoPoint::new(-71.0589, 42.3601);
        repo.insert(camp("Center", vec![Career::Other], None, boston)).await.unwrap();
        repo.insert(camp("Cambridge", vec![Career::Other], None, GeoPoint::new(-71.1097, 42.3736)))
            .await
            .unwrap();
        repo.insert(camp("New York", vec![Career::Other], None, GeoPoint::new(-74.0060, 40.7128)))
            .await
            .unwrap();
        // Inside the bounding box corner, outside the circle
        repo.insert(camp("Corner", vec![Career::Other], None, GeoPoint::new(-70.88, 42.49)))
            .await
            .unwrap();

        let region = SphereRegion::from_distance(boston, 10.0, DistanceUnit::Miles).unwrap();
        let mut names: Vec<String> = repo
            .find_within(&region)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["Cambridge", "Center"]);

        let zero = SphereRegion::from_distance(boston, 0.0, DistanceUnit::Miles).unwrap();
        let hits = repo.find_within(&zero).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Center");

        let swapped = SphereRegion::from_distance(GeoPoint::new(boston.lat, boston.lng), 10.0, DistanceUnit::Miles)
            .unwrap();
        assert!(repo.find_within(&swapped).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ping_succeeds_on_a_live_connection() {
        assert!(repo().await.ping().await.is_ok());
    }
}
