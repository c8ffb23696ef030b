//! Health check handler

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::BootcampRepository;

/// Health check state
#[derive(Clone)]
pub struct HealthState {
    pub repo: Arc<dyn BootcampRepository>,
    pub started_at: Arc<Instant>,
}

/// Service health response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: ComponentHealth,
}

/// Component health status
#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    pub status: String,
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is degraded", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let uptime = state.started_at.elapsed().as_secs();

    let db_start = Instant::now();
    let database = match state.repo.ping().await {
        Ok(()) => ComponentHealth {
            status: "ok".to_string(),
            latency_ms: Some(db_start.elapsed().as_millis() as u64),
            error: None,
        },
        Err(e) => {
            tracing::warn!("Health check: storage ping failed: {}", e);
            ComponentHealth {
                status: "error".to_string(),
                latency_ms: None,
                error: Some("storage unavailable".to_string()),
            }
        }
    };

    let healthy = database.status == "ok";
    let http_status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        http_status,
        Json(HealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: uptime,
            database,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use uuid::Uuid;

    use crate::domain::bootcamp::Bootcamp;
    use crate::domain::geo::SphereRegion;
    use crate::domain::query::{Filter, ListQuery};
    use crate::domain::{DomainError, DomainResult};

    struct UnreachableStore;

    fn down<T>() -> DomainResult<T> {
        Err(DomainError::Storage("unable to open /var/lib/devcamper/db.sqlite".into()))
    }

    #[async_trait]
    impl BootcampRepository for UnreachableStore {
        async fn find(&self, _: &ListQuery) -> DomainResult<Vec<Bootcamp>> {
            down()
        }
        async fn count(&self, _: &Filter) -> DomainResult<u64> {
            down()
        }
        async fn find_by_id(&self, _: Uuid) -> DomainResult<Option<Bootcamp>> {
            down()
        }
        async fn find_within(&self, _: &SphereRegion) -> DomainResult<Vec<Bootcamp>> {
            down()
        }
        async fn insert(&self, _: Bootcamp) -> DomainResult<Bootcamp> {
            down()
        }
        async fn update(&self, _: Bootcamp) -> DomainResult<Bootcamp> {
            down()
        }
        async fn delete(&self, _: Uuid) -> DomainResult<()> {
            down()
        }
        async fn ping(&self) -> DomainResult<()> {
            down()
        }
    }

    #[tokio::test]
    async fn storage_failure_is_degraded_without_details() {
        let state = HealthState {
            repo: Arc::new(UnreachableStore),
            started_at: Arc::new(Instant::now()),
        };
        let (status, Json(body)) = health_check(State(state)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "degraded");
        assert_eq!(body.database.error.as_deref(), Some("storage unavailable"));

        let text = serde_json::to_string(&body).unwrap();
        assert!(!text.contains("/var/lib"));
    }
}
