//! API Router with Swagger UI

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::FromRef,
    http::StatusCode,
    middleware,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ApiResponse, CollectionResponse, EmptyData, ListResponse, PageLinkDto, PaginationDto};
use super::modules::bootcamps::{self, BootcampState};
use super::modules::health::{self, HealthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use crate::application::BootcampService;
use crate::domain::query::DEFAULT_LIMIT;

/// State for every route; handlers pick their slice through `FromRef`
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BootcampService>,
    pub default_limit: u64,
    pub started_at: Arc<Instant>,
    pub metrics: MetricsState,
}

impl AppState {
    pub fn new(service: Arc<BootcampService>) -> Self {
        Self {
            service,
            default_limit: DEFAULT_LIMIT,
            started_at: Arc::new(Instant::now()),
            metrics: MetricsState::default(),
        }
    }

    pub fn with_default_limit(mut self, limit: u64) -> Self {
        self.default_limit = limit.max(1);
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsState) -> Self {
        self.metrics = metrics;
        self
    }
}

impl FromRef<AppState> for BootcampState {
    fn from_ref(s: &AppState) -> Self {
        BootcampState {
            service: Arc::clone(&s.service),
            default_limit: s.default_limit,
        }
    }
}

impl FromRef<AppState> for HealthState {
    fn from_ref(s: &AppState) -> Self {
        HealthState {
            repo: Arc::clone(s.service.repository()),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

impl FromRef<AppState> for MetricsState {
    fn from_ref(s: &AppState) -> Self {
        s.metrics.clone()
    }
}

/// Layers that vary by deployment
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Requests running longer than this get `408`
    pub request_timeout: Duration,
    /// Per-request `TraceLayer` spans
    pub trace_requests: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            trace_requests: false,
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        bootcamps::list_bootcamps,
        bootcamps::get_bootcamp,
        bootcamps::create_bootcamp,
        bootcamps::update_bootcamp,
        bootcamps::delete_bootcamp,
        bootcamps::bootcamps_in_radius,
    ),
    components(
        schemas(
            ApiResponse<bootcamps::BootcampDto>,
            ListResponse<bootcamps::BootcampDto>,
            CollectionResponse<bootcamps::BootcampDto>,
            EmptyData,
            PageLinkDto,
            PaginationDto,
            bootcamps::BootcampDto,
            bootcamps::LocationDto,
            bootcamps::CreateBootcampRequest,
            bootcamps::UpdateBootcampRequest,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Bootcamps", description = "Bootcamp listing with filters, CRUD and radius search"),
    ),
    info(
        title = "DevCamper API",
        version = "1.0.0",
        description = "REST API for coding bootcamps"
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: AppState, options: RouterOptions) -> Router {
    let bootcamp_routes = Router::new()
        .route(
            "/",
            get(bootcamps::list_bootcamps).post(bootcamps::create_bootcamp),
        )
        .route(
            "/{id}",
            get(bootcamps::get_bootcamp)
                .put(bootcamps::update_bootcamp)
                .delete(bootcamps::delete_bootcamp),
        )
        .route(
            "/radius/{zipcode}/{distance}",
            get(bootcamps::bootcamps_in_radius),
        );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check))
        .route("/metrics", get(prometheus_metrics))
        .nest("/api/v1/bootcamps", bootcamp_routes)
        .with_state(state)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            options.request_timeout,
        ))
        .layer(cors);

    let router = if options.trace_requests {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.layer(middleware::from_fn(request_id_middleware))
}

// ── Tests ──────────────────────────────────────────────────────
