//! Reusable API server runtime.
//!
//! [`ServerHandle`] owns the full lifecycle: metrics recorder, storage
//! (SQLite through SeaORM, or the in-memory store), migrations, geocoder,
//! the REST API and graceful shutdown.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DbErr;
use sea_orm_migration::MigratorTrait;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::application::BootcampService;
use crate::config::{AppConfig, ConfigError};
use crate::domain::{BootcampRepository, GeocodeError};
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{
    build_geocoder, DatabasePool, InMemoryBootcampRepository, SeaOrmBootcampRepository,
    ShutdownCoordinator, ShutdownReason, ShutdownSignal,
};
use crate::interfaces::http::modules::metrics::MetricsState;
use crate::interfaces::{create_api_router, AppState, RouterOptions};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the API server.
pub struct ServerOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("database: {0}")]
    Database(#[from] DbErr),

    #[error("geocoder: {0}")]
    Geocoder(#[from] GeocodeError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running API server.
///
/// ```rust,no_run
/// use devcamper::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// Bootcamp use cases, shared with the router.
    pub service: Arc<BootcampService>,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Address the REST API is bound to.
    pub local_addr: SocketAddr,

    db: Option<DatabasePool>,
    shutdown: ShutdownCoordinator,
    api_task: JoinHandle<()>,
}

impl ServerHandle {
    /// Start the API server with the given options.
    ///
    /// This will:
    /// 1. Install the Prometheus metrics recorder (once per process)
    /// 2. Open storage and run migrations
    /// 3. Build the configured geocoder
    /// 4. Bind and serve the REST API (with Swagger UI)
    pub async fn start(opts: ServerOptions) -> Result<Self, StartupError> {
        let app_cfg = opts.config;
        app_cfg.validate()?;

        info!("Starting DevCamper API...");

        let metrics = MetricsState::new(prometheus_handle());

        // ── Storage ────────────────────────────────────────────
        let (repo, db): (Arc<dyn BootcampRepository>, Option<DatabasePool>) =
            if app_cfg.database.is_memory() {
                info!("Storage: in-memory");
                (Arc::new(InMemoryBootcampRepository::new()), None)
            } else {
                let pool = DatabasePool::new(app_cfg.database.to_database_config());
                let conn = pool.connect().await?.clone();

                if opts.auto_migrate {
                    info!("Running database migrations...");
                    Migrator::up(&conn, None).await?;
                    info!("Migrations completed");
                }

                (Arc::new(SeaOrmBootcampRepository::new(conn)), Some(pool))
            };

        // ── Services ───────────────────────────────────────────
        let geocoder = build_geocoder(&app_cfg.geocoder)?;
        let service = Arc::new(
            BootcampService::new(repo, geocoder).with_count_scope(app_cfg.pagination.count_scope),
        );

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        // ── REST API server ────────────────────────────────────
        let state = AppState::new(service.clone())
            .with_default_limit(app_cfg.pagination.default_limit)
            .with_metrics(metrics);
        let router = create_api_router(
            state,
            RouterOptions {
                request_timeout: app_cfg.request_timeout(),
                trace_requests: app_cfg.server.is_development(),
            },
        );

        let addr = app_cfg.server.address();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|source| StartupError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr().map_err(|source| StartupError::Bind {
            addr: addr.clone(),
            source,
        })?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_shutdown = shutdown_signal.clone();
        let api_server = axum::serve(listener, router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });

        let task_signal = shutdown_signal;
        let api_task = tokio::spawn(async move {
            match api_server.await {
                Ok(()) if task_signal.is_triggered() => {}
                Ok(()) => task_signal.fail("REST API server stopped unexpectedly"),
                Err(e) => task_signal.fail(format!("REST API server error: {}", e)),
            }
        });

        info!("🚀 DevCamper API started in {} mode", app_cfg.server.environment);

        Ok(Self {
            service,
            config: app_cfg,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait until shutdown is triggered, then drain the server and close
    /// storage within the configured timeout.
    pub async fn wait(self) -> ShutdownReason {
        let signal = self.shutdown.signal();
        signal.wait().await;

        let Self {
            db,
            shutdown,
            api_task,
            ..
        } = self;

        let drained = shutdown
            .run_cleanup(async move {
                match api_task.await {
                    Ok(()) => info!("REST API server stopped"),
                    Err(e) => error!("REST API server task panicked: {}", e),
                }
                if let Some(pool) = db {
                    match pool.close().await {
                        Ok(()) => info!("✅ Database connection closed"),
                        Err(e) => warn!("Error closing database connection: {}", e),
                    }
                }
            })
            .await;

        let reason = signal.reason().unwrap_or(ShutdownReason::Requested);
        let reason = match (drained, reason) {
            (false, ShutdownReason::Requested) => {
                ShutdownReason::Fatal("graceful shutdown timed out".to_string())
            }
            (_, reason) => reason,
        };

        info!("👋 DevCamper API shutdown complete");
        reason
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) -> ShutdownReason {
        info!("🛑 Shutting down DevCamper API...");
        self.trigger_shutdown();
        self.wait().await
    }

    /// Check if the server is still running.
    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// The process-wide recorder; it can only be installed once, so restarts
/// within one process reuse it. `None` if installation failed.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static PROM_HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("📊 Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!("Prometheus recorder unavailable, /metrics disabled: {}", e);
                None
            }
        })
        .clone()
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
/// `RUST_LOG` takes precedence over `logging.level`.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let result = match config.logging.format.to_lowercase().as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("tracing already initialized: {}", e);
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::geocoding::StaticPlace;

    fn test_config(database_url: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.server.environment = "test".to_string();
        config.server.shutdown_timeout = 5;
        config.database.url = database_url.to_string();
        config.geocoder.provider = "static".to_string();
        config.geocoder.places = vec![StaticPlace::new("02118", -71.0589, 42.3601)];
        config
    }

    #[tokio::test]
    async fn starts_on_memory_storage_and_shuts_down() {
        let handle = ServerHandle::start(ServerOptions {
            config: test_config("memory"),
            auto_migrate: true,
        })
        .await
        .unwrap();

        assert_ne!(handle.local_addr.port(), 0);
        assert!(handle.is_running());
        assert_eq!(handle.shutdown().await, ShutdownReason::Requested);
    }

    #[tokio::test]
    async fn starts_on_sqlite_with_migrations() {
        let handle = ServerHandle::start(ServerOptions {
            config: test_config("sqlite::memory:"),
            auto_migrate: true,
        })
        .await
        .unwrap();

        let page = handle
            .service
            .list(&Default::default(), Default::default())
            .await
            .unwrap();
        assert_eq!(page.total, 0);
        assert_eq!(handle.shutdown().await, ShutdownReason::Requested);
    }

    #[tokio::test]
    async fn mapquest_without_key_fails_to_start() {
        let mut config = test_config("memory");
        config.geocoder.provider = "mapquest".to_string();
        let err = ServerHandle::start(ServerOptions {
            config,
            auto_migrate: false,
        })
        .await
        .err()
        .unwrap();
        assert!(matches!(err, StartupError::Geocoder(_)));
    }
}
