//! DevCamper API server
//!
//! ```sh
//! # Run with default config (~/.config/devcamper/config.toml)
//! devcamper
//!
//! # Custom config path and port
//! devcamper --config /etc/devcamper/config.toml --port 8080
//!
//! # Validate config without starting
//! devcamper --check
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use devcamper::config::AppConfig;
use devcamper::infrastructure::ShutdownReason;
use devcamper::server::{init_tracing, ServerHandle, ServerOptions};

/// DevCamper REST API for coding bootcamps.
#[derive(Parser, Debug)]
#[command(
    name = "devcamper",
    version,
    about = "REST API for coding bootcamps",
    long_about = "DevCamper API: bootcamp listings with filtering, pagination, \
                  CRUD and radius search.\n\n\
                  Default config: ~/.config/devcamper/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "DEVCAMPER_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(devcamper::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", config_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Address     : {}", config.server.address());
        println!("   Environment : {}", config.server.environment);
        println!("   Database    : {}", config.database.url);
        println!("   Geocoder    : {}", config.geocoder.provider);
        println!("   Page size   : {}", config.pagination.default_limit);
        println!("   Log level   : {}", config.logging.level);
        return ExitCode::SUCCESS;
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());
    for file in &config.env_files {
        info!("Environment loaded from {}", file.display());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    handle.install_signal_handler();
    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    match handle.wait().await {
        ShutdownReason::Requested => ExitCode::SUCCESS,
        ShutdownReason::Fatal(reason) => {
            error!("Exiting after fatal error: {}", reason);
            ExitCode::FAILURE
        }
    }
}
