//! Dashboard API CLI server
//!
//! ```sh
//! # Defaults: port 3000, environment "development", seed user store
//! dashboard-api
//!
//! # Custom config path
//! dashboard-api --config /etc/dashboard-api/config.toml
//!
//! # Override listen port and deployment mode
//! dashboard-api --port 8080 --environment production
//!
//! # Validate config without starting
//! dashboard-api --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use dashboard_api::config::{AppConfig, Environment, MetricsMode, StoreMode};
use dashboard_api::server::{init_tracing, ServerHandle};

/// REST backend for the thesis dashboard.
#[derive(Parser, Debug)]
#[command(
    name = "dashboard-api",
    version,
    about = "REST backend for the thesis dashboard",
    long_about = "Serves /health, /api/v1/users and /metrics.\n\n\
                  Configuration precedence: defaults < config file < environment \
                  (PORT, APP_ENV/NODE_ENV, ...) < command-line flags.\n\
                  Default config: ~/.config/dashboard-api/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "DASHBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen host.
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the deployment-mode label (e.g. development, production).
    #[arg(short, long)]
    environment: Option<String>,

    /// Override the user store (seed, memory).
    #[arg(long)]
    store: Option<StoreMode>,

    /// Override the metrics mode (static, prometheus).
    #[arg(long)]
    metrics: Option<MetricsMode>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_path = dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(dashboard_api::default_config_path);

    // A bad file or environment value stops startup; nothing falls back to defaults.
    let mut config = match AppConfig::load_with_env(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(environment) = cli.environment {
        config.app.environment = Environment::new(environment);
    }
    if let Some(store) = cli.store {
        config.app.store = store;
    }
    if let Some(metrics) = cli.metrics {
        config.app.metrics = metrics;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Address     : {}", config.address());
        println!("   Environment : {}", config.app.environment);
        println!("   User store  : {:?}", config.app.store);
        println!("   Metrics     : {:?}", config.app.metrics);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    init_tracing(&config);
    if let Some(path) = dotenv_path {
        info!("Loaded environment from {}", path.display());
    }
    info!("Configuration loaded (file: {})", config_path.display());

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(config).await?;
    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
