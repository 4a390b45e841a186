//! Server runtime.
//!
//! [`ServerHandle`] wires configuration, user store, metrics and the REST
//! router together, serves it with graceful shutdown, and lets the caller
//! stop it again.

use std::net::SocketAddr;
use std::sync::OnceLock;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::{error, info, warn};

use crate::config::{AppConfig, MetricsMode};
use crate::infrastructure::build_user_repository;
use crate::interfaces::http::modules::metrics::MetricsSource;
use crate::interfaces::http::{create_api_router, ApiState};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

/// Handle to a running API server.
///
/// ```rust,no_run
/// use dashboard_api::{AppConfig, server::ServerHandle};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(AppConfig::default()).await?;
///     handle.install_signal_handler();
///     handle.shutdown_signal().wait().await;
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Address the listener is bound to (resolves port 0).
    pub local_addr: SocketAddr,

    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Starting Dashboard API...");

        let metrics = match config.app.metrics {
            MetricsMode::Static => MetricsSource::Static,
            MetricsMode::Prometheus => MetricsSource::Prometheus(prometheus_handle()?),
        };

        let repo = build_user_repository(config.app.store);
        info!("User store: {:?}", config.app.store);

        let state = ApiState::new(repo, config.app.environment.clone(), metrics);
        let router = create_api_router(state);

        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        let listener = tokio::net::TcpListener::bind(config.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("Backend API server running on port {}", local_addr.port());
        info!("Environment: {}", config.app.environment);
        info!("Health check: http://localhost:{}/health", local_addr.port());
        info!("Swagger UI available at http://localhost:{}/docs/", local_addr.port());

        let api_server = axum::serve(listener, router.into_make_service())
            .with_graceful_shutdown(async move {
                shutdown_signal.wait().await;
                info!("🛑 REST API server received shutdown signal");
            });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            config,
            local_addr,
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

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to stop, bounded by the configured shutdown timeout
    /// once shutdown has been triggered.
    pub async fn wait(self) {
        let timeout = self.shutdown.timeout();
        let signal = self.shutdown.signal();
        let mut api_task = self.api_task;

        tokio::select! {
            result = &mut api_task => {
                log_task_result(result);
                return;
            }
            _ = signal.wait() => {}
        }

        info!("⏳ Waiting up to {}s for in-flight requests...", timeout.as_secs());
        match tokio::time::timeout(timeout, &mut api_task).await {
            Ok(result) => log_task_result(result),
            Err(_) => {
                warn!("⚠️ Graceful shutdown timed out after {}s", timeout.as_secs());
                api_task.abort();
            }
        }

        info!("👋 Dashboard API shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("🛑 Shutting down Dashboard API...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

fn log_task_result(result: Result<(), tokio::task::JoinError>) {
    match result {
        Ok(()) => info!("REST API server stopped"),
        Err(e) => error!("REST API server task panicked: {}", e),
    }
}

/// The global recorder can only be installed once per process; later calls
/// reuse it.
fn prometheus_handle() -> Result<PrometheusHandle, BuildError> {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    if let Some(handle) = HANDLE.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("📊 Prometheus metrics recorder installed");
    Ok(HANDLE.get_or_init(|| handle).clone())
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

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
