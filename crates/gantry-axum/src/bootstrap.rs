//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the web adapter: the reqwest clients from `gantry-upstream` are
//! instantiated here and injected into the core pipeline.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use gantry_core::config::GatewayConfig;
use gantry_core::ports::{AnalysisBackend, CompletionBackend, DelegateBackend};
use gantry_core::registry::ServiceRegistry;
use gantry_core::services::{OrchestrationPipeline, ServiceDispatcher};
use gantry_upstream::{HttpAnalysisClient, HttpCompletionClient, HttpDelegateClient};

/// Default HTTP port, overridable with `GANTRY_PORT`.
pub const DEFAULT_PORT: u16 = 3000;

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server.
    pub port: u16,
    /// CORS configuration.
    pub cors: CorsConfig,
    /// Gateway configuration passed through to the pipeline.
    pub gateway: GatewayConfig,
}

impl ServerConfig {
    /// Read server and gateway configuration from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        let port = std::env::var("GANTRY_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            port,
            cors: CorsConfig::default(),
            gateway: GatewayConfig::from_env(),
        }
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// The orchestration pipeline handling chat requests.
    pub pipeline: Arc<OrchestrationPipeline>,
    /// Immutable gateway configuration (reported by the health endpoint).
    pub config: Arc<GatewayConfig>,
    /// Process start marker for uptime reporting.
    pub started_at: Instant,
}

impl AxumContext {
    /// Assemble a context from pre-built components.
    ///
    /// Used by tests and alternative compositions; production wiring goes
    /// through [`bootstrap`].
    #[must_use]
    pub fn new(pipeline: Arc<OrchestrationPipeline>, config: Arc<GatewayConfig>) -> Self {
        Self {
            pipeline,
            config,
            started_at: Instant::now(),
        }
    }
}

/// Wire the production clients into the pipeline.
#[must_use]
pub fn bootstrap(gateway: GatewayConfig) -> AxumContext {
    tracing::info!(
        target: "gantry.bootstrap",
        dispatch_mode = ?gateway.dispatch_mode,
        services = gateway.services.len(),
        completion_configured = gateway.completion.api_key.is_some(),
        delegate_configured = gateway.delegate.is_some(),
        "gateway configured"
    );

    let config = Arc::new(gateway);
    let registry = Arc::new(ServiceRegistry::from_config(&config));

    let analysis: Arc<dyn AnalysisBackend> = Arc::new(HttpAnalysisClient::new());
    let dispatcher = ServiceDispatcher::new(registry, analysis, config.dispatch_timeout);

    let completion: Arc<dyn CompletionBackend> =
        Arc::new(HttpCompletionClient::new(config.completion.clone()));
    let delegate: Option<Arc<dyn DelegateBackend>> = config
        .delegate
        .as_ref()
        .map(|d| Arc::new(HttpDelegateClient::new(d)) as Arc<dyn DelegateBackend>);

    let pipeline = Arc::new(OrchestrationPipeline::new(
        Arc::clone(&config),
        dispatcher,
        completion,
        delegate,
    ));

    AxumContext::new(pipeline, config)
}

/// Start the web server on the configured port.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    use tokio::net::TcpListener;

    let ctx = bootstrap(config.gateway.clone());
    let app = crate::routes::create_router(ctx, &config.cors);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("gantry gateway listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
