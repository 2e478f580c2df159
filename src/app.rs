//! Process wiring for the HTTP service.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use sqlx::PgPool;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::adapters::certificate::{
    HttpCertificateRenderer, HttpRendererConfig, LocalCertificateRenderer,
};
use crate::adapters::events::{InMemoryEventBus, TracingEventHandler};
use crate::adapters::http::{health_router, progression_router, ProgressionAppState};
use crate::adapters::postgres::{
    PostgresCatalogReader, PostgresEnrollmentChecker, PostgresEnrollmentRepository,
};
use crate::config::{AppConfig, CertificateConfig, ConfigError, ServerConfig};
use crate::domain::foundation::DomainError;
use crate::ports::{CertificateRenderer, EventSubscriber};

/// Failures that stop the service from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Certificate renderer setup failed: {0}")]
    Renderer(DomainError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over the configured filter. Production logs are JSON.
pub fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    let result = if server.is_production() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    if result.is_err() {
        tracing::debug!("Global subscriber already installed");
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Full HTTP surface: `/api/...` progression routes plus `/health`.
pub fn build_router(state: ProgressionAppState, server: &ServerConfig) -> Router {
    Router::new()
        .nest("/api", progression_router())
        .with_state(state)
        .merge(health_router())
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
}

/// Picks the external renderer when configured, the local one otherwise.
pub fn certificate_renderer(
    config: &CertificateConfig,
) -> Result<Arc<dyn CertificateRenderer>, StartupError> {
    match &config.renderer_url {
        Some(url) => {
            let mut renderer_config = HttpRendererConfig::new(url).with_timeout(config.timeout());
            if let Some(api_key) = &config.api_key {
                renderer_config = renderer_config.with_api_key(api_key.clone());
            }
            let renderer =
                HttpCertificateRenderer::new(renderer_config).map_err(StartupError::Renderer)?;
            Ok(Arc::new(renderer))
        }
        None => Ok(Arc::new(LocalCertificateRenderer::new(
            config.public_base_url.clone(),
        ))),
    }
}

/// Event bus with the log subscriber attached.
pub fn event_bus() -> Arc<InMemoryEventBus> {
    let bus = Arc::new(InMemoryEventBus::dispatch_only());
    bus.subscribe_all(
        &TracingEventHandler::EVENT_TYPES,
        Arc::new(TracingEventHandler),
    );
    bus
}

/// Application state backed by PostgreSQL.
pub fn postgres_state(
    pool: PgPool,
    renderer: Arc<dyn CertificateRenderer>,
    config: &AppConfig,
) -> ProgressionAppState {
    let enrollments = Arc::new(PostgresEnrollmentRepository::new(pool.clone()));
    ProgressionAppState::new(
        Arc::new(PostgresCatalogReader::new(pool.clone())),
        Arc::new(PostgresEnrollmentChecker::new(pool)),
        enrollments.clone(),
        enrollments,
        renderer,
        event_bus(),
        config.progression.max_commit_retries,
    )
}

/// Connects, migrates and serves until ctrl-c.
pub async fn run(config: AppConfig) -> Result<(), StartupError> {
    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let renderer = certificate_renderer(&config.certificate)?;
    let state = postgres_state(pool, renderer, &config);
    let app = build_router(state, &config.server);

    let addr = config.server.socket_addr().map_err(ConfigError::from)?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        external_renderer = config.certificate.uses_external_renderer(),
        "Listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
}
