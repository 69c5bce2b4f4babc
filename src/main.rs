//! Assessor - Application Entry Point

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use assessor::{
    config::Config,
    constants::API_BASE_PATH,
    execution::{self, HttpBackend},
    handlers,
    middleware::logging_middleware,
    services::{AssessmentService, TracingVerdictStore},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Assessor server...");

    tracing::info!(
        url = %config.execution_service.base_url,
        max_attempts = config.polling.max_attempts,
        interval_ms = config.polling.interval.as_millis() as u64,
        max_in_flight = config.execution_service.max_in_flight,
        comparison = ?config.suite.comparison,
        "Using execution service"
    );
    let backend = Arc::new(HttpBackend::new(&config.execution_service)?);

    // Create application state
    let suites = execution::build(backend, &config);
    let assessments = AssessmentService::new(suites.clone(), Arc::new(TracingVerdictStore));
    let state = AppState::new(suites, assessments);

    // Build the router
    let app = Router::new()
        .nest(API_BASE_PATH, handlers::routes())
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start the server
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
