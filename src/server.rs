use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::Config, provider::Provider};

mod extract;
mod handlers;
mod rate_limit;

pub use rate_limit::RateLimiter;

/// Base64 camera frames arrive inside JSON bodies.
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

pub struct AppState {
    pub provider: Arc<dyn Provider>,
    pub config: Config,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(state.config.frontend_origin.clone())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let limiter = Arc::new(RateLimiter::new(state.config.rate_limit));

    // Build router
    Router::new()
        .route("/api/test", get(handlers::health_handler))
        .route("/api/openai", post(handlers::query_handler))
        .route("/api/chat", post(handlers::chat_audio_handler))
        .route("/api/chat/text", post(handlers::chat_text_handler))
        .layer(middleware::from_fn_with_state(limiter, rate_limit::enforce))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn serve(config: Config, provider: Arc<dyn Provider>) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        origin = ?config.frontend_origin,
        text_model = &*config.models.text,
        vision_model = &*config.models.vision,
        "Configured proxy"
    );

    let router = build_router(Arc::new(AppState { provider, config }));

    // Start server
    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", error);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
