//! HTTP server: router, middleware, and lifecycle.

mod error;
mod handlers;

use anyhow::Context;
use axum::handler::HandlerWithoutStateExt;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use error::ApiError;
use imagescout_core::{Config, ImageScout};
use std::any::Any;
use std::path::Path;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub scout: Arc<ImageScout>,
}

/// Build the application router.
///
/// With a `static_dir`, unmatched GET requests are served from it and
/// everything else falls through to the JSON 404.
pub fn router(scout: Arc<ImageScout>, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/search-images", post(handlers::search_images))
        .route("/search-next-page", post(handlers::search_next_page))
        .with_state(AppState { scout });

    let app = match static_dir {
        Some(dir) => api.fallback_service(
            ServeDir::new(dir)
                .call_fallback_on_method_not_allowed(true)
                .not_found_service(handlers::not_found.into_service()),
        ),
        None => api.fallback(handlers::not_found),
    };

    app.layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(cors::Any)
                .allow_methods(cors::Any)
                .allow_headers(cors::Any),
        )
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(detail, "Request handler panicked");
    ApiError::Internal.into_response()
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: &Config, scout: Arc<ImageScout>) -> anyhow::Result<()> {
    let static_dir = config.static_dir();
    let static_dir = if static_dir.is_dir() {
        tracing::info!("Serving static files from {}", static_dir.display());
        Some(static_dir)
    } else {
        tracing::debug!("Static directory {} not found, API only", static_dir.display());
        None
    };

    if !scout.model_configured() {
        tracing::warn!("OpenAI API key missing: searches will fail until OPENAI_API_KEY is set");
    }
    if !scout.photos_configured() {
        tracing::warn!("Unsplash access key missing: searches will fail until UNSPLASH_ACCESS_KEY is set");
    }

    let app = router(scout, static_dir.as_deref());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("ImageScout listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
