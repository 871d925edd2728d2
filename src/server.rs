//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header::CACHE_CONTROL, HeaderValue},
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::api;
use crate::error::ApiError;
use crate::models::{ChartConfig, ChartSummary, ConfigError};
use crate::services::ChartPipeline;

/// Largest accepted request body (image plus sprite sheet).
pub const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ChartConfig>,
    pub pipeline: Arc<ChartPipeline>,
}

/// Create application state from a loaded configuration.
pub fn create_app_state(config: ChartConfig) -> Result<AppState, ConfigError> {
    config.validate()?;
    let pipeline = Arc::new(ChartPipeline::from_config(&config));

    Ok(AppState {
        config: Arc::new(config),
        pipeline,
    })
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests. Chart
/// responses are generated per request and never cached.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/api/quantize", post(handle_quantize))
        .route("/api/render", post(handle_render))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

/// CORS for the configured browser origins, with credentials.
///
/// Methods and headers mirror the preflight request. Origins that are not
/// valid header values are skipped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%origin, %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

// Wrapper handlers to extract state components for the underlying API handlers

async fn handle_quantize(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ChartSummary>, ApiError> {
    api::handle_quantize(State(state.config), State(state.pipeline), multipart).await
}

async fn handle_render(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    api::handle_render(State(state.config), State(state.pipeline), multipart).await
}
