pub mod error;
pub mod health;
pub mod metrics;
pub mod verify;

use axum::extract::DefaultBodyLimit;
use axum::http::header::{self, InvalidHeaderValue};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::config::AppConfig;

/// Builds the API router. Fails if the configured frontend origin is not a
/// valid header value.
///
/// The upload limit is enforced by the multipart extractor so oversized
/// uploads come back through [`error::ApiError`] as JSON.
pub fn build_router(state: AppState, config: &AppConfig) -> Result<Router, InvalidHeaderValue> {
    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_str(&config.frontend_url)?)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Ok(Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/verify", post(verify::submit_verification))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors))
}
