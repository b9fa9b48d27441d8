use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::EnvFilter;

use label_match::app_state::AppState;
use label_match::config::AppConfig;
use label_match::routes;
use label_match::services::ocr::VisionClient;

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing label-match server");

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);

    metrics::describe_counter!(
        "label_verifications_total",
        "Total label verifications submitted"
    );
    metrics::describe_counter!(
        "label_verifications_matched_total",
        "Label verifications where every field matched"
    );
    metrics::describe_counter!(
        "label_extraction_failures_total",
        "Label photographs the vision service could not read"
    );
    metrics::describe_histogram!(
        "label_verification_seconds",
        "Time to extract and verify one label"
    );

    // Initialize vision extraction client
    tracing::info!(
        model = %config.openai_model,
        base_url = %config.openai_base_url,
        "Initializing vision extraction client"
    );
    let vision = VisionClient::new(
        &config.openai_base_url,
        &config.openai_api_key,
        &config.openai_model,
        Duration::from_secs(config.extraction_timeout_secs),
    )
    .expect("Failed to initialize vision client");

    let state = AppState::new(vision);

    let app = routes::build_router(state, &config)
        .expect("FRONTEND_URL is not a valid origin")
        // Prometheus metrics endpoint (separate state)
        .route(
            "/metrics",
            get(routes::metrics::prometheus_metrics).with_state(prometheus_handle),
        );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
