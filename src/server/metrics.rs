use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry,
    TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all SQURL metrics
const PREFIX: &str = "squrl";

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Census Metrics
    pub static ref CENSUS_RECORDS: GaugeVec = GaugeVec::new(
        Opts::new(format!("{PREFIX}_census_records"), "Census rows by load outcome"),
        &["outcome"]
    ).expect("Failed to create census_records metric");

    // Interaction Metrics
    pub static ref MAP_CLICKS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_map_clicks_total"), "Map clicks by target kind"),
        &["kind"]
    ).expect("Failed to create map_clicks_total metric");

    pub static ref SOUND_TOGGLES_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_sound_toggles_total"), "Sound icon clicks by resulting state"),
        &["channel", "state"]
    ).expect("Failed to create sound_toggles_total metric");

    pub static ref ACTIVE_SESSIONS: Gauge = Gauge::new(
        format!("{PREFIX}_active_sessions"),
        "Number of live map sessions"
    ).expect("Failed to create active_sessions metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Register all metrics - ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(CENSUS_RECORDS.clone()));
    let _ = REGISTRY.register(Box::new(MAP_CLICKS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(SOUND_TOGGLES_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(ACTIVE_SESSIONS.clone()));

    tracing::info!("Metrics system initialized successfully");
}

pub fn init_census_metrics(loaded: usize, dropped: usize) {
    CENSUS_RECORDS
        .with_label_values(&["loaded"])
        .set(loaded as f64);
    CENSUS_RECORDS
        .with_label_values(&["dropped"])
        .set(dropped as f64);

    tracing::info!(
        "Census metrics initialized: {} loaded, {} dropped",
        loaded,
        dropped
    );
}

/// Collapses ids in paths so label cardinality stays bounded.
pub fn route_label(path: &str) -> &'static str {
    match path {
        "/" => "/",
        "/v1/session" => "/v1/session",
        "/v1/map" => "/v1/map",
        "/v1/map/features" => "/v1/map/features",
        "/v1/map/clusters" => "/v1/map/clusters",
        "/v1/map/viewport" => "/v1/map/viewport",
        "/v1/map/click" => "/v1/map/click",
        "/v1/detail" => "/v1/detail",
        "/v1/sound" => "/v1/sound",
        "/v1/assets/manifest" => "/v1/assets/manifest",
        p if p.starts_with("/v1/detail/") => "/v1/detail/{id}",
        p if p.starts_with("/v1/sound/") => "/v1/sound/{channel}/click",
        p if p.starts_with("/assets/") => "/assets",
        _ => "other",
    }
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

pub fn record_map_click(kind: &str) {
    MAP_CLICKS_TOTAL.with_label_values(&[kind]).inc();
}

pub fn record_sound_toggle(channel: &str, state: &str) {
    SOUND_TOGGLES_TOTAL
        .with_label_values(&[channel, state])
        .inc();
}

pub fn set_active_sessions(count: usize) {
    ACTIVE_SESSIONS.set(count as f64);
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_default();
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}
