use anyhow::Context;
use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use scholaris_config::ObservabilityConfig;
use scholaris_models::TransitionResult;

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

const HTTP_LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// A transition touches every student of a year, so its buckets reach minutes.
const TRANSITION_BUCKETS: &[f64] = &[0.1, 0.5, 1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0];

/// Whether metrics are recorded. Fixed by the first call to this or to
/// [`init_metrics`].
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| ObservabilityConfig::from_env().enabled)
}

/// Installs the Prometheus recorder and spawns its upkeep loop.
/// Returns `None` when observability is off.
pub fn init_metrics(config: &ObservabilityConfig) -> anyhow::Result<Option<PrometheusHandle>> {
    if !*OBSERVABILITY_ENABLED.get_or_init(|| config.enabled) {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".into()),
            HTTP_LATENCY_BUCKETS,
        )
        .context("Invalid HTTP latency buckets")?
        .set_buckets_for_metric(
            Matcher::Full("transition_duration_seconds".into()),
            TRANSITION_BUCKETS,
        )
        .context("Invalid transition duration buckets")?
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    let upkeep = handle.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(5));
        loop {
            ticker.tick().await;
            upkeep.run_upkeep();
        }
    });

    Ok(Some(handle))
}

/// Keeps `http_requests_active` balanced even if the handler future is dropped.
struct InFlight;

impl InFlight {
    fn enter() -> Self {
        gauge!("http_requests_active").increment(1.0);
        InFlight
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        gauge!("http_requests_active").decrement(1.0);
    }
}

/// Counts requests and records their latency per matched route.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| req.uri().path().to_owned(), |p| p.as_str().to_owned());

    let _in_flight = InFlight::enter();
    let started = Instant::now();
    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    histogram!("http_request_duration_seconds", "method" => method.clone(), "path" => route.clone())
        .record(started.elapsed().as_secs_f64());
    counter!("http_requests_total", "method" => method, "path" => route, "status" => status)
        .increment(1);

    response
}

/// Standalone router serving the Prometheus scrape endpoint.
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

/// Records the counters of a finished transition run.
pub fn track_transition_run(result: &TransitionResult) {
    if !is_observability_enabled() {
        return;
    }
    let status = if result.has_errors() { "partial" } else { "success" };
    counter!("transition_runs_total", "status" => status).increment(1);

    for (outcome, count) in [
        ("promoted", result.promoted),
        ("retained", result.retained),
        ("graduated", result.graduated),
    ] {
        counter!("transition_students_total", "outcome" => outcome).increment(u64::from(count));
    }
    counter!("transition_errors_total").increment(result.errors.len() as u64);
    counter!("transition_classes_created_total").increment(u64::from(result.classes_created));
}

pub fn track_transition_duration(duration: Duration) {
    if !is_observability_enabled() {
        return;
    }
    histogram!("transition_duration_seconds").record(duration.as_secs_f64());
}
