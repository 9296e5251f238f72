use anyhow::Context;
use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use opentelemetry::{KeyValue, global, trace::TraceError};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    propagation::TraceContextPropagator,
    runtime,
    trace::{RandomIdGenerator, Sampler, Tracer},
};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use std::time::Instant;
use tracing::{Instrument, Span, debug, error, info, info_span, warn};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use scholaris_config::ObservabilityConfig;

/// Wraps each request in an `http.request` span and logs its outcome at a
/// level matching the status class.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| req.uri().path().to_owned(), |p| p.as_str().to_owned());

    let span = info_span!(
        "http.request",
        request_id = %Uuid::new_v4(),
        method = %req.method(),
        path = %path,
        status = tracing::field::Empty,
    );

    async move {
        debug!("Incoming request");

        let response = next.run(req).await;
        let status = response.status().as_u16();
        let latency_ms = started.elapsed().as_millis() as u64;
        Span::current().record("status", status);

        match status {
            500..=599 => error!(status, latency_ms, "Server error"),
            400..=499 => warn!(status, latency_ms, "Client error"),
            _ => info!(status, latency_ms, "Request completed"),
        }

        response
    }
    .instrument(span)
    .await
}

fn console_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}={},tower_http=warn,hyper=warn,tonic=warn,h2=warn,sqlx=warn",
            env!("CARGO_CRATE_NAME"),
            log_level
        ))
    })
}

fn init_tracer(config: &ObservabilityConfig) -> Result<Tracer, TraceError> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let resource = Resource::new(vec![
        KeyValue::new(SERVICE_NAME, env!("CARGO_PKG_NAME")),
        KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
        KeyValue::new("environment", config.environment.clone()),
    ]);

    let trace_config = opentelemetry_sdk::trace::Config::default()
        .with_sampler(Sampler::AlwaysOn)
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource);

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(&config.otlp_endpoint),
        )
        .with_trace_config(trace_config)
        .install_batch(runtime::Tokio)
}

fn console_layer<S>(log_level: &str, with_target: bool) -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .compact()
        .with_target(with_target)
        .with_file(true)
        .with_line_number(true)
        .with_filter(console_filter(log_level))
}

/// Console-only logging, used by the CLI and when observability is disabled.
pub fn init_console_logging(log_level: &str) {
    tracing_subscriber::registry()
        .with(console_layer(log_level, true))
        .init();
}

/// Console output plus two daily-rolling files under `log_dir`
/// (`scholaris.log` for errors, `scholaris.json` for structured info logs)
/// and OTLP export when the collector pipeline can be built.
pub fn init_tracing(config: &ObservabilityConfig) -> anyhow::Result<()> {
    use tracing_appender::rolling;
    use tracing_subscriber::fmt;

    if !config.enabled {
        init_console_logging(&config.log_level);
        return Ok(());
    }

    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("Failed to create logs directory {}", config.log_dir))?;

    let error_file = fmt::layer()
        .with_writer(rolling::daily(&config.log_dir, "scholaris.log"))
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(EnvFilter::new("error"));

    let json_file = fmt::layer()
        .json()
        .with_writer(rolling::daily(&config.log_dir, "scholaris.json"))
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    let (otel_layer, otel_error) = match init_tracer(config) {
        Ok(tracer) => (Some(tracing_opentelemetry::layer().with_tracer(tracer)), None),
        Err(e) => (None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(console_layer(&config.log_level, false))
        .with(error_file)
        .with(json_file)
        .with(otel_layer)
        .init();

    match otel_error {
        None => info!(endpoint = %config.otlp_endpoint, "Tracing initialized with OTLP export"),
        Some(e) => warn!(error = %e, "OTLP export unavailable, logging to console and files only"),
    }

    Ok(())
}

/// Flushes pending spans to the collector.
pub async fn shutdown_tracer() {
    info!("Flushing OpenTelemetry spans");
    global::shutdown_tracer_provider();
}
