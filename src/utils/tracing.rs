//! Span helpers shared by long-running operations.

use tracing::Span;

/// Opens an `internal` span whose OTel status is filled in later by
/// [`record_success`] or [`record_error`].
///
/// ```ignore
/// let span = business_span!("transition.execute", academic_year = 2025);
/// run().instrument(span).await;
/// ```
#[macro_export]
macro_rules! business_span {
    ($operation:expr $(, $($field:tt)*)?) => {
        tracing::info_span!(
            $operation,
            otel.kind = "internal",
            otel.status_code = tracing::field::Empty,
            error.message = tracing::field::Empty
            $(, $($field)*)?
        )
    };
}

pub fn record_success() {
    Span::current().record("otel.status_code", "OK");
}

/// Marks the current span failed. A no-op outside a [`business_span!`].
pub fn record_error(message: &str) {
    Span::current()
        .record("otel.status_code", "ERROR")
        .record("error.message", message);
}
