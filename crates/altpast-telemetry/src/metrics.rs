//! Metric name constants and recording helpers
//!
//! Instruments are created on first use from the global meter provider, so
//! they record nothing until [`crate::init`] has installed an exporter.

use std::sync::OnceLock;
use std::time::Instant;

use opentelemetry::KeyValue;
use opentelemetry::global;
use opentelemetry::metrics::{Counter, Histogram};

const METER_NAME: &str = "altpast";

pub const UPSTREAM_REQUEST_DURATION: &str = "upstream.request.duration";
pub const GENERATION_POLL_ATTEMPTS: &str = "generation.poll.attempts";
pub const GENERATION_OUTCOME_COUNT: &str = "generation.outcome.count";

fn upstream_request_duration() -> &'static Histogram<f64> {
    static INSTRUMENT: OnceLock<Histogram<f64>> = OnceLock::new();
    INSTRUMENT.get_or_init(|| {
        global::meter(METER_NAME)
            .f64_histogram(UPSTREAM_REQUEST_DURATION)
            .with_unit("s")
            .with_description("Latency of calls to upstream AI services")
            .build()
    })
}

fn generation_poll_attempts() -> &'static Histogram<u64> {
    static INSTRUMENT: OnceLock<Histogram<u64>> = OnceLock::new();
    INSTRUMENT.get_or_init(|| {
        global::meter(METER_NAME)
            .u64_histogram(GENERATION_POLL_ATTEMPTS)
            .with_description("Status checks performed per image generation")
            .build()
    })
}

fn generation_outcome_count() -> &'static Counter<u64> {
    static INSTRUMENT: OnceLock<Counter<u64>> = OnceLock::new();
    INSTRUMENT.get_or_init(|| {
        global::meter(METER_NAME)
            .u64_counter(GENERATION_OUTCOME_COUNT)
            .with_description("Image generations by terminal outcome")
            .build()
    })
}

/// Record how long an upstream call took
///
/// `service` names the upstream (`whisper`, `openai_chat`, `replicate`),
/// `operation` the call, `status` the HTTP status or `error`.
pub fn record_upstream_call(service: &'static str, operation: &'static str, start: Instant, status: &str) {
    upstream_request_duration().record(
        start.elapsed().as_secs_f64(),
        &[
            KeyValue::new("service", service),
            KeyValue::new("operation", operation),
            KeyValue::new("status", status.to_owned()),
        ],
    );
}

/// Record the end of a generation polling loop
pub fn record_generation(outcome: &'static str, attempts: u32) {
    let attributes = [KeyValue::new("outcome", outcome)];
    generation_poll_attempts().record(u64::from(attempts), &attributes);
    generation_outcome_count().add(1, &attributes);
}
