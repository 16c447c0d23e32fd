//! Observability setup for Palaver: structured logging with optional
//! OpenTelemetry span export.

pub mod tracing_setup;
