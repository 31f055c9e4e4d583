//! Observability helpers for Telelog.

pub mod tracing_setup;
