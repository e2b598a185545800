//! Telemetry initialization for the todo backend.
//!
//! Sets up structured logging through `tracing`: JSON logs to rotating files
//! in production, pretty console output in development.

pub mod tracing;

pub use crate::tracing::{LogFlusher, TracingError, init_test_tracing, init_tracing};
