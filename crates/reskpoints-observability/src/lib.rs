//! # reskpoints-observability
//!
//! Structured logging for the causality engine: subscriber setup, span
//! macros per operation, and typed event helpers.

pub mod tracing_setup;

pub use tracing_setup::{env_filter, events, init_from_config};
