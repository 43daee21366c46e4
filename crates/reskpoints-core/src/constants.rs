/// Reskpoints engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Hard ceiling on backward search depth, regardless of configuration.
pub const MAX_BACKWARD_DEPTH_LIMIT: usize = 64;

/// Maximum evidence strings retained per edge.
pub const MAX_EVIDENCE_PER_EDGE: usize = 16;

/// Environment variable consulted for the tracing filter.
pub const LOG_ENV_VAR: &str = "RESKPOINTS_LOG";

/// Upper bound for configured durations in seconds (100 years).
pub const MAX_DURATION_SECS: u64 = 100 * 365 * 86_400;
