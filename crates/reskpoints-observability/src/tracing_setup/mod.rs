//! Tracing setup: subscriber initialization, span macros and structured events.

pub mod events;
pub mod spans;

use reskpoints_core::config::defaults::DEFAULT_LOG_LEVEL;
use reskpoints_core::config::ObservabilityConfig;
use reskpoints_core::constants::LOG_ENV_VAR;
use tracing_subscriber::EnvFilter;

/// Filter for a configuration. `RESKPOINTS_LOG`, when set and valid, wins
/// over the configured level; an unparsable level falls back to `info`.
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Install the global subscriber. Returns `false` if one was already
/// installed.
pub fn init_from_config(config: &ObservabilityConfig) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
