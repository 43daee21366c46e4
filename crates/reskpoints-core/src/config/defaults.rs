// Single source of truth for all default values.

// --- Correlation ---
pub const DEFAULT_CORRELATION_WINDOW_SECS: u64 = 900; // 15 minutes
pub const DEFAULT_SAME_COMPONENT_AFFINITY: f64 = 1.0;
pub const DEFAULT_ADJACENT_AFFINITY: f64 = 0.4;
pub const DEFAULT_REDUNDANCY_CUTOFF: f64 = 0.95;

// --- Scoring ---
pub const DEFAULT_TEMPORAL_WEIGHT: f64 = 0.4;
pub const DEFAULT_AFFINITY_WEIGHT: f64 = 0.4;
pub const DEFAULT_HISTORY_WEIGHT: f64 = 0.2;
pub const DEFAULT_HISTORY_SATURATION: u64 = 10;
pub const DEFAULT_MATERIALIZATION_THRESHOLD: f64 = 0.3;

// --- Analysis ---
pub const DEFAULT_DECAY_FACTOR: f64 = 0.7;
pub const DEFAULT_MIN_IMPACT: f64 = 0.05;
pub const DEFAULT_MAX_BACKWARD_DEPTH: usize = 5;
pub const DEFAULT_MAX_NODES_VISITED: usize = 10_000;
pub const DEFAULT_PREFER_ORIGINS: bool = true;

// --- Retention ---
pub const DEFAULT_RETENTION_HORIZON_SECS: u64 = 86_400; // 24 hours
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3_600; // 1 hour

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
