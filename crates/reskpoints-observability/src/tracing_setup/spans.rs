//! Span definitions per operation: ingest, impact, root cause, eviction, hydration.

/// Create an ingestion span.
#[macro_export]
macro_rules! ingest_span {
    ($node_id:expr, $component:expr) => {
        tracing::info_span!(
            $crate::tracing_setup::spans::names::INGEST,
            node_id = %$node_id,
            component = %$component
        )
    };
}

/// Create an impact analysis span.
#[macro_export]
macro_rules! impact_span {
    ($node_id:expr) => {
        tracing::debug_span!($crate::tracing_setup::spans::names::IMPACT, node_id = %$node_id)
    };
}

/// Create a root-cause analysis span.
#[macro_export]
macro_rules! root_cause_span {
    ($cluster_size:expr) => {
        tracing::debug_span!(
            $crate::tracing_setup::spans::names::ROOT_CAUSE,
            cluster_size = $cluster_size
        )
    };
}

/// Create a retention sweep span.
#[macro_export]
macro_rules! eviction_span {
    ($cutoff:expr) => {
        tracing::info_span!($crate::tracing_setup::spans::names::EVICTION, cutoff = %$cutoff)
    };
}

/// Create a hydration span.
#[macro_export]
macro_rules! hydrate_span {
    ($node_count:expr, $edge_count:expr) => {
        tracing::info_span!(
            $crate::tracing_setup::spans::names::HYDRATE,
            node_count = $node_count,
            edge_count = $edge_count
        )
    };
}

/// Span names, shared by the macros and by subscribers filtering on them.
pub mod names {
    pub const INGEST: &str = "reskpoints.ingest";
    pub const IMPACT: &str = "reskpoints.impact";
    pub const ROOT_CAUSE: &str = "reskpoints.root_cause";
    pub const EVICTION: &str = "reskpoints.eviction";
    pub const HYDRATE: &str = "reskpoints.hydrate";
}
