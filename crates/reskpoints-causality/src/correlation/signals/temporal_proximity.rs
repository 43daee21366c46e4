//! Temporal proximity signal.
//! Events close together in time are more likely causally related.

/// Linear decay over the window: 1.0 at the same instant, 0.0 at or beyond
/// the window edge.
pub fn score(distance_ms: i64, window_ms: i64) -> f64 {
    if window_ms <= 0 {
        return 0.0;
    }
    let distance = distance_ms.unsigned_abs() as f64;
    let window = window_ms as f64;
    if distance >= window {
        return 0.0;
    }
    1.0 - distance / window
}
