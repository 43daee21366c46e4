//! Component affinity signal.
//! Same component scores highest, dependency-adjacent components score lower.

use reskpoints_core::config::CorrelationConfig;
use reskpoints_core::models::RelationKind;

use crate::correlation::dependency_map::DependencyMap;

/// Affinity between two components and the relation kind it implies.
/// Unrelated components yield `(0.0, None)`.
pub fn score(
    a: &str,
    b: &str,
    dependencies: &DependencyMap,
    config: &CorrelationConfig,
) -> (f64, Option<RelationKind>) {
    if a == b {
        (config.same_component_affinity, Some(RelationKind::TemporalCorrelation))
    } else if dependencies.are_adjacent(a, b) {
        (config.adjacent_affinity, Some(RelationKind::ComponentDependency))
    } else {
        (0.0, None)
    }
}
