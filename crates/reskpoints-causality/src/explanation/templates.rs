//! Sentence templates per relation kind.
//! `{source}` and `{target}` are replaced with node descriptions.

use reskpoints_core::models::RelationKind;

pub fn template_for(kind: RelationKind) -> &'static str {
    match kind {
        RelationKind::TemporalCorrelation => {
            "{source} preceded {target} on the same component"
        }
        RelationKind::ComponentDependency => {
            "{source} propagated to {target} across a component dependency"
        }
        RelationKind::ManualAnnotation => "{source} was marked by an operator as causing {target}",
    }
}

pub fn render(kind: RelationKind, source: &str, target: &str) -> String {
    template_for(kind)
        .replace("{source}", source)
        .replace("{target}", target)
}

/// Short label grouping contributing factors.
pub fn factor_label(kind: RelationKind) -> &'static str {
    match kind {
        RelationKind::TemporalCorrelation => "temporal",
        RelationKind::ComponentDependency => "dependency",
        RelationKind::ManualAnnotation => "operator",
    }
}
