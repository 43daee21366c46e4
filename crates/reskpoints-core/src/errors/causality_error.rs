/// Causality graph errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CausalityError {
    #[error("node already exists: {id}")]
    DuplicateNode { id: String },

    #[error("unknown node: {id}")]
    UnknownNode { id: String },

    #[error("self-loop rejected on node {id}")]
    SelfLoop { id: String },

    #[error("confidence out of range [0, 1]: {value}")]
    InvalidConfidence { value: f64 },

    #[error("graph inconsistency: {details}")]
    GraphInconsistency { details: String },
}
