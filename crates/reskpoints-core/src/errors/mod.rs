//! Error taxonomy. `CausalityError` covers graph contract violations,
//! `PersistenceError` covers load/save hooks, `ReskError` wraps both.

mod causality_error;
mod persistence_error;

pub use causality_error::CausalityError;
pub use persistence_error::PersistenceError;

/// Top-level error for the Reskpoints engine.
#[derive(Debug, thiserror::Error)]
pub enum ReskError {
    #[error(transparent)]
    Causality(#[from] CausalityError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("concurrency error: {0}")]
    ConcurrencyError(String),

    #[error("invalid configuration: {0}")]
    ConfigError(String),
}

impl ReskError {
    /// The causality error carried by this error, if any.
    pub fn as_causality(&self) -> Option<&CausalityError> {
        match self {
            Self::Causality(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_duplicate_node(&self) -> bool {
        matches!(self, Self::Causality(CausalityError::DuplicateNode { .. }))
    }

    pub fn is_unknown_node(&self) -> bool {
        matches!(self, Self::Causality(CausalityError::UnknownNode { .. }))
    }
}

pub type ReskResult<T> = Result<T, ReskError>;
