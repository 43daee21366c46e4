/// Errors raised by persistence hooks and record decoding.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to load graph records: {reason}")]
    LoadFailed { reason: String },

    #[error("failed to save graph records: {reason}")]
    SaveFailed { reason: String },

    #[error("corrupt graph record: {details}")]
    CorruptRecord { details: String },
}
