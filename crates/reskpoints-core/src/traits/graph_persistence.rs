use crate::errors::ReskResult;
use crate::models::GraphRecords;

/// Load/save hooks implemented by the external storage collaborator.
///
/// The engine never performs I/O itself. It hands complete record sets to
/// `save` and rebuilds its in-memory graph from whatever `load` returns.
pub trait IGraphPersistence: Send + Sync {
    /// Load the last persisted graph. An empty record set means "nothing stored".
    fn load(&self) -> ReskResult<GraphRecords>;

    /// Persist a complete record set, replacing whatever was stored before.
    fn save(&self, records: &GraphRecords) -> ReskResult<()>;
}
