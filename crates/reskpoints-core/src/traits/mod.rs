mod graph_persistence;

pub use graph_persistence::IGraphPersistence;
