//! Error types for graph construction, traversal and configuration.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::edge::VertexId;

/// Failure to build a [`crate::Graph`]. The partially built graph is
/// discarded; nothing is handed back to the caller.
#[derive(Error, Debug)]
pub enum BuildError {
    /// An edge endpoint lies outside the declared vertex range.
    #[error("vertex {vertex} is out of range for a graph of {vertex_count} vertices")]
    VertexOutOfRange { vertex: VertexId, vertex_count: u64 },

    /// An edge endpoint collides with the reserved sentinel ids or cannot be
    /// addressed on this platform.
    #[error("vertex id {vertex} exceeds the supported id space")]
    VertexIdTooLarge { vertex: VertexId },

    /// The declared vertex count cannot be addressed on this platform.
    #[error("vertex count {vertex_count} exceeds the supported id space")]
    VertexCountTooLarge { vertex_count: u64 },

    /// An allocation sized by the input could not be satisfied.
    #[error("failed to allocate {what}: {source}")]
    Allocation {
        what: &'static str,
        #[source]
        source: TryReserveError,
    },
}

/// Failure of a single traversal. The graph stays valid for other sources.
#[derive(Error, Debug)]
pub enum TraverseError {
    /// The requested root is not a vertex of the graph.
    #[error("source vertex {vertex} is outside [0, {vertex_count})")]
    InvalidSource { vertex: VertexId, vertex_count: u64 },

    /// Caller-provided tree storage does not have one slot per vertex.
    #[error("tree buffer holds {actual} slots, graph has {expected} vertices")]
    TreeLengthMismatch { expected: usize, actual: usize },

    /// Traversal state could not be allocated.
    #[error("failed to allocate {what}: {source}")]
    Allocation {
        what: &'static str,
        #[source]
        source: TryReserveError,
    },
}

/// Invalid engine configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is syntactically fine but unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// The dedicated worker pool could not be started.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type alias for graph construction.
pub type BuildResult<T> = std::result::Result<T, BuildError>;

/// Result type alias for traversals.
pub type TraverseResult<T> = std::result::Result<T, TraverseError>;
