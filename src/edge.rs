//! Edge-list input types.

use serde::{Deserialize, Serialize};

/// Vertex identifier. Ids index directly into the CSR offsets and the
/// parent array, so the id space is dense `0..vertex_count`.
pub type VertexId = u64;

/// Largest id a vertex may carry. The two values above it are reserved for
/// the [`crate::tree::ROOT`] and [`crate::tree::UNREACHED`] sentinels.
pub const MAX_VERTEX_ID: VertexId = u64::MAX - 2;

/// One input edge. Edges are treated as undirected by the builder, so
/// `Edge::new(a, b)` and `Edge::new(b, a)` describe the same connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub src: VertexId,
    pub dst: VertexId,
}

impl Edge {
    #[must_use]
    pub const fn new(src: VertexId, dst: VertexId) -> Self {
        Self { src, dst }
    }

    #[must_use]
    pub const fn is_self_loop(&self) -> bool {
        self.src == self.dst
    }

    /// Larger of the two endpoints.
    #[must_use]
    pub fn max_endpoint(&self) -> VertexId {
        self.src.max(self.dst)
    }
}

impl From<(VertexId, VertexId)> for Edge {
    fn from((src, dst): (VertexId, VertexId)) -> Self {
        Self { src, dst }
    }
}

impl From<Edge> for (VertexId, VertexId) {
    fn from(edge: Edge) -> Self {
        (edge.src, edge.dst)
    }
}
