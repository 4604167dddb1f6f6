//! Graph construction and breadth-first search core for Graph500-style
//! traversal benchmarks.
//!
//! A driver feeds an edge list to [`build_graph`], runs [`run_bfs`] once per
//! sampled root against the returned [`Graph`], and releases it with
//! [`destroy_graph`]. Edge generation, result validation and reporting stay
//! on the driver side.
//!
//! ```rust
//! use graph500_bfs::{build_graph, destroy_graph, run_bfs, Parent};
//!
//! let graph = build_graph(&[(0u64, 1u64), (1, 2), (2, 3), (0, 3)]).unwrap();
//! let run = run_bfs(&graph, 0).unwrap();
//! assert_eq!(run.tree.parent(0), Parent::Root);
//! assert_eq!(run.tree.parent(1), Parent::Vertex(0));
//! assert_eq!(run.outcome.max_reached, 3);
//! destroy_graph(graph);
//! ```
//!
//! For a fixed vertex universe, duplicate handling or thread control use
//! [`GraphBuilder`] and [`BfsEngine::with_config`] directly.

pub mod bfs;
pub mod config;
pub mod edge;
pub mod error;
pub mod graph;
pub mod tree;

pub use bfs::{BfsEngine, BfsRun, TraversalOutcome, TraversalStats};
pub use config::{EngineConfig, ThreadConfig};
pub use edge::{Edge, VertexId, MAX_VERTEX_ID};
pub use error::{BuildError, ConfigError, TraverseError};
pub use graph::{DuplicatePolicy, Graph, GraphBuilder};
pub use tree::{BfsTree, Parent, ROOT, UNREACHED};

/// Builds a graph over `0..=max id`, merging duplicate edges and dropping
/// self-loops.
pub fn build_graph<E>(edges: &[E]) -> error::BuildResult<Graph>
where
    E: Copy + Into<Edge>,
{
    Graph::build(edges)
}

/// Traverses `graph` from `source` with a default engine.
///
/// Drivers running many roots should keep one [`BfsEngine`] and call
/// [`BfsEngine::run`] on it instead of paying engine setup per root.
pub fn run_bfs(graph: &Graph, source: VertexId) -> error::TraverseResult<BfsRun> {
    BfsEngine::new().run(graph, source)
}

/// Releases all memory held by `graph`.
pub fn destroy_graph(graph: Graph) {
    graph.destroy();
}
