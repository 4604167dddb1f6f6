//! Shared test utilities: edge-list fixtures and a BFS tree validator.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use graph500_bfs::{BfsTree, Edge, Parent, VertexId};
use petgraph::algo::dijkstra;
use petgraph::graphmap::UnGraphMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// =============================================================================
// Fixtures
// =============================================================================

pub fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data")
}

pub fn two_components() -> Vec<Edge> {
    load_edge_list(&data_dir().join("two-components.e")).unwrap()
}

/// Parses an edge list: one `src dst` pair per line, `#` starts a comment.
pub fn load_edge_list(path: &Path) -> Result<Vec<Edge>, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;

    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| {
            let parts: Vec<&str> = l.split_whitespace().collect();
            if parts.len() != 2 {
                return Err(format!("bad edge line: '{}'", l));
            }
            let src = parts[0]
                .parse::<u64>()
                .map_err(|e| format!("bad edge src '{}': {}", parts[0], e))?;
            let dst = parts[1]
                .parse::<u64>()
                .map_err(|e| format!("bad edge dst '{}': {}", parts[1], e))?;
            Ok(Edge::new(src, dst))
        })
        .collect()
}

pub fn write_edge_list(path: &Path, edges: &[Edge]) -> std::io::Result<()> {
    let body: String = edges
        .iter()
        .map(|e| format!("{} {}\n", e.src, e.dst))
        .collect();
    std::fs::write(path, body)
}

/// Uniform random multigraph; self-loops and duplicates are left in.
pub fn random_edges(seed: u64, vertices: u64, edges: usize) -> Vec<Edge> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..edges)
        .map(|_| Edge::new(rng.gen_range(0..vertices), rng.gen_range(0..vertices)))
        .collect()
}

// =============================================================================
// Validation
// =============================================================================

pub struct ValidationResult {
    pub pass: bool,
    pub mismatches: usize,
    pub details: Vec<String>,
}

impl ValidationResult {
    pub fn assert_pass(&self) {
        assert!(
            self.pass,
            "{} mismatches, first: {:?}",
            self.mismatches, self.details
        );
    }
}

/// Reference hop counts from `source`, computed by petgraph over the
/// undirected edge set.
pub fn reference_depths(
    vertex_count: u64,
    edges: &[Edge],
    source: VertexId,
) -> HashMap<VertexId, u64> {
    let mut g: UnGraphMap<VertexId, ()> = UnGraphMap::new();
    for v in 0..vertex_count {
        g.add_node(v);
    }
    for e in edges {
        g.add_edge(e.src, e.dst, ());
    }
    dijkstra(&g, source, None, |_| 1u64)
}

/// Checks a tree against the edge list: reachability matches the reference,
/// every parent is an input edge, and every vertex sits exactly one level
/// below its parent.
pub fn validate_tree(
    vertex_count: u64,
    edges: &[Edge],
    tree: &BfsTree,
    source: VertexId,
) -> ValidationResult {
    let reference = reference_depths(vertex_count, edges, source);
    let edge_set: HashSet<(VertexId, VertexId)> = edges
        .iter()
        .map(|e| (e.src.min(e.dst), e.src.max(e.dst)))
        .collect();

    let mut mismatches = 0;
    let mut details = Vec::new();
    let mut fail = |msg: String| {
        mismatches += 1;
        if details.len() < 10 {
            details.push(msg);
        }
    };

    if tree.len() as u64 != vertex_count {
        fail(format!("tree has {} slots, expected {}", tree.len(), vertex_count));
    }

    for v in 0..vertex_count {
        let expected = reference.get(&v).copied();
        match (tree.parent(v), expected) {
            (Parent::Unreached, None) => {}
            (Parent::Unreached, Some(d)) => {
                fail(format!("vertex {}: expected depth {}, but not visited", v, d));
            }
            (_, None) => fail(format!("vertex {}: expected unreachable, got visited", v)),
            (Parent::Root, Some(_)) => {
                if v != source {
                    fail(format!("vertex {}: marked root, source is {}", v, source));
                }
            }
            (Parent::Vertex(u), Some(d)) => {
                if !edge_set.contains(&(u.min(v), u.max(v))) {
                    fail(format!("vertex {}: parent {} is not a neighbor", v, u));
                }
                match reference.get(&u) {
                    Some(&du) if du + 1 == d => {}
                    other => fail(format!(
                        "vertex {}: depth {} but parent {} has depth {:?}",
                        v, d, u, other
                    )),
                }
                match tree.path_to_root(v) {
                    Some(path) if path.len() as u64 == d + 1 => {}
                    other => fail(format!("vertex {}: bad path to root {:?}", v, other)),
                }
            }
        }
    }

    ValidationResult {
        pass: mismatches == 0,
        mismatches,
        details,
    }
}
