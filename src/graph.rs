//! Compressed sparse row (CSR) graph built from an undirected edge list.
//!
//! Layout:
//! - `offsets`: `Vec<usize>` of length `n + 1`; the neighbors of `v` live in
//!   `neighbors[offsets[v]..offsets[v + 1]]`
//! - `neighbors`: one flat `Vec<VertexId>`, every row sorted ascending
//!
//! Construction is a two-pass bucket fill: count degrees, prefix-sum them into
//! offsets, then scatter every edge into both endpoint rows through per-row
//! write cursors. Rows are sorted in parallel and optionally deduplicated.

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::edge::{Edge, VertexId, MAX_VERTEX_ID};
use crate::error::{BuildError, BuildResult};

/// What to do with an edge that appears more than once in the input.
///
/// Self-loops are dropped under every policy: they never change which
/// vertices a traversal reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Collapse repeated neighbors so every row is a set.
    #[default]
    Merge,
    /// Keep every input edge; rows may repeat a neighbor.
    Keep,
}

/// Configures and runs graph construction.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    vertex_count: Option<u64>,
    duplicates: DuplicatePolicy,
}

impl GraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the vertex universe to `0..count`. Edges touching an id outside
    /// it are rejected. Without this the universe is one past the largest id
    /// seen in the edge list.
    #[must_use]
    pub fn vertex_count(mut self, count: u64) -> Self {
        self.vertex_count = Some(count);
        self
    }

    #[must_use]
    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Builds the graph. The edge slice is only read; nothing borrowed from
    /// it outlives this call.
    pub fn build<E>(&self, edges: &[E]) -> BuildResult<Graph>
    where
        E: Copy + Into<Edge>,
    {
        let start = Instant::now();
        let n = self.resolve_vertex_count(edges)?;

        // Pass 1: degree histogram shifted by one so the prefix sum lands in place.
        let mut offsets: Vec<usize> = try_filled(n + 1, 0, "offset index")?;
        let mut self_loops = 0usize;
        for edge in edge_iter(edges) {
            if edge.is_self_loop() {
                self_loops += 1;
                continue;
            }
            offsets[edge.src as usize + 1] += 1;
            offsets[edge.dst as usize + 1] += 1;
        }
        for v in 0..n {
            offsets[v + 1] += offsets[v];
        }

        // Pass 2: scatter both directions through per-row cursors.
        let total = offsets[n];
        let mut neighbors: Vec<VertexId> = try_filled(total, 0, "neighbor array")?;
        let mut cursors: Vec<usize> = try_copy(&offsets[..n], "row cursors")?;
        for edge in edge_iter(edges) {
            if edge.is_self_loop() {
                continue;
            }
            let (s, d) = (edge.src as usize, edge.dst as usize);
            neighbors[cursors[s]] = edge.dst;
            cursors[s] += 1;
            neighbors[cursors[d]] = edge.src;
            cursors[d] += 1;
        }
        drop(cursors);

        sort_rows(&offsets, &mut neighbors)?;
        if self.duplicates == DuplicatePolicy::Merge {
            merge_duplicates(&mut offsets, &mut neighbors);
        }

        let graph = Graph {
            offsets,
            neighbors,
            input_edges: edges.len(),
        };
        debug!(
            vertices = graph.vertex_count(),
            input_edges = graph.input_edges,
            stored_edges = graph.edge_count(),
            self_loops,
            policy = ?self.duplicates,
            elapsed_us = start.elapsed().as_micros() as u64,
            "graph built"
        );
        Ok(graph)
    }

    fn resolve_vertex_count<E>(&self, edges: &[E]) -> BuildResult<usize>
    where
        E: Copy + Into<Edge>,
    {
        match self.vertex_count {
            Some(count) => {
                if count > MAX_VERTEX_ID + 1 {
                    return Err(BuildError::VertexCountTooLarge {
                        vertex_count: count,
                    });
                }
                for edge in edge_iter(edges) {
                    let vertex = edge.max_endpoint();
                    if vertex >= count {
                        return Err(BuildError::VertexOutOfRange {
                            vertex,
                            vertex_count: count,
                        });
                    }
                }
                usize::try_from(count).map_err(|_| BuildError::VertexCountTooLarge {
                    vertex_count: count,
                })
            }
            None => {
                let Some(max) = edge_iter(edges).map(|e| e.max_endpoint()).max() else {
                    return Ok(0);
                };
                if max > MAX_VERTEX_ID {
                    return Err(BuildError::VertexIdTooLarge { vertex: max });
                }
                usize::try_from(max)
                    .ok()
                    .and_then(|m| m.checked_add(1))
                    .ok_or(BuildError::VertexIdTooLarge { vertex: max })
            }
        }
    }
}

fn edge_iter<E>(edges: &[E]) -> impl Iterator<Item = Edge> + '_
where
    E: Copy + Into<Edge>,
{
    edges.iter().map(|&e| e.into())
}

fn try_filled<T: Clone>(len: usize, value: T, what: &'static str) -> BuildResult<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|source| BuildError::Allocation { what, source })?;
    v.resize(len, value);
    Ok(v)
}

fn try_copy<T: Copy>(src: &[T], what: &'static str) -> BuildResult<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(src.len())
        .map_err(|source| BuildError::Allocation { what, source })?;
    v.extend_from_slice(src);
    Ok(v)
}

fn sort_rows(offsets: &[usize], neighbors: &mut [VertexId]) -> BuildResult<()> {
    let n = offsets.len() - 1;
    let mut rows: Vec<&mut [VertexId]> = Vec::new();
    rows.try_reserve_exact(n)
        .map_err(|source| BuildError::Allocation {
            what: "row table",
            source,
        })?;
    let mut rest = neighbors;
    for bounds in offsets.windows(2) {
        let (row, tail) = std::mem::take(&mut rest).split_at_mut(bounds[1] - bounds[0]);
        rows.push(row);
        rest = tail;
    }
    rows.par_iter_mut()
        .filter(|row| row.len() > 1)
        .for_each(|row| row.sort_unstable());
    Ok(())
}

/// Compacts sorted rows in place, rewriting `offsets` to the new boundaries.
fn merge_duplicates(offsets: &mut [usize], neighbors: &mut Vec<VertexId>) {
    let n = offsets.len() - 1;
    let mut write = 0usize;
    let mut read_start = offsets[0];
    for v in 0..n {
        let read_end = offsets[v + 1];
        offsets[v] = write;
        let mut last = None;
        for read in read_start..read_end {
            let u = neighbors[read];
            if last != Some(u) {
                neighbors[write] = u;
                write += 1;
                last = Some(u);
            }
        }
        read_start = read_end;
    }
    offsets[n] = write;
    neighbors.truncate(write);
    neighbors.shrink_to_fit();
}

/// Immutable undirected graph in CSR form.
///
/// Built once by [`GraphBuilder`], then shared read-only by any number of
/// traversals. Every retained edge `{u, v}` is stored twice: `v` in the row of
/// `u` and `u` in the row of `v`.
#[derive(Debug)]
pub struct Graph {
    offsets: Vec<usize>,
    neighbors: Vec<VertexId>,
    input_edges: usize,
}

impl Graph {
    /// Builds with default options: universe derived from the edges,
    /// duplicates merged.
    pub fn build<E>(edges: &[E]) -> BuildResult<Self>
    where
        E: Copy + Into<Edge>,
    {
        GraphBuilder::new().build(edges)
    }

    /// Size of the vertex universe.
    #[must_use]
    pub fn vertex_count(&self) -> u64 {
        self.len() as u64
    }

    /// Number of undirected edges retained after self-loop removal and the
    /// duplicate policy.
    #[must_use]
    pub fn edge_count(&self) -> u64 {
        (self.neighbors.len() / 2) as u64
    }

    /// Length of the edge list this graph was built from.
    #[must_use]
    pub fn input_edge_count(&self) -> u64 {
        self.input_edges as u64
    }

    #[must_use]
    pub fn contains_vertex(&self, v: VertexId) -> bool {
        v < self.vertex_count()
    }

    /// Sorted neighbors of `v`; empty for ids outside the universe.
    #[must_use]
    pub fn neighbors(&self, v: VertexId) -> &[VertexId] {
        if self.contains_vertex(v) {
            self.row(v as usize)
        } else {
            &[]
        }
    }

    /// Stored degree of `v` (after the duplicate policy).
    #[must_use]
    pub fn degree(&self, v: VertexId) -> usize {
        self.neighbors(v).len()
    }

    /// Releases the adjacency arrays. Consuming `self` makes a traversal
    /// after teardown a compile error rather than a runtime check.
    pub fn destroy(self) {
        debug!(
            vertices = self.vertex_count(),
            stored_edges = self.edge_count(),
            "graph destroyed"
        );
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    #[inline]
    pub(crate) fn row(&self, v: usize) -> &[VertexId] {
        &self.neighbors[self.offsets[v]..self.offsets[v + 1]]
    }
}
