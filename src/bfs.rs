//! Level-synchronous BFS over a [`Graph`].
//!
//! Every vertex owns one parent slot. A slot holding [`UNREACHED`] is an
//! unvisited vertex; a successful compare-and-swap from [`UNREACHED`] to the
//! expanding vertex's id claims the child and moves it onto the next
//! frontier, so each vertex is claimed by exactly one parent even when
//! several workers expand the same level. Once a level finishes, every
//! vertex on it has been expanded and is visited.
//!
//! Frontiers at or above [`EngineConfig::min_frontier_for_parallel`] are split
//! into chunks expanded by rayon workers; smaller ones run on the caller.
//! Which parent wins a vertex reachable from several frontier members is
//! unspecified under parallel expansion; any of them is a valid BFS parent.

use std::collections::TryReserveError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::{EngineConfig, ThreadConfig};
use crate::edge::VertexId;
use crate::error::{ConfigError, TraverseError, TraverseResult};
use crate::graph::Graph;
use crate::tree::{BfsTree, ROOT, UNREACHED};

/// Counters collected during one traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalStats {
    /// Number of frontiers expanded (eccentricity of the source + 1).
    pub levels: u32,
    /// Levels whose expansion ran on the worker pool.
    pub parallel_levels: u32,
    /// Vertices in the source's component, source included.
    pub vertices_reached: u64,
    /// Adjacency entries inspected while expanding frontiers.
    pub edges_scanned: u64,
    /// Largest frontier seen.
    pub max_frontier: u64,
}

/// Timing and summary of one traversal.
#[derive(Debug, Clone, PartialEq)]
pub struct TraversalOutcome {
    /// Wall-clock time of frontier expansion, from the first level to the
    /// empty frontier. Slot initialisation and copy-out are excluded.
    pub elapsed: Duration,
    /// Largest vertex id that was reached.
    pub max_reached: VertexId,
    pub stats: TraversalStats,
}

impl TraversalOutcome {
    #[must_use]
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Tree plus outcome of [`BfsEngine::run`].
#[derive(Debug, Clone)]
pub struct BfsRun {
    pub tree: BfsTree,
    pub outcome: TraversalOutcome,
}

/// Runs traversals against shared, read-only graphs.
///
/// The engine holds no per-traversal state, so one engine may serve any
/// number of graphs and concurrent callers.
#[derive(Debug)]
pub struct BfsEngine {
    config: EngineConfig,
    pool: Option<rayon::ThreadPool>,
}

impl Default for BfsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BfsEngine {
    /// Engine with the default config (rayon global pool).
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            pool: None,
        }
    }

    /// Engine with the given config. `ThreadConfig::Fixed(n)` with `n > 1`
    /// starts a dedicated pool of `n` workers.
    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let pool = match config.threads {
            ThreadConfig::Fixed(n) if n > 1 => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("bfs-worker-{i}"))
                    .build()?,
            ),
            _ => None,
        };
        debug!(
            workers = config.threads.effective_threads(),
            dedicated_pool = pool.is_some(),
            min_frontier = config.min_frontier_for_parallel,
            chunk_size = config.chunk_size,
            "engine configured"
        );
        Ok(Self { config, pool })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of workers that expand a parallel level.
    #[must_use]
    pub fn worker_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => self.config.threads.effective_threads(),
        }
    }

    /// Traverses from `source`, allocating the tree.
    pub fn run(&self, graph: &Graph, source: VertexId) -> TraverseResult<BfsRun> {
        if !graph.contains_vertex(source) {
            return Err(TraverseError::InvalidSource {
                vertex: source,
                vertex_count: graph.vertex_count(),
            });
        }
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(graph.len())
            .map_err(alloc_err("tree"))?;
        slots.resize(graph.len(), UNREACHED);
        let outcome = self.traverse(graph, source, &mut slots)?;
        Ok(BfsRun {
            tree: BfsTree::from_parts(source, slots),
            outcome,
        })
    }

    /// Traverses from `source`, overwriting every slot of `tree_out`.
    ///
    /// `tree_out` must have exactly one slot per vertex. On return slot `v`
    /// holds the parent of `v`, [`ROOT`] for the source, or [`UNREACHED`].
    /// On error `tree_out` is left untouched.
    pub fn traverse(
        &self,
        graph: &Graph,
        source: VertexId,
        tree_out: &mut [VertexId],
    ) -> TraverseResult<TraversalOutcome> {
        let n = graph.len();
        if !graph.contains_vertex(source) {
            return Err(TraverseError::InvalidSource {
                vertex: source,
                vertex_count: graph.vertex_count(),
            });
        }
        if tree_out.len() != n {
            return Err(TraverseError::TreeLengthMismatch {
                expected: n,
                actual: tree_out.len(),
            });
        }

        let mut parents: Vec<AtomicU64> = Vec::new();
        parents
            .try_reserve_exact(n)
            .map_err(alloc_err("parent slots"))?;
        parents.extend((0..n).map(|_| AtomicU64::new(UNREACHED)));

        let mut frontier: Vec<usize> = Vec::new();
        frontier
            .try_reserve_exact(n)
            .map_err(alloc_err("frontier"))?;
        let mut next: Vec<usize> = Vec::new();
        next.try_reserve_exact(n)
            .map_err(alloc_err("next frontier"))?;

        let src = source as usize;
        parents[src].store(ROOT, Ordering::Relaxed);
        frontier.push(src);

        let mut stats = TraversalStats::default();
        let mut max_reached = src;
        let start = Instant::now();

        while !frontier.is_empty() {
            let parallel = self.config.should_parallelize_frontier(frontier.len());
            trace!(
                level = stats.levels,
                frontier = frontier.len(),
                parallel,
                "expanding level"
            );
            stats.levels += 1;
            stats.vertices_reached += frontier.len() as u64;
            stats.max_frontier = stats.max_frontier.max(frontier.len() as u64);

            let level = if parallel {
                stats.parallel_levels += 1;
                self.expand_parallel(graph, &parents, &frontier, &mut next)?
            } else {
                expand_into(graph, &parents, &frontier, &mut next)?
            };
            stats.edges_scanned += level.edges_scanned as u64;
            max_reached = max_reached.max(level.max_claimed);

            std::mem::swap(&mut frontier, &mut next);
            next.clear();
        }

        let elapsed = start.elapsed();

        for (slot, parent) in tree_out.iter_mut().zip(&parents) {
            *slot = parent.load(Ordering::Relaxed);
        }

        debug!(
            source,
            reached = stats.vertices_reached,
            levels = stats.levels,
            parallel_levels = stats.parallel_levels,
            edges_scanned = stats.edges_scanned,
            elapsed_us = elapsed.as_micros() as u64,
            "traversal complete"
        );

        Ok(TraversalOutcome {
            elapsed,
            max_reached: max_reached as VertexId,
            stats,
        })
    }

    fn expand_parallel(
        &self,
        graph: &Graph,
        parents: &[AtomicU64],
        frontier: &[usize],
        next: &mut Vec<usize>,
    ) -> TraverseResult<LevelSummary> {
        let chunk_size = self.config.chunk_size;
        let expand = || {
            frontier
                .par_chunks(chunk_size)
                .map(|chunk| {
                    let mut local = Vec::new();
                    let summary = expand_into(graph, parents, chunk, &mut local)?;
                    Ok::<_, TraverseError>((local, summary))
                })
                .collect::<TraverseResult<Vec<_>>>()
        };
        let parts = match &self.pool {
            Some(pool) => pool.install(expand)?,
            None => expand()?,
        };

        // Claimed vertices are disjoint across chunks, so the total never
        // exceeds the capacity reserved for `next`.
        let mut level = LevelSummary::default();
        for (local, summary) in parts {
            next.extend_from_slice(&local);
            level.merge(summary);
        }
        Ok(level)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct LevelSummary {
    edges_scanned: usize,
    max_claimed: usize,
}

impl LevelSummary {
    fn merge(&mut self, other: LevelSummary) {
        self.edges_scanned += other.edges_scanned;
        self.max_claimed = self.max_claimed.max(other.max_claimed);
    }
}

/// Expands `frontier`, pushing every vertex it claims onto `out`.
fn expand_into(
    graph: &Graph,
    parents: &[AtomicU64],
    frontier: &[usize],
    out: &mut Vec<usize>,
) -> TraverseResult<LevelSummary> {
    let mut summary = LevelSummary::default();
    for &v in frontier {
        let row = graph.row(v);
        summary.edges_scanned += row.len();
        out.try_reserve(row.len())
            .map_err(alloc_err("frontier chunk"))?;
        for &u in row {
            let slot = &parents[u as usize];
            // Plain load first so already-claimed vertices skip the CAS.
            if slot.load(Ordering::Relaxed) == UNREACHED
                && slot
                    .compare_exchange(UNREACHED, v as VertexId, Ordering::Relaxed, Ordering::Relaxed)
                    .is_ok()
            {
                out.push(u as usize);
                summary.max_claimed = summary.max_claimed.max(u as usize);
            }
        }
    }
    Ok(summary)
}

fn alloc_err(what: &'static str) -> impl FnOnce(TryReserveError) -> TraverseError {
    move |source| TraverseError::Allocation { what, source }
}
