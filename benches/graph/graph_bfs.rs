//! Graph construction and BFS benchmarks.
//!
//! Builds a seeded random graph with `2^SCALE` vertices and `EDGE_FACTOR`
//! edges per vertex, then measures construction and single-root traversal
//! with the sequential and the pooled engine.
//!
//! Run: `cargo bench --bench graph_bfs`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use graph500_bfs::{BfsEngine, Edge, EngineConfig, Graph, ThreadConfig, VertexId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ---------------------------------------------------------------------------
// Default parameters
// ---------------------------------------------------------------------------

const SCALE: u32 = 16;
const EDGE_FACTOR: u64 = 16;
const SEED: u64 = 42;
const ROOTS: usize = 8;

fn edge_list() -> Vec<Edge> {
    let vertices = 1u64 << SCALE;
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..vertices * EDGE_FACTOR)
        .map(|_| Edge::new(rng.gen_range(0..vertices), rng.gen_range(0..vertices)))
        .collect()
}

/// Roots with at least one neighbor, so no sample stops at an isolated vertex.
fn sample_roots(graph: &Graph) -> Vec<VertexId> {
    let mut rng = StdRng::seed_from_u64(SEED + 1);
    let mut roots = Vec::with_capacity(ROOTS);
    while roots.len() < ROOTS {
        let v = rng.gen_range(0..graph.vertex_count());
        if graph.degree(v) > 0 {
            roots.push(v);
        }
    }
    roots
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn build(c: &mut Criterion) {
    let edges = edge_list();
    let mut group = c.benchmark_group("graph/build");
    group.throughput(Throughput::Elements(edges.len() as u64));
    group.sample_size(10);
    group.bench_function(BenchmarkId::new("scale", SCALE), |b| {
        b.iter(|| black_box(Graph::build(&edges).unwrap()));
    });
    group.finish();
}

fn bfs(c: &mut Criterion) {
    let graph = Graph::build(&edge_list()).unwrap();
    let roots = sample_roots(&graph);

    let engines = [
        ("sequential", EngineConfig::sequential()),
        ("pooled", EngineConfig::new().with_threads(ThreadConfig::Auto)),
    ];

    let mut group = c.benchmark_group("graph/bfs");
    group.throughput(Throughput::Elements(graph.edge_count()));
    for (label, config) in engines {
        let engine = BfsEngine::with_config(config).unwrap();
        let mut tree = vec![0; graph.vertex_count() as usize];
        let mut i = 0usize;
        group.bench_function(BenchmarkId::new(label, SCALE), |b| {
            b.iter(|| {
                let root = roots[i % roots.len()];
                i += 1;
                black_box(engine.traverse(&graph, root, &mut tree).unwrap())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, build, bfs);
criterion_main!(benches);
