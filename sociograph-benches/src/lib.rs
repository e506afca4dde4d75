//! Benchmark support crate for sociograph.
//!
//! Provides seeded graph fixtures and parameter types used by the Criterion
//! benchmarks for traversal, path metrics, homophily testing and robustness
//! simulation.

pub mod error;
pub mod params;

use sociograph_core::{GeneratorParams, GraphModel, generate};

use crate::{error::BenchSetupError, params::GraphBenchParams};

/// Seed used for every benchmark fixture.
pub const SEED: u64 = 42;

/// Node counts exercised by the size sweeps.
pub const NODE_COUNTS: &[usize] = &[100, 400, 1_000];

/// Connectivity constant used by the size sweeps; above 1 the graph is
/// almost surely connected.
pub const CONSTANT: f64 = 2.0;

/// Generates the seeded random graph described by `params`.
///
/// # Errors
/// Returns [`BenchSetupError::Graph`] when the parameters are rejected.
pub fn fixture(params: &GraphBenchParams) -> Result<GraphModel, BenchSetupError> {
    let generator = GeneratorParams::new(params.node_count, params.constant)?.with_seed(SEED);
    Ok(generate(&generator))
}

/// Picks `count` evenly spaced node identifiers to seed a multi-source BFS.
///
/// # Errors
/// Returns [`BenchSetupError::ZeroValue`] when `count` is zero.
pub fn spread_sources(graph: &GraphModel, count: usize) -> Result<Vec<String>, BenchSetupError> {
    if count == 0 {
        return Err(BenchSetupError::ZeroValue {
            context: "source count",
        });
    }
    let stride = (graph.node_count() / count).max(1);
    Ok(graph
        .nodes()
        .step_by(stride)
        .take(count)
        .map(|id| id.as_str().to_owned())
        .collect())
}
