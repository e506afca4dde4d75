//! Benchmark parameter types.

use std::fmt;

/// Shape of a generated benchmark graph.
#[derive(Clone, Debug)]
pub struct GraphBenchParams {
    /// Number of nodes in the graph.
    pub node_count: usize,
    /// Connectivity constant `c`.
    pub constant: f64,
}

impl fmt::Display for GraphBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},c={}", self.node_count, self.constant)
    }
}

/// Parameters for a robustness benchmark run.
#[derive(Clone, Debug)]
pub struct RobustnessBenchParams {
    /// Number of nodes in the graph.
    pub node_count: usize,
    /// Edges removed per trial.
    pub removals: usize,
    /// Monte Carlo trials per run.
    pub trials: usize,
}

impl fmt::Display for RobustnessBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={},k={},trials={}",
            self.node_count, self.removals, self.trials
        )
    }
}
