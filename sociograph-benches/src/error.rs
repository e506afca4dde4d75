//! Benchmark setup error type.
//!
//! Setup functions propagate failures with `?` so that benchmark bodies
//! never need `.expect()`.

use sociograph_core::GraphError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Graph generation or an analysis rejected its parameters.
    #[error("graph operation failed: {0}")]
    Graph(#[from] GraphError),
    /// A zero value was passed where a non-zero integer was required.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// A description of the parameter that was unexpectedly zero.
        context: &'static str,
    },
}
