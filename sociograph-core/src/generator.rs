//! Erdős–Rényi random graph generation.
//!
//! The edge probability is derived from the node count and a connectivity
//! constant as `p = c · ln(n) / n`, so `c > 1` places the graph above the
//! connectivity threshold with high probability.

use rand::{Rng, SeedableRng, distributions::Standard, rngs::SmallRng};
use tracing::{debug, instrument};

use crate::{
    error::{GraphError, Result},
    graph::{GraphModel, Sign},
};

/// Seed used when the caller does not override it.
pub const DEFAULT_SEED: u64 = 42;

/// Validated parameters for [`construct`].
///
/// # Examples
/// ```
/// use sociograph_core::GeneratorParams;
///
/// let params = GeneratorParams::new(10, 1.5)?.with_seed(7);
/// assert_eq!(params.node_count(), 10);
/// assert_eq!(params.seed(), 7);
/// assert!((params.edge_probability() - 1.5 * 10f64.ln() / 10.0).abs() < 1e-12);
/// # Ok::<(), sociograph_core::GraphError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorParams {
    node_count: usize,
    constant: f64,
    edge_probability: f64,
    seed: u64,
}

impl GeneratorParams {
    /// Validates `node_count` and `constant` and derives the edge probability.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidParameter`] when `node_count <= 1`, when
    /// `constant` is not a positive finite number, or when the derived
    /// probability exceeds `1`.
    pub fn new(node_count: usize, constant: f64) -> Result<Self> {
        if node_count <= 1 {
            return Err(GraphError::invalid(
                "n",
                format!("node count must be greater than 1 (got {node_count})"),
            ));
        }
        if !constant.is_finite() || constant <= 0.0 {
            return Err(GraphError::invalid(
                "c",
                format!("constant must be a positive finite number (got {constant})"),
            ));
        }
        let n = node_count as f64;
        let edge_probability = constant * n.ln() / n;
        if !(0.0..=1.0).contains(&edge_probability) {
            return Err(GraphError::invalid(
                "c",
                format!("derived edge probability {edge_probability} lies outside [0, 1]"),
            ));
        }
        Ok(Self {
            node_count,
            constant,
            edge_probability,
            seed: DEFAULT_SEED,
        })
    }

    /// Overrides the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the number of nodes to generate.
    #[must_use]
    #[rustfmt::skip]
    pub fn node_count(&self) -> usize { self.node_count }

    /// Returns the connectivity constant `c`.
    #[must_use]
    #[rustfmt::skip]
    pub fn constant(&self) -> f64 { self.constant }

    /// Returns the per-pair inclusion probability `p`.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge_probability(&self) -> f64 { self.edge_probability }

    /// Returns the seed driving the generator.
    #[must_use]
    #[rustfmt::skip]
    pub fn seed(&self) -> u64 { self.seed }
}

/// Builds an Erdős–Rényi graph on `n` nodes named `"0"` .. `"n-1"`.
///
/// # Errors
/// Propagates the validation errors of [`GeneratorParams::new`].
///
/// # Examples
/// ```
/// use sociograph_core::construct;
///
/// let first = construct(10, 1.5, 42)?;
/// let second = construct(10, 1.5, 42)?;
/// assert_eq!(first.node_count(), 10);
/// assert_eq!(first, second);
/// # Ok::<(), sociograph_core::GraphError>(())
/// ```
pub fn construct(n: usize, c: f64, seed: u64) -> Result<GraphModel> {
    GeneratorParams::new(n, c).map(|params| generate(&params.with_seed(seed)))
}

/// Builds an Erdős–Rényi graph from validated parameters.
///
/// Each of the `n(n-1)/2` unordered pairs `(i, j)`, `i < j`, is visited in
/// lexicographic order and kept when one uniform draw falls below `p`.
#[must_use]
#[instrument(
    name = "core.generate",
    skip(params),
    fields(n = params.node_count, c = params.constant, seed = params.seed),
)]
pub fn generate(params: &GeneratorParams) -> GraphModel {
    let mut rng = SmallRng::seed_from_u64(params.seed);
    let mut graph = GraphModel::with_capacity(params.node_count);
    for label in 0..params.node_count {
        graph.add_node(label.to_string());
    }

    for left in 0..params.node_count {
        for right in (left + 1)..params.node_count {
            let draw: f64 = rng.sample(Standard);
            if draw < params.edge_probability {
                graph.connect(left, right);
            }
        }
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        p = params.edge_probability,
        "generated random graph"
    );
    graph
}

/// Gives every edge an explicit sign: negative with probability
/// `negative_fraction`, positive otherwise. Returns the number of negative
/// edges.
///
/// Edges are visited in canonical order with one uniform draw each, so the
/// same seed reproduces the same signing.
///
/// # Errors
/// Returns [`GraphError::InvalidParameter`] unless `negative_fraction` lies
/// in `[0, 1]`.
///
/// # Examples
/// ```
/// use sociograph_core::{GraphModel, assign_random_signs, verify_structural_balance};
///
/// let mut graph = GraphModel::new();
/// graph.add_edge("a", "b")?;
/// graph.add_edge("b", "c")?;
/// graph.add_edge("c", "a")?;
/// assert_eq!(assign_random_signs(&mut graph, 0.0, 42)?, 0);
/// assert!(graph.has_signed_edges());
/// assert_eq!(verify_structural_balance(&graph).is_balanced(), Some(true));
/// # Ok::<(), sociograph_core::GraphError>(())
/// ```
#[instrument(
    name = "core.assign_random_signs",
    err,
    skip(graph),
    fields(edges = graph.edge_count()),
)]
pub fn assign_random_signs(
    graph: &mut GraphModel,
    negative_fraction: f64,
    seed: u64,
) -> Result<usize> {
    if !(0.0..=1.0).contains(&negative_fraction) {
        return Err(GraphError::invalid(
            "negative_fraction",
            format!("fraction must lie in [0, 1] (got {negative_fraction})"),
        ));
    }
    let mut rng = SmallRng::seed_from_u64(seed);
    let pairs: Vec<(usize, usize)> = graph.edge_pairs().collect();
    let mut negative = 0_usize;
    for (u, v) in pairs {
        let draw: f64 = rng.sample(Standard);
        let sign = if draw < negative_fraction {
            negative += 1;
            Sign::Negative
        } else {
            Sign::Positive
        };
        graph.sign_at(u, v, sign);
    }
    debug!(negative, "edge signs assigned");
    Ok(negative)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, 1.5)]
    #[case(1, 1.5)]
    #[case(10, 0.0)]
    #[case(10, -1.0)]
    #[case(10, f64::NAN)]
    #[case(10, 10.0)]
    fn rejects_invalid_parameters(#[case] n: usize, #[case] c: f64) {
        let err = construct(n, c, DEFAULT_SEED).expect_err("parameters must be rejected");
        assert!(matches!(err, GraphError::InvalidParameter { .. }));
    }

    #[rstest]
    #[case(2, 1.0)]
    #[case(50, 1.5)]
    #[case(200, 3.0)]
    fn produces_simple_graph_with_n_nodes(#[case] n: usize, #[case] c: f64) {
        let graph = construct(n, c, 9).expect("parameters are valid");
        assert_eq!(graph.node_count(), n);

        let mut seen = HashSet::new();
        for edge in graph.edges() {
            assert_ne!(edge.source(), edge.target());
            let mut pair = [edge.source().clone(), edge.target().clone()];
            pair.sort();
            assert!(seen.insert(pair), "duplicate undirected edge");
        }
        assert_eq!(seen.len(), graph.edge_count());
    }

    #[test]
    fn same_seed_reproduces_the_edge_set() {
        let collect = |seed| {
            construct(10, 1.5, seed)
                .expect("parameters are valid")
                .edges()
                .map(|edge| (edge.source().to_string(), edge.target().to_string()))
                .collect::<Vec<_>>()
        };
        assert_eq!(collect(DEFAULT_SEED), collect(DEFAULT_SEED));
    }

    #[test]
    fn different_seeds_diverge_on_larger_graphs() {
        let first = construct(80, 2.0, 1).expect("parameters are valid");
        let second = construct(80, 2.0, 2).expect("parameters are valid");
        assert_ne!(first, second);
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.5)]
    #[case(f64::NAN)]
    fn rejects_invalid_negative_fractions(#[case] fraction: f64) {
        let mut graph = construct(10, 1.5, 3).expect("parameters are valid");
        let err = assign_random_signs(&mut graph, fraction, 3).expect_err("must be rejected");
        assert!(matches!(err, GraphError::InvalidParameter { .. }));
        assert!(!graph.has_signed_edges());
    }

    #[rstest]
    #[case(0.0, 0)]
    #[case(1.0, usize::MAX)]
    fn extreme_fractions_sign_uniformly(#[case] fraction: f64, #[case] expected: usize) {
        let mut graph = construct(30, 2.0, 4).expect("parameters are valid");
        let negative = assign_random_signs(&mut graph, fraction, 4).expect("fraction is valid");
        let expected = expected.min(graph.edge_count());
        assert_eq!(negative, expected);
        assert!(graph.edges().all(|edge| edge.explicit_sign().is_some()));
        assert_eq!(
            graph
                .edges()
                .filter(|edge| edge.sign() == Sign::Negative)
                .count(),
            expected
        );
    }

    #[test]
    fn signing_is_reproducible() {
        let signed = |seed| {
            let mut graph = construct(40, 2.0, 8).expect("parameters are valid");
            assign_random_signs(&mut graph, 0.3, seed).expect("fraction is valid");
            graph
        };
        assert_eq!(signed(5), signed(5));
    }
}
