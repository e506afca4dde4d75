//! Structural balance of signed graphs.
//!
//! A triangle is balanced when it carries an even number of negative edges.
//! Only triangles that appear in a fundamental cycle basis are classified;
//! longer cycles are not examined.

use tracing::{debug, instrument};

use crate::{
    graph::{GraphModel, NodeId, Sign},
    traversal::{component_sizes, cycle_basis_indices},
};

/// Triangle found in the cycle basis, with its negative edge count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTriangle {
    nodes: [NodeId; 3],
    negative_edges: u8,
}

impl SignedTriangle {
    /// Returns the three corners in cycle order.
    #[must_use]
    #[rustfmt::skip]
    pub fn nodes(&self) -> &[NodeId; 3] { &self.nodes }

    /// Returns how many of the three edges are negative.
    #[must_use]
    #[rustfmt::skip]
    pub fn negative_edges(&self) -> u8 { self.negative_edges }

    /// Returns `true` when the negative edge count is even.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.negative_edges % 2 == 0
    }
}

/// Outcome of a balance check on a graph with signed edges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BalanceReport {
    components_examined: usize,
    triangles_examined: usize,
    imbalanced: Vec<SignedTriangle>,
}

impl BalanceReport {
    /// Returns the number of components with at least three members.
    #[must_use]
    #[rustfmt::skip]
    pub fn components_examined(&self) -> usize { self.components_examined }

    /// Returns the number of basis triangles classified.
    #[must_use]
    #[rustfmt::skip]
    pub fn triangles_examined(&self) -> usize { self.triangles_examined }

    /// Returns every triangle with an odd number of negative edges.
    #[must_use]
    #[rustfmt::skip]
    pub fn imbalanced(&self) -> &[SignedTriangle] { &self.imbalanced }

    /// Returns `true` when no examined triangle is imbalanced.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.imbalanced.is_empty()
    }
}

/// Result of [`verify_structural_balance`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BalanceVerdict {
    /// No edge carries an explicit sign, so balance is not defined.
    NotApplicable,
    /// Triangles were classified.
    Evaluated(BalanceReport),
}

impl BalanceVerdict {
    /// Returns `Some(balanced)` for an evaluated graph and `None` otherwise.
    #[must_use]
    pub fn is_balanced(&self) -> Option<bool> {
        match self {
            Self::NotApplicable => None,
            Self::Evaluated(report) => Some(report.is_balanced()),
        }
    }
}

fn negative_between(graph: &GraphModel, u: usize, v: usize) -> bool {
    graph
        .explicit_sign_at(u, v)
        .is_some_and(Sign::is_negative)
}

/// Checks every basis triangle of every component with three or more
/// members.
///
/// Edges without an explicit sign count as positive. A graph where no edge
/// carries an explicit sign yields [`BalanceVerdict::NotApplicable`].
///
/// # Examples
/// ```
/// use sociograph_core::{GraphModel, Sign, verify_structural_balance};
///
/// let mut graph = GraphModel::new();
/// graph.add_signed_edge("a", "b", Sign::Negative)?;
/// graph.add_signed_edge("b", "c", Sign::Negative)?;
/// graph.add_edge("c", "a")?;
/// assert_eq!(verify_structural_balance(&graph).is_balanced(), Some(true));
///
/// graph.set_edge_sign("a", "b", Sign::Positive)?;
/// assert_eq!(verify_structural_balance(&graph).is_balanced(), Some(false));
/// # Ok::<(), sociograph_core::GraphError>(())
/// ```
#[must_use]
#[instrument(
    name = "core.verify_structural_balance",
    skip(graph),
    fields(nodes = graph.node_count(), edges = graph.edge_count()),
)]
pub fn verify_structural_balance(graph: &GraphModel) -> BalanceVerdict {
    if !graph.has_signed_edges() {
        debug!("no signed edges; balance not applicable");
        return BalanceVerdict::NotApplicable;
    }

    let components_examined = component_sizes(graph)
        .into_iter()
        .filter(|&size| size >= 3)
        .count();

    // Every triangle lives in a component of at least three nodes, so one
    // basis over the whole graph covers exactly the components examined.
    let mut report = BalanceReport {
        components_examined,
        ..BalanceReport::default()
    };
    for cycle in cycle_basis_indices(graph) {
        let &[a, b, c] = cycle.as_slice() else {
            continue;
        };
        report.triangles_examined += 1;
        let negative_edges = [(a, b), (b, c), (c, a)]
            .into_iter()
            .map(|(u, v)| u8::from(negative_between(graph, u, v)))
            .sum();
        let triangle = SignedTriangle {
            nodes: [
                graph.id_at(a).clone(),
                graph.id_at(b).clone(),
                graph.id_at(c).clone(),
            ],
            negative_edges,
        };
        if !triangle.is_balanced() {
            report.imbalanced.push(triangle);
        }
    }

    debug!(
        components = report.components_examined,
        triangles = report.triangles_examined,
        imbalanced = report.imbalanced.len(),
        "structural balance evaluated"
    );
    BalanceVerdict::Evaluated(report)
}
