//! Graph builders shared by the integration tests.

use sociograph_core::{GraphModel, Sign};

/// Builds an unsigned graph from an edge list.
#[must_use]
pub fn graph_from(edges: &[(&str, &str)]) -> GraphModel {
    let mut graph = GraphModel::new();
    for &(u, v) in edges {
        graph.add_edge(u, v).expect("edge must insert");
    }
    graph
}

/// Builds the complete graph on nodes `"0"` .. `"n-1"`.
#[must_use]
pub fn complete(n: usize) -> GraphModel {
    let mut graph = GraphModel::with_capacity(n);
    for node in 0..n {
        graph.add_node(node.to_string());
    }
    for left in 0..n {
        for right in (left + 1)..n {
            graph
                .add_edge(left.to_string(), right.to_string())
                .expect("edge must insert");
        }
    }
    graph
}

/// Builds a random recursive tree: node `i` attaches to `parents[i - 1]`
/// reduced modulo `i`.
#[must_use]
pub fn tree(parents: &[usize]) -> GraphModel {
    let mut graph = GraphModel::new();
    graph.add_node("0");
    for (offset, &parent) in parents.iter().enumerate() {
        let child = offset + 1;
        graph
            .add_edge((parent % child).to_string(), child.to_string())
            .expect("edge must insert");
    }
    graph
}

/// Builds a triangle whose first `negatives` edges are negative.
#[must_use]
pub fn signed_triangle(negatives: usize) -> GraphModel {
    let mut graph = GraphModel::new();
    for (position, (u, v)) in [("a", "b"), ("b", "c"), ("c", "a")].into_iter().enumerate() {
        let sign = if position < negatives {
            Sign::Negative
        } else {
            Sign::Positive
        };
        graph.add_signed_edge(u, v, sign).expect("edge must insert");
    }
    graph
}
