//! Shared graph builders for the unit tests of `sociograph-core`.

use crate::graph::GraphModel;

/// Builds a graph from an edge list, creating endpoints on demand.
pub(crate) fn graph_from(edges: &[(&str, &str)]) -> GraphModel {
    let mut graph = GraphModel::new();
    for &(u, v) in edges {
        graph.add_edge(u, v).expect("edge must insert");
    }
    graph
}

/// Complete graph on nodes `"0"` .. `"n-1"`.
pub(crate) fn complete(n: usize) -> GraphModel {
    let mut graph = GraphModel::new();
    for left in 0..n {
        for right in (left + 1)..n {
            graph
                .add_edge(left.to_string(), right.to_string())
                .expect("edge must insert");
        }
    }
    graph
}

/// Path `0 - 1 - .. - (n-1)`.
pub(crate) fn path(n: usize) -> GraphModel {
    let mut graph = GraphModel::new();
    for i in 1..n {
        graph
            .add_edge((i - 1).to_string(), i.to_string())
            .expect("edge must insert");
    }
    graph
}

/// Cycle on `n >= 3` nodes: a path closed by the edge `(n-1) - 0`.
pub(crate) fn ring(n: usize) -> GraphModel {
    let mut graph = path(n);
    graph
        .add_edge((n - 1).to_string(), "0")
        .expect("edge must insert");
    graph
}
