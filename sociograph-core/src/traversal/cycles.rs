//! Cycle detection and fundamental cycle bases.

use std::collections::HashSet;

use tracing::instrument;

use crate::graph::{GraphModel, NodeId};

/// Reports whether the component of the first node contains a cycle.
///
/// Only the component reachable from the first node in canonical order is
/// examined; a cycle confined to another component is not reported. An empty
/// graph has no cycle.
///
/// # Examples
/// ```
/// use sociograph_core::{GraphModel, cycle_detection};
///
/// let mut graph = GraphModel::new();
/// graph.add_edge("a", "b")?;
/// graph.add_edge("b", "c")?;
/// assert!(!cycle_detection(&graph));
/// graph.add_edge("c", "a")?;
/// assert!(cycle_detection(&graph));
/// # Ok::<(), sociograph_core::GraphError>(())
/// ```
#[must_use]
#[instrument(name = "core.cycle_detection", skip(graph), fields(nodes = graph.node_count()))]
pub fn cycle_detection(graph: &GraphModel) -> bool {
    if graph.is_empty() {
        return false;
    }
    let mut visited = vec![false; graph.node_count()];
    let mut stack: Vec<(usize, Option<usize>)> = vec![(0, None)];
    visited[0] = true;
    while let Some((node, parent)) = stack.pop() {
        for &next in graph.neighbor_indices(node) {
            if Some(next) == parent {
                continue;
            }
            if visited[next] {
                return true;
            }
            visited[next] = true;
            stack.push((next, Some(node)));
        }
    }
    false
}

/// Computes a fundamental cycle basis, one spanning tree per component.
///
/// Each cycle is listed as a closed walk without repeating its first node.
/// Roots are the first node of each component in canonical order.
#[must_use]
#[instrument(name = "core.cycle_basis", skip(graph), fields(nodes = graph.node_count()))]
pub fn cycle_basis(graph: &GraphModel) -> Vec<Vec<NodeId>> {
    cycle_basis_indices(graph)
        .into_iter()
        .map(|cycle| {
            cycle
                .into_iter()
                .map(|node| graph.id_at(node).clone())
                .collect()
        })
        .collect()
}

pub(crate) fn cycle_basis_indices(graph: &GraphModel) -> Vec<Vec<usize>> {
    let node_count = graph.node_count();
    let mut predecessor: Vec<usize> = (0..node_count).collect();
    let mut used: Vec<Option<HashSet<usize>>> = vec![None; node_count];
    let mut cycles = Vec::new();

    for root in 0..node_count {
        if used[root].is_some() {
            continue;
        }
        used[root] = Some(HashSet::new());
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            for &next in graph.neighbor_indices(node) {
                let Some(next_used) = used[next].as_ref() else {
                    predecessor[next] = node;
                    stack.push(next);
                    used[next] = Some(HashSet::from([node]));
                    continue;
                };
                let seen_from_node = used[node]
                    .as_ref()
                    .is_some_and(|node_used| node_used.contains(&next));
                if seen_from_node {
                    continue;
                }

                let mut cycle = vec![next, node];
                let mut walker = predecessor[node];
                loop {
                    cycle.push(walker);
                    let parent = predecessor[walker];
                    if next_used.contains(&walker) || parent == walker {
                        break;
                    }
                    walker = parent;
                }
                cycles.push(cycle);
                if let Some(next_used) = used[next].as_mut() {
                    next_used.insert(node);
                }
            }
        }
    }
    cycles
}
