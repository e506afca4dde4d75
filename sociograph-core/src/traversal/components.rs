//! Connected-component discovery with an explicit-stack depth-first walk.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::{
    cancel::{CancellationToken, Interrupt, Uninterruptible, into_ok},
    error::Result,
    graph::{GraphModel, NodeId},
};

use super::palette::{COMPONENT_PALETTE, Color, wrapping};

/// One connected component.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentRecord {
    members: Vec<NodeId>,
    edges: Vec<(NodeId, NodeId)>,
    color: Color,
}

impl ComponentRecord {
    /// Returns member identifiers sorted ascending.
    #[must_use]
    #[rustfmt::skip]
    pub fn members(&self) -> &[NodeId] { &self.members }

    /// Returns every edge with both endpoints in the component, once per
    /// undirected pair, in discovery order.
    #[must_use]
    #[rustfmt::skip]
    pub fn edges(&self) -> &[(NodeId, NodeId)] { &self.edges }

    /// Returns the palette colour assigned in discovery order.
    #[must_use]
    #[rustfmt::skip]
    pub fn color(&self) -> Color { self.color }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` for a component without members, which
    /// [`connected_components`] never produces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Walks the component containing `start`, marking nodes in `visited` and
/// calling `visit` once per member in pop order.
fn explore(
    graph: &GraphModel,
    start: usize,
    visited: &mut [bool],
    mut visit: impl FnMut(usize),
) {
    let mut stack = vec![start];
    visited[start] = true;
    while let Some(node) = stack.pop() {
        visit(node);
        for &next in graph.neighbor_indices(node) {
            if !visited[next] {
                visited[next] = true;
                stack.push(next);
            }
        }
    }
}

fn components_impl<I: Interrupt>(
    graph: &GraphModel,
    interrupt: &I,
) -> core::result::Result<Vec<ComponentRecord>, I::Error> {
    let mut visited = vec![false; graph.node_count()];
    let mut records = Vec::new();
    for start in 0..graph.node_count() {
        if visited[start] {
            continue;
        }
        interrupt.checkpoint()?;

        let mut members = Vec::new();
        let mut edges = Vec::new();
        let mut seen_edges = HashSet::new();
        explore(graph, start, &mut visited, |node| {
            members.push(node);
            for &next in graph.neighbor_indices(node) {
                let key = (node.min(next), node.max(next));
                if seen_edges.insert(key) {
                    edges.push(key);
                }
            }
        });

        let mut member_ids: Vec<NodeId> = members
            .into_iter()
            .map(|node| graph.id_at(node).clone())
            .collect();
        member_ids.sort_unstable();
        records.push(ComponentRecord {
            members: member_ids,
            edges: edges
                .into_iter()
                .map(|(u, v)| (graph.id_at(u).clone(), graph.id_at(v).clone()))
                .collect(),
            color: wrapping(&COMPONENT_PALETTE, records.len()),
        });
    }
    Ok(records)
}

/// Partitions the graph into connected components.
///
/// Components are discovered by scanning nodes in canonical order and are
/// coloured from [`COMPONENT_PALETTE`] in that order. Isolated nodes form
/// singleton components.
///
/// # Examples
/// ```
/// use sociograph_core::{GraphModel, connected_components};
///
/// let mut graph = GraphModel::new();
/// graph.add_edge("b", "a")?;
/// graph.add_node("c");
/// let components = connected_components(&graph);
/// assert_eq!(components.len(), 2);
/// assert_eq!(components[0].members()[0].as_str(), "a");
/// assert_eq!(components[1].len(), 1);
/// # Ok::<(), sociograph_core::GraphError>(())
/// ```
#[must_use]
#[instrument(
    name = "core.connected_components",
    skip(graph),
    fields(nodes = graph.node_count(), edges = graph.edge_count()),
)]
pub fn connected_components(graph: &GraphModel) -> Vec<ComponentRecord> {
    let records = into_ok(components_impl(graph, &Uninterruptible));
    debug!(components = records.len(), "components discovered");
    records
}

/// [`connected_components`] that checks `token` before each new component.
///
/// # Errors
/// Returns [`crate::GraphError::Cancelled`] when the token fires.
pub fn connected_components_cancellable(
    graph: &GraphModel,
    token: &CancellationToken,
) -> Result<Vec<ComponentRecord>> {
    components_impl(graph, token)
}

fn sizes_impl<I: Interrupt>(
    graph: &GraphModel,
    interrupt: &I,
) -> core::result::Result<Vec<usize>, I::Error> {
    let mut visited = vec![false; graph.node_count()];
    let mut sizes = Vec::new();
    for start in 0..graph.node_count() {
        if visited[start] {
            continue;
        }
        interrupt.checkpoint()?;
        let mut size = 0_usize;
        explore(graph, start, &mut visited, |_| size += 1);
        sizes.push(size);
    }
    Ok(sizes)
}

/// Component sizes in discovery order, without materialising records.
pub(crate) fn component_sizes(graph: &GraphModel) -> Vec<usize> {
    into_ok(sizes_impl(graph, &Uninterruptible))
}

pub(crate) fn component_sizes_cancellable(
    graph: &GraphModel,
    token: &CancellationToken,
) -> Result<Vec<usize>> {
    sizes_impl(graph, token)
}
