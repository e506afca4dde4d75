//! Multi-source breadth-first search with provenance colouring.
//!
//! All sources share one FIFO frontier. The first source whose search reaches
//! a node owns it: the node and the tree edge that discovered it take that
//! source's colour, and no later discovery repaints it. Contention at equal
//! depth goes to the source seeded first.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, instrument};

use crate::{
    cancel::{CancellationToken, Interrupt, Uninterruptible},
    error::{GraphError, Result},
    graph::{GraphModel, NodeId},
};

use super::palette::{
    BACKGROUND_EDGE_COLOR, BACKGROUND_NODE_COLOR, Color, SOURCE_PALETTE, wrapping,
};

/// Output of [`multi_source_bfs`].
///
/// Colour arrays are parallel to the graph's canonical node and edge orders
/// so a renderer can zip them with [`GraphModel::nodes`] and
/// [`GraphModel::edges`].
#[derive(Clone, Debug, PartialEq)]
pub struct BfsResult {
    sources: Vec<NodeId>,
    visitation: Vec<NodeId>,
    traversal_edges: Vec<(NodeId, NodeId)>,
    node_colors: Vec<Color>,
    edge_colors: Vec<Color>,
}

impl BfsResult {
    /// Returns the effective sources in the order they were seeded.
    #[must_use]
    #[rustfmt::skip]
    pub fn sources(&self) -> &[NodeId] { &self.sources }

    /// Returns nodes in the order they left the frontier.
    #[must_use]
    #[rustfmt::skip]
    pub fn visitation(&self) -> &[NodeId] { &self.visitation }

    /// Returns first-discovery tree edges as `(discoverer, discovered)`.
    #[must_use]
    #[rustfmt::skip]
    pub fn traversal_edges(&self) -> &[(NodeId, NodeId)] { &self.traversal_edges }

    /// Returns one colour per node in canonical node order.
    #[must_use]
    #[rustfmt::skip]
    pub fn node_colors(&self) -> &[Color] { &self.node_colors }

    /// Returns one colour per edge in canonical edge order.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge_colors(&self) -> &[Color] { &self.edge_colors }
}

/// Runs a multi-source BFS from `sources`.
///
/// An empty `sources` slice falls back to the first node in canonical order.
/// Source `i` is painted `SOURCE_PALETTE[i % 10]`; a source listed twice keeps
/// its first colour. Nodes and edges no source reaches receive the
/// background colours.
///
/// # Errors
/// Returns [`GraphError::UnknownNode`] when a source is not in the graph.
///
/// # Examples
/// ```
/// use sociograph_core::{GraphModel, multi_source_bfs};
///
/// let mut graph = GraphModel::new();
/// for (u, v) in [("a", "b"), ("b", "c"), ("c", "d")] {
///     graph.add_edge(u, v)?;
/// }
/// let result = multi_source_bfs(&graph, &["a", "d"])?;
/// let colors: Vec<&str> = result.node_colors().iter().map(|c| c.as_str()).collect();
/// assert_eq!(colors, ["red", "red", "blue", "blue"]);
/// # Ok::<(), sociograph_core::GraphError>(())
/// ```
pub fn multi_source_bfs<S: AsRef<str>>(graph: &GraphModel, sources: &[S]) -> Result<BfsResult> {
    bfs_impl(graph, sources, &Uninterruptible)
}

/// [`multi_source_bfs`] that checks `token` before expanding each node.
///
/// # Errors
/// Returns [`GraphError::Cancelled`] when the token fires and
/// [`GraphError::UnknownNode`] when a source is not in the graph.
pub fn multi_source_bfs_cancellable<S: AsRef<str>>(
    graph: &GraphModel,
    sources: &[S],
    token: &CancellationToken,
) -> Result<BfsResult> {
    bfs_impl(graph, sources, token)
}

#[instrument(
    name = "core.multi_source_bfs",
    err,
    skip_all,
    fields(nodes = graph.node_count(), sources = sources.len()),
)]
fn bfs_impl<S, I>(graph: &GraphModel, sources: &[S], interrupt: &I) -> Result<BfsResult>
where
    S: AsRef<str>,
    I: Interrupt,
    GraphError: From<I::Error>,
{
    let mut starts = sources
        .iter()
        .map(|source| graph.resolve(source.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    if starts.is_empty() && !graph.is_empty() {
        starts.push(0);
    }

    let mut owner: Vec<Option<usize>> = vec![None; graph.node_count()];
    let mut queue = VecDeque::with_capacity(graph.node_count());
    for (slot, &start) in starts.iter().enumerate() {
        if owner[start].is_none() {
            owner[start] = Some(slot);
            queue.push_back(start);
        }
    }

    let mut visitation = Vec::with_capacity(graph.node_count());
    let mut tree = Vec::new();
    let mut tree_owner: HashMap<(usize, usize), usize> = HashMap::new();
    while let Some(node) = queue.pop_front() {
        interrupt.checkpoint()?;
        visitation.push(node);
        let Some(slot) = owner[node] else {
            continue;
        };
        for &next in graph.neighbor_indices(node) {
            if owner[next].is_none() {
                owner[next] = Some(slot);
                tree.push((node, next));
                tree_owner.insert((node.min(next), node.max(next)), slot);
                queue.push_back(next);
            }
        }
    }

    let node_colors = owner
        .iter()
        .map(|claim| claim.map_or(BACKGROUND_NODE_COLOR, |slot| wrapping(&SOURCE_PALETTE, slot)))
        .collect();
    let edge_colors = graph
        .edge_pairs()
        .map(|pair| {
            tree_owner
                .get(&pair)
                .map_or(BACKGROUND_EDGE_COLOR, |&slot| wrapping(&SOURCE_PALETTE, slot))
        })
        .collect();

    debug!(
        reached = visitation.len(),
        tree_edges = tree.len(),
        "multi-source bfs completed"
    );
    Ok(BfsResult {
        sources: starts.iter().map(|&start| graph.id_at(start).clone()).collect(),
        visitation: visitation
            .into_iter()
            .map(|node| graph.id_at(node).clone())
            .collect(),
        traversal_edges: tree
            .into_iter()
            .map(|(from, to)| (graph.id_at(from).clone(), graph.id_at(to).clone()))
            .collect(),
        node_colors,
        edge_colors,
    })
}
