//! Traversal engine: multi-source BFS, connected components, cycle queries.
//!
//! Every depth-first walk in this module runs on an explicit stack so very
//! deep graphs cannot exhaust the native call stack.

mod bfs;
mod components;
mod cycles;
mod palette;

use std::collections::BTreeSet;

use tracing::instrument;

use crate::graph::{GraphModel, NodeId};

pub use self::{
    bfs::{BfsResult, multi_source_bfs, multi_source_bfs_cancellable},
    components::{ComponentRecord, connected_components, connected_components_cancellable},
    cycles::{cycle_basis, cycle_detection},
    palette::{
        BACKGROUND_EDGE_COLOR, BACKGROUND_NODE_COLOR, COMPONENT_PALETTE, Color, SOURCE_PALETTE,
    },
};

pub(crate) use self::{
    components::{component_sizes, component_sizes_cancellable},
    cycles::cycle_basis_indices,
};

/// Returns the nodes that have no incident edges.
///
/// # Examples
/// ```
/// use sociograph_core::{GraphModel, isolated_nodes};
///
/// let mut graph = GraphModel::new();
/// graph.add_edge("a", "b")?;
/// graph.add_node("lonely");
/// let isolated = isolated_nodes(&graph);
/// assert_eq!(isolated.len(), 1);
/// assert!(isolated.contains("lonely"));
/// # Ok::<(), sociograph_core::GraphError>(())
/// ```
#[must_use]
#[instrument(name = "core.isolated_nodes", skip(graph), fields(nodes = graph.node_count()))]
pub fn isolated_nodes(graph: &GraphModel) -> BTreeSet<NodeId> {
    (0..graph.node_count())
        .filter(|&position| graph.neighbor_indices(position).is_empty())
        .map(|position| graph.id_at(position).clone())
        .collect()
}
