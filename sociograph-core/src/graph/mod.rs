//! In-memory undirected simple graph.
//!
//! [`GraphModel`] owns nodes, their attributes, and optionally signed edges.
//! Nodes are addressed by string [`NodeId`]s at the public surface and by
//! dense insertion indices internally, which keeps the traversal code free
//! of hashing.
//!
//! Canonical orders:
//!
//! - Nodes iterate in insertion order.
//! - Edges iterate node-major: for each node in canonical order, each
//!   neighbour in adjacency (insertion) order, yielding the edge when the
//!   neighbour comes later in node order. Every per-edge output array in the
//!   crate is parallel to this order.
//!
//! Adjacency is symmetric and the edge table and adjacency lists are only
//! ever mutated together.

mod attribute;

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::{GraphError, Result};

pub use self::attribute::{AttributeValue, NodeId, Sign};

#[derive(Clone, Debug, PartialEq)]
struct Node {
    id: NodeId,
    attributes: BTreeMap<String, AttributeValue>,
}

/// Undirected simple graph: no self-loops, no parallel edges.
///
/// `Clone` is the defensive copy: the clone shares no mutable state with the
/// original, so destructive simulations operate on their own value.
///
/// # Examples
/// ```
/// use sociograph_core::{GraphModel, Sign};
///
/// let mut graph = GraphModel::new();
/// graph.add_edge("a", "b")?;
/// graph.add_signed_edge("b", "c", Sign::Negative)?;
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.edge_sign("c", "b"), Some(Sign::Negative));
/// assert_eq!(graph.neighbors("b")?.count(), 2);
/// # Ok::<(), sociograph_core::GraphError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphModel {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    adjacency: Vec<Vec<usize>>,
    edges: HashMap<(usize, usize), Option<Sign>>,
}

/// Borrowed view of one edge in canonical order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeView<'a> {
    source: &'a NodeId,
    target: &'a NodeId,
    sign: Option<Sign>,
}

impl<'a> EdgeView<'a> {
    /// Returns the endpoint that comes first in node order.
    #[must_use]
    #[rustfmt::skip]
    pub fn source(&self) -> &'a NodeId { self.source }

    /// Returns the endpoint that comes later in node order.
    #[must_use]
    #[rustfmt::skip]
    pub fn target(&self) -> &'a NodeId { self.target }

    /// Returns the effective sign, [`Sign::Positive`] when none was set.
    #[must_use]
    pub fn sign(&self) -> Sign {
        self.sign.unwrap_or_default()
    }

    /// Returns the sign only if one was set explicitly.
    #[must_use]
    #[rustfmt::skip]
    pub fn explicit_sign(&self) -> Option<Sign> { self.sign }
}

const fn edge_key(left: usize, right: usize) -> (usize, usize) {
    if left <= right {
        (left, right)
    } else {
        (right, left)
    }
}

impl GraphModel {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with room for `node_count` nodes.
    #[must_use]
    pub fn with_capacity(node_count: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(node_count),
            index: HashMap::with_capacity(node_count),
            adjacency: Vec::with_capacity(node_count),
            edges: HashMap::new(),
        }
    }

    /// Adds a node if it is not present yet. Adding an existing node is a
    /// no-op.
    pub fn add_node(&mut self, id: impl Into<NodeId>) {
        self.ensure_node(id.into());
    }

    /// Adds a node and merges `attributes` into its attribute map.
    pub fn add_node_with_attributes<K, V>(
        &mut self,
        id: impl Into<NodeId>,
        attributes: impl IntoIterator<Item = (K, V)>,
    ) where
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        let position = self.ensure_node(id.into());
        if let Some(node) = self.nodes.get_mut(position) {
            node.attributes.extend(
                attributes
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into())),
            );
        }
    }

    /// Adds an unsigned edge, creating missing endpoints.
    ///
    /// Re-adding an existing edge leaves the graph unchanged.
    ///
    /// # Errors
    /// Returns [`GraphError::SelfLoop`] when both endpoints are the same node.
    pub fn add_edge(&mut self, left: impl Into<NodeId>, right: impl Into<NodeId>) -> Result<()> {
        self.insert_edge(left.into(), right.into(), None)
    }

    /// Adds an edge carrying an explicit sign, creating missing endpoints.
    ///
    /// Re-adding an existing edge overwrites its sign.
    ///
    /// # Errors
    /// Returns [`GraphError::SelfLoop`] when both endpoints are the same node.
    pub fn add_signed_edge(
        &mut self,
        left: impl Into<NodeId>,
        right: impl Into<NodeId>,
        sign: Sign,
    ) -> Result<()> {
        self.insert_edge(left.into(), right.into(), Some(sign))
    }

    fn insert_edge(&mut self, left: NodeId, right: NodeId, sign: Option<Sign>) -> Result<()> {
        if left == right {
            return Err(GraphError::SelfLoop { node: left });
        }
        let u = self.ensure_node(left);
        let v = self.ensure_node(right);
        let key = edge_key(u, v);
        match self.edges.get_mut(&key) {
            Some(existing) => {
                if sign.is_some() {
                    *existing = sign;
                }
            }
            None => {
                self.edges.insert(key, sign);
                self.link(u, v);
            }
        }
        Ok(())
    }

    fn ensure_node(&mut self, id: NodeId) -> usize {
        if let Some(&position) = self.index.get(&id) {
            return position;
        }
        let position = self.nodes.len();
        self.index.insert(id.clone(), position);
        self.nodes.push(Node {
            id,
            attributes: BTreeMap::new(),
        });
        self.adjacency.push(Vec::new());
        position
    }

    fn link(&mut self, u: usize, v: usize) {
        if let Some(list) = self.adjacency.get_mut(u) {
            list.push(v);
        }
        if let Some(list) = self.adjacency.get_mut(v) {
            list.push(u);
        }
    }

    fn unlink(&mut self, u: usize, v: usize) {
        if let Some(list) = self.adjacency.get_mut(u) {
            list.retain(|&other| other != v);
        }
        if let Some(list) = self.adjacency.get_mut(v) {
            list.retain(|&other| other != u);
        }
    }

    /// Sets (or replaces) an attribute on an existing node.
    ///
    /// # Errors
    /// Returns [`GraphError::UnknownNode`] when `id` is not in the graph.
    pub fn set_node_attribute(
        &mut self,
        id: &str,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Result<()> {
        let position = self.resolve(id)?;
        if let Some(node) = self.nodes.get_mut(position) {
            node.attributes.insert(key.into(), value.into());
        }
        Ok(())
    }

    /// Returns the attribute stored under `key` on node `id`, if any.
    #[must_use]
    pub fn node_attribute(&self, id: &str, key: &str) -> Option<&AttributeValue> {
        self.index_of(id)
            .and_then(|position| self.attribute_at(position, key))
    }

    /// Returns `true` when at least one node carries an attribute named `key`.
    #[must_use]
    pub fn has_attribute(&self, key: &str) -> bool {
        self.nodes
            .iter()
            .any(|node| node.attributes.contains_key(key))
    }

    /// Overwrites the sign of an existing edge.
    ///
    /// # Errors
    /// Returns [`GraphError::UnknownNode`] when either endpoint is missing and
    /// [`GraphError::InvalidParameter`] when the nodes are not adjacent.
    pub fn set_edge_sign(&mut self, left: &str, right: &str, sign: Sign) -> Result<()> {
        let key = edge_key(self.resolve(left)?, self.resolve(right)?);
        let slot = self.edges.get_mut(&key).ok_or_else(|| {
            GraphError::invalid("edge", format!("`{left}` and `{right}` are not adjacent"))
        })?;
        *slot = Some(sign);
        Ok(())
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` when the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` when `id` names a node of the graph.
    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Iterates node identifiers in canonical order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &NodeId> {
        self.nodes.iter().map(|node| &node.id)
    }

    /// Lazily iterates the neighbours of `id` in adjacency order.
    ///
    /// # Errors
    /// Returns [`GraphError::UnknownNode`] when `id` is not in the graph.
    pub fn neighbors(&self, id: &str) -> Result<impl ExactSizeIterator<Item = &NodeId>> {
        let position = self.resolve(id)?;
        Ok(self
            .neighbor_indices(position)
            .iter()
            .map(|&other| self.id_at(other)))
    }

    /// Returns the number of edges incident to `id`.
    ///
    /// # Errors
    /// Returns [`GraphError::UnknownNode`] when `id` is not in the graph.
    pub fn degree(&self, id: &str) -> Result<usize> {
        let position = self.resolve(id)?;
        Ok(self.neighbor_indices(position).len())
    }

    /// Returns `true` when `left` and `right` are adjacent.
    #[must_use]
    pub fn has_edge(&self, left: &str, right: &str) -> bool {
        self.edge_entry(left, right).is_some()
    }

    /// Returns the effective sign of the edge, or `None` when the nodes are
    /// not adjacent.
    #[must_use]
    pub fn edge_sign(&self, left: &str, right: &str) -> Option<Sign> {
        self.edge_entry(left, right)
            .map(|sign| sign.unwrap_or_default())
    }

    fn edge_entry(&self, left: &str, right: &str) -> Option<Option<Sign>> {
        let u = self.index_of(left)?;
        let v = self.index_of(right)?;
        self.edges.get(&edge_key(u, v)).copied()
    }

    /// Returns `true` when at least one edge carries an explicit sign.
    #[must_use]
    pub fn has_signed_edges(&self) -> bool {
        self.edges.values().any(Option::is_some)
    }

    /// Iterates edges in canonical order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> {
        self.edge_pairs().map(|(u, v)| EdgeView {
            source: self.id_at(u),
            target: self.id_at(v),
            sign: self.explicit_sign_at(u, v),
        })
    }

    /// Removes every listed edge that exists and returns how many were
    /// removed. Pairs naming unknown nodes or non-adjacent nodes are skipped.
    pub fn remove_edges<'a>(&mut self, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> usize {
        let resolved: Vec<(usize, usize)> = pairs
            .into_iter()
            .filter_map(|(left, right)| Some((self.index_of(left)?, self.index_of(right)?)))
            .collect();
        self.remove_edge_indices(&resolved)
    }

    /// Builds an independent graph from `ids`, their attributes, and every
    /// edge joining two of them. Node order follows the original graph.
    ///
    /// # Errors
    /// Returns [`GraphError::UnknownNode`] when an identifier is missing.
    pub fn induced_subgraph<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut keep = ids
            .into_iter()
            .map(|id| self.resolve(id))
            .collect::<Result<Vec<_>>>()?;
        keep.sort_unstable();
        keep.dedup();
        let members: HashSet<usize> = keep.iter().copied().collect();

        let mut subgraph = Self::with_capacity(keep.len());
        for &position in &keep {
            if let Some(node) = self.nodes.get(position) {
                subgraph.add_node_with_attributes(node.id.clone(), node.attributes.clone());
            }
        }
        for (u, v) in self.edge_pairs() {
            if members.contains(&u) && members.contains(&v) {
                subgraph.insert_edge(
                    self.id_at(u).clone(),
                    self.id_at(v).clone(),
                    self.explicit_sign_at(u, v),
                )?;
            }
        }
        Ok(subgraph)
    }

    // Index-level accessors used by the algorithms.

    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub(crate) fn resolve(&self, id: &str) -> Result<usize> {
        self.index_of(id).ok_or_else(|| GraphError::UnknownNode {
            node: NodeId::from(id),
        })
    }

    /// Callers only pass indices obtained from this graph.
    pub(crate) fn id_at(&self, position: usize) -> &NodeId {
        &self.nodes[position].id
    }

    pub(crate) fn neighbor_indices(&self, position: usize) -> &[usize] {
        self.adjacency.get(position).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn attribute_at(&self, position: usize, key: &str) -> Option<&AttributeValue> {
        self.nodes
            .get(position)
            .and_then(|node| node.attributes.get(key))
    }

    pub(crate) fn explicit_sign_at(&self, u: usize, v: usize) -> Option<Sign> {
        self.edges.get(&edge_key(u, v)).copied().flatten()
    }

    /// Canonical edge order as index pairs `(earlier, later)`.
    pub(crate) fn edge_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(u, neighbours)| {
            neighbours
                .iter()
                .filter(move |&&v| v > u)
                .map(move |&v| (u, v))
        })
    }

    /// Inserts an unsigned edge between two distinct existing indices.
    pub(crate) fn connect(&mut self, u: usize, v: usize) {
        let key = edge_key(u, v);
        if u != v && !self.edges.contains_key(&key) {
            self.edges.insert(key, None);
            self.link(u, v);
        }
    }

    /// Overwrites the sign of an existing edge; absent pairs are ignored.
    pub(crate) fn sign_at(&mut self, u: usize, v: usize, sign: Sign) {
        if let Some(slot) = self.edges.get_mut(&edge_key(u, v)) {
            *slot = Some(sign);
        }
    }

    pub(crate) fn remove_edge_indices(&mut self, pairs: &[(usize, usize)]) -> usize {
        let mut removed = 0;
        for &(u, v) in pairs {
            if self.edges.remove(&edge_key(u, v)).is_some() {
                self.unlink(u, v);
                removed += 1;
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests;
