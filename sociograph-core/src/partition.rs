//! Pluggable graph partitioning and community labelling.

use tracing::{debug, instrument};

use crate::{
    graph::{AttributeValue, GraphModel, NodeId},
    traversal::connected_components,
};

/// Attribute holding the 1-based community number.
pub const COMMUNITY_ATTRIBUTE: &str = "community";
/// Attribute holding the human-readable community label.
pub const COMMUNITY_LABEL_ATTRIBUTE: &str = "community_label";

/// Splits a graph into disjoint groups of nodes.
///
/// Implementations must return groups that are pairwise disjoint and contain
/// only nodes of `graph`. Nodes left out of every group are not labelled.
pub trait Partitioner {
    /// Returns the node groups of `graph`.
    fn partition(&self, graph: &GraphModel) -> Vec<Vec<NodeId>>;
}

/// Partitions a graph into its connected components.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConnectedComponentPartitioner;

impl Partitioner for ConnectedComponentPartitioner {
    fn partition(&self, graph: &GraphModel) -> Vec<Vec<NodeId>> {
        connected_components(graph)
            .into_iter()
            .map(|component| component.members().to_vec())
            .collect()
    }
}

/// Labels every node of group `i` with `community = i + 1` and
/// `community_label = "Community {i + 1}"`, returning the number of groups.
///
/// Group members missing from the graph are skipped.
///
/// # Examples
/// ```
/// use sociograph_core::{
///     AttributeValue, ConnectedComponentPartitioner, GraphModel, label_communities,
/// };
///
/// let mut graph = GraphModel::new();
/// graph.add_edge("a", "b")?;
/// graph.add_node("c");
/// assert_eq!(label_communities(&mut graph, &ConnectedComponentPartitioner), 2);
/// assert_eq!(graph.node_attribute("c", "community"), Some(&AttributeValue::Integer(2)));
/// # Ok::<(), sociograph_core::GraphError>(())
/// ```
#[instrument(
    name = "core.label_communities",
    skip(graph, partitioner),
    fields(nodes = graph.node_count()),
)]
pub fn label_communities<P>(graph: &mut GraphModel, partitioner: &P) -> usize
where
    P: Partitioner + ?Sized,
{
    let groups = partitioner.partition(graph);
    for (number, group) in (1_i64..).zip(&groups) {
        for member in group {
            if graph.contains_node(member.as_str()) {
                graph.add_node_with_attributes(
                    member,
                    [
                        (COMMUNITY_ATTRIBUTE, AttributeValue::Integer(number)),
                        (
                            COMMUNITY_LABEL_ATTRIBUTE,
                            AttributeValue::Text(format!("Community {number}")),
                        ),
                    ],
                );
            }
        }
    }
    debug!(communities = groups.len(), "communities labelled");
    groups.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::homophily::select_attribute;

    /// Puts every node in its own group.
    struct Singletons;

    impl Partitioner for Singletons {
        fn partition(&self, graph: &GraphModel) -> Vec<Vec<NodeId>> {
            graph.nodes().map(|id| vec![id.clone()]).collect()
        }
    }

    #[test]
    fn components_become_numbered_communities() {
        let mut graph = GraphModel::new();
        graph.add_edge("b", "a").expect("edge must insert");
        graph.add_edge("x", "y").expect("edge must insert");
        assert_eq!(label_communities(&mut graph, &ConnectedComponentPartitioner), 2);
        assert_eq!(
            graph.node_attribute("a", COMMUNITY_ATTRIBUTE),
            Some(&AttributeValue::Integer(1))
        );
        assert_eq!(
            graph.node_attribute("y", COMMUNITY_LABEL_ATTRIBUTE),
            Some(&AttributeValue::Text("Community 2".to_owned()))
        );
        assert_eq!(select_attribute(&graph), Some(COMMUNITY_ATTRIBUTE));
    }

    #[test]
    fn custom_partitioners_plug_in() {
        let mut graph = GraphModel::new();
        graph.add_edge("a", "b").expect("edge must insert");
        let partitioner: &dyn Partitioner = &Singletons;
        assert_eq!(label_communities(&mut graph, partitioner), 2);
        assert_eq!(
            graph.node_attribute("b", COMMUNITY_ATTRIBUTE),
            Some(&AttributeValue::Integer(2))
        );
    }
}
