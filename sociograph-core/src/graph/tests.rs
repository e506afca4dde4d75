//! Unit tests for the undirected graph model.

use rstest::{fixture, rstest};

use super::{AttributeValue, GraphModel, NodeId, Sign};
use crate::error::GraphError;

#[fixture]
fn path() -> GraphModel {
    let mut graph = GraphModel::new();
    graph.add_edge("a", "b").expect("edge must insert");
    graph.add_edge("b", "c").expect("edge must insert");
    graph.add_edge("c", "d").expect("edge must insert");
    graph
}

fn is_symmetric(graph: &GraphModel) -> bool {
    graph.nodes().all(|u| {
        graph
            .neighbors(u.as_str())
            .expect("node exists")
            .all(|v| graph.has_edge(v.as_str(), u.as_str()))
    })
}

#[rstest]
fn adjacency_is_symmetric(path: GraphModel) {
    assert!(is_symmetric(&path));
    assert!(path.has_edge("b", "a"));
    assert!(!path.has_edge("a", "c"));
}

#[test]
fn rejects_self_loops() {
    let mut graph = GraphModel::new();
    let err = graph.add_edge("x", "x").expect_err("self-loop must fail");
    assert_eq!(
        err,
        GraphError::SelfLoop {
            node: NodeId::from("x")
        }
    );
    assert_eq!(graph.node_count(), 0);
}

#[rstest]
fn duplicate_edges_are_collapsed(mut path: GraphModel) {
    path.add_edge("b", "a").expect("re-adding is allowed");
    assert_eq!(path.edge_count(), 3);
    assert_eq!(path.degree("a").expect("node exists"), 1);
}

#[rstest]
fn re_adding_signed_edge_updates_sign(mut path: GraphModel) {
    assert!(!path.has_signed_edges());
    path.add_signed_edge("a", "b", Sign::Negative)
        .expect("edge exists");
    assert_eq!(path.edge_sign("b", "a"), Some(Sign::Negative));
    assert!(path.has_signed_edges());

    path.add_edge("a", "b").expect("unsigned re-add keeps the sign");
    assert_eq!(path.edge_sign("a", "b"), Some(Sign::Negative));
}

#[rstest]
fn unset_sign_defaults_to_positive(path: GraphModel) {
    let first = path.edges().next().expect("graph has edges");
    assert_eq!(first.sign(), Sign::Positive);
    assert_eq!(first.explicit_sign(), None);
    assert_eq!(path.edge_sign("a", "c"), None);
}

#[test]
fn canonical_edge_order_is_node_major() {
    let mut graph = GraphModel::new();
    graph.add_node("n0");
    graph.add_node("n1");
    graph.add_node("n2");
    graph.add_edge("n1", "n2").expect("edge");
    graph.add_edge("n0", "n2").expect("edge");
    graph.add_edge("n0", "n1").expect("edge");

    let edges: Vec<(&str, &str)> = graph
        .edges()
        .map(|edge| (edge.source().as_str(), edge.target().as_str()))
        .collect();
    assert_eq!(edges, vec![("n0", "n2"), ("n0", "n1"), ("n1", "n2")]);
}

#[rstest]
fn remove_edges_keeps_index_consistent(mut path: GraphModel) {
    let removed = path.remove_edges([("b", "c"), ("a", "d"), ("zz", "a")]);
    assert_eq!(removed, 1);
    assert_eq!(path.edge_count(), 2);
    assert!(!path.has_edge("c", "b"));
    assert_eq!(path.degree("b").expect("node exists"), 1);
    assert_eq!(path.edges().count(), path.edge_count());
    assert!(is_symmetric(&path));
}

#[rstest]
fn clone_is_independent(path: GraphModel) {
    let mut copy = path.clone();
    copy.remove_edges([("a", "b")]);
    copy.set_node_attribute("a", "group", "x")
        .expect("node exists");

    assert!(path.has_edge("a", "b"));
    assert_eq!(path.node_attribute("a", "group"), None);
    assert_ne!(copy, path);
}

#[rstest]
fn neighbors_reports_unknown_nodes(path: GraphModel) {
    let err = path.neighbors("missing").err().expect("lookup must fail");
    assert_eq!(err.code().as_str(), "GRAPH_UNKNOWN_NODE");
}

#[test]
fn attributes_merge_on_re_add() {
    let mut graph = GraphModel::new();
    graph.add_node_with_attributes("a", [("group", AttributeValue::from("red"))]);
    graph.add_node_with_attributes("a", [("community", 3_i64)]);
    assert_eq!(graph.node_count(), 1);
    assert_eq!(
        graph.node_attribute("a", "group"),
        Some(&AttributeValue::Text("red".to_owned()))
    );
    assert_eq!(
        graph.node_attribute("a", "community"),
        Some(&AttributeValue::Integer(3))
    );
    assert!(graph.has_attribute("community"));
    assert!(!graph.has_attribute("club"));
}

#[rstest]
fn induced_subgraph_copies_members_and_inner_edges(mut path: GraphModel) {
    path.set_edge_sign("b", "c", Sign::Negative)
        .expect("edge exists");
    path.set_node_attribute("b", "group", "x")
        .expect("node exists");

    let sub = path
        .induced_subgraph(["c", "b"])
        .expect("members exist");
    let ids: Vec<&str> = sub.nodes().map(NodeId::as_str).collect();
    assert_eq!(ids, vec!["b", "c"]);
    assert_eq!(sub.edge_count(), 1);
    assert_eq!(sub.edge_sign("b", "c"), Some(Sign::Negative));
    assert_eq!(
        sub.node_attribute("b", "group"),
        Some(&AttributeValue::Text("x".to_owned()))
    );
}

#[rstest]
fn set_edge_sign_rejects_non_adjacent_nodes(mut path: GraphModel) {
    let err = path
        .set_edge_sign("a", "d", Sign::Negative)
        .expect_err("nodes are not adjacent");
    assert!(matches!(
        err,
        GraphError::InvalidParameter {
            parameter: "edge",
            ..
        }
    ));
}

#[rstest]
#[case(1, Some(Sign::Positive))]
#[case(-1, Some(Sign::Negative))]
#[case(0, None)]
#[case(2, None)]
fn sign_from_integer(#[case] raw: i64, #[case] expected: Option<Sign>) {
    assert_eq!(Sign::try_from(raw).ok(), expected);
}
