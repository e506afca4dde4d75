//! Unit tests for the homophily tester.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use rstest::rstest;

use super::*;
use crate::{CancellationToken, generator::construct, test_utils::ring};

fn labelled(nodes: &[(&str, &str)], key: &str, edges: &[(&str, &str)]) -> GraphModel {
    let mut graph = GraphModel::new();
    for &(id, label) in nodes {
        graph.add_node_with_attributes(id, [(key, label)]);
    }
    for &(u, v) in edges {
        graph.add_edge(u, v).expect("edge must insert");
    }
    graph
}

/// Two labelled six-cliques joined by a single bridge.
fn cliques() -> GraphModel {
    let mut graph = GraphModel::new();
    for side in ["l", "r"] {
        for i in 0..6 {
            graph.add_node_with_attributes(format!("{side}{i}"), [("community", side)]);
        }
        for i in 0..6 {
            for j in (i + 1)..6 {
                graph
                    .add_edge(format!("{side}{i}"), format!("{side}{j}"))
                    .expect("edge must insert");
            }
        }
    }
    graph.add_edge("l0", "r0").expect("edge must insert");
    graph
}

#[test]
fn coefficient_of_a_mixed_path() {
    let graph = labelled(
        &[("a", "x"), ("b", "x"), ("c", "y"), ("d", "y")],
        "group",
        &[("a", "b"), ("b", "c"), ("c", "d")],
    );
    let r = assortativity_coefficient(&graph, "group").expect("coefficient is defined");
    assert!((r - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn coefficient_of_perfect_disassortative_mixing_is_negative_one() {
    let graph = labelled(
        &[("a", "x"), ("b", "y"), ("c", "x"), ("d", "y")],
        "group",
        &[("a", "b"), ("c", "d")],
    );
    let r = assortativity_coefficient(&graph, "group").expect("coefficient is defined");
    assert!((r + 1.0).abs() < 1e-12);
}

#[test]
fn unlabelled_endpoints_are_ignored() {
    let mut graph = labelled(
        &[("a", "x"), ("b", "x"), ("c", "y"), ("d", "y")],
        "group",
        &[("a", "b"), ("c", "d")],
    );
    graph.add_edge("a", "stranger").expect("edge must insert");
    graph.add_edge("c", "stranger").expect("edge must insert");
    assert_eq!(assortativity_coefficient(&graph, "group"), Some(1.0));
}

#[rstest]
#[case::single_category(&[("a", "x"), ("b", "x"), ("c", "x")], &[("a", "b"), ("b", "c")])]
#[case::no_labelled_edges(&[("a", "x"), ("b", "y")], &[])]
fn degenerate_mixing_is_reported(#[case] nodes: &[(&str, &str)], #[case] edges: &[(&str, &str)]) {
    let graph = labelled(nodes, "club", edges);
    assert_eq!(
        verify_homophily(&graph),
        HomophilyVerdict::Degenerate {
            attribute: "club".to_owned()
        }
    );
}

#[test]
fn missing_attribute_is_not_applicable() {
    let mut graph = GraphModel::new();
    graph.add_edge("a", "b").expect("edge must insert");
    graph
        .set_node_attribute("a", "weight", 3_i64)
        .expect("node exists");
    assert_eq!(verify_homophily(&graph), HomophilyVerdict::NoSuitableAttribute);
    assert_eq!(select_attribute(&graph), None);
}

#[test]
fn attribute_priority_prefers_community() {
    let mut graph = labelled(&[("a", "x")], "group", &[]);
    graph
        .set_node_attribute("a", "community", 1_i64)
        .expect("node exists");
    assert_eq!(select_attribute(&graph), Some("community"));
}

#[test]
fn strong_communities_are_significant() {
    let verdict = verify_homophily(&cliques());
    let HomophilyVerdict::Tested(report) = verdict else {
        panic!("labelled cliques must be tested");
    };
    assert_eq!(report.attribute(), "community");
    assert!(report.coefficient() > 0.9);
    assert!(report.p_value() < 0.05);
    assert!(report.is_significant());
    assert!(report.to_string().starts_with("significant homophily"));
}

#[test]
fn same_seed_gives_same_p_value() {
    let params = HomophilyParams::new(200, 0.05)
        .expect("parameters are valid")
        .with_seed(11);
    let first = verify_homophily_with(&cliques(), &params).expect("not cancelled");
    let second = verify_homophily_with(&cliques(), &params).expect("not cancelled");
    assert_eq!(first, second);
}

#[test]
fn random_labels_are_not_significant_on_average() {
    let params = HomophilyParams::new(200, 0.05).expect("parameters are valid");
    let runs: u32 = 10;
    let mut total = 0.0;
    for seed in 0..u64::from(runs) {
        let mut graph = construct(60, 3.0, seed).expect("parameters are valid");
        let mut rng = SmallRng::seed_from_u64(seed + 1000);
        for i in 0..60 {
            let label = rng.gen_range(0..3_i64);
            graph
                .set_node_attribute(&i.to_string(), "group", label)
                .expect("node exists");
        }
        let HomophilyVerdict::Tested(report) =
            verify_homophily_with(&graph, &params.clone().with_seed(seed))
                .expect("not cancelled")
        else {
            panic!("random labels must be tested");
        };
        assert!((0.0..=1.0).contains(&report.p_value()));
        total += report.p_value();
    }
    assert!(total / f64::from(runs) > 0.05);
}

#[rstest]
#[case(0, 0.05)]
#[case(10, 0.0)]
#[case(10, 1.0)]
#[case(10, f64::NAN)]
fn rejects_invalid_parameters(#[case] permutations: usize, #[case] significance: f64) {
    let err = HomophilyParams::new(permutations, significance).expect_err("must be rejected");
    assert!(matches!(err, GraphError::InvalidParameter { .. }));
}

#[test]
fn defaults_match_the_documented_values() {
    let params = HomophilyParams::default();
    assert_eq!(params.permutations(), 1000);
    assert_eq!(params.significance(), 0.05);
    assert_eq!(params.seed(), DEFAULT_SEED);
}

#[test]
fn unique_labels_on_a_large_ring_stay_cheap() {
    let nodes = 3_000;
    let mut graph = ring(nodes);
    for i in 0..nodes {
        graph
            .set_node_attribute(&i.to_string(), "color", format!("c{i}"))
            .expect("node exists");
    }
    let params = HomophilyParams::new(200, 0.05).expect("parameters are valid");
    let verdict = verify_homophily_with(&graph, &params).expect("not cancelled");
    let HomophilyVerdict::Tested(report) = verdict else {
        panic!("unique labels must be tested");
    };
    assert_eq!(report.attribute(), "color");
    assert!(report.coefficient() < 0.0);
    // Every relabelling of unique labels is the same mixing pattern.
    assert_eq!(report.p_value(), 1.0);
}

#[test]
fn permutation_test_observes_cancellation() {
    let token = CancellationToken::new();
    token.cancel();
    let params = HomophilyParams::new(50, 0.05)
        .expect("parameters are valid")
        .with_cancellation(token);
    assert_eq!(
        verify_homophily_with(&cliques(), &params),
        Err(GraphError::Cancelled)
    );
}

#[test]
fn cancellation_is_ignored_without_an_attribute() {
    let token = CancellationToken::new();
    token.cancel();
    let params = HomophilyParams::default().with_cancellation(token);
    let graph = labelled(&[], "group", &[("a", "b")]);
    assert_eq!(
        verify_homophily_with(&graph, &params),
        Ok(HomophilyVerdict::NoSuitableAttribute)
    );
}
