//! Sociograph core library.
//!
//! An in-memory undirected graph model with the analyses built on it:
//! multi-source traversal, connectivity, density and path length,
//! structural balance of signed graphs, homophily testing, and Monte Carlo
//! edge-failure simulation.
//!
//! Inapplicable analyses (a disconnected graph, no signed edges, no
//! categorical attribute) return typed results rather than errors, so every
//! analysis is total over any graph the model can represent.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod balance;
mod cancel;
mod error;
mod generator;
mod graph;
mod homophily;
mod metrics;
mod partition;
mod robustness;
#[cfg(test)]
mod test_utils;
mod traversal;

pub use crate::{
    balance::{BalanceReport, BalanceVerdict, SignedTriangle, verify_structural_balance},
    cancel::CancellationToken,
    error::{GraphError, GraphErrorCode, Result},
    generator::{DEFAULT_SEED, GeneratorParams, assign_random_signs, construct, generate},
    graph::{AttributeValue, EdgeView, GraphModel, NodeId, Sign},
    homophily::{
        ATTRIBUTE_PRIORITY, HomophilyParams, HomophilyReport, HomophilyVerdict,
        assortativity_coefficient, select_attribute, verify_homophily, verify_homophily_with,
    },
    metrics::{
        AveragePathLength, average_shortest_path_length, average_shortest_path_length_cancellable,
        clustering_coefficients, graph_density, neighborhood_overlap,
    },
    partition::{
        COMMUNITY_ATTRIBUTE, COMMUNITY_LABEL_ATTRIBUTE, ConnectedComponentPartitioner,
        Partitioner, label_communities,
    },
    robustness::{
        FailureSimulation, RemovalClamped, RobustnessParams, RobustnessReport, robustness_check,
        simulate_failures, simulate_failures_cancellable,
    },
    traversal::{
        BACKGROUND_EDGE_COLOR, BACKGROUND_NODE_COLOR, BfsResult, COMPONENT_PALETTE, Color,
        ComponentRecord, SOURCE_PALETTE, connected_components, connected_components_cancellable,
        cycle_basis, cycle_detection, isolated_nodes, multi_source_bfs,
        multi_source_bfs_cancellable,
    },
};
