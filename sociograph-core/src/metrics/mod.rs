//! Aggregate graph metrics.
//!
//! Density and average path length are rounded to two decimals so reports
//! stay byte-stable across platforms. The local metrics
//! ([`clustering_coefficients`], [`neighborhood_overlap`]) are returned
//! unrounded.

use std::{collections::VecDeque, fmt};

use tracing::{debug, instrument};

use crate::{
    cancel::{CancellationToken, Interrupt, Uninterruptible, into_ok},
    error::Result,
    graph::GraphModel,
    traversal::{component_sizes, component_sizes_cancellable},
};

/// Average shortest path length, or the reason it is undefined.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AveragePathLength {
    /// Mean hop distance over ordered node pairs, rounded to two decimals.
    Mean(f64),
    /// The graph does not form exactly one connected component.
    Disconnected {
        /// Number of components found (zero for the empty graph).
        components: usize,
    },
}

impl AveragePathLength {
    /// Returns the mean when it is defined.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Mean(mean) => Some(mean),
            Self::Disconnected { .. } => None,
        }
    }
}

impl fmt::Display for AveragePathLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mean(mean) => write!(f, "{mean:.2}"),
            Self::Disconnected { components } => {
                write!(f, "undefined ({components} components)")
            }
        }
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Returns `|E| / (|V|(|V|-1)/2)` rounded to two decimals.
///
/// Graphs with at most one node have density `0`.
///
/// # Examples
/// ```
/// use sociograph_core::{GraphModel, graph_density};
///
/// let mut graph = GraphModel::new();
/// graph.add_edge("a", "b")?;
/// graph.add_edge("b", "c")?;
/// assert_eq!(graph_density(&graph), 0.67);
/// # Ok::<(), sociograph_core::GraphError>(())
/// ```
#[must_use]
#[instrument(
    name = "core.graph_density",
    skip(graph),
    fields(nodes = graph.node_count(), edges = graph.edge_count()),
)]
pub fn graph_density(graph: &GraphModel) -> f64 {
    let nodes = graph.node_count();
    if nodes <= 1 {
        return 0.0;
    }
    let possible = (nodes * (nodes - 1)) as f64 / 2.0;
    round2(graph.edge_count() as f64 / possible)
}

/// Sums hop distances from `source` to every node it reaches and counts
/// those nodes, excluding `source` itself.
fn distance_totals(
    graph: &GraphModel,
    source: usize,
    distance: &mut [Option<usize>],
) -> (usize, usize) {
    distance.fill(None);
    distance[source] = Some(0);
    let mut queue = VecDeque::from([source]);
    let mut sum = 0;
    let mut reached = 0;
    while let Some(node) = queue.pop_front() {
        let Some(hops) = distance[node] else {
            continue;
        };
        for &next in graph.neighbor_indices(node) {
            if distance[next].is_none() {
                distance[next] = Some(hops + 1);
                sum += hops + 1;
                reached += 1;
                queue.push_back(next);
            }
        }
    }
    (sum, reached)
}

fn path_length_impl<I: Interrupt>(
    graph: &GraphModel,
    interrupt: &I,
    sizes: &[usize],
) -> core::result::Result<AveragePathLength, I::Error> {
    if sizes.len() != 1 {
        return Ok(AveragePathLength::Disconnected {
            components: sizes.len(),
        });
    }

    // Every source contributes its distance to every other node, so each
    // unordered pair enters the sum and the count twice.
    let mut distance = vec![None; graph.node_count()];
    let mut total = 0_usize;
    let mut pairs = 0_usize;
    for source in 0..graph.node_count() {
        interrupt.checkpoint()?;
        let (sum, reached) = distance_totals(graph, source, &mut distance);
        total += sum;
        pairs += reached;
    }
    if pairs == 0 {
        return Ok(AveragePathLength::Mean(0.0));
    }
    Ok(AveragePathLength::Mean(round2(total as f64 / pairs as f64)))
}

/// Mean unweighted shortest path length of a connected graph.
///
/// Returns [`AveragePathLength::Disconnected`] unless the graph forms exactly
/// one connected component. A single node has mean `0`.
///
/// # Examples
/// ```
/// use sociograph_core::{AveragePathLength, GraphModel, average_shortest_path_length};
///
/// let mut graph = GraphModel::new();
/// graph.add_edge("a", "b")?;
/// graph.add_edge("b", "c")?;
/// assert_eq!(average_shortest_path_length(&graph), AveragePathLength::Mean(1.33));
///
/// graph.add_node("d");
/// assert_eq!(
///     average_shortest_path_length(&graph),
///     AveragePathLength::Disconnected { components: 2 },
/// );
/// # Ok::<(), sociograph_core::GraphError>(())
/// ```
#[must_use]
#[instrument(
    name = "core.average_shortest_path_length",
    skip(graph),
    fields(nodes = graph.node_count(), edges = graph.edge_count()),
)]
pub fn average_shortest_path_length(graph: &GraphModel) -> AveragePathLength {
    let sizes = component_sizes(graph);
    let result = into_ok(path_length_impl(graph, &Uninterruptible, &sizes));
    debug!(%result, "average shortest path length computed");
    result
}

/// [`average_shortest_path_length`] that checks `token` before each BFS.
///
/// # Errors
/// Returns [`crate::GraphError::Cancelled`] when the token fires.
pub fn average_shortest_path_length_cancellable(
    graph: &GraphModel,
    token: &CancellationToken,
) -> Result<AveragePathLength> {
    let sizes = component_sizes_cancellable(graph, token)?;
    path_length_impl(graph, token, &sizes)
}

/// Local clustering coefficient of every node, in canonical node order.
///
/// A node of degree `k` with `t` edges among its neighbours scores
/// `2t / (k(k-1))`; nodes of degree below two score `0`.
#[must_use]
#[instrument(name = "core.clustering_coefficients", skip(graph), fields(nodes = graph.node_count()))]
pub fn clustering_coefficients(graph: &GraphModel) -> Vec<f64> {
    let mut marked = vec![false; graph.node_count()];
    (0..graph.node_count())
        .map(|node| {
            let neighbours = graph.neighbor_indices(node);
            let degree = neighbours.len();
            if degree < 2 {
                return 0.0;
            }
            for &next in neighbours {
                marked[next] = true;
            }
            let closed: usize = neighbours
                .iter()
                .map(|&next| {
                    graph
                        .neighbor_indices(next)
                        .iter()
                        .filter(|&&other| marked[other])
                        .count()
                })
                .sum();
            for &next in neighbours {
                marked[next] = false;
            }
            // `closed` counts each neighbour-to-neighbour edge from both ends.
            closed as f64 / (degree * (degree - 1)) as f64
        })
        .collect()
}

/// Neighbourhood overlap of every edge, in canonical edge order.
///
/// For an edge `(u, v)` this is the number of shared neighbours divided by
/// the number of nodes adjacent to either endpoint, excluding `u` and `v`
/// themselves. Edges whose endpoints have no other neighbours score `0`.
#[must_use]
#[instrument(name = "core.neighborhood_overlap", skip(graph), fields(edges = graph.edge_count()))]
pub fn neighborhood_overlap(graph: &GraphModel) -> Vec<f64> {
    let mut marked = vec![false; graph.node_count()];
    graph
        .edge_pairs()
        .map(|(u, v)| {
            let left = graph.neighbor_indices(u);
            let right = graph.neighbor_indices(v);
            for &next in left {
                marked[next] = true;
            }
            let shared = right.iter().filter(|&&other| marked[other]).count();
            for &next in left {
                marked[next] = false;
            }
            // u and v are each other's neighbours but not members of the union.
            let union = left.len() + right.len() - shared - 2;
            if union == 0 {
                0.0
            } else {
                shared as f64 / union as f64
            }
        })
        .collect()
}
