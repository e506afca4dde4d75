//! Random edge-failure simulation.
//!
//! Every simulation clones the caller's graph and damages only the clone.
//! Monte Carlo trials in [`robustness_check`] each start from the original
//! graph, so trials are independent and never cumulative.

mod seed;

use std::{convert::Infallible, fmt};

use rand::{SeedableRng, rngs::SmallRng, seq::index};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::{
    cancel::{CancellationToken, Interrupt, into_ok},
    error::{GraphError, Result},
    generator::DEFAULT_SEED,
    graph::{GraphModel, NodeId},
    metrics::{
        AveragePathLength, average_shortest_path_length, average_shortest_path_length_cancellable,
    },
    traversal::{component_sizes, component_sizes_cancellable},
};

use self::seed::mix_trial_seed;

const DEFAULT_TRIALS: usize = 100;
/// A trial persists while its component count stays within this factor of
/// the original count.
const PERSISTENCE_FACTOR: f64 = 1.5;

/// Warning raised when more removals were requested than edges exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemovalClamped {
    requested: usize,
    available: usize,
}

impl RemovalClamped {
    /// Returns the requested number of removals.
    #[must_use]
    #[rustfmt::skip]
    pub fn requested(&self) -> usize { self.requested }

    /// Returns the number of edges that could actually be removed.
    #[must_use]
    #[rustfmt::skip]
    pub fn available(&self) -> usize { self.available }
}

impl fmt::Display for RemovalClamped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "requested {} edge removals but only {} edges exist; removing all of them",
            self.requested, self.available
        )
    }
}

/// Picks up to `k` distinct edges uniformly at random.
fn sample_removal(
    graph: &GraphModel,
    k: usize,
    rng: &mut SmallRng,
) -> (Vec<(usize, usize)>, Option<RemovalClamped>) {
    let pairs: Vec<(usize, usize)> = graph.edge_pairs().collect();
    let clamped = (k > pairs.len()).then_some(RemovalClamped {
        requested: k,
        available: pairs.len(),
    });
    let amount = k.min(pairs.len());
    let chosen = index::sample(rng, pairs.len(), amount)
        .into_iter()
        .map(|position| pairs[position])
        .collect();
    (chosen, clamped)
}

/// Damaged copy of a graph with path lengths before and after removal.
#[derive(Clone, Debug, PartialEq)]
pub struct FailureSimulation {
    graph: GraphModel,
    removed: Vec<(NodeId, NodeId)>,
    requested: usize,
    clamped: Option<RemovalClamped>,
    before: AveragePathLength,
    after: AveragePathLength,
}

impl FailureSimulation {
    /// Returns the damaged copy.
    #[must_use]
    #[rustfmt::skip]
    pub fn graph(&self) -> &GraphModel { &self.graph }

    /// Consumes the simulation and returns the damaged copy.
    #[must_use]
    pub fn into_graph(self) -> GraphModel {
        self.graph
    }

    /// Returns the removed edges in sampling order.
    #[must_use]
    #[rustfmt::skip]
    pub fn removed(&self) -> &[(NodeId, NodeId)] { &self.removed }

    /// Returns the number of removals asked for.
    #[must_use]
    #[rustfmt::skip]
    pub fn requested(&self) -> usize { self.requested }

    /// Returns the number of edges actually removed.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.removed.len()
    }

    /// Returns the clamp warning when `requested` exceeded the edge count.
    #[must_use]
    #[rustfmt::skip]
    pub fn clamped(&self) -> Option<RemovalClamped> { self.clamped }

    /// Returns the average path length of the intact graph.
    #[must_use]
    #[rustfmt::skip]
    pub fn before(&self) -> AveragePathLength { self.before }

    /// Returns the average path length of the damaged copy.
    #[must_use]
    #[rustfmt::skip]
    pub fn after(&self) -> AveragePathLength { self.after }
}

/// Removes `k` uniformly sampled edges from a copy of `graph`.
///
/// When `k` exceeds the edge count every edge is removed and the result
/// carries a [`RemovalClamped`] warning; this is never an error. The
/// caller's graph is left untouched.
///
/// # Examples
/// ```
/// use sociograph_core::{AveragePathLength, GraphModel, simulate_failures};
///
/// let mut graph = GraphModel::new();
/// graph.add_edge("a", "b")?;
/// graph.add_edge("b", "c")?;
/// let simulation = simulate_failures(&graph, 5, 42);
/// assert_eq!(simulation.applied(), 2);
/// assert!(simulation.clamped().is_some());
/// assert_eq!(simulation.after(), AveragePathLength::Disconnected { components: 3 });
/// assert_eq!(graph.edge_count(), 2);
/// # Ok::<(), sociograph_core::GraphError>(())
/// ```
#[must_use]
pub fn simulate_failures(graph: &GraphModel, k: usize, seed: u64) -> FailureSimulation {
    into_ok(simulate_impl(graph, k, seed, |measured| {
        Ok::<_, Infallible>(average_shortest_path_length(measured))
    }))
}

/// [`simulate_failures`] that checks `token` before the removal and before
/// each BFS of the path-length measurements.
///
/// # Errors
/// Returns [`GraphError::Cancelled`] when the token fires.
pub fn simulate_failures_cancellable(
    graph: &GraphModel,
    k: usize,
    seed: u64,
    token: &CancellationToken,
) -> Result<FailureSimulation> {
    token.checkpoint()?;
    simulate_impl(graph, k, seed, |measured| {
        average_shortest_path_length_cancellable(measured, token)
    })
}

#[instrument(
    name = "core.simulate_failures",
    skip(graph, measure),
    fields(nodes = graph.node_count(), edges = graph.edge_count()),
)]
fn simulate_impl<E>(
    graph: &GraphModel,
    k: usize,
    seed: u64,
    mut measure: impl FnMut(&GraphModel) -> core::result::Result<AveragePathLength, E>,
) -> core::result::Result<FailureSimulation, E> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let (chosen, clamped) = sample_removal(graph, k, &mut rng);
    if let Some(clamp) = clamped {
        warn!(
            requested = clamp.requested,
            available = clamp.available,
            "removal count clamped to edge count"
        );
    }

    let mut damaged = graph.clone();
    let removed_count = damaged.remove_edge_indices(&chosen);
    let removed = chosen
        .iter()
        .map(|&(u, v)| (graph.id_at(u).clone(), graph.id_at(v).clone()))
        .collect();

    let before = measure(graph)?;
    let after = measure(&damaged)?;
    info!(removed = removed_count, %before, %after, "failure simulation completed");
    Ok(FailureSimulation {
        graph: damaged,
        removed,
        requested: k,
        clamped,
        before,
        after,
    })
}

/// Configuration of [`robustness_check`].
///
/// # Examples
/// ```
/// use sociograph_core::{CancellationToken, RobustnessParams};
///
/// let token = CancellationToken::new();
/// let params = RobustnessParams::new(250)?
///     .with_seed(9)
///     .with_cancellation(token.clone());
/// assert_eq!(params.trials(), 250);
/// assert!(RobustnessParams::new(0).is_err());
/// # Ok::<(), sociograph_core::GraphError>(())
/// ```
#[derive(Clone, Debug)]
pub struct RobustnessParams {
    trials: usize,
    seed: u64,
    cancellation: Option<CancellationToken>,
}

impl RobustnessParams {
    /// Creates parameters for `trials` independent trials.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidParameter`] when `trials` is zero.
    pub fn new(trials: usize) -> Result<Self> {
        if trials == 0 {
            return Err(GraphError::invalid(
                "trials",
                "at least one trial is required",
            ));
        }
        Ok(Self {
            trials,
            seed: DEFAULT_SEED,
            cancellation: None,
        })
    }

    /// Overrides the base seed from which per-trial seeds are derived.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks `token` before every trial.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Returns the number of trials.
    #[must_use]
    #[rustfmt::skip]
    pub fn trials(&self) -> usize { self.trials }

    /// Returns the base seed.
    #[must_use]
    #[rustfmt::skip]
    pub fn seed(&self) -> u64 { self.seed }
}

impl Default for RobustnessParams {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            seed: DEFAULT_SEED,
            cancellation: None,
        }
    }
}

/// Aggregate statistics over all trials of [`robustness_check`].
#[derive(Clone, Debug, PartialEq)]
pub struct RobustnessReport {
    original_components: usize,
    trials: usize,
    removals: usize,
    clamped: Option<RemovalClamped>,
    mean_components: f64,
    mean_largest: f64,
    mean_smallest: f64,
    persistence_rate: f64,
}

impl RobustnessReport {
    /// Returns the component count of the intact graph.
    #[must_use]
    #[rustfmt::skip]
    pub fn original_components(&self) -> usize { self.original_components }

    /// Returns the number of trials run.
    #[must_use]
    #[rustfmt::skip]
    pub fn trials(&self) -> usize { self.trials }

    /// Returns the number of edges removed per trial.
    #[must_use]
    #[rustfmt::skip]
    pub fn removals(&self) -> usize { self.removals }

    /// Returns the clamp warning when `k` exceeded the edge count.
    #[must_use]
    #[rustfmt::skip]
    pub fn clamped(&self) -> Option<RemovalClamped> { self.clamped }

    /// Returns the mean number of components after removal.
    #[must_use]
    #[rustfmt::skip]
    pub fn mean_components(&self) -> f64 { self.mean_components }

    /// Returns the mean size of the largest component after removal.
    #[must_use]
    #[rustfmt::skip]
    pub fn mean_largest(&self) -> f64 { self.mean_largest }

    /// Returns the mean size of the smallest component after removal.
    #[must_use]
    #[rustfmt::skip]
    pub fn mean_smallest(&self) -> f64 { self.mean_smallest }

    /// Returns the fraction of trials whose component count stayed within
    /// 1.5 times the original count.
    #[must_use]
    #[rustfmt::skip]
    pub fn persistence_rate(&self) -> f64 { self.persistence_rate }
}

/// Per-trial sums merged into the report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TrialTotals {
    components: usize,
    largest: usize,
    smallest: usize,
    persisted: usize,
}

impl TrialTotals {
    fn merge(self, other: Self) -> Self {
        Self {
            components: self.components + other.components,
            largest: self.largest + other.largest,
            smallest: self.smallest + other.smallest,
            persisted: self.persisted + other.persisted,
        }
    }
}

fn run_trial(
    graph: &GraphModel,
    k: usize,
    original_components: usize,
    params: &RobustnessParams,
    trial: usize,
) -> Result<TrialTotals> {
    if let Some(token) = &params.cancellation {
        token.checkpoint()?;
    }
    let mut rng = SmallRng::seed_from_u64(mix_trial_seed(params.seed, trial));
    let (chosen, _) = sample_removal(graph, k, &mut rng);
    let mut damaged = graph.clone();
    damaged.remove_edge_indices(&chosen);

    let sizes = match &params.cancellation {
        Some(token) => component_sizes_cancellable(&damaged, token)?,
        None => component_sizes(&damaged),
    };
    let components = sizes.len();
    let persisted = components as f64 <= PERSISTENCE_FACTOR * original_components as f64;
    Ok(TrialTotals {
        components,
        largest: sizes.iter().copied().max().unwrap_or(0),
        smallest: sizes.iter().copied().min().unwrap_or(0),
        persisted: usize::from(persisted),
    })
}

#[cfg(feature = "parallel")]
fn run_trials(
    graph: &GraphModel,
    k: usize,
    original_components: usize,
    params: &RobustnessParams,
) -> Result<TrialTotals> {
    (0..params.trials)
        .into_par_iter()
        .map(|trial| run_trial(graph, k, original_components, params, trial))
        .try_reduce(TrialTotals::default, |left, right| Ok(left.merge(right)))
}

#[cfg(not(feature = "parallel"))]
fn run_trials(
    graph: &GraphModel,
    k: usize,
    original_components: usize,
    params: &RobustnessParams,
) -> Result<TrialTotals> {
    (0..params.trials).try_fold(TrialTotals::default(), |totals, trial| {
        run_trial(graph, k, original_components, params, trial).map(|outcome| totals.merge(outcome))
    })
}

/// Repeats independent random removals of `k` edges and aggregates the
/// resulting component structure.
///
/// Trials run on the rayon pool when the `parallel` feature is enabled.
/// Each trial seeds its own generator from the base seed and its index, so
/// the report does not depend on the worker count.
///
/// # Errors
/// Returns [`GraphError::Cancelled`] when the configured token fires.
///
/// # Examples
/// ```
/// use sociograph_core::{GraphModel, RobustnessParams, robustness_check};
///
/// let mut graph = GraphModel::new();
/// graph.add_edge("a", "b")?;
/// graph.add_edge("c", "d")?;
/// let report = robustness_check(&graph, 0, &RobustnessParams::new(10)?)?;
/// assert_eq!(report.original_components(), 2);
/// assert_eq!(report.mean_components(), 2.0);
/// assert_eq!(report.persistence_rate(), 1.0);
/// # Ok::<(), sociograph_core::GraphError>(())
/// ```
#[instrument(
    name = "core.robustness_check",
    err,
    skip(graph, params),
    fields(nodes = graph.node_count(), edges = graph.edge_count(), trials = params.trials),
)]
pub fn robustness_check(
    graph: &GraphModel,
    k: usize,
    params: &RobustnessParams,
) -> Result<RobustnessReport> {
    let original_components = component_sizes(graph).len();
    let available = graph.edge_count();
    let clamped = (k > available).then_some(RemovalClamped {
        requested: k,
        available,
    });
    if let Some(clamp) = clamped {
        warn!(
            requested = clamp.requested,
            available = clamp.available,
            "removal count clamped to edge count"
        );
    }

    let totals = run_trials(graph, k, original_components, params)?;
    let trials = params.trials as f64;
    let report = RobustnessReport {
        original_components,
        trials: params.trials,
        removals: k.min(available),
        clamped,
        mean_components: totals.components as f64 / trials,
        mean_largest: totals.largest as f64 / trials,
        mean_smallest: totals.smallest as f64 / trials,
        persistence_rate: totals.persisted as f64 / trials,
    };
    debug!(?totals, "trial totals merged");
    info!(
        mean_components = report.mean_components,
        persistence_rate = report.persistence_rate,
        "robustness check completed"
    );
    Ok(report)
}
