//! Homophily testing via attribute assortativity and label permutation.
//!
//! The observed assortativity coefficient is compared with coefficients
//! obtained by shuffling the label multiset across the labelled nodes. The
//! graph itself is never mutated; permutations act on a private label table.

use std::{collections::HashMap, fmt};

use rand::{SeedableRng, rngs::SmallRng, seq::SliceRandom};
use tracing::{debug, info, instrument};

use crate::{
    cancel::{CancellationToken, Interrupt, Uninterruptible, into_ok},
    error::{GraphError, Result},
    generator::DEFAULT_SEED,
    graph::GraphModel,
};

/// Categorical attribute names consulted, in priority order.
pub const ATTRIBUTE_PRIORITY: [&str; 5] = ["community", "community_label", "group", "club", "color"];

const DEFAULT_PERMUTATIONS: usize = 1000;
const DEFAULT_SIGNIFICANCE: f64 = 0.05;

/// Configuration of the permutation test.
///
/// # Examples
/// ```
/// use sociograph_core::{CancellationToken, HomophilyParams};
///
/// let params = HomophilyParams::new(500, 0.01)?
///     .with_seed(7)
///     .with_cancellation(CancellationToken::new());
/// assert_eq!(params.permutations(), 500);
/// assert!(HomophilyParams::new(0, 0.05).is_err());
/// # Ok::<(), sociograph_core::GraphError>(())
/// ```
#[derive(Clone, Debug)]
pub struct HomophilyParams {
    permutations: usize,
    significance: f64,
    seed: u64,
    cancellation: Option<CancellationToken>,
}

impl HomophilyParams {
    /// Creates parameters with an explicit permutation count and threshold.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidParameter`] when `permutations` is zero or
    /// `significance` is not strictly between `0` and `1`.
    pub fn new(permutations: usize, significance: f64) -> Result<Self> {
        if permutations == 0 {
            return Err(GraphError::invalid(
                "permutations",
                "at least one permutation is required",
            ));
        }
        if !(significance > 0.0 && significance < 1.0) {
            return Err(GraphError::invalid(
                "significance",
                format!("threshold must lie strictly between 0 and 1 (got {significance})"),
            ));
        }
        Ok(Self {
            permutations,
            significance,
            seed: DEFAULT_SEED,
            cancellation: None,
        })
    }

    /// Seeds the label shuffler.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks `token` before every permutation.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Returns the number of label permutations drawn.
    #[must_use]
    #[rustfmt::skip]
    pub fn permutations(&self) -> usize { self.permutations }

    /// Returns the threshold applied to the p-value for the verdict.
    #[must_use]
    #[rustfmt::skip]
    pub fn significance(&self) -> f64 { self.significance }

    /// Returns the shuffler seed.
    #[must_use]
    #[rustfmt::skip]
    pub fn seed(&self) -> u64 { self.seed }
}

impl Default for HomophilyParams {
    fn default() -> Self {
        Self {
            permutations: DEFAULT_PERMUTATIONS,
            significance: DEFAULT_SIGNIFICANCE,
            seed: DEFAULT_SEED,
            cancellation: None,
        }
    }
}

/// Observed coefficient and its permutation p-value.
#[derive(Clone, Debug, PartialEq)]
pub struct HomophilyReport {
    attribute: String,
    coefficient: f64,
    p_value: f64,
    permutations: usize,
    significance: f64,
}

impl HomophilyReport {
    /// Returns the attribute that was tested.
    #[must_use]
    #[rustfmt::skip]
    pub fn attribute(&self) -> &str { &self.attribute }

    /// Returns the observed assortativity coefficient.
    #[must_use]
    #[rustfmt::skip]
    pub fn coefficient(&self) -> f64 { self.coefficient }

    /// Returns the two-sided permutation p-value.
    #[must_use]
    #[rustfmt::skip]
    pub fn p_value(&self) -> f64 { self.p_value }

    /// Returns the number of permutations drawn.
    #[must_use]
    #[rustfmt::skip]
    pub fn permutations(&self) -> usize { self.permutations }

    /// Returns `true` when the p-value falls below the threshold.
    #[must_use]
    pub fn is_significant(&self) -> bool {
        self.p_value < self.significance
    }
}

impl fmt::Display for HomophilyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.is_significant() {
            "significant homophily"
        } else {
            "no significant homophily"
        };
        write!(
            f,
            "{verdict} on `{}` (r = {:.4}, p = {:.4}, {} permutations)",
            self.attribute, self.coefficient, self.p_value, self.permutations
        )
    }
}

/// Result of [`verify_homophily`].
#[derive(Clone, Debug, PartialEq)]
pub enum HomophilyVerdict {
    /// No node carries any attribute from [`ATTRIBUTE_PRIORITY`].
    NoSuitableAttribute,
    /// The coefficient is undefined: no edge joins two labelled nodes, or
    /// all labelled endpoints share one category.
    Degenerate {
        /// The attribute that was selected.
        attribute: String,
    },
    /// The permutation test ran.
    Tested(HomophilyReport),
}

impl fmt::Display for HomophilyVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSuitableAttribute => f.write_str("no suitable categorical attribute"),
            Self::Degenerate { attribute } => {
                write!(f, "assortativity on `{attribute}` is undefined")
            }
            Self::Tested(report) => report.fmt(f),
        }
    }
}

/// Node categories for one attribute, with the edges joining labelled nodes.
struct Labelling {
    labels: Vec<Option<usize>>,
    categories: usize,
    edges: Vec<(usize, usize)>,
}

impl Labelling {
    fn new(graph: &GraphModel, attribute: &str) -> Self {
        let mut categories: HashMap<String, usize> = HashMap::new();
        let labels: Vec<Option<usize>> = (0..graph.node_count())
            .map(|position| {
                graph.attribute_at(position, attribute).map(|value| {
                    let next = categories.len();
                    *categories.entry(value.to_string()).or_insert(next)
                })
            })
            .collect();
        let edges = graph
            .edge_pairs()
            .filter(|&(u, v)| labels[u].is_some() && labels[v].is_some())
            .collect();
        Self {
            labels,
            categories: categories.len(),
            edges,
        }
    }
}

/// Attribute assortativity of `labels` over `edges`.
///
/// With `e` the symmetric mixing matrix (each edge counted in both
/// directions, normalised to sum to one) and `a` its marginals, returns
/// `(tr(e) - Σ aᵢ²) / (1 - Σ aᵢ²)`. Only the trace and the per-category
/// endpoint counts are accumulated, so `endpoints` is scratch space of one
/// slot per category, reused across calls. Returns `None` when no edge joins
/// two labelled nodes or the denominator vanishes.
fn mixing_coefficient(
    labels: &[Option<usize>],
    edges: &[(usize, usize)],
    endpoints: &mut [usize],
) -> Option<f64> {
    endpoints.fill(0);
    let mut counted = 0_usize;
    let mut same = 0_usize;
    for &(u, v) in edges {
        let (Some(a), Some(b)) = (labels[u], labels[v]) else {
            continue;
        };
        counted += 1;
        same += usize::from(a == b);
        endpoints[a] += 1;
        endpoints[b] += 1;
    }
    if counted == 0 {
        return None;
    }

    let total = (2 * counted) as f64;
    let trace = same as f64 / counted as f64;
    let expected: f64 = endpoints
        .iter()
        .map(|&count| {
            let share = count as f64 / total;
            share * share
        })
        .sum();
    let denominator = 1.0 - expected;
    if denominator.abs() < f64::EPSILON {
        return None;
    }
    Some((trace - expected) / denominator)
}

/// Attribute assortativity coefficient of `attribute`.
///
/// Only edges whose endpoints both carry the attribute contribute. Values
/// are compared by their display form. Returns `None` when the coefficient
/// is undefined.
///
/// # Examples
/// ```
/// use sociograph_core::{GraphModel, assortativity_coefficient};
///
/// let mut graph = GraphModel::new();
/// for (id, group) in [("a", "x"), ("b", "x"), ("c", "y"), ("d", "y")] {
///     graph.add_node_with_attributes(id, [("group", group)]);
/// }
/// graph.add_edge("a", "b")?;
/// graph.add_edge("c", "d")?;
/// assert_eq!(assortativity_coefficient(&graph, "group"), Some(1.0));
/// # Ok::<(), sociograph_core::GraphError>(())
/// ```
#[must_use]
pub fn assortativity_coefficient(graph: &GraphModel, attribute: &str) -> Option<f64> {
    let labelling = Labelling::new(graph, attribute);
    let mut endpoints = vec![0; labelling.categories];
    mixing_coefficient(&labelling.labels, &labelling.edges, &mut endpoints)
}

/// Returns the first attribute of [`ATTRIBUTE_PRIORITY`] present on any
/// node.
#[must_use]
pub fn select_attribute(graph: &GraphModel) -> Option<&'static str> {
    ATTRIBUTE_PRIORITY
        .into_iter()
        .find(|&name| graph.has_attribute(name))
}

/// Runs the permutation test with [`HomophilyParams::default`].
#[must_use]
pub fn verify_homophily(graph: &GraphModel) -> HomophilyVerdict {
    into_ok(homophily_impl(
        graph,
        &HomophilyParams::default(),
        &Uninterruptible,
    ))
}

/// Tests whether adjacent nodes share the selected attribute more often than
/// chance.
///
/// The p-value is the fraction of permutations whose `|r|` reaches the
/// observed `|r|`. Permutations that leave the coefficient undefined count
/// as `r = 0`. Each permutation costs `O(E + C)` for `E` edges and `C`
/// categories.
///
/// # Errors
/// Returns [`GraphError::Cancelled`] when the configured token fires.
///
/// # Examples
/// ```
/// use sociograph_core::{GraphModel, HomophilyParams, HomophilyVerdict, verify_homophily_with};
///
/// let mut graph = GraphModel::new();
/// graph.add_edge("a", "b")?;
/// let params = HomophilyParams::new(100, 0.05)?;
/// assert_eq!(
///     verify_homophily_with(&graph, &params)?,
///     HomophilyVerdict::NoSuitableAttribute
/// );
/// # Ok::<(), sociograph_core::GraphError>(())
/// ```
pub fn verify_homophily_with(
    graph: &GraphModel,
    params: &HomophilyParams,
) -> Result<HomophilyVerdict> {
    match &params.cancellation {
        Some(token) => homophily_impl(graph, params, token),
        None => Ok(into_ok(homophily_impl(graph, params, &Uninterruptible))),
    }
}

#[instrument(
    name = "core.verify_homophily",
    skip_all,
    fields(nodes = graph.node_count(), permutations = params.permutations, seed = params.seed),
)]
fn homophily_impl<I: Interrupt>(
    graph: &GraphModel,
    params: &HomophilyParams,
    interrupt: &I,
) -> core::result::Result<HomophilyVerdict, I::Error> {
    let Some(attribute) = select_attribute(graph) else {
        debug!("no categorical attribute found");
        return Ok(HomophilyVerdict::NoSuitableAttribute);
    };
    let labelling = Labelling::new(graph, attribute);
    let mut endpoints = vec![0; labelling.categories];
    let Some(observed) = mixing_coefficient(&labelling.labels, &labelling.edges, &mut endpoints)
    else {
        debug!(attribute, "assortativity undefined");
        return Ok(HomophilyVerdict::Degenerate {
            attribute: attribute.to_owned(),
        });
    };

    let (positions, mut values): (Vec<usize>, Vec<usize>) = labelling
        .labels
        .iter()
        .enumerate()
        .filter_map(|(position, label)| label.map(|value| (position, value)))
        .unzip();
    let mut shuffled = labelling.labels.clone();
    let mut rng = SmallRng::seed_from_u64(params.seed);
    let mut extreme = 0_usize;
    for _ in 0..params.permutations {
        interrupt.checkpoint()?;
        values.shuffle(&mut rng);
        for (&position, &value) in positions.iter().zip(&values) {
            shuffled[position] = Some(value);
        }
        let permuted =
            mixing_coefficient(&shuffled, &labelling.edges, &mut endpoints).unwrap_or(0.0);
        if permuted.abs() >= observed.abs() {
            extreme += 1;
        }
    }

    let report = HomophilyReport {
        attribute: attribute.to_owned(),
        coefficient: observed,
        p_value: extreme as f64 / params.permutations as f64,
        permutations: params.permutations,
        significance: params.significance,
    };
    info!(
        attribute,
        coefficient = report.coefficient,
        p_value = report.p_value,
        significant = report.is_significant(),
        "homophily tested"
    );
    Ok(HomophilyVerdict::Tested(report))
}

#[cfg(test)]
mod tests;
