//! Command implementations and argument parsing for the sociograph CLI.

use std::io::{self, Write};

use clap::{Args, Parser, Subcommand};
use sociograph_core::{
    AveragePathLength, BalanceVerdict, BfsResult, ConnectedComponentPartitioner, DEFAULT_SEED,
    FailureSimulation, GeneratorParams, GraphError, GraphModel, HomophilyVerdict,
    RobustnessParams, RobustnessReport, assign_random_signs, average_shortest_path_length,
    connected_components, cycle_detection, generate, graph_density, isolated_nodes,
    label_communities, multi_source_bfs, robustness_check, simulate_failures, verify_homophily,
    verify_structural_balance,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use crate::logging::LoggingArgs;

const DEFAULT_TRIALS: usize = 100;
/// Number of identifiers printed before a list is elided.
const PREVIEW_LIMIT: usize = 10;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "sociograph",
    about = "Generate random social graphs and analyse their structure."
)]
pub struct Cli {
    /// Logging flags, read before the command runs.
    #[command(flatten)]
    pub logging: LoggingArgs,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Generate an Erdős–Rényi graph and run the requested analyses.
    Analyze(AnalyzeCommand),
}

/// Options accepted by the `analyze` command.
#[derive(Debug, Args, Clone, PartialEq)]
pub struct AnalyzeCommand {
    /// Number of nodes to generate.
    #[arg(long)]
    pub nodes: usize,

    /// Connectivity constant `c` in `p = c · ln(n) / n`.
    #[arg(long)]
    pub constant: f64,

    /// Seed for generation and every stochastic analysis.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Sign each generated edge negative with probability `P`.
    #[arg(long = "negative-fraction", value_name = "P")]
    pub negative_fraction: Option<f64>,

    /// Run a multi-source BFS from these node identifiers.
    #[arg(long = "multi-bfs", num_args = 1..)]
    pub multi_bfs: Vec<String>,

    /// Report density, average path length, components, cycles and isolated nodes.
    #[arg(long)]
    pub analyze: bool,

    /// Label nodes with their connected component as `community`.
    #[arg(long = "label-communities")]
    pub label_communities: bool,

    /// Run the homophily permutation test.
    #[arg(long = "verify-homophily")]
    pub verify_homophily: bool,

    /// Check structural balance of the signed triangles.
    ///
    /// Generated graphs carry no edge signs, so this reports "not
    /// applicable" unless signs are added with `--negative-fraction`.
    #[arg(long = "verify-balanced-graph")]
    pub verify_balanced_graph: bool,

    /// Remove this many random edges and compare path lengths.
    #[arg(long = "simulate-failures", value_name = "K")]
    pub simulate_failures: Option<usize>,

    /// Run Monte Carlo trials removing this many random edges each.
    #[arg(long = "robustness-check", value_name = "K")]
    pub robustness_check: Option<usize>,

    /// Number of robustness trials.
    #[arg(long, default_value_t = DEFAULT_TRIALS)]
    pub trials: usize,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The analytics engine rejected a request.
    #[error(transparent)]
    Core(#[from] GraphError),
}

/// Structural metrics reported by `--analyze`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSummary {
    /// Density rounded to two decimals.
    pub density: f64,
    /// Average shortest path length, if defined.
    pub path_length: AveragePathLength,
    /// Sizes of the connected components in discovery order.
    pub component_sizes: Vec<usize>,
    /// Whether the first node's component contains a cycle.
    pub has_cycle: bool,
    /// Identifiers of nodes without edges.
    pub isolated: Vec<String>,
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct AnalysisSummary {
    /// Number of generated nodes.
    pub nodes: usize,
    /// Number of generated edges.
    pub edges: usize,
    /// Seed used throughout the run.
    pub seed: u64,
    /// Number of edges signed negative, when signs were assigned.
    pub negative_edges: Option<usize>,
    /// Multi-source BFS result, when requested.
    pub bfs: Option<BfsResult>,
    /// Structural metrics, when requested.
    pub metrics: Option<MetricsSummary>,
    /// Number of communities written to the graph, when requested.
    pub communities: Option<usize>,
    /// Homophily verdict, when requested.
    pub homophily: Option<HomophilyVerdict>,
    /// Balance verdict, when requested.
    pub balance: Option<BalanceVerdict>,
    /// Edge-failure simulation, when requested.
    pub failures: Option<FailureSimulation>,
    /// Monte Carlo robustness report, when requested.
    pub robustness: Option<RobustnessReport>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when generation or an analysis fails.
///
/// # Examples
/// ```
/// # use sociograph_cli::cli::{AnalyzeCommand, Cli, Command, run_cli};
/// # use sociograph_cli::logging::LoggingArgs;
/// let cli = Cli {
///     logging: LoggingArgs::default(),
///     command: Command::Analyze(AnalyzeCommand {
///         nodes: 10,
///         constant: 1.5,
///         seed: 42,
///         negative_fraction: None,
///         multi_bfs: vec!["0".to_owned()],
///         analyze: true,
///         label_communities: false,
///         verify_homophily: false,
///         verify_balanced_graph: false,
///         simulate_failures: None,
///         robustness_check: None,
///         trials: 100,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.nodes, 10);
/// assert!(summary.metrics.is_some());
/// # Ok::<(), sociograph_cli::cli::CliError>(())
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<AnalysisSummary, CliError> {
    match cli.command {
        Command::Analyze(analyze) => {
            Span::current().record("command", field::display("analyze"));
            run_analyze(&analyze)
        }
    }
}

#[instrument(
    name = "cli.analyze",
    err,
    skip(command),
    fields(nodes = command.nodes, constant = command.constant, seed = command.seed),
)]
pub(super) fn run_analyze(command: &AnalyzeCommand) -> Result<AnalysisSummary, CliError> {
    let params = GeneratorParams::new(command.nodes, command.constant)?.with_seed(command.seed);
    let mut graph = generate(&params);
    let negative_edges = command
        .negative_fraction
        .map(|fraction| assign_random_signs(&mut graph, fraction, command.seed))
        .transpose()?;
    let mut summary = AnalysisSummary {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        seed: command.seed,
        negative_edges,
        bfs: None,
        metrics: None,
        communities: None,
        homophily: None,
        balance: None,
        failures: None,
        robustness: None,
    };

    if !command.multi_bfs.is_empty() {
        summary.bfs = Some(multi_source_bfs(&graph, command.multi_bfs.as_slice())?);
    }
    if command.analyze {
        summary.metrics = Some(collect_metrics(&graph));
    }
    if command.label_communities {
        summary.communities = Some(label_communities(
            &mut graph,
            &ConnectedComponentPartitioner,
        ));
    }
    if command.verify_homophily {
        summary.homophily = Some(verify_homophily(&graph));
    }
    if command.verify_balanced_graph {
        summary.balance = Some(verify_structural_balance(&graph));
    }
    // Later analyses see the damaged graph, as a pipeline of failures would.
    if let Some(k) = command.simulate_failures {
        let simulation = simulate_failures(&graph, k, command.seed);
        graph = simulation.graph().clone();
        summary.failures = Some(simulation);
    }
    if let Some(k) = command.robustness_check {
        let params = RobustnessParams::new(command.trials)?.with_seed(command.seed);
        summary.robustness = Some(robustness_check(&graph, k, &params)?);
    }

    info!(
        nodes = summary.nodes,
        edges = summary.edges,
        "analysis completed"
    );
    Ok(summary)
}

pub(super) fn collect_metrics(graph: &GraphModel) -> MetricsSummary {
    MetricsSummary {
        density: graph_density(graph),
        path_length: average_shortest_path_length(graph),
        component_sizes: connected_components(graph)
            .iter()
            .map(|component| component.len())
            .collect(),
        has_cycle: cycle_detection(graph),
        isolated: isolated_nodes(graph)
            .into_iter()
            .map(|id| id.as_str().to_owned())
            .collect(),
    }
}

pub(super) fn preview<T: std::fmt::Display>(items: &[T]) -> String {
    let shown: Vec<String> = items
        .iter()
        .take(PREVIEW_LIMIT)
        .map(ToString::to_string)
        .collect();
    let ellipsis = if items.len() > PREVIEW_LIMIT { ", ..." } else { "" };
    format!("[{}{ellipsis}]", shown.join(", "))
}

fn render_bfs(bfs: &BfsResult, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "multi-source bfs:")?;
    writeln!(writer, "  sources: {}", preview(bfs.sources()))?;
    writeln!(writer, "  visited: {}", bfs.visitation().len())?;
    writeln!(writer, "  tree edges: {}", bfs.traversal_edges().len())?;
    Ok(())
}

fn render_metrics(metrics: &MetricsSummary, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "density: {:.2}", metrics.density)?;
    writeln!(writer, "average shortest path length: {}", metrics.path_length)?;
    writeln!(
        writer,
        "components: {} {}",
        metrics.component_sizes.len(),
        preview(&metrics.component_sizes)
    )?;
    writeln!(writer, "cycle detected: {}", metrics.has_cycle)?;
    writeln!(
        writer,
        "isolated nodes: {} {}",
        metrics.isolated.len(),
        preview(&metrics.isolated)
    )?;
    Ok(())
}

fn render_balance(balance: &BalanceVerdict, writer: &mut impl Write) -> io::Result<()> {
    match balance {
        BalanceVerdict::NotApplicable => {
            writeln!(writer, "structural balance: not applicable (no signed edges)")
        }
        BalanceVerdict::Evaluated(report) => {
            let verdict = if report.is_balanced() {
                "balanced"
            } else {
                "not balanced"
            };
            writeln!(
                writer,
                "structural balance: {verdict} ({} triangles, {} imbalanced)",
                report.triangles_examined(),
                report.imbalanced().len()
            )
        }
    }
}

fn render_failures(simulation: &FailureSimulation, writer: &mut impl Write) -> io::Result<()> {
    if let Some(clamp) = simulation.clamped() {
        writeln!(writer, "warning: {clamp}")?;
    }
    writeln!(
        writer,
        "failure simulation: removed {} edges; average shortest path length {} -> {}",
        simulation.applied(),
        simulation.before(),
        simulation.after()
    )
}

fn render_robustness(report: &RobustnessReport, writer: &mut impl Write) -> io::Result<()> {
    if let Some(clamp) = report.clamped() {
        writeln!(writer, "warning: {clamp}")?;
    }
    writeln!(
        writer,
        "robustness: {} trials removing {} edges",
        report.trials(),
        report.removals()
    )?;
    writeln!(writer, "  original components: {}", report.original_components())?;
    writeln!(writer, "  mean components: {:.2}", report.mean_components())?;
    writeln!(writer, "  mean largest component: {:.2}", report.mean_largest())?;
    writeln!(writer, "  mean smallest component: {:.2}", report.mean_smallest())?;
    writeln!(
        writer,
        "  persistence rate: {:.1}%",
        report.persistence_rate() * 100.0
    )?;
    Ok(())
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &AnalysisSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(
        writer,
        "graph: {} nodes, {} edges (seed {})",
        summary.nodes, summary.edges, summary.seed
    )?;
    if let Some(negative) = summary.negative_edges {
        writeln!(writer, "negative edges: {negative}")?;
    }
    if let Some(bfs) = &summary.bfs {
        render_bfs(bfs, &mut writer)?;
    }
    if let Some(metrics) = &summary.metrics {
        render_metrics(metrics, &mut writer)?;
    }
    if let Some(communities) = summary.communities {
        writeln!(writer, "communities labelled: {communities}")?;
    }
    if let Some(homophily) = &summary.homophily {
        writeln!(writer, "homophily: {homophily}")?;
    }
    if let Some(balance) = &summary.balance {
        render_balance(balance, &mut writer)?;
    }
    if let Some(simulation) = &summary.failures {
        render_failures(simulation, &mut writer)?;
    }
    if let Some(report) = &summary.robustness {
        render_robustness(report, &mut writer)?;
    }
    Ok(())
}
