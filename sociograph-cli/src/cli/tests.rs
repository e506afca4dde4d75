//! Unit tests for the CLI commands and summary rendering.

use super::commands::{collect_metrics, preview, run_analyze};
use super::{AnalysisSummary, AnalyzeCommand, Cli, CliError, Command, render_summary, run_cli};
use crate::logging::{LogFormat, LoggingArgs};

use clap::Parser;
use rstest::{fixture, rstest};
use sociograph_core::{AveragePathLength, BalanceVerdict, GraphErrorCode, GraphModel};

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[fixture]
fn command() -> AnalyzeCommand {
    AnalyzeCommand {
        nodes: 30,
        constant: 2.0,
        seed: 42,
        negative_fraction: None,
        multi_bfs: Vec::new(),
        analyze: false,
        label_communities: false,
        verify_homophily: false,
        verify_balanced_graph: false,
        simulate_failures: None,
        robustness_check: None,
        trials: 20,
    }
}

fn render(summary: &AnalysisSummary) -> Result<String, Box<dyn std::error::Error>> {
    let mut buffer = Vec::new();
    render_summary(summary, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[rstest]
fn parses_every_flag() -> TestResult {
    let cli = Cli::try_parse_from([
        "sociograph",
        "analyze",
        "--nodes",
        "50",
        "--constant",
        "1.5",
        "--seed",
        "7",
        "--negative-fraction",
        "0.25",
        "--multi-bfs",
        "0",
        "3",
        "--analyze",
        "--label-communities",
        "--verify-homophily",
        "--verify-balanced-graph",
        "--simulate-failures",
        "4",
        "--robustness-check",
        "2",
        "--trials",
        "10",
    ])?;
    let Command::Analyze(analyze) = cli.command;
    assert_eq!(analyze.nodes, 50);
    assert_eq!(analyze.seed, 7);
    assert_eq!(analyze.negative_fraction, Some(0.25));
    assert_eq!(analyze.multi_bfs, vec!["0".to_owned(), "3".to_owned()]);
    assert!(analyze.analyze && analyze.label_communities);
    assert!(analyze.verify_homophily && analyze.verify_balanced_graph);
    assert_eq!(analyze.simulate_failures, Some(4));
    assert_eq!(analyze.robustness_check, Some(2));
    assert_eq!(analyze.trials, 10);
    Ok(())
}

#[rstest]
fn parse_applies_defaults() -> TestResult {
    let cli = Cli::try_parse_from(["sociograph", "analyze", "--nodes", "5", "--constant", "1"])?;
    let Command::Analyze(analyze) = cli.command;
    assert_eq!(analyze.seed, 42);
    assert_eq!(analyze.trials, 100);
    assert!(analyze.multi_bfs.is_empty());
    assert!(analyze.simulate_failures.is_none());
    assert!(analyze.negative_fraction.is_none());
    assert_eq!(cli.logging, LoggingArgs::default());
    Ok(())
}

#[rstest]
#[case::before_subcommand(&[
    "sociograph", "--log-format", "json", "analyze", "--nodes", "5", "--constant", "1",
])]
#[case::after_subcommand(&[
    "sociograph", "analyze", "--nodes", "5", "--constant", "1", "--log-format", "json",
])]
fn logging_flags_are_global(#[case] args: &[&str]) -> TestResult {
    let cli = Cli::try_parse_from(args)?;
    assert_eq!(cli.logging.format, Some(LogFormat::Json));
    assert!(cli.logging.filter.is_none());
    Ok(())
}

#[rstest]
fn log_filter_flag_is_captured() -> TestResult {
    let cli = Cli::try_parse_from([
        "sociograph",
        "analyze",
        "--nodes",
        "5",
        "--constant",
        "1",
        "--log-filter",
        "sociograph_core=debug",
    ])?;
    assert_eq!(cli.logging.filter.as_deref(), Some("sociograph_core=debug"));
    assert!(cli.logging.format.is_none());
    Ok(())
}

#[rstest]
#[case::missing_nodes(&["sociograph", "analyze", "--constant", "1"])]
#[case::negative_removals(&[
    "sociograph", "analyze", "--nodes", "5", "--constant", "1", "--simulate-failures", "-1",
])]
#[case::unknown_log_format(&[
    "sociograph", "--log-format", "xml", "analyze", "--nodes", "5", "--constant", "1",
])]
fn parse_rejects_malformed_arguments(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[rstest]
fn plain_run_only_generates(command: AnalyzeCommand) -> TestResult {
    let summary = run_analyze(&command)?;
    assert_eq!(summary.nodes, 30);
    assert!(summary.bfs.is_none());
    assert!(summary.metrics.is_none());
    assert!(summary.robustness.is_none());
    Ok(())
}

#[rstest]
fn full_run_fills_every_section(mut command: AnalyzeCommand) -> TestResult {
    command.multi_bfs = vec!["0".to_owned(), "1".to_owned()];
    command.analyze = true;
    command.label_communities = true;
    command.verify_homophily = true;
    command.verify_balanced_graph = true;
    command.simulate_failures = Some(5);
    command.robustness_check = Some(3);
    let summary = run_cli(Cli {
        logging: LoggingArgs::default(),
        command: Command::Analyze(command),
    })?;

    let bfs = summary.bfs.as_ref().ok_or("bfs missing")?;
    assert_eq!(bfs.sources().len(), 2);
    assert!(summary.metrics.is_some());
    assert!(summary.communities.is_some_and(|count| count >= 1));
    assert!(summary.homophily.is_some());
    // Generated graphs carry no signs.
    assert_eq!(summary.balance, Some(BalanceVerdict::NotApplicable));
    let failures = summary.failures.as_ref().ok_or("failures missing")?;
    assert_eq!(failures.graph().edge_count(), summary.edges - failures.applied());
    let robustness = summary.robustness.as_ref().ok_or("robustness missing")?;
    assert_eq!(robustness.trials(), 20);

    let text = render(&summary)?;
    assert!(text.starts_with("graph: 30 nodes"));
    for heading in [
        "multi-source bfs:",
        "density:",
        "communities labelled:",
        "homophily:",
        "structural balance: not applicable",
        "failure simulation:",
        "robustness: 20 trials",
    ] {
        assert!(text.contains(heading), "missing `{heading}` in:\n{text}");
    }
    Ok(())
}

#[rstest]
fn plain_run_assigns_no_signs(command: AnalyzeCommand) -> TestResult {
    let summary = run_analyze(&command)?;
    assert!(summary.negative_edges.is_none());
    assert!(!render(&summary)?.contains("negative edges"));
    Ok(())
}

#[rstest]
#[case::all_positive(0.0)]
#[case::mixed(0.4)]
#[case::all_negative(1.0)]
fn signed_runs_evaluate_balance(
    #[case] fraction: f64,
    mut command: AnalyzeCommand,
) -> TestResult {
    command.negative_fraction = Some(fraction);
    command.verify_balanced_graph = true;
    let summary = run_analyze(&command)?;

    let negative = summary.negative_edges.ok_or("negative edge count missing")?;
    assert!(negative <= summary.edges);
    if fraction == 0.0 {
        assert_eq!(negative, 0);
    }
    if fraction == 1.0 {
        assert_eq!(negative, summary.edges);
    }
    let balance = summary.balance.as_ref().ok_or("balance missing")?;
    assert!(matches!(balance, BalanceVerdict::Evaluated(_)));
    if fraction == 0.0 {
        assert_eq!(balance.is_balanced(), Some(true));
    }

    let text = render(&summary)?;
    assert!(text.contains(&format!("negative edges: {negative}")));
    assert!(!text.contains("structural balance: not applicable"));
    Ok(())
}

#[rstest]
#[case::negative(-0.5)]
#[case::above_one(2.0)]
fn out_of_range_negative_fraction_is_reported(
    #[case] fraction: f64,
    mut command: AnalyzeCommand,
) {
    command.negative_fraction = Some(fraction);
    let err = run_analyze(&command).expect_err("fraction must be rejected");
    let CliError::Core(core) = err;
    assert_eq!(core.code(), GraphErrorCode::InvalidParameter);
}

#[rstest]
fn runs_are_reproducible(mut command: AnalyzeCommand) -> TestResult {
    command.analyze = true;
    command.robustness_check = Some(4);
    let first = run_analyze(&command)?;
    let second = run_analyze(&command)?;
    assert_eq!(first.edges, second.edges);
    assert_eq!(first.metrics, second.metrics);
    assert_eq!(first.robustness, second.robustness);
    Ok(())
}

#[rstest]
fn unknown_bfs_source_is_reported(mut command: AnalyzeCommand) {
    command.multi_bfs = vec!["nobody".to_owned()];
    let err = run_analyze(&command).expect_err("unknown source must fail");
    let CliError::Core(core) = err;
    assert_eq!(core.code(), GraphErrorCode::UnknownNode);
}

#[rstest]
#[case::single_node(1, 10)]
#[case::zero_trials(30, 0)]
fn invalid_parameters_are_reported(
    #[case] nodes: usize,
    #[case] trials: usize,
    mut command: AnalyzeCommand,
) {
    command.nodes = nodes;
    command.trials = trials;
    command.robustness_check = Some(1);
    let err = run_analyze(&command).expect_err("parameters must be rejected");
    let CliError::Core(core) = err;
    assert_eq!(core.code(), GraphErrorCode::InvalidParameter);
}

#[rstest]
fn metrics_summarise_a_small_graph() -> TestResult {
    let mut graph = GraphModel::new();
    graph.add_edge("a", "b")?;
    graph.add_edge("b", "c")?;
    graph.add_edge("c", "a")?;
    graph.add_node("z");
    let metrics = collect_metrics(&graph);
    assert_eq!(metrics.density, 0.5);
    assert_eq!(
        metrics.path_length,
        AveragePathLength::Disconnected { components: 2 }
    );
    assert_eq!(metrics.component_sizes, vec![3, 1]);
    assert!(metrics.has_cycle);
    assert_eq!(metrics.isolated, vec!["z".to_owned()]);
    Ok(())
}

#[rstest]
#[case::short(3, "[0, 1, 2]")]
#[case::elided(12, "[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, ...]")]
#[case::empty(0, "[]")]
fn preview_elides_long_lists(#[case] len: usize, #[case] expected: &str) {
    let items: Vec<usize> = (0..len).collect();
    assert_eq!(preview(&items), expected);
}
