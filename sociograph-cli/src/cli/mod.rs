//! Command-line interface orchestration for sociograph.
//!
//! The `analyze` command generates a seeded random graph and runs whichever
//! analyses were requested, in a fixed order. Edge-failure simulation
//! replaces the working graph, so a robustness check requested alongside it
//! runs on the damaged copy.

mod commands;

pub use commands::{
    AnalysisSummary, AnalyzeCommand, Cli, CliError, Command, MetricsSummary, render_summary,
    run_cli,
};

#[cfg(test)]
mod tests;
