//! CLI entry point for the sociograph analytics engine.
//!
//! Parses command-line arguments with clap, generates and analyses a random
//! graph, renders the summary to stdout, and maps errors to exit codes.
//! Logging is initialised straight after parsing, honouring `--log-format`
//! and `--log-filter`, so every later step can emit structured diagnostics
//! via `tracing`.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use sociograph_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

/// Execute the parsed command, render the summary, and flush the output stream.
fn try_main(cli: Cli) -> Result<()> {
    let summary = run_cli(cli).context("failed to execute command")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to render summary")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = logging::init_logging(&cli.logging) {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main(cli) {
        let code = err
            .downcast_ref::<CliError>()
            .map(|cli_error| match cli_error {
                CliError::Core(core) => core.code(),
            });
        let code_field = code.map(|code| field::display(code.as_str()));
        error!(error = %err, code = code_field, "command execution failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
