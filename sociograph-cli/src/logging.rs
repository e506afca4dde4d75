//! Logging set-up for the `sociograph` binary.
//!
//! The `--log-format` and `--log-filter` flags take precedence over the
//! `SOCIOGRAPH_LOG_FORMAT` and `RUST_LOG` environment variables. Events go to
//! `stderr` so the analysis summary on `stdout` can be piped cleanly, and the
//! `log` facade is bridged into `tracing`.

use std::{env, sync::OnceLock};

use clap::{Args, ValueEnum};
use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

const LOG_FORMAT_ENV: &str = "SOCIOGRAPH_LOG_FORMAT";
const DEFAULT_FILTER: &str = "info";

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Output format of the installed subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Human,
    /// One JSON object per event, with the enclosing analysis spans.
    Json,
}

/// Logging flags accepted by every command.
#[derive(Clone, Debug, Default, PartialEq, Eq, Args)]
pub struct LoggingArgs {
    /// Log output format; overrides `SOCIOGRAPH_LOG_FORMAT`.
    #[arg(long = "log-format", value_enum, global = true)]
    pub format: Option<LogFormat>,

    /// Tracing filter such as `debug` or `sociograph_core=trace`; overrides `RUST_LOG`.
    #[arg(long = "log-filter", value_name = "FILTER", global = true)]
    pub filter: Option<String>,
}

/// Errors raised while initialising structured logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Environment variable contained invalid UTF-8 data.
    #[error("environment variable `{name}` contained invalid UTF-8: {source}")]
    InvalidUnicode {
        /// Name of the offending environment variable.
        name: &'static str,
        /// Underlying parse failure.
        #[source]
        source: env::VarError,
    },
    /// `--log-filter` was not a valid tracing filter.
    #[error("invalid log filter `{filter}`: {source}")]
    InvalidFilter {
        /// Raw directive supplied by the user.
        filter: String,
        /// Parse failure reported by `tracing_subscriber`.
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    /// Unsupported log format requested via `SOCIOGRAPH_LOG_FORMAT`.
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat {
        /// Raw value supplied by the user.
        provided: String,
    },
    /// Failed to install the global tracing subscriber.
    #[error("failed to install tracing subscriber: {source}")]
    InstallFailed {
        /// Error raised by `tracing_subscriber`.
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

/// Installs the global subscriber for this process, once.
///
/// Later calls are no-ops. A subscriber installed by someone else is kept
/// and only reported on `stderr`.
///
/// # Errors
/// Returns [`LoggingError`] when the format or filter cannot be resolved.
pub fn init_logging(args: &LoggingArgs) -> Result<(), LoggingError> {
    if INITIALISED.get().is_some() {
        return Ok(());
    }

    let format = resolve_format(args.format, env::var(LOG_FORMAT_ENV))?;
    let filter = resolve_filter(args.filter.as_deref())?;
    match install_subscriber(format, filter) {
        Ok(()) => {}
        Err(LoggingError::InstallFailed { source }) => report_existing_subscriber(&source),
        Err(err) => return Err(err),
    }
    INITIALISED.get_or_init(|| ());
    Ok(())
}

#[expect(
    clippy::print_stderr,
    reason = "tracing is owned by another subscriber, so report on stderr directly"
)]
fn report_existing_subscriber(source: &tracing_subscriber::util::TryInitError) {
    eprintln!("structured logging already configured elsewhere: {source}");
}

/// Picks the flag when given, then the environment, then human output.
fn resolve_format(
    flag: Option<LogFormat>,
    env_value: Result<String, env::VarError>,
) -> Result<LogFormat, LoggingError> {
    if let Some(format) = flag {
        return Ok(format);
    }
    match env_value {
        Ok(raw) => parse_log_format(&raw),
        Err(env::VarError::NotPresent) => Ok(LogFormat::Human),
        Err(err @ env::VarError::NotUnicode(_)) => Err(LoggingError::InvalidUnicode {
            name: LOG_FORMAT_ENV,
            source: err,
        }),
    }
}

fn resolve_filter(flag: Option<&str>) -> Result<EnvFilter, LoggingError> {
    match flag {
        Some(directive) => {
            EnvFilter::try_new(directive).map_err(|source| LoggingError::InvalidFilter {
                filter: directive.to_owned(),
                source,
            })
        }
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

fn install_subscriber(format: LogFormat, env_filter: EnvFilter) -> Result<(), LoggingError> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);

    let fmt_layer = match format {
        LogFormat::Json => fmt_layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
        LogFormat::Human => fmt_layer.boxed(),
    };

    // Best-effort: another logger may already own the `log` slot.
    if LogTracer::init().is_err() {
        tracing::debug!("log bridge already installed");
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|source| LoggingError::InstallFailed { source })
}

fn parse_log_format(raw: &str) -> Result<LogFormat, LoggingError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "human" => Ok(LogFormat::Human),
        "json" => Ok(LogFormat::Json),
        other => Err(LoggingError::UnsupportedFormat {
            provided: other.to_owned(),
        }),
    }
}
