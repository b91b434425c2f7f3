//! Tracing configuration.
//!
//! Logging is off unless one of these asks for it, in this order:
//!
//! 1. `FLOWCHECK_LOG`: a full `EnvFilter` directive string
//! 2. `RUST_LOG`: same, for users who already export it
//! 3. `-v` / `-vv`: `debug` / `trace` for the flowcheck crates only
//!
//! The output format comes from `--logFormat`, else `FLOWCHECK_LOG_FORMAT`:
//!
//! - `text` (default): standard `tracing-subscriber` flat output
//! - `tree`: hierarchical indented output via `tracing-tree`
//! - `json`: one JSON object per span/event
//!
//! ```bash
//! FLOWCHECK_LOG=debug FLOWCHECK_LOG_FORMAT=tree flowcheck program.json
//! FLOWCHECK_LOG="flowcheck_emitter=trace" flowcheck program.json
//! flowcheck -vv --logFormat json program.json
//! ```

use clap::ValueEnum;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_ENV: &str = "FLOWCHECK_LOG";
const RUST_LOG_ENV: &str = "RUST_LOG";
const LOG_FORMAT_ENV: &str = "FLOWCHECK_LOG_FORMAT";

/// Targets `-v` turns on. Dependencies stay quiet.
const CRATE_TARGETS: &[&str] = &[
    "flowcheck_cli",
    "flowcheck_emitter",
    "flowcheck_lowering",
    "flowcheck_ast",
];

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Standard flat text lines.
    #[default]
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a format name from the environment; anything unrecognised is
    /// `Text`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Filter directives for the flowcheck crates at `verbosity`, or `None`
/// when no `-v` was given.
#[must_use]
pub fn crate_directives(verbosity: u8) -> Option<String> {
    let level = match verbosity {
        0 => return None,
        1 => "debug",
        _ => "trace",
    };
    Some(
        CRATE_TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(","),
    )
}

/// Resolved subscriber setup for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub directives: String,
    pub format: LogFormat,
}

impl LogSettings {
    /// Settings from explicit inputs. `None` means logging stays off.
    #[must_use]
    pub fn resolve(
        own_log: Option<&str>,
        rust_log: Option<&str>,
        verbosity: u8,
        format_flag: Option<LogFormat>,
        format_env: Option<&str>,
    ) -> Option<Self> {
        let directives = own_log
            .or(rust_log)
            .map(str::to_string)
            .or_else(|| crate_directives(verbosity))?;
        let format = format_flag
            .or_else(|| format_env.map(LogFormat::parse))
            .unwrap_or_default();
        Some(Self { directives, format })
    }

    /// Settings from the process environment plus the command-line inputs.
    #[must_use]
    pub fn from_env(verbosity: u8, format_flag: Option<LogFormat>) -> Option<Self> {
        let own_log = std::env::var(LOG_ENV).ok();
        let rust_log = std::env::var(RUST_LOG_ENV).ok();
        let format_env = std::env::var(LOG_FORMAT_ENV).ok();
        Self::resolve(
            own_log.as_deref(),
            rust_log.as_deref(),
            verbosity,
            format_flag,
            format_env.as_deref(),
        )
    }
}

fn build_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder().parse_lossy(directives)
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when [`LogSettings::from_env`] finds no directives. All
/// output goes to stderr so it never mixes with the emitted program.
pub fn init_tracing(verbosity: u8, format_flag: Option<LogFormat>) {
    let Some(settings) = LogSettings::from_env(verbosity, format_flag) else {
        return;
    };
    let filter = build_filter(&settings.directives);

    match settings.format {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

#[cfg(test)]
#[path = "../tests/tracing_config.rs"]
mod tests;
