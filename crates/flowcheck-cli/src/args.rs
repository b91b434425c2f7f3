use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::tracing_config::LogFormat;

/// CLI arguments for the flowcheck binary.
#[derive(Parser, Debug)]
#[command(
    name = "flowcheck",
    version,
    about = "Insert tcomb runtime checks for Flow type annotations"
)]
pub struct CliArgs {
    /// Serialized program (JSON) to transform. Use `-` for stdin.
    pub input: PathBuf,

    /// Path to a flowcheck.json configuration file.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Write the output to this file instead of stdout.
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    /// Print the transformed program as JSON instead of JavaScript.
    #[arg(long = "emitAst", alias = "emit-ast")]
    pub emit_ast: bool,

    // ==================== Transform Options ====================
    /// Lower type declarations but insert no assertions.
    #[arg(long = "skipAsserts", alias = "skip-asserts")]
    pub skip_asserts: bool,

    /// Do not emit the library import or the shared helpers.
    #[arg(long = "skipHelpers", alias = "skip-helpers")]
    pub skip_helpers: bool,

    /// Make failed assertions warn through `console.warn` instead of throwing.
    #[arg(long = "warnOnFailure", alias = "warn-on-failure")]
    pub warn_on_failure: bool,

    /// Treat a type name as opaque (may be repeated).
    #[arg(short = 'g', long = "global", value_name = "NAME")]
    pub globals: Vec<String>,

    /// Module the runtime library is imported from.
    #[arg(long = "runtimeLibrary", alias = "runtime-library", value_name = "MODULE")]
    pub runtime_library: Option<String>,

    // ==================== Output Formatting ====================
    /// Disable colored diagnostics.
    #[arg(long = "noColor", alias = "no-color")]
    pub no_color: bool,

    // ==================== Logging ====================
    /// Log flowcheck activity to stderr (`-v` debug, `-vv` trace).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Log output format; overrides `FLOWCHECK_LOG_FORMAT`.
    #[arg(long = "logFormat", alias = "log-format", value_enum, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,
}

#[cfg(test)]
#[path = "../tests/args.rs"]
mod tests;
