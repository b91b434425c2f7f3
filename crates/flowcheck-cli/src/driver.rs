//! One transform run: read the serialized program, resolve options, apply
//! the pass and render the result.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::args::CliArgs;
use crate::config::{discover_config, load_config, resolve_transform_options};
use flowcheck_ast::{Printer, Program};
use flowcheck_common::Diagnostic;
use flowcheck_emitter::{TransformOptions, transform_program};

/// Result of one run. `output` is `None` when the unit failed.
#[derive(Debug)]
pub struct CompilationResult {
    pub output: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompilationResult {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Read a JSON program from `input`, or from stdin for `-`.
///
/// An empty `fileName` is filled in from the input path so diagnostics
/// name the file they came from.
pub fn read_program(input: &Path) -> Result<Program> {
    let source = if input.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read program from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("failed to read program: {}", input.display()))?
    };

    let mut program: Program = serde_json::from_str(&source)
        .with_context(|| format!("failed to parse program JSON: {}", input.display()))?;
    if program.file_name.is_empty() && input.as_os_str() != "-" {
        program.file_name = input.display().to_string();
    }
    Ok(program)
}

/// Options for this run: `--config`, else a `flowcheck.json` beside the
/// input, then the flags.
pub fn resolve_options(args: &CliArgs) -> Result<TransformOptions> {
    let config_path = args
        .config
        .clone()
        .or_else(|| discover_config(&args.input));
    let config = match &config_path {
        Some(path) => {
            debug!("[driver] loading config {}", path.display());
            Some(load_config(path)?)
        }
        None => None,
    };
    Ok(resolve_transform_options(config.as_ref(), args))
}

/// Transform `program` and render it as JavaScript or, with `emit_ast`,
/// as pretty JSON.
pub fn compile_program(
    program: Program,
    options: &TransformOptions,
    emit_ast: bool,
) -> Result<CompilationResult> {
    let file_name = program.file_name.clone();
    match transform_program(program, options) {
        Ok(transformed) => {
            let output = if emit_ast {
                let mut json = serde_json::to_string_pretty(&transformed)
                    .context("failed to serialize transformed program")?;
                json.push('\n');
                json
            } else {
                Printer::print_program(&transformed)
            };
            debug!("[driver] transformed {file_name}");
            Ok(CompilationResult {
                output: Some(output),
                diagnostics: Vec::new(),
            })
        }
        Err(diagnostic) => {
            debug!("[driver] {file_name} failed with FC{}", diagnostic.code);
            Ok(CompilationResult {
                output: None,
                diagnostics: vec![diagnostic],
            })
        }
    }
}

/// Full run for parsed arguments. Writing the output is left to the caller.
pub fn compile(args: &CliArgs) -> Result<CompilationResult> {
    let options = resolve_options(args)?;
    let program = read_program(&args.input)?;
    compile_program(program, &options, args.emit_ast)
}

#[cfg(test)]
#[path = "../tests/driver.rs"]
mod tests;
