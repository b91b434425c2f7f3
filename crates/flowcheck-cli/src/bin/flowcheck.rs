#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{IsTerminal, Write};

use flowcheck_cli::args::CliArgs;
use flowcheck_cli::driver;
use flowcheck_cli::reporter::Reporter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_DIAGNOSTICS: i32 = 1;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    // Tracing stays off unless FLOWCHECK_LOG, RUST_LOG or -v asks for it.
    flowcheck_cli::tracing_config::init_tracing(args.verbose, args.log_format);

    let result = driver::compile(&args)?;

    if result.has_errors() {
        let color = !args.no_color && std::io::stderr().is_terminal();
        let reporter = Reporter::new(color);
        eprintln!("{}", reporter.render(&result.diagnostics));
        std::process::exit(EXIT_DIAGNOSTICS);
    }

    if let Some(output) = result.output {
        match &args.out {
            Some(path) => std::fs::write(path, output)
                .with_context(|| format!("failed to write output: {}", path.display()))?,
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(output.as_bytes())
                    .context("failed to write output")?;
                stdout.flush().context("failed to flush output")?;
            }
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
