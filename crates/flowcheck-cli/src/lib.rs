//! Command-line driver for flowcheck.
//!
//! - `args`: clap definitions
//! - `config`: `flowcheck.json` loading and option resolution
//! - `driver`: read, transform, render
//! - `reporter`: diagnostic rendering
//! - `tracing_config`: subscriber setup from `FLOWCHECK_LOG` and `-v`

pub mod args;
pub mod config;
pub mod driver;
pub mod reporter;
pub mod tracing_config;
