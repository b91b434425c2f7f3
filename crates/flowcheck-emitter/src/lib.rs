//! Runtime-check insertion for flowcheck.
//!
//! This crate rewrites an annotated `Program` into one that checks its
//! annotations at run time:
//! - `pass`: the single-pass transform (`transform_program`)
//! - `assertion`: assert calls, parameter targets, return wrapping
//! - `scope`: declared binding types per lexical scope
//! - `unit`: per-unit flags and generated identifiers
//! - `helpers`: the library import and the shared helpers
//! - `options`: `TransformOptions`

pub mod options;
pub use options::TransformOptions;

pub mod unit;
pub use unit::CompilationUnitState;

pub mod scope;
pub use scope::{RecordedBinding, ScopeStack, ScopeTypeBindings};

pub mod assertion;

pub mod helpers;

pub mod pass;
pub use pass::{RuntimeCheckPass, transform_program};
