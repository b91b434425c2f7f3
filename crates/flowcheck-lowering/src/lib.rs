//! Lowering of static type annotations into runtime combinators.
//!
//! This crate is the pure core of the flowcheck compiler:
//! - `lower`: `TypeAnnotation` → `Combinator` under a `TypeEnvironment`
//! - `recursive`: declare/define protocol for self-referential types
//! - `extend`: interface extension
//! - `pattern_path`: leaf types inside destructuring patterns
//! - `semantics`: reference model of the runtime contract

pub mod combinator;
pub use combinator::{Builtin, Combinator, Predicate, RuntimeNames};

pub mod error;
pub use error::LoweringError;

pub mod type_env;
pub use type_env::TypeEnvironment;

pub mod lower;
pub use lower::{GenericKind, TypeLowering, classify_generic, lower_type};

pub mod recursive;
pub use recursive::{RecursiveTypeEntry, RecursiveTypeRegistry};

pub mod extend;
pub use extend::lower_extension;

pub mod pattern_path;
pub use pattern_path::resolve_leaf_type;

pub mod semantics;
pub use semantics::{AssertPolicy, RuntimeAssertionFailure, RuntimeModel};
