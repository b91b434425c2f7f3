//! Per-compilation-unit state.
//!
//! Tracks what the unit needs at exit (library import, assert helper,
//! extend helper) and owns the generated identifiers, chosen so they cannot
//! collide with any name the unit already uses.

use flowcheck_ast::{Program, collect_names};
use flowcheck_common::limits::MAX_UID_SUFFIX;
use flowcheck_lowering::RuntimeNames;
use rustc_hash::FxHashSet;

#[derive(Clone, Debug)]
pub struct CompilationUnitState {
    /// A type declaration was lowered.
    pub has_types: bool,
    /// At least one assertion call was inserted.
    pub has_asserts: bool,
    /// An extend combinator was emitted.
    pub has_extend: bool,
    names: RuntimeNames,
    assert_id: String,
}

impl CompilationUnitState {
    #[must_use]
    pub fn new(program: &Program) -> Self {
        let mut taken = collect_names(program);
        let library = generate_uid(&mut taken, "t");
        let assert_id = generate_uid(&mut taken, "assert");
        let extend = generate_uid(&mut taken, "extend");
        Self {
            has_types: false,
            has_asserts: false,
            has_extend: false,
            names: RuntimeNames { library, extend },
            assert_id,
        }
    }

    #[must_use]
    pub const fn names(&self) -> &RuntimeNames {
        &self.names
    }

    /// Binding of the imported combinator library.
    #[must_use]
    pub fn library_id(&self) -> &str {
        &self.names.library
    }

    #[must_use]
    pub fn assert_id(&self) -> &str {
        &self.assert_id
    }

    #[must_use]
    pub fn extend_id(&self) -> &str {
        &self.names.extend
    }
}

/// `_base`, then `_base2`, `_base3`, ... until a free name is found.
///
/// The chosen name is added to `taken`.
pub fn generate_uid(taken: &mut FxHashSet<String>, base: &str) -> String {
    let mut candidate = format!("_{base}");
    let mut suffix = 2;
    while taken.contains(&candidate) && suffix <= MAX_UID_SUFFIX {
        candidate = format!("_{base}{suffix}");
        suffix += 1;
    }
    taken.insert(candidate.clone());
    candidate
}

#[cfg(test)]
#[path = "../tests/unit.rs"]
mod tests;
