//! Lexical scopes of declared binding types.
//!
//! A typed `let`/`const` records its declared annotation and binding pattern
//! under every name the pattern binds, so a later `name = value` can be
//! checked against the leaf type. Untyped declarations, parameters and
//! function or class names are recorded as untyped so they shadow outer
//! typed bindings.
//!
//! Each function body, block and arrow opens a fresh scope, as do `for`
//! heads, `catch` clauses and `switch` bodies. Writes only ever touch the
//! innermost scope; lookups walk outward.

use flowcheck_ast::{Pattern, TypeAnnotation};
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// Declared type of a binding plus the pattern it was declared with.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedBinding {
    pub annotation: TypeAnnotation,
    pub pattern: Pattern,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ScopeBinding {
    Typed(Rc<RecordedBinding>),
    Untyped,
}

/// One lexical scope.
#[derive(Debug, Default)]
pub struct ScopeTypeBindings {
    bindings: FxHashMap<String, ScopeBinding>,
}

impl ScopeTypeBindings {
    /// Record `name` unless this scope already has it. Returns `false` if
    /// the name was already recorded.
    pub fn record(&mut self, name: &str, binding: ScopeBinding) -> bool {
        if self.bindings.contains_key(name) {
            return false;
        }
        self.bindings.insert(name.to_string(), binding);
        true
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ScopeBinding> {
        self.bindings.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<ScopeTypeBindings>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// Stack holding only the unit's top-level scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: vec![ScopeTypeBindings::default()],
        }
    }

    pub fn push(&mut self) {
        self.scopes.push(ScopeTypeBindings::default());
    }

    /// Leave the innermost scope. The top-level scope is never popped.
    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Whether only the unit's top-level scope is open.
    #[must_use]
    pub fn at_top_level(&self) -> bool {
        self.scopes.len() == 1
    }

    /// Record every name bound by `pattern` with the declared annotation.
    pub fn record_typed(&mut self, pattern: &Pattern, annotation: &TypeAnnotation) {
        let recorded = Rc::new(RecordedBinding {
            annotation: annotation.clone(),
            pattern: pattern.clone(),
        });
        for name in pattern.bound_names() {
            self.record(name, ScopeBinding::Typed(Rc::clone(&recorded)));
        }
    }

    /// Record every name bound by `pattern` as untyped.
    pub fn record_untyped(&mut self, pattern: &Pattern) {
        for name in pattern.bound_names() {
            self.record(name, ScopeBinding::Untyped);
        }
    }

    pub fn record(&mut self, name: &str, binding: ScopeBinding) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.record(name, binding);
        }
    }

    /// The typed binding `name` resolves to, if the nearest declaration of
    /// `name` is typed.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&RecordedBinding> {
        let binding = self.scopes.iter().rev().find_map(|scope| scope.get(name))?;
        match binding {
            ScopeBinding::Typed(recorded) => Some(recorded.as_ref()),
            ScopeBinding::Untyped => None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/scope.rs"]
mod tests;
