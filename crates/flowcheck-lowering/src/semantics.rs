//! Reference model of the runtime combinator contract.
//!
//! Evaluates a [`Combinator`] against a JSON value the way the runtime
//! library does, reporting the path to the first offending sub-value. It is
//! used to check what lowering produces, not to replace the runtime library.
//!
//! JSON has no `undefined`, functions or promises: `null` and absent
//! properties stand for the nil value, and the `Function` and `Promise`
//! builtins reject every JSON value.

use crate::combinator::{Builtin, Combinator, Predicate};
use crate::extend::informative_members;
use flowcheck_ast::{LiteralType, TypeName};
use flowcheck_common::limits::MAX_ANNOTATION_DEPTH;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde_json::Value;
use smallvec::SmallVec;
use tracing::warn;

/// A value failed a runtime check.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Invalid value {actual} supplied to {location} (expected a {expected})")]
pub struct RuntimeAssertionFailure {
    /// Property keys and indices from the checked value to the offender.
    pub path: Vec<String>,
    /// Label and path joined for display (`"node/next/value"`).
    pub location: String,
    /// JSON text of the offending value.
    pub actual: String,
    /// Display name of the type it failed.
    pub expected: String,
}

impl RuntimeAssertionFailure {
    /// Path joined with dots (`"next.value"`), empty at the root.
    #[must_use]
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

/// What the assert helper does on failure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AssertPolicy {
    /// Raise the failure.
    #[default]
    Throw,
    /// Log the failure and pass the value through.
    Warn,
}

type PredicateFn = Box<dyn Fn(&Value) -> bool>;

/// Registry of named types and predicates plus the failure policy.
#[derive(Default)]
pub struct RuntimeModel {
    types: FxHashMap<String, Combinator>,
    predicates: FxHashMap<String, PredicateFn>,
    policy: AssertPolicy,
}

struct Mismatch {
    path: SmallVec<[String; 4]>,
    actual: String,
    expected: String,
}

impl RuntimeModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_policy(mut self, policy: AssertPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Bind a named type, as a `const` declaration or a `define` call does.
    pub fn define(&mut self, name: impl Into<String>, combinator: Combinator) {
        self.types.insert(name.into(), combinator);
    }

    /// Bind a predicate function referenced by refinements.
    pub fn define_predicate(
        &mut self,
        name: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + 'static,
    ) {
        self.predicates.insert(name.into(), Box::new(predicate));
    }

    /// `type.is(value)`
    #[must_use]
    pub fn is(&self, combinator: &Combinator, value: &Value) -> bool {
        self.check(combinator, value, 0).is_ok()
    }

    /// Check `value`, reporting the first failure.
    pub fn validate(
        &self,
        combinator: &Combinator,
        value: &Value,
    ) -> Result<(), RuntimeAssertionFailure> {
        self.validate_labelled(combinator, value, &combinator.display_name())
    }

    fn validate_labelled(
        &self,
        combinator: &Combinator,
        value: &Value,
        label: &str,
    ) -> Result<(), RuntimeAssertionFailure> {
        self.check(combinator, value, 0).map_err(|boxed| {
            let Mismatch {
                mut path,
                actual,
                expected,
            } = *boxed;
            path.reverse();
            let mut location = label.to_string();
            for segment in &path {
                location.push('/');
                location.push_str(segment);
            }
            RuntimeAssertionFailure {
                path: path.into_vec(),
                location,
                actual,
                expected,
            }
        })
    }

    /// The emitted assert helper: check `value` against `combinator` under
    /// `label`, applying the failure policy.
    pub fn assert<'v>(
        &self,
        value: &'v Value,
        combinator: &Combinator,
        label: &str,
    ) -> Result<&'v Value, RuntimeAssertionFailure> {
        match self.validate_labelled(combinator, value, label) {
            Ok(()) => Ok(value),
            Err(failure) => match self.policy {
                AssertPolicy::Throw => Err(failure),
                AssertPolicy::Warn => {
                    warn!("{failure}");
                    Ok(value)
                }
            },
        }
    }

    // =========================================================================
    // Evaluation
    // =========================================================================

    fn check(
        &self,
        combinator: &Combinator,
        value: &Value,
        depth: u32,
    ) -> Result<(), Box<Mismatch>> {
        if depth > MAX_ANNOTATION_DEPTH {
            return Err(mismatch(combinator, value));
        }
        let depth = depth + 1;
        match combinator {
            Combinator::Builtin(builtin) => {
                if builtin_accepts(*builtin, value) {
                    Ok(())
                } else {
                    Err(mismatch(combinator, value))
                }
            }
            Combinator::Ref(path) => match self.types.get(&path.to_string()) {
                Some(target) => self.check(target, value, depth),
                None => Err(mismatch(combinator, value)),
            },
            Combinator::Declare(name) => match self.types.get(name) {
                Some(target) => self.check(target, value, depth),
                None => Err(mismatch(combinator, value)),
            },
            Combinator::List { elem, .. } => {
                let Value::Array(items) = value else {
                    return Err(mismatch(combinator, value));
                };
                for (i, item) in items.iter().enumerate() {
                    self.check(elem, item, depth).map_err(|m| at(m, i.to_string()))?;
                }
                Ok(())
            }
            Combinator::Maybe { inner, .. } => {
                if value.is_null() {
                    Ok(())
                } else {
                    self.check(inner, value, depth)
                }
            }
            Combinator::Tuple { elems, .. } => {
                let Value::Array(items) = value else {
                    return Err(mismatch(combinator, value));
                };
                if items.len() != elems.len() {
                    return Err(mismatch(combinator, value));
                }
                for (i, (elem, item)) in elems.iter().zip(items).enumerate() {
                    self.check(elem, item, depth).map_err(|m| at(m, i.to_string()))?;
                }
                Ok(())
            }
            Combinator::Union { members, .. } => {
                if members.iter().any(|m| self.check(m, value, depth).is_ok()) {
                    Ok(())
                } else {
                    Err(mismatch(combinator, value))
                }
            }
            Combinator::Enum { values, .. } => match value {
                Value::String(s) if values.contains(s) => Ok(()),
                _ => Err(mismatch(combinator, value)),
            },
            Combinator::Dict { key, value: codomain, .. } => {
                let Value::Object(map) = value else {
                    return Err(mismatch(combinator, value));
                };
                for (k, v) in map {
                    let key_value = Value::String(k.clone());
                    self.check(key, &key_value, depth)
                        .map_err(|m| at(m, k.clone()))?;
                    self.check(codomain, v, depth).map_err(|m| at(m, k.clone()))?;
                }
                Ok(())
            }
            Combinator::Refinement {
                base, predicate, ..
            } => {
                self.check(base, value, depth)?;
                if self.predicate_holds(predicate, value) {
                    Ok(())
                } else {
                    Err(mismatch(combinator, value))
                }
            }
            Combinator::Interface { props, exact, .. } => {
                self.check_props(combinator, props, *exact, value, depth)
            }
            Combinator::Props(props) => self.check_props(combinator, props, false, value, depth),
            Combinator::Intersection { members, .. } => {
                for member in members {
                    self.check(member, value, depth)?;
                }
                Ok(())
            }
            Combinator::Extend { members, .. } => {
                for member in informative_members(members) {
                    self.check(member, value, depth)?;
                }
                Ok(())
            }
        }
    }

    fn check_props(
        &self,
        combinator: &Combinator,
        props: &IndexMap<String, Combinator>,
        exact: bool,
        value: &Value,
        depth: u32,
    ) -> Result<(), Box<Mismatch>> {
        let Value::Object(map) = value else {
            return Err(mismatch(combinator, value));
        };
        for (key, prop) in props {
            let field = map.get(key).unwrap_or(&Value::Null);
            self.check(prop, field, depth).map_err(|m| at(m, key.clone()))?;
        }
        if exact {
            if let Some(extra) = map.keys().find(|k| !props.contains_key(k.as_str())) {
                let mut m = mismatch(&Combinator::Builtin(Builtin::Nil), &map[extra]);
                m.path.push(extra.clone());
                return Err(m);
            }
        }
        Ok(())
    }

    fn predicate_holds(&self, predicate: &Predicate, value: &Value) -> bool {
        match predicate {
            Predicate::Ref(name) => self.lookup_predicate(name).is_some_and(|p| p(value)),
            Predicate::Equals(LiteralType::Number(text)) => match (text.parse::<f64>(), value) {
                (Ok(expected), Value::Number(n)) => n.as_f64() == Some(expected),
                _ => false,
            },
            Predicate::Equals(LiteralType::Boolean(expected)) => value.as_bool() == Some(*expected),
            Predicate::Equals(LiteralType::String(expected)) => {
                value.as_str() == Some(expected.as_str())
            }
        }
    }

    fn lookup_predicate(&self, name: &TypeName) -> Option<&PredicateFn> {
        self.predicates.get(&name.to_string())
    }
}

fn builtin_accepts(builtin: Builtin, value: &Value) -> bool {
    match builtin {
        Builtin::Number => value.is_number(),
        Builtin::String => value.is_string(),
        Builtin::Boolean => value.is_boolean(),
        Builtin::Nil => value.is_null(),
        Builtin::Any => true,
        Builtin::Object => value.is_object(),
        Builtin::Function | Builtin::Promise => false,
    }
}

fn mismatch(combinator: &Combinator, value: &Value) -> Box<Mismatch> {
    Box::new(Mismatch {
        path: SmallVec::new(),
        actual: value.to_string(),
        expected: combinator.display_name(),
    })
}

/// Record one more path segment on the way out (segments are collected
/// innermost first and reversed at the end).
fn at(mut m: Box<Mismatch>, segment: String) -> Box<Mismatch> {
    m.path.push(segment);
    m
}

#[cfg(test)]
#[path = "../tests/semantics.rs"]
mod tests;
