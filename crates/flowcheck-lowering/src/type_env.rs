//! Type environment: type parameters in scope plus opaque and erased names.
//!
//! Environments are immutable once built. Entering a generic function,
//! class or declaration derives a child with [`TypeEnvironment::child`];
//! the parent is never modified, so a nested context cannot leak its type
//! parameters outward.

use flowcheck_ast::{TypeAnnotation, TypeParam};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

/// Pseudo-generics of the static checker that carry no runtime shape.
pub const ERASED_PSEUDO_GENERICS: [&str; 6] =
    ["$Shape", "$Keys", "$Diff", "$Abstract", "$Subtype", "$ObjMap"];

/// Names that cannot be declared as types.
pub const RESERVED_TYPE_NAMES: [&str; 2] = ["$Refinement", "$Reify"];

/// Result of looking up a name among the type parameters in scope.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TypeParamLookup<'a> {
    /// `T: Bound`
    Bounded(&'a TypeAnnotation),
    /// `T`
    Unbounded,
}

#[derive(Clone, Debug, Default)]
pub struct TypeEnvironment {
    params: FxHashMap<String, Option<TypeAnnotation>>,
    /// Configured globals and erased pseudo-generics, shared by all children.
    erased: Arc<FxHashSet<String>>,
}

impl TypeEnvironment {
    /// Root environment. `globals` and `ambient_types` are both erased to
    /// `Any`; the fixed pseudo-generics are always erased.
    pub fn new<G, A>(globals: G, ambient_types: A) -> Self
    where
        G: IntoIterator,
        G::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        let mut erased: FxHashSet<String> = ERASED_PSEUDO_GENERICS
            .iter()
            .map(|name| (*name).to_string())
            .collect();
        erased.extend(globals.into_iter().map(Into::into));
        erased.extend(ambient_types.into_iter().map(Into::into));
        Self {
            params: FxHashMap::default(),
            erased: Arc::new(erased),
        }
    }

    /// Derive an environment with `params` added. Inner parameters shadow
    /// outer ones with the same name.
    #[must_use]
    pub fn child(&self, params: &[TypeParam]) -> Self {
        if params.is_empty() {
            return self.clone();
        }
        let mut child = self.clone();
        for param in params {
            child
                .params
                .insert(param.name.clone(), param.bound.clone());
        }
        child
    }

    #[must_use]
    pub fn lookup_param(&self, name: &str) -> Option<TypeParamLookup<'_>> {
        self.params.get(name).map(|bound| match bound {
            Some(bound) => TypeParamLookup::Bounded(bound),
            None => TypeParamLookup::Unbounded,
        })
    }

    /// `true` for configured globals and erased pseudo-generics.
    #[must_use]
    pub fn is_erased(&self, name: &str) -> bool {
        self.erased.contains(name)
    }
}

/// `true` if `name` may not be declared as a type.
#[must_use]
pub fn is_reserved_type_name(name: &str) -> bool {
    RESERVED_TYPE_NAMES.contains(&name)
}
