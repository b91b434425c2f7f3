//! Annotation lowering.
//!
//! Turns a `TypeAnnotation` into a [`Combinator`] under a
//! [`TypeEnvironment`]. Lowering is pure: it reads the environment, never
//! writes it, and reports every failure as a [`LoweringError`].
//!
//! # Refinement markers
//!
//! `$Refinement<typeof p>` has no standalone runtime form. It lowers to a
//! carrier plus a predicate marker ([`Lowered::refinement`]). Intersections
//! collect the markers of their members and fold them on top of the
//! remaining members:
//!
//! ```flow
//! type Positive = number & $Refinement<typeof isPositive>;
//! // _t.refinement(_t.Number, isPositive, "Positive")
//! ```
//!
//! Outside an intersection a marker folds onto `Any`.

use crate::combinator::{Builtin, Combinator, Predicate};
use crate::error::LoweringError;
use crate::type_env::{TypeEnvironment, TypeParamLookup};
use flowcheck_ast::{
    GenericRef, LiteralType, ObjectShape, PrimitiveType, TypeAnnotation, TypeName,
};
use flowcheck_common::limits::MAX_ANNOTATION_DEPTH;
use indexmap::IndexMap;
use tracing::trace;

/// What a generic reference resolves to.
#[derive(Clone, Debug, PartialEq)]
pub enum GenericKind<'a> {
    /// `Array<T>`
    List,
    /// `Function`
    Function,
    /// `Object`
    Object,
    /// `Promise<T>` (argument ignored)
    Promise,
    /// `$Exact<{...}>`
    Exact,
    /// Configured global or erased pseudo-generic.
    Erased,
    /// Type parameter in scope.
    TypeParam { bound: Option<&'a TypeAnnotation> },
    /// `$Refinement<typeof predicate>`
    Refinement { predicate: Predicate },
    /// `$Reify<T>`
    Reify { target: TypeName },
    /// Any other named type.
    Nominal,
}

/// Resolve a generic reference against the environment.
///
/// Only unqualified names are special; `a.Array` is an ordinary nominal
/// reference.
pub fn classify_generic<'a>(
    generic: &GenericRef,
    env: &'a TypeEnvironment,
) -> Result<GenericKind<'a>, LoweringError> {
    let Some(name) = generic.name.as_simple() else {
        return Ok(GenericKind::Nominal);
    };
    let kind = match name {
        "Array" => GenericKind::List,
        "Function" => GenericKind::Function,
        "Object" => GenericKind::Object,
        "$Exact" => GenericKind::Exact,
        "Promise" => GenericKind::Promise,
        _ if env.is_erased(name) => GenericKind::Erased,
        _ => match env.lookup_param(name) {
            Some(TypeParamLookup::Bounded(bound)) => GenericKind::TypeParam { bound: Some(bound) },
            Some(TypeParamLookup::Unbounded) => GenericKind::TypeParam { bound: None },
            None => match name {
                "$Refinement" => GenericKind::Refinement {
                    predicate: refinement_predicate(generic)?,
                },
                "$Reify" => GenericKind::Reify {
                    target: reify_target(generic)?,
                },
                _ => GenericKind::Nominal,
            },
        },
    };
    Ok(kind)
}

/// The predicate of `$Refinement<typeof p>`.
pub fn refinement_predicate(generic: &GenericRef) -> Result<Predicate, LoweringError> {
    match generic.args() {
        [TypeAnnotation::Typeof(predicate)] => Ok(Predicate::Ref(predicate.clone())),
        _ => Err(LoweringError::InvalidRefinement),
    }
}

/// The target of `$Reify<T>`.
pub fn reify_target(generic: &GenericRef) -> Result<TypeName, LoweringError> {
    match generic.args() {
        [TypeAnnotation::Generic(target)] => Ok(target.name.clone()),
        _ => Err(LoweringError::InvalidReify),
    }
}

/// Lowered annotation plus its refinement marker, if any.
#[derive(Clone, Debug, PartialEq)]
pub struct Lowered {
    pub combinator: Combinator,
    pub refinement: Option<Predicate>,
}

impl Lowered {
    const fn plain(combinator: Combinator) -> Self {
        Self {
            combinator,
            refinement: None,
        }
    }

    /// Fold a dangling marker onto `Any`.
    fn into_combinator(self, name: Option<&str>) -> Combinator {
        match self.refinement {
            Some(predicate) => Combinator::Refinement {
                base: Box::new(self.combinator),
                predicate,
                name: name.map(str::to_string),
            },
            None => self.combinator,
        }
    }
}

/// Lower `annotation` under `env`, naming the outermost combinator `name`.
pub fn lower_type(
    annotation: &TypeAnnotation,
    env: &TypeEnvironment,
    name: Option<&str>,
) -> Result<Combinator, LoweringError> {
    TypeLowering::new(env).lower(annotation, name)
}

/// Recursive-descent lowering with a depth guard.
pub struct TypeLowering<'a> {
    env: &'a TypeEnvironment,
    depth: u32,
}

impl<'a> TypeLowering<'a> {
    #[must_use]
    pub const fn new(env: &'a TypeEnvironment) -> Self {
        Self { env, depth: 0 }
    }

    #[must_use]
    pub const fn env(&self) -> &'a TypeEnvironment {
        self.env
    }

    pub fn lower(
        &mut self,
        annotation: &TypeAnnotation,
        name: Option<&str>,
    ) -> Result<Combinator, LoweringError> {
        Ok(self.lower_marked(annotation, name)?.into_combinator(name))
    }

    /// Lower keeping the refinement marker visible to the caller.
    pub fn lower_marked(
        &mut self,
        annotation: &TypeAnnotation,
        name: Option<&str>,
    ) -> Result<Lowered, LoweringError> {
        if self.depth >= MAX_ANNOTATION_DEPTH {
            return Err(LoweringError::TooDeep {
                limit: MAX_ANNOTATION_DEPTH,
            });
        }
        self.depth += 1;
        let result = self.lower_inner(annotation, name);
        self.depth -= 1;
        result
    }

    fn lower_inner(
        &mut self,
        annotation: &TypeAnnotation,
        name: Option<&str>,
    ) -> Result<Lowered, LoweringError> {
        let owned = || name.map(str::to_string);
        let combinator = match annotation {
            TypeAnnotation::Primitive(primitive) => Combinator::Builtin(match primitive {
                PrimitiveType::Number => Builtin::Number,
                PrimitiveType::String => Builtin::String,
                PrimitiveType::Boolean => Builtin::Boolean,
                PrimitiveType::Void | PrimitiveType::Null => Builtin::Nil,
                PrimitiveType::Any | PrimitiveType::Mixed => Builtin::Any,
            }),
            TypeAnnotation::Existential | TypeAnnotation::Typeof(_) => Combinator::ANY,
            TypeAnnotation::Function(_) => Combinator::Builtin(Builtin::Function),
            TypeAnnotation::List(elem) => Combinator::List {
                elem: Box::new(self.lower(elem, None)?),
                name: owned(),
            },
            TypeAnnotation::Nullable(inner) => Combinator::Maybe {
                inner: Box::new(self.lower(inner, None)?),
                name: owned(),
            },
            TypeAnnotation::Tuple(elems) => Combinator::Tuple {
                elems: self.lower_all(elems)?,
                name: owned(),
            },
            TypeAnnotation::Union(members) => self.lower_union(members, name)?,
            TypeAnnotation::Object(shape) => self.lower_object(shape, name, shape.exact)?,
            TypeAnnotation::Intersection(members) => self.lower_intersection(members, name)?,
            TypeAnnotation::Generic(generic) => return self.lower_generic(generic, name),
            TypeAnnotation::Literal(literal) => match literal {
                LiteralType::String(value) => Combinator::Enum {
                    values: vec![value.clone()],
                    name: owned(),
                },
                LiteralType::Number(_) => Combinator::Refinement {
                    base: Box::new(Combinator::Builtin(Builtin::Number)),
                    predicate: Predicate::Equals(literal.clone()),
                    name: owned(),
                },
                LiteralType::Boolean(_) => Combinator::Refinement {
                    base: Box::new(Combinator::Builtin(Builtin::Boolean)),
                    predicate: Predicate::Equals(literal.clone()),
                    name: owned(),
                },
            },
            TypeAnnotation::Unsupported { kind } => {
                return Err(LoweringError::UnsupportedAnnotation(kind.clone()));
            }
        };
        Ok(Lowered::plain(combinator))
    }

    fn lower_all(&mut self, annotations: &[TypeAnnotation]) -> Result<Vec<Combinator>, LoweringError> {
        annotations.iter().map(|a| self.lower(a, None)).collect()
    }

    fn lower_union(
        &mut self,
        members: &[TypeAnnotation],
        name: Option<&str>,
    ) -> Result<Combinator, LoweringError> {
        let string_literals: Option<Vec<String>> = members
            .iter()
            .map(|member| match member {
                TypeAnnotation::Literal(LiteralType::String(value)) => Some(value.clone()),
                _ => None,
            })
            .collect();
        if let Some(values) = string_literals.filter(|values| !values.is_empty()) {
            return Ok(Combinator::Enum {
                values,
                name: name.map(str::to_string),
            });
        }
        Ok(Combinator::Union {
            members: self.lower_all(members)?,
            name: name.map(str::to_string),
        })
    }

    /// Object shape: a dict for one indexer, an interface for none.
    pub fn lower_object(
        &mut self,
        shape: &ObjectShape,
        name: Option<&str>,
        exact: bool,
    ) -> Result<Combinator, LoweringError> {
        match shape.indexers.as_slice() {
            [] => Ok(Combinator::Interface {
                props: self.lower_props(shape)?,
                name: name.map(str::to_string),
                exact,
            }),
            [indexer] => Ok(Combinator::Dict {
                key: Box::new(self.lower(&indexer.key, None)?),
                value: Box::new(self.lower(&indexer.value, None)?),
                name: name.map(str::to_string),
            }),
            indexers => Err(LoweringError::AmbiguousIndexer {
                count: indexers.len(),
            }),
        }
    }

    /// Properties of an object shape, optional ones wrapped in `Maybe`.
    pub fn lower_props(
        &mut self,
        shape: &ObjectShape,
    ) -> Result<IndexMap<String, Combinator>, LoweringError> {
        let mut props = IndexMap::with_capacity(shape.properties.len());
        for prop in &shape.properties {
            let mut value = self.lower(&prop.value, None)?;
            if prop.optional {
                value = value.maybe();
            }
            props.insert(prop.key.clone(), value);
        }
        Ok(props)
    }

    fn lower_intersection(
        &mut self,
        members: &[TypeAnnotation],
        name: Option<&str>,
    ) -> Result<Combinator, LoweringError> {
        let mut plain = Vec::with_capacity(members.len());
        let mut predicates = Vec::new();
        for member in members {
            let lowered = self.lower_marked(member, None)?;
            match lowered.refinement {
                Some(predicate) => predicates.push(predicate),
                None => plain.push(lowered.combinator),
            }
        }

        let carrier_name = if predicates.is_empty() { name } else { None };
        let mut carrier = match plain.len() {
            0 => Combinator::ANY,
            1 => plain.remove(0),
            _ => Combinator::Intersection {
                members: plain,
                name: carrier_name.map(str::to_string),
            },
        };

        let last = predicates.len();
        for (i, predicate) in predicates.into_iter().enumerate() {
            carrier = Combinator::Refinement {
                base: Box::new(carrier),
                predicate,
                name: if i + 1 == last {
                    name.map(str::to_string)
                } else {
                    None
                },
            };
        }
        Ok(carrier)
    }

    fn lower_generic(
        &mut self,
        generic: &GenericRef,
        name: Option<&str>,
    ) -> Result<Lowered, LoweringError> {
        let kind = classify_generic(generic, self.env)?;
        trace!(name = %generic.name, ?kind, "[lowering] generic");
        let combinator = match kind {
            GenericKind::List => match generic.args() {
                [elem] => Combinator::List {
                    elem: Box::new(self.lower(elem, None)?),
                    name: name.map(str::to_string),
                },
                args => {
                    return Err(LoweringError::Arity {
                        name: "Array".to_string(),
                        got: args.len(),
                    });
                }
            },
            GenericKind::Function => Combinator::Builtin(Builtin::Function),
            GenericKind::Object => Combinator::Builtin(Builtin::Object),
            GenericKind::Promise => Combinator::Builtin(Builtin::Promise),
            GenericKind::Exact => match generic.args() {
                [TypeAnnotation::Object(shape)] => Combinator::Interface {
                    props: self.lower_props(shape)?,
                    name: name.map(str::to_string),
                    exact: true,
                },
                _ => return Err(LoweringError::InvalidExact),
            },
            GenericKind::Erased | GenericKind::Reify { .. } => Combinator::ANY,
            GenericKind::TypeParam { bound: Some(bound) } => {
                return self.lower_marked(bound, None);
            }
            GenericKind::TypeParam { bound: None } => Combinator::ANY,
            GenericKind::Refinement { predicate } => {
                return Ok(Lowered {
                    combinator: Combinator::ANY,
                    refinement: Some(predicate),
                });
            }
            GenericKind::Nominal => Combinator::Ref(generic.name.clone()),
        };
        Ok(Lowered::plain(combinator))
    }
}

#[cfg(test)]
#[path = "../tests/lower.rs"]
mod tests;
