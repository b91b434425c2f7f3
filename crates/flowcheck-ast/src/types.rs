//! Static type annotations as delivered by the upstream parser.
//!
//! The variant set is closed: every annotation kind the parser can produce
//! maps onto exactly one variant, and kinds this compiler does not lower are
//! carried as `TypeAnnotation::Unsupported` so the failure can be reported
//! with the parser's own kind name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A (possibly qualified) type name: `User`, `React.Component`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeName {
    pub parts: Vec<String>,
}

impl TypeName {
    /// Single-segment name.
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            parts: vec![name.into()],
        }
    }

    /// Parse a dotted path (`a.b.C`).
    pub fn dotted(path: &str) -> Self {
        Self {
            parts: path.split('.').map(str::to_string).collect(),
        }
    }

    /// The unqualified name if this is a single segment.
    #[must_use]
    pub fn as_simple(&self) -> Option<&str> {
        match self.parts.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    /// Last segment (`C` for `a.b.C`).
    #[must_use]
    pub fn last(&self) -> &str {
        self.parts.last().map_or("", String::as_str)
    }

    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.as_simple() == Some(name)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.join("."))
    }
}

/// Primitive (keyword) types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    Number,
    String,
    Boolean,
    Void,
    Null,
    Any,
    Mixed,
}

impl PrimitiveType {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Void => "void",
            Self::Null => "null",
            Self::Any => "any",
            Self::Mixed => "mixed",
        }
    }
}

/// Literal types: `"a"`, `1`, `true`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralType {
    String(String),
    /// Source text of the numeric literal.
    Number(String),
    Boolean(bool),
}

/// Reference to a named type, optionally applied to type arguments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenericRef {
    pub name: TypeName,
    #[serde(default)]
    pub type_args: Option<Vec<TypeAnnotation>>,
}

impl GenericRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: TypeName::simple(name),
            type_args: None,
        }
    }

    pub fn with_args(name: impl Into<String>, args: Vec<TypeAnnotation>) -> Self {
        Self {
            name: TypeName::simple(name),
            type_args: Some(args),
        }
    }

    /// Type arguments, empty when none were written.
    #[must_use]
    pub fn args(&self) -> &[TypeAnnotation] {
        self.type_args.as_deref().unwrap_or(&[])
    }
}

/// A property of an object type: `key: T` or `key?: T`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectTypeProperty {
    pub key: String,
    pub value: TypeAnnotation,
    #[serde(default)]
    pub optional: bool,
}

/// An indexer of an object type: `[key: K]: V`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectTypeIndexer {
    #[serde(default)]
    pub id: Option<String>,
    pub key: TypeAnnotation,
    pub value: TypeAnnotation,
}

/// Object type: ordered properties, indexers and exactness (`{| |}`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectShape {
    #[serde(default)]
    pub properties: Vec<ObjectTypeProperty>,
    #[serde(default)]
    pub indexers: Vec<ObjectTypeIndexer>,
    #[serde(default)]
    pub exact: bool,
}

impl ObjectShape {
    /// Find a property by key.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&ObjectTypeProperty> {
        self.properties.iter().find(|p| p.key == key)
    }
}

/// Parameter of a function type (kept for printing only).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionTypeParam {
    #[serde(default)]
    pub name: Option<String>,
    pub annotation: TypeAnnotation,
    #[serde(default)]
    pub optional: bool,
}

/// Function type. Opaque for lowering purposes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionShape {
    #[serde(default)]
    pub params: Vec<FunctionTypeParam>,
    #[serde(default)]
    pub rest: Option<Box<FunctionTypeParam>>,
    pub return_type: Box<TypeAnnotation>,
}

/// Type parameter declaration: `T` or `T: Bound`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeParam {
    pub name: String,
    #[serde(default)]
    pub bound: Option<TypeAnnotation>,
}

impl TypeParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bound: None,
        }
    }

    pub fn bounded(name: impl Into<String>, bound: TypeAnnotation) -> Self {
        Self {
            name: name.into(),
            bound: Some(bound),
        }
    }
}

/// A static type annotation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TypeAnnotation {
    Primitive(PrimitiveType),
    /// `*`
    Existential,
    /// `typeof x`
    Typeof(TypeName),
    /// `T[]`
    List(Box<TypeAnnotation>),
    /// `[A, B]`
    Tuple(Vec<TypeAnnotation>),
    /// `?T`
    Nullable(Box<TypeAnnotation>),
    Union(Vec<TypeAnnotation>),
    Intersection(Vec<TypeAnnotation>),
    Object(ObjectShape),
    Function(FunctionShape),
    Generic(GenericRef),
    Literal(LiteralType),
    /// Any parser node kind this compiler does not lower.
    Unsupported { kind: String },
}

// =========================================================================
// Builder helpers
// =========================================================================

impl TypeAnnotation {
    #[must_use]
    pub const fn number() -> Self {
        Self::Primitive(PrimitiveType::Number)
    }

    #[must_use]
    pub const fn string() -> Self {
        Self::Primitive(PrimitiveType::String)
    }

    #[must_use]
    pub const fn boolean() -> Self {
        Self::Primitive(PrimitiveType::Boolean)
    }

    #[must_use]
    pub const fn void() -> Self {
        Self::Primitive(PrimitiveType::Void)
    }

    #[must_use]
    pub const fn null() -> Self {
        Self::Primitive(PrimitiveType::Null)
    }

    #[must_use]
    pub const fn any() -> Self {
        Self::Primitive(PrimitiveType::Any)
    }

    pub fn list(elem: Self) -> Self {
        Self::List(Box::new(elem))
    }

    pub fn nullable(inner: Self) -> Self {
        Self::Nullable(Box::new(inner))
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Generic(GenericRef::named(name))
    }

    pub fn generic(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::Generic(GenericRef::with_args(name, args))
    }

    pub fn string_literal(value: impl Into<String>) -> Self {
        Self::Literal(LiteralType::String(value.into()))
    }

    /// Object type from `(key, type, optional)` triples.
    pub fn object<K: Into<String>>(props: impl IntoIterator<Item = (K, Self, bool)>) -> Self {
        Self::Object(ObjectShape {
            properties: props
                .into_iter()
                .map(|(key, value, optional)| ObjectTypeProperty {
                    key: key.into(),
                    value,
                    optional,
                })
                .collect(),
            indexers: Vec::new(),
            exact: false,
        })
    }

    /// `true` for `any` written literally (not for erased generics).
    #[must_use]
    pub const fn is_any_keyword(&self) -> bool {
        matches!(self, Self::Primitive(PrimitiveType::Any))
    }

    /// Parser-facing name of the annotation kind, used in diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &str {
        match self {
            Self::Primitive(_) => "Primitive",
            Self::Existential => "Existential",
            Self::Typeof(_) => "Typeof",
            Self::List(_) => "List",
            Self::Tuple(_) => "Tuple",
            Self::Nullable(_) => "Nullable",
            Self::Union(_) => "Union",
            Self::Intersection(_) => "Intersection",
            Self::Object(_) => "Object",
            Self::Function(_) => "Function",
            Self::Generic(_) => "Generic",
            Self::Literal(_) => "Literal",
            Self::Unsupported { kind } => kind,
        }
    }
}
