//! Runtime combinator trees.
//!
//! A `Combinator` is the lowered form of a type annotation: a closed tree
//! mirroring the primitives of the runtime combinator library. It is turned
//! into host expressions (`_t.list(_t.String, "Names")`) by
//! [`Combinator::to_expr`], and it can be evaluated directly by the
//! reference model in [`crate::semantics`].
//!
//! # Naming
//!
//! Construction combinators carry an optional type name. Lowering attaches
//! the declaration name to the outermost combinator only, so nested
//! combinators are always anonymous.

use flowcheck_ast::node::{Function, ObjectProp, Param, PropKey, Stmt};
use flowcheck_ast::{Expr, LiteralType, TypeName};
use indexmap::IndexMap;

/// Fixed singleton types exposed by the runtime library.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    Number,
    String,
    Boolean,
    Nil,
    Any,
    Function,
    Object,
    Promise,
}

impl Builtin {
    /// Member name on the library binding (`_t.Number`).
    #[must_use]
    pub const fn runtime_name(self) -> &'static str {
        match self {
            Self::Number => "Number",
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::Nil => "Nil",
            Self::Any => "Any",
            Self::Function => "Function",
            Self::Object => "Object",
            Self::Promise => "Promise",
        }
    }
}

/// Refinement predicate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    /// User predicate function referenced by name (`typeof isPositive`).
    Ref(TypeName),
    /// Synthesized equality test against a literal.
    Equals(LiteralType),
}

/// Lowered type.
#[derive(Clone, Debug, PartialEq)]
pub enum Combinator {
    Builtin(Builtin),
    /// Reference to a named type declared elsewhere.
    Ref(TypeName),
    List {
        elem: Box<Combinator>,
        name: Option<String>,
    },
    Maybe {
        inner: Box<Combinator>,
        name: Option<String>,
    },
    Tuple {
        elems: Vec<Combinator>,
        name: Option<String>,
    },
    Union {
        members: Vec<Combinator>,
        name: Option<String>,
    },
    Enum {
        values: Vec<String>,
        name: Option<String>,
    },
    Dict {
        key: Box<Combinator>,
        value: Box<Combinator>,
        name: Option<String>,
    },
    Refinement {
        base: Box<Combinator>,
        predicate: Predicate,
        name: Option<String>,
    },
    Interface {
        props: IndexMap<String, Combinator>,
        name: Option<String>,
        exact: bool,
    },
    Intersection {
        members: Vec<Combinator>,
        name: Option<String>,
    },
    /// Forward declaration of a recursive type, defined later.
    Declare(String),
    /// Structural extension through the unit's extend helper.
    Extend {
        members: Vec<Combinator>,
        name: Option<String>,
    },
    /// Bare property record. Only appears as an `Extend` member.
    Props(IndexMap<String, Combinator>),
}

/// Identifiers the emitted expressions refer to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeNames {
    /// Binding of the imported combinator library (`_t`).
    pub library: String,
    /// The unit's extend helper (`_extend`).
    pub extend: String,
}

impl Default for RuntimeNames {
    fn default() -> Self {
        Self {
            library: "_t".to_string(),
            extend: "_extend".to_string(),
        }
    }
}

impl Combinator {
    pub const ANY: Self = Self::Builtin(Builtin::Any);

    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Builtin(Builtin::Any))
    }

    /// `Any`, or `Maybe` nested any number of times around `Any`.
    #[must_use]
    pub fn is_any_like(&self) -> bool {
        match self {
            Self::Builtin(Builtin::Any) => true,
            Self::Maybe { inner, .. } => inner.is_any_like(),
            _ => false,
        }
    }

    /// `true` if emitting this tree needs the extend helper.
    #[must_use]
    pub fn uses_extend(&self) -> bool {
        match self {
            Self::Extend { .. } => true,
            Self::Builtin(_) | Self::Ref(_) | Self::Enum { .. } | Self::Declare(_) => false,
            Self::List { elem: inner, .. }
            | Self::Maybe { inner, .. }
            | Self::Refinement { base: inner, .. } => inner.uses_extend(),
            Self::Dict { key, value, .. } => key.uses_extend() || value.uses_extend(),
            Self::Tuple { elems: members, .. }
            | Self::Union { members, .. }
            | Self::Intersection { members, .. } => members.iter().any(Self::uses_extend),
            Self::Interface { props, .. } | Self::Props(props) => {
                props.values().any(Self::uses_extend)
            }
        }
    }

    /// Wrap in `Maybe` (anonymous).
    #[must_use]
    pub fn maybe(self) -> Self {
        Self::Maybe {
            inner: Box::new(self),
            name: None,
        }
    }

    /// Set the type name of a construction combinator. References and
    /// builtins are shared values and are left untouched.
    #[must_use]
    pub fn named(mut self, type_name: Option<&str>) -> Self {
        let Some(type_name) = type_name else {
            return self;
        };
        match &mut self {
            Self::List { name, .. }
            | Self::Maybe { name, .. }
            | Self::Tuple { name, .. }
            | Self::Union { name, .. }
            | Self::Enum { name, .. }
            | Self::Dict { name, .. }
            | Self::Refinement { name, .. }
            | Self::Interface { name, .. }
            | Self::Intersection { name, .. }
            | Self::Extend { name, .. } => *name = Some(type_name.to_string()),
            Self::Builtin(_) | Self::Ref(_) | Self::Declare(_) | Self::Props(_) => {}
        }
        self
    }

    // =========================================================================
    // Emission
    // =========================================================================

    /// Host expression constructing this combinator at runtime.
    #[must_use]
    pub fn to_expr(&self, names: &RuntimeNames) -> Expr {
        let lib = || Expr::id(names.library.as_str());
        let combinator = |member: &str, mut args: Vec<Expr>, name: Option<&String>| {
            if let Some(name) = name {
                args.push(Expr::string(name.as_str()));
            }
            Expr::call(Expr::prop(lib(), member), args)
        };
        match self {
            Self::Builtin(builtin) => Expr::prop(lib(), builtin.runtime_name()),
            Self::Ref(path) => type_path_expr(path),
            Self::List { elem, name } => {
                combinator("list", vec![elem.to_expr(names)], name.as_ref())
            }
            Self::Maybe { inner, name } => {
                combinator("maybe", vec![inner.to_expr(names)], name.as_ref())
            }
            Self::Tuple { elems, name } => combinator(
                "tuple",
                vec![exprs_array(elems, names)],
                name.as_ref(),
            ),
            Self::Union { members, name } => combinator(
                "union",
                vec![exprs_array(members, names)],
                name.as_ref(),
            ),
            Self::Enum { values, name } => {
                let mut args = vec![Expr::array(
                    values.iter().map(|v| Expr::string(v.as_str())).collect(),
                )];
                if let Some(name) = name {
                    args.push(Expr::string(name.as_str()));
                }
                Expr::call(Expr::prop(Expr::prop(lib(), "enums"), "of"), args)
            }
            Self::Dict { key, value, name } => combinator(
                "dict",
                vec![key.to_expr(names), value.to_expr(names)],
                name.as_ref(),
            ),
            Self::Refinement {
                base,
                predicate,
                name,
            } => combinator(
                "refinement",
                vec![base.to_expr(names), predicate.to_expr()],
                name.as_ref(),
            ),
            Self::Interface { props, name, exact } => {
                let mut args = vec![props_object(props, names)];
                match (name, exact) {
                    (Some(name), false) => args.push(Expr::string(name.as_str())),
                    (Some(name), true) => args.push(Expr::object([
                        ("name", Expr::string(name.as_str())),
                        ("strict", Expr::Bool(true)),
                    ])),
                    (None, true) => args.push(Expr::object([("strict", Expr::Bool(true))])),
                    (None, false) => {}
                }
                Expr::call(Expr::prop(lib(), "interface"), args)
            }
            Self::Intersection { members, name } => combinator(
                "intersection",
                vec![exprs_array(members, names)],
                name.as_ref(),
            ),
            Self::Declare(name) => combinator("declare", vec![Expr::string(name.as_str())], None),
            Self::Extend { members, name } => {
                let mut args = vec![exprs_array(members, names)];
                if let Some(name) = name {
                    args.push(Expr::string(name.as_str()));
                }
                Expr::call(Expr::id(names.extend.as_str()), args)
            }
            Self::Props(props) => props_object(props, names),
        }
    }

    // =========================================================================
    // Display names
    // =========================================================================

    /// Human-readable type name, following the runtime's naming rules.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::Builtin(builtin) => builtin.runtime_name().to_string(),
            Self::Ref(path) => path.to_string(),
            Self::Declare(name) => name.clone(),
            Self::List { name: Some(n), .. }
            | Self::Maybe { name: Some(n), .. }
            | Self::Tuple { name: Some(n), .. }
            | Self::Union { name: Some(n), .. }
            | Self::Enum { name: Some(n), .. }
            | Self::Dict { name: Some(n), .. }
            | Self::Refinement { name: Some(n), .. }
            | Self::Interface { name: Some(n), .. }
            | Self::Intersection { name: Some(n), .. }
            | Self::Extend { name: Some(n), .. } => n.clone(),
            Self::List { elem, .. } => format!("Array<{}>", elem.display_name()),
            Self::Maybe { inner, .. } => format!("?{}", inner.display_name()),
            Self::Tuple { elems, .. } => format!("[{}]", join_names(elems, ", ")),
            Self::Union { members, .. } => join_names(members, " | "),
            Self::Intersection { members, .. } | Self::Extend { members, .. } => {
                join_names(members, " & ")
            }
            Self::Enum { values, .. } => values
                .iter()
                .map(|v| format!("\"{v}\""))
                .collect::<Vec<_>>()
                .join(" | "),
            Self::Dict { key, value, .. } => {
                format!("{{[key: {}]: {}}}", key.display_name(), value.display_name())
            }
            Self::Refinement { base, .. } => format!("{{{} | <predicate>}}", base.display_name()),
            Self::Interface { props, .. } | Self::Props(props) => {
                let fields = props
                    .iter()
                    .map(|(key, value)| format!("{key}: {}", value.display_name()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{{{fields}}}")
            }
        }
    }
}

impl Predicate {
    /// Host expression for the predicate function.
    #[must_use]
    pub fn to_expr(&self) -> Expr {
        match self {
            Self::Ref(path) => type_path_expr(path),
            Self::Equals(literal) => {
                let (param, value) = match literal {
                    LiteralType::Number(text) => ("n", Expr::number(text.as_str())),
                    LiteralType::Boolean(value) => ("b", Expr::Bool(*value)),
                    LiteralType::String(value) => ("s", Expr::string(value.as_str())),
                };
                let mut function = Function::anonymous(vec![Stmt::ret(Some(Expr::binary(
                    Expr::id(param),
                    "===",
                    value,
                )))]);
                function.params = vec![Param::ident(param)];
                Expr::function(function)
            }
        }
    }
}

/// Member chain for a (possibly qualified) name: `a.b.C`.
#[must_use]
pub fn type_path_expr(path: &TypeName) -> Expr {
    let mut parts = path.parts.iter();
    let Some(first) = parts.next() else {
        return Expr::void_0();
    };
    parts.fold(Expr::id(first.as_str()), |object, part| {
        Expr::prop(object, part.as_str())
    })
}

fn exprs_array(items: &[Combinator], names: &RuntimeNames) -> Expr {
    Expr::array(items.iter().map(|item| item.to_expr(names)).collect())
}

fn props_object(props: &IndexMap<String, Combinator>, names: &RuntimeNames) -> Expr {
    Expr::Object(
        props
            .iter()
            .map(|(key, value)| ObjectProp::KeyValue {
                key: prop_key(key),
                value: value.to_expr(names),
                shorthand: false,
            })
            .collect(),
    )
}

fn prop_key(key: &str) -> PropKey {
    let mut chars = key.chars();
    let is_ident = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$');
    if is_ident {
        PropKey::Ident(key.to_string())
    } else {
        PropKey::Str(key.to_string())
    }
}

fn join_names(items: &[Combinator], separator: &str) -> String {
    items
        .iter()
        .map(Combinator::display_name)
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
#[path = "../tests/combinator.rs"]
mod tests;
