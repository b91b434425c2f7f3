//! Annotated syntax tree.
//!
//! This is the shape handed over by the upstream parser (as JSON) and the
//! shape handed back to the code generator after the transform. The output
//! tree uses the same types with every `TypeAnnotation` slot emptied and
//! type declarations replaced by ordinary `const` declarations.
//!
//! # Structure
//!
//! - `Program` is one compilation unit.
//! - `Stmt` / `Expr` cover the host grammar the transform needs to see.
//! - `Pattern` covers binding and assignment targets (destructuring included).
//!
//! Builder helpers at the bottom mirror the constructors the transform uses
//! when synthesizing nodes.

use crate::types::{GenericRef, ObjectShape, TypeAnnotation, TypeParam};
use flowcheck_common::Span;
use serde::{Deserialize, Serialize};

/// One compilation unit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub file_name: String,
    pub body: Vec<Stmt>,
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Expr(Expr),
    VarDecl(VarDecl),
    /// Function declaration (`id` is always set)
    Function(Function),
    Class(Class),
    Return(Option<Expr>),
    If {
        test: Expr,
        consequent: Box<Stmt>,
        #[serde(default)]
        alternate: Option<Box<Stmt>>,
    },
    Block(Vec<Stmt>),
    Throw(Expr),
    For {
        #[serde(default)]
        init: Option<ForInit>,
        #[serde(default)]
        test: Option<Expr>,
        #[serde(default)]
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    ForIn {
        left: ForHead,
        right: Expr,
        body: Box<Stmt>,
    },
    ForOf {
        left: ForHead,
        right: Expr,
        body: Box<Stmt>,
        /// `for await (... of ...)`
        #[serde(default)]
        is_await: bool,
    },
    While {
        test: Expr,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        test: Expr,
    },
    Try {
        block: Vec<Stmt>,
        #[serde(default)]
        handler: Option<CatchClause>,
        #[serde(default)]
        finalizer: Option<Vec<Stmt>>,
    },
    Switch {
        discriminant: Expr,
        cases: Vec<SwitchCase>,
    },
    Break(Option<String>),
    Continue(Option<String>),
    Labeled {
        label: String,
        body: Box<Stmt>,
    },
    Empty,
    TypeAlias(TypeAlias),
    Interface(InterfaceDecl),
    Import(ImportDecl),
    Export(ExportDecl),
    ExportDefault(Expr),
}

/// First clause of a C-style `for`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ForInit {
    VarDecl(VarDecl),
    Expr(Expr),
}

/// Left side of `for-in` / `for-of`. A declaration has no initializers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ForHead {
    VarDecl(VarDecl),
    Target(AssignTarget),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    /// `None` for `catch { ... }`
    #[serde(default)]
    pub param: Option<Pattern>,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    /// `None` for `default:`
    #[serde(default)]
    pub test: Option<Expr>,
    pub consequent: Vec<Stmt>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub kind: VarKind,
    pub declarations: Vec<VarDeclarator>,
    #[serde(default)]
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VarDeclarator {
    pub id: Pattern,
    #[serde(default)]
    pub annotation: Option<TypeAnnotation>,
    #[serde(default)]
    pub init: Option<Expr>,
    #[serde(default)]
    pub span: Span,
}

/// `type Name<T> = ...`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeAlias {
    pub id: String,
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
    pub right: TypeAnnotation,
    /// Set by the parser when the declaration refers to itself.
    #[serde(default)]
    pub recursive: bool,
    #[serde(default)]
    pub span: Span,
}

/// `interface Name<T> extends A, B { ... }`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InterfaceDecl {
    pub id: String,
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
    #[serde(default)]
    pub extends: Vec<GenericRef>,
    pub body: ObjectShape,
    /// Set by the parser when the declaration refers to itself.
    #[serde(default)]
    pub recursive: bool,
    #[serde(default)]
    pub span: Span,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportKind {
    Value,
    Type,
    Typeof,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ImportSpecifier {
    Default {
        local: String,
    },
    Namespace {
        local: String,
    },
    Named {
        imported: String,
        local: String,
        #[serde(default)]
        import_kind: Option<ImportKind>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImportDecl {
    pub specifiers: Vec<ImportSpecifier>,
    pub source: String,
    pub import_kind: ImportKind,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportSpecifier {
    pub local: String,
    pub exported: String,
}

/// `export <declaration>` or `export { a as b } from "m"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportDecl {
    #[serde(default)]
    pub declaration: Option<Box<Stmt>>,
    #[serde(default)]
    pub specifiers: Vec<ExportSpecifier>,
    #[serde(default)]
    pub source: Option<String>,
    pub export_kind: ImportKind,
}

// =============================================================================
// Functions and Classes
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FunctionBody {
    Block(Vec<Stmt>),
    /// Concise arrow body
    Expr(Box<Expr>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Param {
    /// Binding pattern, possibly wrapped in `Pattern::Assign` (default value)
    /// or `Pattern::Rest`.
    pub pattern: Pattern,
    #[serde(default)]
    pub annotation: Option<TypeAnnotation>,
    /// `x?: T`
    #[serde(default)]
    pub optional: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Function {
    #[serde(default)]
    pub id: Option<String>,
    pub params: Vec<Param>,
    pub body: FunctionBody,
    #[serde(default)]
    pub return_type: Option<TypeAnnotation>,
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub is_arrow: bool,
    #[serde(default)]
    pub is_generator: bool,
    #[serde(default)]
    pub span: Span,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ClassMember {
    Method {
        key: PropKey,
        kind: MethodKind,
        #[serde(default)]
        is_static: bool,
        function: Function,
    },
    Property {
        key: PropKey,
        #[serde(default)]
        annotation: Option<TypeAnnotation>,
        #[serde(default)]
        value: Option<Expr>,
        #[serde(default)]
        is_static: bool,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Class {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub super_class: Option<Box<Expr>>,
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
    pub body: Vec<ClassMember>,
    #[serde(default)]
    pub span: Span,
}

// =============================================================================
// Expressions
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PropKey {
    Ident(String),
    Str(String),
    Num(String),
    Computed(Box<Expr>),
}

impl PropKey {
    /// Static name of the key, if it has one.
    #[must_use]
    pub fn static_name(&self) -> Option<&str> {
        match self {
            Self::Ident(name) | Self::Str(name) | Self::Num(name) => Some(name),
            Self::Computed(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ObjectProp {
    KeyValue {
        key: PropKey,
        value: Expr,
        #[serde(default)]
        shorthand: bool,
    },
    Method {
        key: PropKey,
        function: Function,
    },
    Spread(Expr),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MemberProp {
    Ident(String),
    Computed(Box<Expr>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AssignTarget {
    Pattern(Pattern),
    /// Member expression target: `a.b = ...`
    Expr(Box<Expr>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Ident(String),
    This,
    Super,
    Null,
    Bool(bool),
    /// Source text of the numeric literal.
    Num(String),
    Str(String),
    Regex {
        pattern: String,
        #[serde(default)]
        flags: String,
    },
    Template(TemplateLiteral),
    TaggedTemplate {
        tag: Box<Expr>,
        quasi: TemplateLiteral,
    },
    /// Elements; `None` is a hole.
    Array(Vec<Option<Expr>>),
    Object(Vec<ObjectProp>),
    Function(Box<Function>),
    Class(Box<Class>),
    Member {
        object: Box<Expr>,
        property: MemberProp,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    New {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Unary {
        operator: String,
        argument: Box<Expr>,
    },
    /// `++x`, `x--`
    Update {
        operator: String,
        #[serde(default)]
        prefix: bool,
        argument: Box<Expr>,
    },
    Binary {
        operator: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Assign {
        operator: String,
        target: AssignTarget,
        value: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    Seq(Vec<Expr>),
    Spread(Box<Expr>),
    Await(Box<Expr>),
    Yield {
        #[serde(default)]
        argument: Option<Box<Expr>>,
        /// `yield*`
        #[serde(default)]
        delegate: bool,
    },
    Paren(Box<Expr>),
    /// `(expr: T)`
    TypeCast {
        expr: Box<Expr>,
        annotation: TypeAnnotation,
        #[serde(default)]
        optional: bool,
        #[serde(default)]
        span: Span,
    },
}

/// Template literal. `quasis` holds the raw text between substitutions and
/// is always one longer than `exprs`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateLiteral {
    pub quasis: Vec<String>,
    #[serde(default)]
    pub exprs: Vec<Expr>,
}

// =============================================================================
// Patterns
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ObjectPatternProp {
    KeyValue {
        key: PropKey,
        value: Pattern,
        #[serde(default)]
        shorthand: bool,
    },
    Rest(Pattern),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    Ident(String),
    Object(Vec<ObjectPatternProp>),
    /// Elements; `None` is a hole.
    Array(Vec<Option<Pattern>>),
    /// Pattern with default value: `x = 1`
    Assign {
        left: Box<Pattern>,
        right: Box<Expr>,
    },
    Rest(Box<Pattern>),
}

impl Pattern {
    /// Every identifier bound by this pattern, left to right.
    #[must_use]
    pub fn bound_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_bound_names(&mut names);
        names
    }

    fn collect_bound_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Self::Ident(name) => names.push(name),
            Self::Object(props) => {
                for prop in props {
                    match prop {
                        ObjectPatternProp::KeyValue { value, .. } => {
                            value.collect_bound_names(names);
                        }
                        ObjectPatternProp::Rest(rest) => rest.collect_bound_names(names),
                    }
                }
            }
            Self::Array(elements) => {
                for element in elements.iter().flatten() {
                    element.collect_bound_names(names);
                }
            }
            Self::Assign { left, .. } => left.collect_bound_names(names),
            Self::Rest(inner) => inner.collect_bound_names(names),
        }
    }

    /// Shorthand object-pattern property: `{ name }`.
    pub fn shorthand(name: impl Into<String>) -> ObjectPatternProp {
        let name = name.into();
        ObjectPatternProp::KeyValue {
            key: PropKey::Ident(name.clone()),
            value: Self::Ident(name),
            shorthand: true,
        }
    }
}

// =========================================================================
// Builder helpers for node construction
// =========================================================================

impl Expr {
    /// Create an identifier node
    pub fn id(name: impl Into<String>) -> Self {
        Self::Ident(name.into())
    }

    /// Create a string literal
    pub fn string(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// Create a numeric literal
    pub fn number(n: impl Into<String>) -> Self {
        Self::Num(n.into())
    }

    /// Create a call expression
    pub fn call(callee: Self, args: Vec<Self>) -> Self {
        Self::Call {
            callee: Box::new(callee),
            args,
        }
    }

    /// Create a property access: `object.property`
    pub fn prop(object: Self, property: impl Into<String>) -> Self {
        Self::Member {
            object: Box::new(object),
            property: MemberProp::Ident(property.into()),
        }
    }

    /// Create an element access: `object[index]`
    pub fn elem(object: Self, index: Self) -> Self {
        Self::Member {
            object: Box::new(object),
            property: MemberProp::Computed(Box::new(index)),
        }
    }

    /// Create a binary expression
    pub fn binary(left: Self, op: impl Into<String>, right: Self) -> Self {
        Self::Binary {
            operator: op.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create `void 0`
    pub fn void_0() -> Self {
        Self::Unary {
            operator: "void".to_string(),
            argument: Box::new(Self::number("0")),
        }
    }

    /// Create an array literal without holes
    pub fn array(elements: Vec<Self>) -> Self {
        Self::Array(elements.into_iter().map(Some).collect())
    }

    /// Create an object literal from `(key, value)` pairs
    pub fn object<K: Into<String>>(props: impl IntoIterator<Item = (K, Self)>) -> Self {
        Self::Object(
            props
                .into_iter()
                .map(|(key, value)| ObjectProp::KeyValue {
                    key: PropKey::Ident(key.into()),
                    value,
                    shorthand: false,
                })
                .collect(),
        )
    }

    /// Create a function expression
    pub fn function(function: Function) -> Self {
        Self::Function(Box::new(function))
    }

    /// `true` if this is the identifier `undefined`
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Ident(name) if name == "undefined")
    }
}

impl Stmt {
    /// Create an expression statement
    pub const fn expr(expr: Expr) -> Self {
        Self::Expr(expr)
    }

    /// Create a return statement
    pub const fn ret(expr: Option<Expr>) -> Self {
        Self::Return(expr)
    }

    /// Create `const name = init;`
    pub fn const_decl(name: impl Into<String>, init: Expr, span: Span) -> Self {
        Self::VarDecl(VarDecl {
            kind: VarKind::Const,
            declarations: vec![VarDeclarator {
                id: Pattern::Ident(name.into()),
                annotation: None,
                init: Some(init),
                span,
            }],
            span,
        })
    }
}

impl Function {
    /// Anonymous function expression with a block body and no parameters.
    #[must_use]
    pub fn anonymous(body: Vec<Stmt>) -> Self {
        Self {
            id: None,
            params: Vec::new(),
            body: FunctionBody::Block(body),
            return_type: None,
            type_params: Vec::new(),
            is_async: false,
            is_arrow: false,
            is_generator: false,
            span: Span::dummy(),
        }
    }

    /// Arrow function with a block body and no parameters.
    #[must_use]
    pub fn arrow(body: Vec<Stmt>) -> Self {
        Self {
            is_arrow: true,
            ..Self::anonymous(body)
        }
    }

    /// Named function declaration.
    pub fn declaration(name: impl Into<String>, params: Vec<Param>, body: Vec<Stmt>) -> Self {
        Self {
            id: Some(name.into()),
            params,
            ..Self::anonymous(body)
        }
    }
}

impl Param {
    /// Untyped identifier parameter.
    pub fn ident(name: impl Into<String>) -> Self {
        Self {
            pattern: Pattern::Ident(name.into()),
            annotation: None,
            optional: false,
        }
    }

    /// Typed identifier parameter.
    pub fn typed(name: impl Into<String>, annotation: TypeAnnotation) -> Self {
        Self {
            pattern: Pattern::Ident(name.into()),
            annotation: Some(annotation),
            optional: false,
        }
    }
}

#[cfg(test)]
#[path = "../tests/node.rs"]
mod tests;
