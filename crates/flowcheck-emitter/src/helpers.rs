//! Runtime helpers emitted once per compilation unit.
//!
//! ```js
//! function _assert(x, type, name) {
//!   if (_t.isType(type) && type.meta.kind !== "struct") {
//!     if (!type.is(x)) {
//!       type(x, [name + ": " + _t.getTypeName(type)]);
//!     }
//!   } else if (!(x instanceof type)) {
//!     _t.fail("Invalid value " + _t.stringify(x) + " supplied to " + name + " (expected a " + _t.getTypeName(type) + ")");
//!   }
//!   return x;
//! }
//! ```
//!
//! With `warnOnFailure` the helper first replaces `_t.fail` with a function
//! that logs through `console.warn`.

use crate::unit::CompilationUnitState;
use flowcheck_ast::node::{AssignTarget, FunctionBody, ImportDecl, ImportKind, ImportSpecifier};
use flowcheck_ast::{Expr, Function, Param, Stmt};
use flowcheck_common::Span;

fn not(argument: Expr) -> Expr {
    Expr::Unary {
        operator: "!".to_string(),
        argument: Box::new(argument),
    }
}

fn if_then(test: Expr, consequent: Vec<Stmt>, alternate: Option<Stmt>) -> Stmt {
    Stmt::If {
        test,
        consequent: Box::new(Stmt::Block(consequent)),
        alternate: alternate.map(Box::new),
    }
}

/// Left-nested string concatenation of `parts`.
fn concat(parts: Vec<Expr>) -> Expr {
    let mut parts = parts.into_iter();
    let first = parts.next().unwrap_or_else(|| Expr::string(""));
    parts.fold(first, |acc, part| Expr::binary(acc, "+", part))
}

fn member_chain(root: &str, path: &[&str]) -> Expr {
    path.iter()
        .fold(Expr::id(root), |object, property| Expr::prop(object, *property))
}

/// `import _t from "tcomb";`
pub fn library_import(unit: &CompilationUnitState, runtime_library: &str) -> Stmt {
    Stmt::Import(ImportDecl {
        specifiers: vec![ImportSpecifier::Default {
            local: unit.library_id().to_string(),
        }],
        source: runtime_library.to_string(),
        import_kind: ImportKind::Value,
    })
}

/// The assert helper declaration.
pub fn assert_helper(unit: &CompilationUnitState, warn_on_failure: bool) -> Stmt {
    let lib = unit.library_id();
    let type_name_of = || {
        Expr::call(
            Expr::prop(Expr::id(lib), "getTypeName"),
            vec![Expr::id("type")],
        )
    };

    let mut body = Vec::with_capacity(3);
    if warn_on_failure {
        let warn = Function {
            params: vec![Param::ident("message")],
            ..Function::anonymous(vec![Stmt::expr(Expr::call(
                member_chain("console", &["warn"]),
                vec![Expr::id("message")],
            ))])
        };
        body.push(Stmt::expr(Expr::Assign {
            operator: "=".to_string(),
            target: AssignTarget::Expr(Box::new(Expr::prop(Expr::id(lib), "fail"))),
            value: Box::new(Expr::function(warn)),
            span: Span::dummy(),
        }));
    }

    let is_combinator = Expr::binary(
        Expr::call(Expr::prop(Expr::id(lib), "isType"), vec![Expr::id("type")]),
        "&&",
        Expr::binary(
            member_chain("type", &["meta", "kind"]),
            "!==",
            Expr::string("struct"),
        ),
    );
    let combinator_check = if_then(
        not(Expr::call(
            Expr::prop(Expr::id("type"), "is"),
            vec![Expr::id("x")],
        )),
        vec![Stmt::expr(Expr::call(
            Expr::id("type"),
            vec![
                Expr::id("x"),
                Expr::array(vec![concat(vec![
                    Expr::id("name"),
                    Expr::string(": "),
                    type_name_of(),
                ])]),
            ],
        ))],
        None,
    );
    let instance_check = if_then(
        not(Expr::binary(Expr::id("x"), "instanceof", Expr::id("type"))),
        vec![Stmt::expr(Expr::call(
            Expr::prop(Expr::id(lib), "fail"),
            vec![concat(vec![
                Expr::string("Invalid value "),
                Expr::call(Expr::prop(Expr::id(lib), "stringify"), vec![Expr::id("x")]),
                Expr::string(" supplied to "),
                Expr::id("name"),
                Expr::string(" (expected a "),
                type_name_of(),
                Expr::string(")"),
            ])],
        ))],
        None,
    );
    body.push(if_then(
        is_combinator,
        vec![combinator_check],
        Some(instance_check),
    ));
    body.push(Stmt::ret(Some(Expr::id("x"))));

    Stmt::Function(Function::declaration(
        unit.assert_id(),
        vec![Param::ident("x"), Param::ident("type"), Param::ident("name")],
        body,
    ))
}

/// The extend helper declaration.
///
/// ```js
/// function _extend(types, name) {
///   const isAny = (type) => { ... };
///   return _t.interface.extend(types.filter((type) => !isAny(type)), name);
/// }
/// ```
///
/// `Any` members, and `maybe` chains around `Any`, are dropped before
/// extending.
pub fn extend_helper(unit: &CompilationUnitState) -> Stmt {
    let lib = unit.library_id();
    let is_any_body = vec![
        if_then(
            Expr::binary(
                Expr::id("type"),
                "===",
                Expr::prop(Expr::id(lib), "Any"),
            ),
            vec![Stmt::ret(Some(Expr::Bool(true)))],
            None,
        ),
        if_then(
            Expr::binary(
                Expr::call(Expr::prop(Expr::id(lib), "isType"), vec![Expr::id("type")]),
                "&&",
                Expr::binary(
                    member_chain("type", &["meta", "kind"]),
                    "===",
                    Expr::string("maybe"),
                ),
            ),
            vec![Stmt::ret(Some(Expr::call(
                Expr::id("isAny"),
                vec![member_chain("type", &["meta", "type"])],
            )))],
            None,
        ),
        Stmt::ret(Some(Expr::Bool(false))),
    ];
    let is_any = Function {
        params: vec![Param::ident("type")],
        ..Function::arrow(is_any_body)
    };
    let keep = Function {
        params: vec![Param::ident("type")],
        body: FunctionBody::Expr(Box::new(not(Expr::call(
            Expr::id("isAny"),
            vec![Expr::id("type")],
        )))),
        ..Function::arrow(Vec::new())
    };
    let extended = Expr::call(
        member_chain(lib, &["interface", "extend"]),
        vec![
            Expr::call(
                Expr::prop(Expr::id("types"), "filter"),
                vec![Expr::function(keep)],
            ),
            Expr::id("name"),
        ],
    );
    let body = vec![
        Stmt::const_decl("isAny", Expr::function(is_any), Span::dummy()),
        Stmt::ret(Some(extended)),
    ];

    Stmt::Function(Function::declaration(
        unit.extend_id(),
        vec![Param::ident("types"), Param::ident("name")],
        body,
    ))
}

#[cfg(test)]
#[path = "../tests/helpers.rs"]
mod tests;
