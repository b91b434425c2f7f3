//! Building blocks of inserted checks: the assert call, check targets of
//! parameters and the wrapped return value.

use flowcheck_ast::node::{
    Expr, FunctionBody, ObjectPatternProp, ObjectProp, Param, Pattern, PropKey,
};
use flowcheck_ast::{Function, PrimitiveType, Printer, Stmt, TypeAnnotation};

/// Label of every return-value check.
pub const RETURN_VALUE_LABEL: &str = "return value";

/// `assert_id(value, type_expr, "label")`
pub fn assert_call(assert_id: &str, value: Expr, type_expr: Expr, label: &str) -> Expr {
    Expr::call(Expr::id(assert_id), vec![value, type_expr, Expr::string(label)])
}

/// `true` when `value` is a literal whose type already matches `annotation`,
/// looking through one level of `?T`.
#[must_use]
pub fn is_redundant_check(value: &Expr, annotation: &TypeAnnotation) -> bool {
    match annotation {
        TypeAnnotation::Nullable(inner) => literal_matches(value, inner),
        _ => literal_matches(value, annotation),
    }
}

fn literal_matches(value: &Expr, annotation: &TypeAnnotation) -> bool {
    let TypeAnnotation::Primitive(primitive) = annotation else {
        return false;
    };
    match primitive {
        PrimitiveType::Boolean => matches!(value, Expr::Bool(_)),
        PrimitiveType::Number => matches!(value, Expr::Num(_)),
        PrimitiveType::String => matches!(value, Expr::Str(_)),
        PrimitiveType::Null => matches!(value, Expr::Null),
        PrimitiveType::Void => value.is_undefined(),
        PrimitiveType::Any | PrimitiveType::Mixed => false,
    }
}

/// Value expression equivalent to a binding pattern, with defaults removed:
/// `{ a = 1, b: [c] }` becomes `{ a, b: [c] }`.
#[must_use]
pub fn strip_defaults(pattern: &Pattern) -> Expr {
    match pattern {
        Pattern::Ident(name) => Expr::id(name.as_str()),
        Pattern::Assign { left, .. } => strip_defaults(left),
        Pattern::Rest(inner) => Expr::Spread(Box::new(strip_defaults(inner))),
        Pattern::Array(elements) => Expr::Array(
            elements
                .iter()
                .map(|element| element.as_ref().map(strip_defaults))
                .collect(),
        ),
        Pattern::Object(props) => Expr::Object(
            props
                .iter()
                .map(|prop| match prop {
                    ObjectPatternProp::KeyValue { key, value, .. } => {
                        let value = strip_defaults(value);
                        let shorthand = matches!(
                            (key, &value),
                            (PropKey::Ident(key), Expr::Ident(name)) if key == name
                        );
                        ObjectProp::KeyValue {
                            key: key.clone(),
                            value,
                            shorthand,
                        }
                    }
                    ObjectPatternProp::Rest(Pattern::Ident(name)) => ObjectProp::KeyValue {
                        key: PropKey::Ident(name.clone()),
                        value: Expr::id(name.as_str()),
                        shorthand: true,
                    },
                    ObjectPatternProp::Rest(other) => ObjectProp::Spread(strip_defaults(other)),
                })
                .collect(),
        ),
    }
}

/// What a typed parameter's check looks at.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamCheckTarget {
    /// Expression passed to the assert helper.
    pub value: Expr,
    /// Concise source text of the parameter, without its outer default.
    pub label: String,
}

/// Check target of `param`. A rest parameter checks its argument, a
/// defaulted parameter checks its left side.
#[must_use]
pub fn param_check_target(param: &Param) -> ParamCheckTarget {
    let labelled = match &param.pattern {
        Pattern::Rest(inner) => inner.as_ref(),
        Pattern::Assign { left, .. } => left.as_ref(),
        other => other,
    };
    ParamCheckTarget {
        value: strip_defaults(labelled),
        label: Printer::concise_pattern(labelled),
    }
}

/// Body statements of `body`; a concise body becomes `return expr;`.
#[must_use]
pub fn body_statements(body: FunctionBody) -> Vec<Stmt> {
    match body {
        FunctionBody::Block(stmts) => stmts,
        FunctionBody::Expr(expr) => vec![Stmt::ret(Some(*expr))],
    }
}

/// Expression producing the value the original body returns.
///
/// - empty body: `void 0`
/// - arrow: `(() => { body })()`
/// - otherwise: `function () { body }.apply(this, arguments)`
///
/// An async function's inner wrapper stays async, even around an empty
/// body, so the produced value is the promise itself.
#[must_use]
pub fn produced_value(body: Vec<Stmt>, is_arrow: bool, is_async: bool) -> Expr {
    if body.is_empty() && !is_async {
        return Expr::void_0();
    }
    if is_arrow {
        let inner = Function {
            is_async,
            ..Function::arrow(body)
        };
        Expr::call(Expr::function(inner), Vec::new())
    } else {
        let inner = Function {
            is_async,
            ..Function::anonymous(body)
        };
        Expr::call(
            Expr::prop(Expr::function(inner), "apply"),
            vec![Expr::This, Expr::id("arguments")],
        )
    }
}

#[cfg(test)]
#[path = "../tests/assertion.rs"]
mod tests;
