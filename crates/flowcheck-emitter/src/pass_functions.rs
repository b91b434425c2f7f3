//! Functions and classes.
//!
//! A function gets its parameter checks at the top of its body and, with a
//! declared return type, its whole original body wrapped so the produced
//! value is checked before it is returned:
//!
//! ```js
//! function f(x) {
//!   _assert(x, _t.String, "x");
//!   return _assert(function () { ... }.apply(this, arguments), _t.Number, "return value");
//! }
//! ```
//!
//! Wrappers are built after the body has been visited, so a wrapped body is
//! never visited twice.

use super::{PassResult, RuntimeCheckPass};
use crate::assertion::{RETURN_VALUE_LABEL, body_statements, param_check_target, produced_value};
use flowcheck_ast::node::{Class, ClassMember, FunctionBody};
use flowcheck_ast::{Function, Stmt};
use flowcheck_lowering::{Builtin, Combinator, TypeEnvironment};
use tracing::trace;

impl RuntimeCheckPass<'_> {
    /// Visit a function in its own scope under `env` extended with the
    /// function's type parameters.
    pub(super) fn visit_function(
        &mut self,
        func: Function,
        env: &TypeEnvironment,
    ) -> PassResult<Function> {
        let env = env.child(&func.type_params);
        self.scopes.push();
        let result = self.visit_function_in_scope(func, &env);
        self.scopes.pop();
        result
    }

    fn visit_function_in_scope(
        &mut self,
        mut func: Function,
        env: &TypeEnvironment,
    ) -> PassResult<Function> {
        let span = func.span;
        let check = !self.options.skip_asserts;

        let mut prologue = Vec::new();
        let mut params = Vec::with_capacity(func.params.len());
        for mut param in std::mem::take(&mut func.params) {
            self.scopes.record_untyped(&param.pattern);
            // The label shows the parameter as written, before its defaults
            // are visited.
            let target =
                (check && param.annotation.is_some()).then(|| param_check_target(&param));
            param.pattern = self.visit_pattern(param.pattern, env)?;
            if let (Some(annotation), Some(target)) = (param.annotation.take(), target) {
                let value = self.check_value(
                    target.value,
                    &annotation,
                    param.optional,
                    &target.label,
                    env,
                    span,
                )?;
                prologue.push(Stmt::expr(value));
            }
            param.optional = false;
            params.push(param);
        }
        func.params = params;

        let body = match std::mem::replace(&mut func.body, FunctionBody::Block(Vec::new())) {
            FunctionBody::Block(stmts) => {
                self.record_var_scoped(&stmts);
                FunctionBody::Block(self.visit_stmts(stmts, env)?)
            }
            FunctionBody::Expr(expr) => FunctionBody::Expr(self.visit_boxed(expr, env)?),
        };

        func.type_params.clear();
        let return_type = func.return_type.take();
        let return_check = match return_type {
            // A generator's declared type describes its iterator, which the
            // body never returns.
            Some(_) if !check || func.is_generator => None,
            Some(_) if func.is_async => Some(Combinator::Builtin(Builtin::Promise)),
            Some(return_type) => Some(self.lower(&return_type, env, span)?),
            None => None,
        };

        func.body = match return_check {
            Some(combinator) => {
                trace!(
                    "[flowcheck] wrapping return of {}",
                    func.id.as_deref().unwrap_or("<anonymous>")
                );
                let produced =
                    produced_value(body_statements(body), func.is_arrow, func.is_async);
                func.is_async = false;
                let checked = self.assert_expr(produced, &combinator, RETURN_VALUE_LABEL);
                prologue.push(Stmt::ret(Some(checked)));
                FunctionBody::Block(prologue)
            }
            None if prologue.is_empty() => body,
            None => {
                prologue.extend(body_statements(body));
                FunctionBody::Block(prologue)
            }
        };
        Ok(func)
    }

    /// Class type parameters are visible to every member.
    pub(super) fn visit_class(
        &mut self,
        mut class: Class,
        env: &TypeEnvironment,
    ) -> PassResult<Class> {
        let env = env.child(&class.type_params);
        class.type_params.clear();
        if let Some(super_class) = class.super_class.take() {
            class.super_class = Some(self.visit_boxed(super_class, &env)?);
        }

        let mut members = Vec::with_capacity(class.body.len());
        for member in std::mem::take(&mut class.body) {
            members.push(match member {
                ClassMember::Method {
                    key,
                    kind,
                    is_static,
                    function,
                } => ClassMember::Method {
                    key: self.visit_prop_key(key, &env)?,
                    kind,
                    is_static,
                    function: self.visit_function(function, &env)?,
                },
                ClassMember::Property {
                    key,
                    value,
                    is_static,
                    ..
                } => ClassMember::Property {
                    key: self.visit_prop_key(key, &env)?,
                    annotation: None,
                    value: self.visit_opt_expr(value, &env)?,
                    is_static,
                },
            });
        }
        class.body = members;
        Ok(class)
    }
}
