//! Loops, `try` and `switch`.
//!
//! A `for` head, a `catch` clause and a `switch` body each open their own
//! scope. A typed `for (let i: number = 0; ...)` head is checked like any
//! declaration and stays visible to the loop only; a catch parameter is
//! recorded untyped so it shadows outer typed bindings.

use super::{PassResult, RuntimeCheckPass};
use flowcheck_ast::node::{AssignTarget, CatchClause, ForHead, ForInit, SwitchCase};
use flowcheck_ast::{Expr, Stmt};
use flowcheck_lowering::TypeEnvironment;

impl RuntimeCheckPass<'_> {
    fn in_scope<T>(
        &mut self,
        visit: impl FnOnce(&mut Self) -> PassResult<T>,
    ) -> PassResult<T> {
        self.scopes.push();
        let result = visit(self);
        self.scopes.pop();
        result
    }

    pub(super) fn visit_for(
        &mut self,
        init: Option<ForInit>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Stmt,
        env: &TypeEnvironment,
    ) -> PassResult<Stmt> {
        self.in_scope(|pass| {
            let init = match init {
                Some(ForInit::VarDecl(decl)) => {
                    Some(ForInit::VarDecl(pass.visit_var_decl(decl, env)?))
                }
                Some(ForInit::Expr(expr)) => Some(ForInit::Expr(pass.visit_expr(expr, env)?)),
                None => None,
            };
            Ok(Stmt::For {
                init,
                test: pass.visit_opt_expr(test, env)?,
                update: pass.visit_opt_expr(update, env)?,
                body: Box::new(pass.visit_branch(body, env)?),
            })
        })
    }

    /// Shared by `for-in` and `for-of`. The iterated expression is visited
    /// outside the head's scope.
    pub(super) fn visit_for_each(
        &mut self,
        left: ForHead,
        right: Expr,
        body: Stmt,
        env: &TypeEnvironment,
    ) -> PassResult<(ForHead, Expr, Stmt)> {
        let right = self.visit_expr(right, env)?;
        self.in_scope(|pass| {
            let left = match left {
                ForHead::VarDecl(decl) => ForHead::VarDecl(pass.visit_var_decl(decl, env)?),
                ForHead::Target(AssignTarget::Pattern(pattern)) => {
                    ForHead::Target(AssignTarget::Pattern(pass.visit_pattern(pattern, env)?))
                }
                ForHead::Target(AssignTarget::Expr(target)) => {
                    ForHead::Target(AssignTarget::Expr(pass.visit_boxed(target, env)?))
                }
            };
            let body = pass.visit_branch(body, env)?;
            Ok((left, right, body))
        })
    }

    pub(super) fn visit_try(
        &mut self,
        block: Vec<Stmt>,
        handler: Option<CatchClause>,
        finalizer: Option<Vec<Stmt>>,
        env: &TypeEnvironment,
    ) -> PassResult<Stmt> {
        let block = self.visit_block(block, env)?;
        let handler = match handler {
            Some(handler) => Some(self.visit_catch(handler, env)?),
            None => None,
        };
        let finalizer = finalizer
            .map(|finalizer| self.visit_block(finalizer, env))
            .transpose()?;
        Ok(Stmt::Try {
            block,
            handler,
            finalizer,
        })
    }

    fn visit_catch(
        &mut self,
        handler: CatchClause,
        env: &TypeEnvironment,
    ) -> PassResult<CatchClause> {
        self.in_scope(|pass| {
            let param = match handler.param {
                Some(param) => {
                    pass.scopes.record_untyped(&param);
                    Some(pass.visit_pattern(param, env)?)
                }
                None => None,
            };
            Ok(CatchClause {
                param,
                body: pass.visit_stmts(handler.body, env)?,
            })
        })
    }

    /// All cases share the one block scope of the `switch` body.
    pub(super) fn visit_switch(
        &mut self,
        discriminant: Expr,
        cases: Vec<SwitchCase>,
        env: &TypeEnvironment,
    ) -> PassResult<Stmt> {
        let discriminant = self.visit_expr(discriminant, env)?;
        self.in_scope(|pass| {
            let cases = cases
                .into_iter()
                .map(|case| {
                    Ok(SwitchCase {
                        test: pass.visit_opt_expr(case.test, env)?,
                        consequent: pass.visit_stmts(case.consequent, env)?,
                    })
                })
                .collect::<PassResult<_>>()?;
            Ok(Stmt::Switch {
                discriminant,
                cases,
            })
        })
    }
}
