//! Runtime-check insertion pass.
//!
//! Walks a compilation unit once, depth-first, in source order, and rewrites
//! it so every static annotation it can express becomes a runtime check:
//!
//! ```flow
//! type Name = string;
//! function greet(name: Name): string { return "hi " + name; }
//! ```
//!
//! becomes
//!
//! ```js
//! import _t from "tcomb";
//! const Name = _t.String;
//! function greet(name) {
//!   _assert(name, Name, "name");
//!   return _assert(function () {
//!     return "hi " + name;
//!   }.apply(this, arguments), _t.String, "return value");
//! }
//! function _assert(x, type, name) { ... }
//! ```
//!
//! # Structure
//!
//! - Declarations, statements and expressions live here.
//! - Loops, `try` and `switch` live in `pass_control.rs`.
//! - Functions and classes live in `pass_functions.rs`.
//! - Helper synthesis runs last, in [`RuntimeCheckPass::finish_unit`].
//!
//! Type parameters travel in an explicit [`TypeEnvironment`] argument;
//! declared binding types live in a [`ScopeStack`] owned by the pass.

#[path = "pass_control.rs"]
mod pass_control;
#[path = "pass_functions.rs"]
mod pass_functions;

use crate::assertion::{assert_call, is_redundant_check};
use crate::helpers::{assert_helper, extend_helper, library_import};
use crate::options::TransformOptions;
use crate::scope::{ScopeBinding, ScopeStack};
use crate::unit::CompilationUnitState;
use flowcheck_ast::node::{
    AssignTarget, ExportDecl, ImportDecl, ImportKind, ImportSpecifier, InterfaceDecl, MemberProp,
    ObjectPatternProp, ObjectProp, PropKey, TemplateLiteral, TypeAlias, VarDecl, VarKind,
};
use flowcheck_ast::{
    Expr, Pattern, Printer, Program, Stmt, TypeAnnotation, declared_function_names,
    var_scoped_names,
};
use flowcheck_common::diagnostics::diagnostic_codes;
use flowcheck_common::limits::MAX_AST_DEPTH;
use flowcheck_common::{Diagnostic, Span};
use flowcheck_lowering::combinator::type_path_expr;
use flowcheck_lowering::type_env::is_reserved_type_name;
use flowcheck_lowering::{
    Combinator, GenericKind, LoweringError, RecursiveTypeRegistry, TypeEnvironment,
    TypeLowering, classify_generic, lower_extension, lower_type, resolve_leaf_type,
};
use tracing::{debug, trace};

pub type PassResult<T> = Result<T, Diagnostic>;

/// Transform `program` under `options`.
///
/// The first build-time diagnostic aborts the unit.
pub fn transform_program(program: Program, options: &TransformOptions) -> PassResult<Program> {
    RuntimeCheckPass::new(options, &program).run(program)
}

pub struct RuntimeCheckPass<'a> {
    options: &'a TransformOptions,
    file_name: String,
    unit: CompilationUnitState,
    recursive: RecursiveTypeRegistry,
    scopes: ScopeStack,
    /// Current recursion depth for stack overflow protection
    visit_depth: u32,
}

impl<'a> RuntimeCheckPass<'a> {
    /// Create a pass for `program`. Generated identifiers are chosen here,
    /// against every name `program` uses.
    #[must_use]
    pub fn new(options: &'a TransformOptions, program: &Program) -> Self {
        Self {
            options,
            file_name: program.file_name.clone(),
            unit: CompilationUnitState::new(program),
            recursive: RecursiveTypeRegistry::new(),
            scopes: ScopeStack::new(),
            visit_depth: 0,
        }
    }

    pub fn run(mut self, program: Program) -> PassResult<Program> {
        debug!(
            "[flowcheck] transforming {} ({} statements)",
            self.file_name,
            program.body.len()
        );
        let env = TypeEnvironment::new(
            self.options.globals.iter().cloned(),
            self.options.ambient_types.iter().cloned(),
        );
        self.record_var_scoped(&program.body);
        let body = self.visit_stmts(program.body, &env)?;
        let body = self.finish_unit(body);
        Ok(Program {
            file_name: program.file_name,
            body,
        })
    }

    #[must_use]
    pub const fn unit(&self) -> &CompilationUnitState {
        &self.unit
    }

    /// Prepend the library import, then append the recursive defines and the
    /// helpers the unit needs.
    fn finish_unit(&mut self, body: Vec<Stmt>) -> Vec<Stmt> {
        let skip_helpers = self.options.skip_helpers;
        let assert_required = self.unit.has_asserts && !skip_helpers;
        let extend_required = self.unit.has_extend && !skip_helpers;
        let import_required = self.unit.has_types || assert_required || extend_required;
        debug!(
            "[flowcheck] {} import={} assert={} extend={} deferred={}",
            self.file_name,
            import_required,
            assert_required,
            extend_required,
            self.recursive.len()
        );

        let mut out = Vec::with_capacity(body.len() + self.recursive.len() + 3);
        if import_required {
            out.push(library_import(&self.unit, &self.options.runtime_library));
        }
        out.extend(body);
        out.extend(self.recursive.flush(self.unit.names()));
        if assert_required {
            out.push(assert_helper(&self.unit, self.options.warn_on_failure));
        }
        if extend_required {
            out.push(extend_helper(&self.unit));
        }
        out
    }

    // =========================================================================
    // Lowering and assertion helpers
    // =========================================================================

    fn diagnostic(&self, err: &LoweringError, span: Span) -> Diagnostic {
        err.to_diagnostic(&self.file_name, span)
    }

    fn lower(
        &self,
        annotation: &TypeAnnotation,
        env: &TypeEnvironment,
        span: Span,
    ) -> PassResult<Combinator> {
        lower_type(annotation, env, None).map_err(|err| self.diagnostic(&err, span))
    }

    /// `_assert(value, combinator, "label")`; marks the unit as needing the
    /// assert helper.
    fn assert_expr(&mut self, value: Expr, combinator: &Combinator, label: &str) -> Expr {
        self.unit.has_asserts = true;
        assert_call(
            self.unit.assert_id(),
            value,
            combinator.to_expr(self.unit.names()),
            label,
        )
    }

    /// Check `value` against `annotation` unless the check is redundant.
    fn check_value(
        &mut self,
        value: Expr,
        annotation: &TypeAnnotation,
        optional: bool,
        label: &str,
        env: &TypeEnvironment,
        span: Span,
    ) -> PassResult<Expr> {
        if is_redundant_check(&value, annotation) {
            trace!("[flowcheck] literal check elided for {}", label);
            return Ok(value);
        }
        let mut combinator = self.lower(annotation, env, span)?;
        if optional {
            combinator = combinator.maybe();
        }
        Ok(self.assert_expr(value, &combinator, label))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// `var` names of a function body (or the unit) are bound from its
    /// first statement on, so they shadow outer typed bindings throughout.
    fn record_var_scoped(&mut self, stmts: &[Stmt]) {
        for name in var_scoped_names(stmts) {
            self.scopes.record(name, ScopeBinding::Untyped);
        }
    }

    /// Visit a statement list.
    ///
    /// Function and class declarations are recorded before the first
    /// statement. Below the top level, recursive types declared in the list
    /// are defined right after its last type declaration; top-level ones
    /// wait for [`RuntimeCheckPass::finish_unit`].
    fn visit_stmts(&mut self, stmts: Vec<Stmt>, env: &TypeEnvironment) -> PassResult<Vec<Stmt>> {
        for name in declared_function_names(&stmts) {
            self.scopes.record(name, ScopeBinding::Untyped);
        }
        let deferred_from = self.recursive.len();
        let mut defines_at = None;
        let mut out = Vec::with_capacity(stmts.len());
        for stmt in stmts {
            let pending = self.recursive.len();
            if let Some(stmt) = self.visit_stmt(stmt, env)? {
                out.push(stmt);
            }
            if self.recursive.len() > pending {
                defines_at = Some(out.len());
            }
        }
        if let Some(at) = defines_at.filter(|_| !self.scopes.at_top_level()) {
            let defines = self.recursive.flush_since(deferred_from, self.unit.names());
            trace!("[flowcheck] {} nested recursive defines", defines.len());
            let rest = out.split_off(at);
            out.extend(defines);
            out.extend(rest);
        }
        Ok(out)
    }

    /// Visit `stmts` in a fresh block scope.
    fn visit_block(&mut self, stmts: Vec<Stmt>, env: &TypeEnvironment) -> PassResult<Vec<Stmt>> {
        self.scopes.push();
        let result = self.visit_stmts(stmts, env);
        self.scopes.pop();
        result
    }

    /// Visit a statement. `None` means the statement only carried types and
    /// is dropped from the output.
    fn visit_stmt(&mut self, stmt: Stmt, env: &TypeEnvironment) -> PassResult<Option<Stmt>> {
        if self.visit_depth >= MAX_AST_DEPTH {
            debug!("[flowcheck] depth limit reached, statement left as is");
            return Ok(Some(stmt));
        }
        self.visit_depth += 1;
        let result = self.visit_stmt_inner(stmt, env);
        self.visit_depth -= 1;
        result
    }

    fn visit_stmt_inner(&mut self, stmt: Stmt, env: &TypeEnvironment) -> PassResult<Option<Stmt>> {
        let stmt = match stmt {
            Stmt::Expr(expr) => Stmt::Expr(self.visit_expr(expr, env)?),
            Stmt::VarDecl(decl) => Stmt::VarDecl(self.visit_var_decl(decl, env)?),
            Stmt::Function(func) => Stmt::Function(self.visit_function(func, env)?),
            Stmt::Class(class) => Stmt::Class(self.visit_class(class, env)?),
            Stmt::Return(arg) => Stmt::Return(self.visit_opt_expr(arg, env)?),
            Stmt::If {
                test,
                consequent,
                alternate,
            } => Stmt::If {
                test: self.visit_expr(test, env)?,
                consequent: Box::new(self.visit_branch(*consequent, env)?),
                alternate: match alternate {
                    Some(alternate) => Some(Box::new(self.visit_branch(*alternate, env)?)),
                    None => None,
                },
            },
            Stmt::Block(stmts) => Stmt::Block(self.visit_block(stmts, env)?),
            Stmt::Throw(expr) => Stmt::Throw(self.visit_expr(expr, env)?),
            Stmt::For {
                init,
                test,
                update,
                body,
            } => self.visit_for(init, test, update, *body, env)?,
            Stmt::ForIn { left, right, body } => {
                let (left, right, body) = self.visit_for_each(left, right, *body, env)?;
                Stmt::ForIn {
                    left,
                    right,
                    body: Box::new(body),
                }
            }
            Stmt::ForOf {
                left,
                right,
                body,
                is_await,
            } => {
                let (left, right, body) = self.visit_for_each(left, right, *body, env)?;
                Stmt::ForOf {
                    left,
                    right,
                    body: Box::new(body),
                    is_await,
                }
            }
            Stmt::While { test, body } => Stmt::While {
                test: self.visit_expr(test, env)?,
                body: Box::new(self.visit_branch(*body, env)?),
            },
            Stmt::DoWhile { body, test } => Stmt::DoWhile {
                body: Box::new(self.visit_branch(*body, env)?),
                test: self.visit_expr(test, env)?,
            },
            Stmt::Try {
                block,
                handler,
                finalizer,
            } => self.visit_try(block, handler, finalizer, env)?,
            Stmt::Switch {
                discriminant,
                cases,
            } => self.visit_switch(discriminant, cases, env)?,
            Stmt::Labeled { label, body } => Stmt::Labeled {
                label,
                body: Box::new(self.visit_branch(*body, env)?),
            },
            jump @ (Stmt::Break(_) | Stmt::Continue(_) | Stmt::Empty) => jump,
            Stmt::TypeAlias(alias) => self.visit_type_alias(alias, env)?,
            Stmt::Interface(decl) => self.visit_interface(decl, env)?,
            Stmt::Import(import) => return Ok(Self::visit_import(import).map(Stmt::Import)),
            Stmt::Export(export) => return self.visit_export(export, env),
            Stmt::ExportDefault(expr) => Stmt::ExportDefault(self.visit_expr(expr, env)?),
        };
        Ok(Some(stmt))
    }

    /// Branch and loop bodies always produce a statement.
    fn visit_branch(&mut self, stmt: Stmt, env: &TypeEnvironment) -> PassResult<Stmt> {
        Ok(self
            .visit_stmt(stmt, env)?
            .unwrap_or_else(|| Stmt::Block(Vec::new())))
    }

    /// `let`/`const` declarators with an annotation are recorded and their
    /// initializer checked. `var` is never checked.
    fn visit_var_decl(&mut self, mut decl: VarDecl, env: &TypeEnvironment) -> PassResult<VarDecl> {
        let checked = decl.kind != VarKind::Var && !self.options.skip_asserts;
        for declarator in &mut decl.declarations {
            let init = self.visit_opt_expr(declarator.init.take(), env)?;
            let id = std::mem::replace(&mut declarator.id, Pattern::Ident(String::new()));
            let label = Printer::concise_pattern(&id);
            declarator.id = self.visit_pattern(id, env)?;

            let annotation = match (declarator.annotation.take(), checked) {
                (Some(annotation), true) => annotation,
                _ => {
                    self.scopes.record_untyped(&declarator.id);
                    declarator.init = init;
                    continue;
                }
            };
            self.scopes.record_typed(&declarator.id, &annotation);
            declarator.init = match init {
                Some(init) => {
                    let span = if declarator.span.is_dummy() {
                        decl.span
                    } else {
                        declarator.span
                    };
                    Some(self.check_value(init, &annotation, false, &label, env, span)?)
                }
                None => None,
            };
        }
        Ok(decl)
    }

    fn check_reserved(&self, name: &str, span: Span) -> PassResult<()> {
        if is_reserved_type_name(name) {
            return Err(Diagnostic::from_code(
                &self.file_name,
                span.start,
                span.len(),
                diagnostic_codes::RESERVED_TYPE_NAME,
                &[name],
            ));
        }
        Ok(())
    }

    /// `type Name = T` becomes `const Name = <T>`; a recursive alias is
    /// declared now and defined once its statement list has been visited.
    fn visit_type_alias(&mut self, alias: TypeAlias, env: &TypeEnvironment) -> PassResult<Stmt> {
        self.check_reserved(&alias.id, alias.span)?;
        self.unit.has_types = true;
        let env = env.child(&alias.type_params);
        debug!(
            "[flowcheck] type {} (recursive: {})",
            alias.id, alias.recursive
        );

        if alias.recursive {
            let lowered = lower_type(&alias.right, &env, None)
                .map_err(|err| self.diagnostic(&err, alias.span))?;
            self.recursive.push(alias.id.clone(), lowered, alias.span);
            return Ok(RecursiveTypeRegistry::declare(
                &alias.id,
                self.unit.names(),
                alias.span,
            ));
        }
        let lowered = lower_type(&alias.right, &env, Some(alias.id.as_str()))
            .map_err(|err| self.diagnostic(&err, alias.span))?;
        Ok(Stmt::const_decl(
            alias.id,
            lowered.to_expr(self.unit.names()),
            alias.span,
        ))
    }

    /// `interface Name { ... }` becomes `const Name = _t.interface(...)`, or
    /// an extend call when it has parents.
    fn visit_interface(&mut self, decl: InterfaceDecl, env: &TypeEnvironment) -> PassResult<Stmt> {
        self.check_reserved(&decl.id, decl.span)?;
        self.unit.has_types = true;
        let env = env.child(&decl.type_params);
        let name = (!decl.recursive).then_some(decl.id.as_str());
        debug!(
            "[flowcheck] interface {} ({} parents, recursive: {})",
            decl.id,
            decl.extends.len(),
            decl.recursive
        );

        let mut lowering = TypeLowering::new(&env);
        let lowered = if decl.extends.is_empty() {
            lowering.lower_object(&decl.body, name, decl.body.exact)
        } else {
            self.unit.has_extend = true;
            lower_extension(&mut lowering, &decl.extends, &decl.body, name)
        }
        .map_err(|err| self.diagnostic(&err, decl.span))?;

        if decl.recursive {
            self.recursive.push(decl.id.clone(), lowered, decl.span);
            return Ok(RecursiveTypeRegistry::declare(
                &decl.id,
                self.unit.names(),
                decl.span,
            ));
        }
        Ok(Stmt::const_decl(
            decl.id,
            lowered.to_expr(self.unit.names()),
            decl.span,
        ))
    }

    /// Type imports become value imports (types are values after the
    /// transform). `typeof` imports have no runtime counterpart and are
    /// dropped.
    fn visit_import(mut import: ImportDecl) -> Option<ImportDecl> {
        if import.import_kind == ImportKind::Typeof {
            return None;
        }
        import.import_kind = ImportKind::Value;
        let had_specifiers = !import.specifiers.is_empty();
        import.specifiers.retain(|specifier| {
            !matches!(
                specifier,
                ImportSpecifier::Named {
                    import_kind: Some(ImportKind::Typeof),
                    ..
                }
            )
        });
        if had_specifiers && import.specifiers.is_empty() {
            return None;
        }
        for specifier in &mut import.specifiers {
            if let ImportSpecifier::Named { import_kind, .. } = specifier {
                *import_kind = None;
            }
        }
        Some(import)
    }

    fn visit_export(
        &mut self,
        mut export: ExportDecl,
        env: &TypeEnvironment,
    ) -> PassResult<Option<Stmt>> {
        export.export_kind = ImportKind::Value;
        if let Some(declaration) = export.declaration.take() {
            match self.visit_stmt(*declaration, env)? {
                Some(declaration) => export.declaration = Some(Box::new(declaration)),
                None => return Ok(None),
            }
        }
        Ok(Some(Stmt::Export(export)))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn visit_opt_expr(
        &mut self,
        expr: Option<Expr>,
        env: &TypeEnvironment,
    ) -> PassResult<Option<Expr>> {
        expr.map(|expr| self.visit_expr(expr, env)).transpose()
    }

    fn visit_exprs(&mut self, exprs: Vec<Expr>, env: &TypeEnvironment) -> PassResult<Vec<Expr>> {
        exprs
            .into_iter()
            .map(|expr| self.visit_expr(expr, env))
            .collect()
    }

    fn visit_boxed(&mut self, expr: Box<Expr>, env: &TypeEnvironment) -> PassResult<Box<Expr>> {
        Ok(Box::new(self.visit_expr(*expr, env)?))
    }

    fn visit_expr(&mut self, expr: Expr, env: &TypeEnvironment) -> PassResult<Expr> {
        if self.visit_depth >= MAX_AST_DEPTH {
            debug!("[flowcheck] depth limit reached, expression left as is");
            return Ok(expr);
        }
        self.visit_depth += 1;
        let result = self.visit_expr_inner(expr, env);
        self.visit_depth -= 1;
        result
    }

    fn visit_expr_inner(&mut self, expr: Expr, env: &TypeEnvironment) -> PassResult<Expr> {
        let expr = match expr {
            leaf @ (Expr::Ident(_)
            | Expr::This
            | Expr::Super
            | Expr::Null
            | Expr::Bool(_)
            | Expr::Num(_)
            | Expr::Str(_)
            | Expr::Regex { .. }) => leaf,
            Expr::Template(template) => Expr::Template(self.visit_template(template, env)?),
            Expr::TaggedTemplate { tag, quasi } => Expr::TaggedTemplate {
                tag: self.visit_boxed(tag, env)?,
                quasi: self.visit_template(quasi, env)?,
            },
            Expr::Array(elements) => Expr::Array(
                elements
                    .into_iter()
                    .map(|element| self.visit_opt_expr(element, env))
                    .collect::<PassResult<_>>()?,
            ),
            Expr::Object(props) => Expr::Object(
                props
                    .into_iter()
                    .map(|prop| self.visit_object_prop(prop, env))
                    .collect::<PassResult<_>>()?,
            ),
            Expr::Function(func) => Expr::function(self.visit_function(*func, env)?),
            Expr::Class(class) => Expr::Class(Box::new(self.visit_class(*class, env)?)),
            Expr::Member { object, property } => Expr::Member {
                object: self.visit_boxed(object, env)?,
                property: match property {
                    MemberProp::Computed(index) => {
                        MemberProp::Computed(self.visit_boxed(index, env)?)
                    }
                    ident @ MemberProp::Ident(_) => ident,
                },
            },
            Expr::Call { callee, args } => Expr::Call {
                callee: self.visit_boxed(callee, env)?,
                args: self.visit_exprs(args, env)?,
            },
            Expr::New { callee, args } => Expr::New {
                callee: self.visit_boxed(callee, env)?,
                args: self.visit_exprs(args, env)?,
            },
            Expr::Unary { operator, argument } => Expr::Unary {
                operator,
                argument: self.visit_boxed(argument, env)?,
            },
            // `x++` is never checked, like compound assignment.
            Expr::Update {
                operator,
                prefix,
                argument,
            } => Expr::Update {
                operator,
                prefix,
                argument: self.visit_boxed(argument, env)?,
            },
            Expr::Binary {
                operator,
                left,
                right,
            } => Expr::Binary {
                operator,
                left: self.visit_boxed(left, env)?,
                right: self.visit_boxed(right, env)?,
            },
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => Expr::Conditional {
                test: self.visit_boxed(test, env)?,
                consequent: self.visit_boxed(consequent, env)?,
                alternate: self.visit_boxed(alternate, env)?,
            },
            Expr::Assign {
                operator,
                target,
                value,
                span,
            } => self.visit_assignment(operator, target, *value, span, env)?,
            Expr::Seq(exprs) => Expr::Seq(self.visit_exprs(exprs, env)?),
            Expr::Spread(arg) => Expr::Spread(self.visit_boxed(arg, env)?),
            Expr::Await(arg) => Expr::Await(self.visit_boxed(arg, env)?),
            Expr::Yield { argument, delegate } => Expr::Yield {
                argument: argument
                    .map(|argument| self.visit_boxed(argument, env))
                    .transpose()?,
                delegate,
            },
            Expr::Paren(inner) => Expr::Paren(self.visit_boxed(inner, env)?),
            Expr::TypeCast {
                expr,
                annotation,
                optional,
                span,
            } => self.visit_cast(*expr, &annotation, optional, span, env)?,
        };
        Ok(expr)
    }

    fn visit_template(
        &mut self,
        template: TemplateLiteral,
        env: &TypeEnvironment,
    ) -> PassResult<TemplateLiteral> {
        Ok(TemplateLiteral {
            quasis: template.quasis,
            exprs: self.visit_exprs(template.exprs, env)?,
        })
    }

    fn visit_object_prop(&mut self, prop: ObjectProp, env: &TypeEnvironment) -> PassResult<ObjectProp> {
        Ok(match prop {
            ObjectProp::KeyValue {
                key,
                value,
                shorthand,
            } => ObjectProp::KeyValue {
                key: self.visit_prop_key(key, env)?,
                value: self.visit_expr(value, env)?,
                shorthand,
            },
            ObjectProp::Method { key, function } => ObjectProp::Method {
                key: self.visit_prop_key(key, env)?,
                function: self.visit_function(function, env)?,
            },
            ObjectProp::Spread(arg) => ObjectProp::Spread(self.visit_expr(arg, env)?),
        })
    }

    fn visit_prop_key(&mut self, key: PropKey, env: &TypeEnvironment) -> PassResult<PropKey> {
        Ok(match key {
            PropKey::Computed(expr) => PropKey::Computed(self.visit_boxed(expr, env)?),
            other => other,
        })
    }

    /// Visit the expressions inside a pattern (defaults, computed keys).
    fn visit_pattern(&mut self, pattern: Pattern, env: &TypeEnvironment) -> PassResult<Pattern> {
        Ok(match pattern {
            Pattern::Ident(_) => pattern,
            Pattern::Object(props) => Pattern::Object(
                props
                    .into_iter()
                    .map(|prop| -> PassResult<ObjectPatternProp> {
                        Ok(match prop {
                            ObjectPatternProp::KeyValue {
                                key,
                                value,
                                shorthand,
                            } => ObjectPatternProp::KeyValue {
                                key: self.visit_prop_key(key, env)?,
                                value: self.visit_pattern(value, env)?,
                                shorthand,
                            },
                            ObjectPatternProp::Rest(rest) => {
                                ObjectPatternProp::Rest(self.visit_pattern(rest, env)?)
                            }
                        })
                    })
                    .collect::<PassResult<_>>()?,
            ),
            Pattern::Array(elements) => Pattern::Array(
                elements
                    .into_iter()
                    .map(|element| {
                        element
                            .map(|element| self.visit_pattern(element, env))
                            .transpose()
                    })
                    .collect::<PassResult<_>>()?,
            ),
            Pattern::Assign { left, right } => Pattern::Assign {
                left: Box::new(self.visit_pattern(*left, env)?),
                right: self.visit_boxed(right, env)?,
            },
            Pattern::Rest(inner) => Pattern::Rest(Box::new(self.visit_pattern(*inner, env)?)),
        })
    }

    /// `name = value` where `name` has a recorded declared type is checked
    /// against the leaf type found through the declaring pattern.
    fn visit_assignment(
        &mut self,
        operator: String,
        target: AssignTarget,
        value: Expr,
        span: Span,
        env: &TypeEnvironment,
    ) -> PassResult<Expr> {
        let value = self.visit_expr(value, env)?;
        let target = match target {
            AssignTarget::Pattern(pattern) => AssignTarget::Pattern(self.visit_pattern(pattern, env)?),
            AssignTarget::Expr(expr) => AssignTarget::Expr(self.visit_boxed(expr, env)?),
        };
        let value = match &target {
            AssignTarget::Pattern(Pattern::Ident(name))
                if operator == "=" && !self.options.skip_asserts =>
            {
                self.check_reassignment(name, value, env, span)?
            }
            _ => value,
        };
        Ok(Expr::Assign {
            operator,
            target,
            value: Box::new(value),
            span,
        })
    }

    fn check_reassignment(
        &mut self,
        name: &str,
        value: Expr,
        env: &TypeEnvironment,
        span: Span,
    ) -> PassResult<Expr> {
        let Some(binding) = self.scopes.lookup(name) else {
            return Ok(value);
        };
        let Some(leaf) = resolve_leaf_type(&binding.pattern, &binding.annotation, name) else {
            trace!("[flowcheck] no declared type found for {} in its pattern", name);
            return Ok(value);
        };
        if is_redundant_check(&value, leaf) {
            return Ok(value);
        }
        let combinator = self.lower(leaf, env, span)?;
        if combinator.is_any() {
            return Ok(value);
        }
        Ok(self.assert_expr(value, &combinator, name))
    }

    /// `(expr: $Reify<T>)` becomes `T`; any other cast becomes an assertion
    /// labelled with the text of `expr`.
    fn visit_cast(
        &mut self,
        expr: Expr,
        annotation: &TypeAnnotation,
        optional: bool,
        span: Span,
        env: &TypeEnvironment,
    ) -> PassResult<Expr> {
        if let TypeAnnotation::Generic(generic) = annotation {
            let kind = classify_generic(generic, env).map_err(|err| self.diagnostic(&err, span))?;
            if let GenericKind::Reify { target } = kind {
                debug!("[flowcheck] reified {}", target);
                return Ok(type_path_expr(&target));
            }
        }
        let label = Printer::concise_expr(&expr);
        let inner = self.visit_expr(expr, env)?;
        if self.options.skip_asserts {
            return Ok(inner);
        }
        self.check_value(inner, annotation, optional, &label, env, span)
    }
}

#[cfg(test)]
#[path = "../tests/pass.rs"]
mod tests;
