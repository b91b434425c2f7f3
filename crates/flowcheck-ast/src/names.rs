//! Name collection.
//!
//! [`collect_names`] gathers every name a unit mentions, used to pick
//! generated identifiers that cannot collide with user code. The walk is
//! over-inclusive: bindings, references, type names and import locals all
//! count as taken.
//!
//! [`var_scoped_names`] and [`declared_function_names`] list the names a
//! statement list declares before any of its statements run.

use crate::node::{
    AssignTarget, Class, ClassMember, Expr, ForHead, ForInit, Function, FunctionBody,
    ImportSpecifier, ObjectPatternProp, ObjectProp, Pattern, Program, PropKey, Stmt,
    TemplateLiteral, VarDecl, VarKind,
};
use crate::types::{GenericRef, TypeAnnotation};
use rustc_hash::FxHashSet;

/// Every identifier-like name that appears in `program`.
#[must_use]
pub fn collect_names(program: &Program) -> FxHashSet<String> {
    let mut collector = NameCollector::default();
    for stmt in &program.body {
        collector.stmt(stmt);
    }
    collector.names
}

/// Names bound by `var` anywhere in `stmts`, nested blocks and loop heads
/// included. Nested functions and classes are not entered.
#[must_use]
pub fn var_scoped_names(stmts: &[Stmt]) -> Vec<&str> {
    let mut names = Vec::new();
    for stmt in stmts {
        collect_var_names(stmt, &mut names);
    }
    names
}

fn collect_var_decl<'a>(decl: &'a VarDecl, names: &mut Vec<&'a str>) {
    if decl.kind == VarKind::Var {
        for declarator in &decl.declarations {
            names.extend(declarator.id.bound_names());
        }
    }
}

fn collect_var_names<'a>(stmt: &'a Stmt, names: &mut Vec<&'a str>) {
    match stmt {
        Stmt::VarDecl(decl) => collect_var_decl(decl, names),
        Stmt::If {
            consequent,
            alternate,
            ..
        } => {
            collect_var_names(consequent, names);
            if let Some(alternate) = alternate {
                collect_var_names(alternate, names);
            }
        }
        Stmt::Block(stmts) => {
            for stmt in stmts {
                collect_var_names(stmt, names);
            }
        }
        Stmt::For { init, body, .. } => {
            if let Some(ForInit::VarDecl(decl)) = init {
                collect_var_decl(decl, names);
            }
            collect_var_names(body, names);
        }
        Stmt::ForIn { left, body, .. } | Stmt::ForOf { left, body, .. } => {
            if let ForHead::VarDecl(decl) = left {
                collect_var_decl(decl, names);
            }
            collect_var_names(body, names);
        }
        Stmt::While { body, .. } | Stmt::DoWhile { body, .. } | Stmt::Labeled { body, .. } => {
            collect_var_names(body, names);
        }
        Stmt::Try {
            block,
            handler,
            finalizer,
        } => {
            let handler = handler.iter().flat_map(|handler| &handler.body);
            for stmt in block.iter().chain(handler).chain(finalizer.iter().flatten()) {
                collect_var_names(stmt, names);
            }
        }
        Stmt::Switch { cases, .. } => {
            for stmt in cases.iter().flat_map(|case| &case.consequent) {
                collect_var_names(stmt, names);
            }
        }
        Stmt::Export(export) => {
            if let Some(declaration) = &export.declaration {
                collect_var_names(declaration, names);
            }
        }
        Stmt::Expr(_)
        | Stmt::Function(_)
        | Stmt::Class(_)
        | Stmt::Return(_)
        | Stmt::Throw(_)
        | Stmt::Break(_)
        | Stmt::Continue(_)
        | Stmt::Empty
        | Stmt::TypeAlias(_)
        | Stmt::Interface(_)
        | Stmt::Import(_)
        | Stmt::ExportDefault(_) => {}
    }
}

/// Function and class declaration names of `stmts` itself, exported ones
/// included. These are bound from the start of the list.
#[must_use]
pub fn declared_function_names(stmts: &[Stmt]) -> Vec<&str> {
    stmts
        .iter()
        .filter_map(|stmt| {
            let stmt = match stmt {
                Stmt::Export(export) => export.declaration.as_deref()?,
                other => other,
            };
            match stmt {
                Stmt::Function(func) => func.id.as_deref(),
                Stmt::Class(class) => class.id.as_deref(),
                _ => None,
            }
        })
        .collect()
}

#[derive(Default)]
struct NameCollector {
    names: FxHashSet<String>,
}

impl NameCollector {
    fn add(&mut self, name: &str) {
        if !self.names.contains(name) {
            self.names.insert(name.to_string());
        }
    }

    fn stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr) | Stmt::Throw(expr) | Stmt::ExportDefault(expr) => self.expr(expr),
            Stmt::VarDecl(decl) => self.var_decl(decl),
            Stmt::Function(func) => self.function(func),
            Stmt::Class(class) => self.class(class),
            Stmt::Return(arg) => {
                if let Some(arg) = arg {
                    self.expr(arg);
                }
            }
            Stmt::If {
                test,
                consequent,
                alternate,
            } => {
                self.expr(test);
                self.stmt(consequent);
                if let Some(alternate) = alternate {
                    self.stmt(alternate);
                }
            }
            Stmt::Block(stmts) => self.stmts(stmts),
            Stmt::For {
                init,
                test,
                update,
                body,
            } => {
                match init {
                    Some(ForInit::VarDecl(decl)) => self.var_decl(decl),
                    Some(ForInit::Expr(expr)) => self.expr(expr),
                    None => {}
                }
                for expr in test.iter().chain(update) {
                    self.expr(expr);
                }
                self.stmt(body);
            }
            Stmt::ForIn { left, right, body } | Stmt::ForOf {
                left, right, body, ..
            } => {
                match left {
                    ForHead::VarDecl(decl) => self.var_decl(decl),
                    ForHead::Target(target) => self.assign_target(target),
                }
                self.expr(right);
                self.stmt(body);
            }
            Stmt::While { test, body } | Stmt::DoWhile { body, test } => {
                self.expr(test);
                self.stmt(body);
            }
            Stmt::Try {
                block,
                handler,
                finalizer,
            } => {
                self.stmts(block);
                if let Some(handler) = handler {
                    if let Some(param) = &handler.param {
                        self.pattern(param);
                    }
                    self.stmts(&handler.body);
                }
                if let Some(finalizer) = finalizer {
                    self.stmts(finalizer);
                }
            }
            Stmt::Switch {
                discriminant,
                cases,
            } => {
                self.expr(discriminant);
                for case in cases {
                    if let Some(test) = &case.test {
                        self.expr(test);
                    }
                    self.stmts(&case.consequent);
                }
            }
            Stmt::Break(label) | Stmt::Continue(label) => {
                if let Some(label) = label {
                    self.add(label);
                }
            }
            Stmt::Labeled { label, body } => {
                self.add(label);
                self.stmt(body);
            }
            Stmt::Empty => {}
            Stmt::TypeAlias(alias) => {
                self.add(&alias.id);
                self.annotation(&alias.right);
            }
            Stmt::Interface(decl) => {
                self.add(&decl.id);
                for parent in &decl.extends {
                    self.generic(parent);
                }
                for prop in &decl.body.properties {
                    self.annotation(&prop.value);
                }
            }
            Stmt::Import(import) => {
                for specifier in &import.specifiers {
                    match specifier {
                        ImportSpecifier::Default { local }
                        | ImportSpecifier::Namespace { local }
                        | ImportSpecifier::Named { local, .. } => self.add(local),
                    }
                }
            }
            Stmt::Export(export) => {
                if let Some(declaration) = &export.declaration {
                    self.stmt(declaration);
                }
                for specifier in &export.specifiers {
                    self.add(&specifier.local);
                }
            }
        }
    }

    fn var_decl(&mut self, decl: &VarDecl) {
        for declarator in &decl.declarations {
            self.pattern(&declarator.id);
            if let Some(annotation) = &declarator.annotation {
                self.annotation(annotation);
            }
            if let Some(init) = &declarator.init {
                self.expr(init);
            }
        }
    }

    fn assign_target(&mut self, target: &AssignTarget) {
        match target {
            AssignTarget::Pattern(pattern) => self.pattern(pattern),
            AssignTarget::Expr(target) => self.expr(target),
        }
    }

    fn template(&mut self, template: &TemplateLiteral) {
        for expr in &template.exprs {
            self.expr(expr);
        }
    }

    fn function(&mut self, func: &Function) {
        if let Some(id) = &func.id {
            self.add(id);
        }
        for param in &func.params {
            self.pattern(&param.pattern);
            if let Some(annotation) = &param.annotation {
                self.annotation(annotation);
            }
        }
        if let Some(return_type) = &func.return_type {
            self.annotation(return_type);
        }
        match &func.body {
            FunctionBody::Block(stmts) => self.stmts(stmts),
            FunctionBody::Expr(expr) => self.expr(expr),
        }
    }

    fn class(&mut self, class: &Class) {
        if let Some(id) = &class.id {
            self.add(id);
        }
        if let Some(super_class) = &class.super_class {
            self.expr(super_class);
        }
        for member in &class.body {
            match member {
                ClassMember::Method { key, function, .. } => {
                    self.prop_key(key);
                    self.function(function);
                }
                ClassMember::Property { key, value, .. } => {
                    self.prop_key(key);
                    if let Some(value) = value {
                        self.expr(value);
                    }
                }
            }
        }
    }

    fn prop_key(&mut self, key: &PropKey) {
        if let PropKey::Computed(expr) = key {
            self.expr(expr);
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(name) => self.add(name),
            Expr::This
            | Expr::Super
            | Expr::Null
            | Expr::Bool(_)
            | Expr::Num(_)
            | Expr::Str(_)
            | Expr::Regex { .. } => {}
            Expr::Template(template) => self.template(template),
            Expr::TaggedTemplate { tag, quasi } => {
                self.expr(tag);
                self.template(quasi);
            }
            Expr::Array(elements) => {
                for element in elements.iter().flatten() {
                    self.expr(element);
                }
            }
            Expr::Object(props) => {
                for prop in props {
                    match prop {
                        ObjectProp::KeyValue { key, value, .. } => {
                            self.prop_key(key);
                            self.expr(value);
                        }
                        ObjectProp::Method { key, function } => {
                            self.prop_key(key);
                            self.function(function);
                        }
                        ObjectProp::Spread(arg) => self.expr(arg),
                    }
                }
            }
            Expr::Function(func) => self.function(func),
            Expr::Class(class) => self.class(class),
            Expr::Member { object, .. } => self.expr(object),
            Expr::Call { callee, args } | Expr::New { callee, args } => {
                self.expr(callee);
                for arg in args {
                    self.expr(arg);
                }
            }
            Expr::Unary { argument, .. } | Expr::Update { argument, .. } => self.expr(argument),
            Expr::Yield { argument, .. } => {
                if let Some(argument) = argument {
                    self.expr(argument);
                }
            }
            Expr::Binary { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.expr(test);
                self.expr(consequent);
                self.expr(alternate);
            }
            Expr::Assign { target, value, .. } => {
                self.assign_target(target);
                self.expr(value);
            }
            Expr::Seq(exprs) => {
                for e in exprs {
                    self.expr(e);
                }
            }
            Expr::Spread(inner) | Expr::Await(inner) | Expr::Paren(inner) => self.expr(inner),
            Expr::TypeCast {
                expr, annotation, ..
            } => {
                self.expr(expr);
                self.annotation(annotation);
            }
        }
    }

    fn pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Ident(name) => self.add(name),
            Pattern::Object(props) => {
                for prop in props {
                    match prop {
                        ObjectPatternProp::KeyValue { key, value, .. } => {
                            self.prop_key(key);
                            self.pattern(value);
                        }
                        ObjectPatternProp::Rest(rest) => self.pattern(rest),
                    }
                }
            }
            Pattern::Array(elements) => {
                for element in elements.iter().flatten() {
                    self.pattern(element);
                }
            }
            Pattern::Assign { left, right } => {
                self.pattern(left);
                self.expr(right);
            }
            Pattern::Rest(inner) => self.pattern(inner),
        }
    }

    fn generic(&mut self, generic: &GenericRef) {
        if let Some(first) = generic.name.parts.first() {
            self.add(first);
        }
        for arg in generic.args() {
            self.annotation(arg);
        }
    }

    fn annotation(&mut self, annotation: &TypeAnnotation) {
        match annotation {
            TypeAnnotation::Generic(generic) => self.generic(generic),
            TypeAnnotation::Typeof(name) => {
                if let Some(first) = name.parts.first() {
                    self.add(first);
                }
            }
            TypeAnnotation::List(inner) | TypeAnnotation::Nullable(inner) => {
                self.annotation(inner);
            }
            TypeAnnotation::Tuple(members)
            | TypeAnnotation::Union(members)
            | TypeAnnotation::Intersection(members) => {
                for member in members {
                    self.annotation(member);
                }
            }
            TypeAnnotation::Object(shape) => {
                for prop in &shape.properties {
                    self.annotation(&prop.value);
                }
                for indexer in &shape.indexers {
                    self.annotation(&indexer.key);
                    self.annotation(&indexer.value);
                }
            }
            TypeAnnotation::Function(shape) => {
                for param in &shape.params {
                    self.annotation(&param.annotation);
                }
                self.annotation(&shape.return_type);
            }
            TypeAnnotation::Primitive(_)
            | TypeAnnotation::Existential
            | TypeAnnotation::Literal(_)
            | TypeAnnotation::Unsupported { .. } => {}
        }
    }
}

#[cfg(test)]
#[path = "../tests/names.rs"]
mod tests;
