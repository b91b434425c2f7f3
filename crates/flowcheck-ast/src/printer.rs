//! Printer for the annotated syntax tree.
//!
//! Two layouts are supported:
//!
//! - **pretty**: one statement per line, two-space indentation. Used to render
//!   transformed units.
//! - **concise**: everything on one line. Used to build the failure labels
//!   the transform embeds in assertion calls (`"{ x = \"x\" }"`, `"(a: any)"`),
//!   so labels are stable regardless of source formatting.
//!
//! Type annotations are printed in Flow syntax when present, which only
//! happens for untransformed input.

use crate::node::{
    AssignTarget, CatchClause, Class, ClassMember, ExportDecl, Expr, ForHead, ForInit, Function,
    FunctionBody, ImportDecl, ImportKind, ImportSpecifier, InterfaceDecl, MemberProp, MethodKind,
    ObjectPatternProp, ObjectProp, Param, Pattern, Program, PropKey, Stmt, SwitchCase,
    TemplateLiteral, TypeAlias, VarDecl,
};
use crate::types::{
    FunctionShape, FunctionTypeParam, GenericRef, LiteralType, ObjectShape, TypeAnnotation,
    TypeParam,
};

// =============================================================================
// Precedence
// =============================================================================

const PREC_SEQ: u8 = 1;
const PREC_ASSIGN: u8 = 2;
const PREC_CONDITIONAL: u8 = 3;
const PREC_UNARY: u8 = 15;
const PREC_CALL: u8 = 18;
const PREC_PRIMARY: u8 = 20;

fn binary_precedence(op: &str) -> u8 {
    match op {
        "??" | "||" => 4,
        "&&" => 5,
        "|" => 6,
        "^" => 7,
        "&" => 8,
        "==" | "!=" | "===" | "!==" => 9,
        "<" | ">" | "<=" | ">=" | "instanceof" | "in" => 10,
        "<<" | ">>" | ">>>" => 11,
        "+" | "-" => 12,
        "*" | "/" | "%" => 13,
        "**" => 14,
        _ => 4,
    }
}

fn expr_precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Seq(_) => PREC_SEQ,
        Expr::Assign { .. } | Expr::Spread(_) | Expr::Yield { .. } => PREC_ASSIGN,
        Expr::Function(func) if func.is_arrow => PREC_ASSIGN,
        Expr::Conditional { .. } => PREC_CONDITIONAL,
        Expr::Binary { operator, .. } => binary_precedence(operator),
        Expr::Unary { .. } | Expr::Update { .. } | Expr::Await(_) => PREC_UNARY,
        Expr::Call { .. }
        | Expr::New { .. }
        | Expr::Member { .. }
        | Expr::TaggedTemplate { .. } => PREC_CALL,
        _ => PREC_PRIMARY,
    }
}

/// Quote a string literal with double quotes.
#[must_use]
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

// =============================================================================
// Printer
// =============================================================================

/// Tree printer. See the module docs for the two layouts.
pub struct Printer {
    output: String,
    indent_level: u32,
    concise: bool,
}

impl Printer {
    #[must_use]
    pub const fn pretty() -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            concise: false,
        }
    }

    #[must_use]
    pub const fn concise() -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            concise: true,
        }
    }

    /// Consume the printer and return the text written so far.
    #[must_use]
    pub fn finish(self) -> String {
        self.output
    }

    /// Pretty-print a whole unit.
    #[must_use]
    pub fn print_program(program: &Program) -> String {
        let mut printer = Self::pretty();
        for stmt in &program.body {
            printer.write_indent();
            printer.emit_stmt(stmt);
            printer.write_line();
        }
        printer.finish()
    }

    /// Pretty-print a single statement.
    #[must_use]
    pub fn stmt_to_string(stmt: &Stmt) -> String {
        let mut printer = Self::pretty();
        printer.emit_stmt(stmt);
        printer.finish()
    }

    /// Single-line text of an expression.
    #[must_use]
    pub fn concise_expr(expr: &Expr) -> String {
        let mut printer = Self::concise();
        printer.emit_expr(expr, PREC_SEQ);
        printer.finish()
    }

    /// Single-line text of a binding pattern.
    #[must_use]
    pub fn concise_pattern(pattern: &Pattern) -> String {
        let mut printer = Self::concise();
        printer.emit_pattern(pattern);
        printer.finish()
    }

    /// Flow syntax of a type annotation.
    #[must_use]
    pub fn type_to_string(annotation: &TypeAnnotation) -> String {
        let mut printer = Self::concise();
        printer.emit_type(annotation);
        printer.finish()
    }

    // =========================================================================
    // Output primitives
    // =========================================================================

    fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn write_line(&mut self) {
        if !self.concise {
            self.output.push('\n');
        }
    }

    fn write_indent(&mut self) {
        if !self.concise {
            for _ in 0..self.indent_level {
                self.output.push_str("  ");
            }
        }
    }

    const fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    const fn decrease_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn emit_comma_separated<T>(&mut self, items: &[T], mut emit: impl FnMut(&mut Self, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            emit(self, item);
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn emit_block(&mut self, stmts: &[Stmt]) {
        if stmts.is_empty() {
            self.write("{}");
            return;
        }
        if self.concise {
            self.write("{ ");
            for (i, stmt) in stmts.iter().enumerate() {
                if i > 0 {
                    self.write(" ");
                }
                self.emit_stmt(stmt);
            }
            self.write(" }");
            return;
        }
        self.write("{");
        self.write_line();
        self.increase_indent();
        for stmt in stmts {
            self.write_indent();
            self.emit_stmt(stmt);
            self.write_line();
        }
        self.decrease_indent();
        self.write_indent();
        self.write("}");
    }

    fn emit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr) => {
                if starts_with_ambiguous_token(expr) {
                    self.write("(");
                    self.emit_expr(expr, PREC_SEQ);
                    self.write(")");
                } else {
                    self.emit_expr(expr, PREC_SEQ);
                }
                self.write(";");
            }
            Stmt::VarDecl(decl) => {
                self.emit_var_decl(decl);
                self.write(";");
            }
            Stmt::Function(func) => self.emit_function(func),
            Stmt::Class(class) => self.emit_class(class),
            Stmt::Return(arg) => {
                self.write("return");
                if let Some(arg) = arg {
                    self.write(" ");
                    self.emit_expr(arg, PREC_SEQ);
                }
                self.write(";");
            }
            Stmt::If {
                test,
                consequent,
                alternate,
            } => {
                self.write("if (");
                self.emit_expr(test, PREC_SEQ);
                self.write(") ");
                self.emit_stmt(consequent);
                if let Some(alternate) = alternate {
                    self.write(" else ");
                    self.emit_stmt(alternate);
                }
            }
            Stmt::Block(stmts) => self.emit_block(stmts),
            Stmt::Throw(arg) => {
                self.write("throw ");
                self.emit_expr(arg, PREC_SEQ);
                self.write(";");
            }
            Stmt::For {
                init,
                test,
                update,
                body,
            } => {
                self.write("for (");
                match init {
                    Some(ForInit::VarDecl(decl)) => self.emit_var_decl(decl),
                    Some(ForInit::Expr(expr)) => self.emit_expr(expr, PREC_SEQ),
                    None => {}
                }
                self.write(";");
                if let Some(test) = test {
                    self.write(" ");
                    self.emit_expr(test, PREC_SEQ);
                }
                self.write(";");
                if let Some(update) = update {
                    self.write(" ");
                    self.emit_expr(update, PREC_SEQ);
                }
                self.write(") ");
                self.emit_stmt(body);
            }
            Stmt::ForIn { left, right, body } => {
                self.write("for (");
                self.emit_for_head(left);
                self.write(" in ");
                self.emit_expr(right, PREC_SEQ);
                self.write(") ");
                self.emit_stmt(body);
            }
            Stmt::ForOf {
                left,
                right,
                body,
                is_await,
            } => {
                self.write(if *is_await { "for await (" } else { "for (" });
                self.emit_for_head(left);
                self.write(" of ");
                self.emit_expr(right, PREC_ASSIGN);
                self.write(") ");
                self.emit_stmt(body);
            }
            Stmt::While { test, body } => {
                self.write("while (");
                self.emit_expr(test, PREC_SEQ);
                self.write(") ");
                self.emit_stmt(body);
            }
            Stmt::DoWhile { body, test } => {
                self.write("do ");
                self.emit_stmt(body);
                self.write(" while (");
                self.emit_expr(test, PREC_SEQ);
                self.write(");");
            }
            Stmt::Try {
                block,
                handler,
                finalizer,
            } => self.emit_try(block, handler.as_ref(), finalizer.as_deref()),
            Stmt::Switch {
                discriminant,
                cases,
            } => self.emit_switch(discriminant, cases),
            Stmt::Break(label) => self.emit_jump("break", label.as_deref()),
            Stmt::Continue(label) => self.emit_jump("continue", label.as_deref()),
            Stmt::Labeled { label, body } => {
                self.write(label);
                self.write(": ");
                self.emit_stmt(body);
            }
            Stmt::Empty => self.write(";"),
            Stmt::TypeAlias(alias) => self.emit_type_alias(alias),
            Stmt::Interface(decl) => self.emit_interface(decl),
            Stmt::Import(import) => self.emit_import(import),
            Stmt::Export(export) => self.emit_export(export),
            Stmt::ExportDefault(expr) => {
                self.write("export default ");
                self.emit_expr(expr, PREC_ASSIGN);
                self.write(";");
            }
        }
    }

    fn emit_var_decl(&mut self, decl: &VarDecl) {
        self.write(decl.kind.keyword());
        self.write(" ");
        self.emit_comma_separated(&decl.declarations, |p, declarator| {
            p.emit_pattern(&declarator.id);
            if let Some(annotation) = &declarator.annotation {
                p.write(": ");
                p.emit_type(annotation);
            }
            if let Some(init) = &declarator.init {
                p.write(" = ");
                p.emit_expr(init, PREC_ASSIGN);
            }
        });
    }

    fn emit_for_head(&mut self, head: &ForHead) {
        match head {
            ForHead::VarDecl(decl) => self.emit_var_decl(decl),
            ForHead::Target(AssignTarget::Pattern(pattern)) => self.emit_pattern(pattern),
            ForHead::Target(AssignTarget::Expr(target)) => self.emit_expr(target, PREC_CALL),
        }
    }

    fn emit_jump(&mut self, keyword: &str, label: Option<&str>) {
        self.write(keyword);
        if let Some(label) = label {
            self.write(" ");
            self.write(label);
        }
        self.write(";");
    }

    fn emit_try(
        &mut self,
        block: &[Stmt],
        handler: Option<&CatchClause>,
        finalizer: Option<&[Stmt]>,
    ) {
        self.write("try ");
        self.emit_block(block);
        if let Some(handler) = handler {
            self.write(" catch ");
            if let Some(param) = &handler.param {
                self.write("(");
                self.emit_pattern(param);
                self.write(") ");
            }
            self.emit_block(&handler.body);
        }
        if let Some(finalizer) = finalizer {
            self.write(" finally ");
            self.emit_block(finalizer);
        }
    }

    fn emit_switch(&mut self, discriminant: &Expr, cases: &[SwitchCase]) {
        self.write("switch (");
        self.emit_expr(discriminant, PREC_SEQ);
        self.write(") {");
        if cases.is_empty() {
            self.write("}");
            return;
        }
        self.write_line();
        self.increase_indent();
        for case in cases {
            if self.concise {
                self.write(" ");
            }
            self.write_indent();
            match &case.test {
                Some(test) => {
                    self.write("case ");
                    self.emit_expr(test, PREC_SEQ);
                    self.write(":");
                }
                None => self.write("default:"),
            }
            self.write_line();
            self.increase_indent();
            for stmt in &case.consequent {
                if self.concise {
                    self.write(" ");
                }
                self.write_indent();
                self.emit_stmt(stmt);
                self.write_line();
            }
            self.decrease_indent();
        }
        self.decrease_indent();
        self.write_indent();
        if self.concise {
            self.write(" ");
        }
        self.write("}");
    }

    fn emit_type_alias(&mut self, alias: &TypeAlias) {
        self.write("type ");
        self.write(&alias.id);
        self.emit_type_params(&alias.type_params);
        self.write(" = ");
        self.emit_type(&alias.right);
        self.write(";");
    }

    fn emit_interface(&mut self, decl: &InterfaceDecl) {
        self.write("interface ");
        self.write(&decl.id);
        self.emit_type_params(&decl.type_params);
        if !decl.extends.is_empty() {
            self.write(" extends ");
            self.emit_comma_separated(&decl.extends, |p, parent| p.emit_generic(parent));
        }
        self.write(" ");
        self.emit_object_type(&decl.body);
    }

    fn emit_import(&mut self, import: &ImportDecl) {
        self.write("import ");
        match import.import_kind {
            ImportKind::Type => self.write("type "),
            ImportKind::Typeof => self.write("typeof "),
            ImportKind::Value => {}
        }
        let mut named = Vec::new();
        let mut wrote_any = false;
        for specifier in &import.specifiers {
            match specifier {
                ImportSpecifier::Default { local } => {
                    if wrote_any {
                        self.write(", ");
                    }
                    self.write(local);
                    wrote_any = true;
                }
                ImportSpecifier::Namespace { local } => {
                    if wrote_any {
                        self.write(", ");
                    }
                    self.write("* as ");
                    self.write(local);
                    wrote_any = true;
                }
                ImportSpecifier::Named { .. } => named.push(specifier),
            }
        }
        if !named.is_empty() {
            if wrote_any {
                self.write(", ");
            }
            self.write("{ ");
            self.emit_comma_separated(&named, |p, specifier| {
                if let ImportSpecifier::Named {
                    imported,
                    local,
                    import_kind,
                } = specifier
                {
                    match import_kind {
                        Some(ImportKind::Type) => p.write("type "),
                        Some(ImportKind::Typeof) => p.write("typeof "),
                        _ => {}
                    }
                    p.write(imported);
                    if imported != local {
                        p.write(" as ");
                        p.write(local);
                    }
                }
            });
            self.write(" }");
            wrote_any = true;
        }
        if wrote_any {
            self.write(" from ");
        }
        self.write(&quote_string(&import.source));
        self.write(";");
    }

    fn emit_export(&mut self, export: &ExportDecl) {
        self.write("export ");
        if let Some(declaration) = &export.declaration {
            self.emit_stmt(declaration);
            return;
        }
        if export.export_kind == ImportKind::Type {
            self.write("type ");
        }
        self.write("{ ");
        self.emit_comma_separated(&export.specifiers, |p, specifier| {
            p.write(&specifier.local);
            if specifier.local != specifier.exported {
                p.write(" as ");
                p.write(&specifier.exported);
            }
        });
        self.write(" }");
        if let Some(source) = &export.source {
            self.write(" from ");
            self.write(&quote_string(source));
        }
        self.write(";");
    }

    // =========================================================================
    // Functions and classes
    // =========================================================================

    fn emit_params(&mut self, params: &[Param]) {
        self.write("(");
        self.emit_comma_separated(params, |p, param| p.emit_param(param));
        self.write(")");
    }

    fn emit_param(&mut self, param: &Param) {
        let (core, default) = match &param.pattern {
            Pattern::Assign { left, right } => (left.as_ref(), Some(right.as_ref())),
            other => (other, None),
        };
        self.emit_pattern(core);
        if param.optional {
            self.write("?");
        }
        if let Some(annotation) = &param.annotation {
            self.write(": ");
            self.emit_type(annotation);
        }
        if let Some(default) = default {
            self.write(" = ");
            self.emit_expr(default, PREC_ASSIGN);
        }
    }

    fn emit_function(&mut self, func: &Function) {
        if func.is_async {
            self.write("async ");
        }
        if func.is_arrow {
            self.emit_type_params(&func.type_params);
            self.emit_params(&func.params);
            self.emit_return_type(func.return_type.as_ref());
            self.write(" => ");
            match &func.body {
                FunctionBody::Block(stmts) => self.emit_block(stmts),
                FunctionBody::Expr(expr) => {
                    if matches!(expr.as_ref(), Expr::Object(_)) {
                        self.write("(");
                        self.emit_expr(expr, PREC_SEQ);
                        self.write(")");
                    } else {
                        self.emit_expr(expr, PREC_ASSIGN);
                    }
                }
            }
            return;
        }
        self.write("function");
        if func.is_generator {
            self.write("*");
        }
        self.write(" ");
        if let Some(id) = &func.id {
            self.write(id);
        }
        self.emit_type_params(&func.type_params);
        self.emit_params(&func.params);
        self.emit_return_type(func.return_type.as_ref());
        self.write(" ");
        self.emit_function_body(&func.body);
    }

    fn emit_function_body(&mut self, body: &FunctionBody) {
        match body {
            FunctionBody::Block(stmts) => self.emit_block(stmts),
            FunctionBody::Expr(expr) => {
                self.emit_block(&[Stmt::Return(Some(expr.as_ref().clone()))]);
            }
        }
    }

    fn emit_return_type(&mut self, return_type: Option<&TypeAnnotation>) {
        if let Some(return_type) = return_type {
            self.write(": ");
            self.emit_type(return_type);
        }
    }

    fn emit_method(&mut self, key: &PropKey, func: &Function) {
        if func.is_async {
            self.write("async ");
        }
        if func.is_generator {
            self.write("*");
        }
        self.emit_prop_key(key);
        self.emit_type_params(&func.type_params);
        self.emit_params(&func.params);
        self.emit_return_type(func.return_type.as_ref());
        self.write(" ");
        self.emit_function_body(&func.body);
    }

    fn emit_class(&mut self, class: &Class) {
        self.write("class");
        if let Some(id) = &class.id {
            self.write(" ");
            self.write(id);
        }
        self.emit_type_params(&class.type_params);
        if let Some(super_class) = &class.super_class {
            self.write(" extends ");
            self.emit_expr(super_class, PREC_CALL);
        }
        self.write(" ");
        if class.body.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        if self.concise {
            self.write(" ");
        }
        self.write_line();
        self.increase_indent();
        for member in &class.body {
            self.write_indent();
            self.emit_class_member(member);
            if self.concise {
                self.write(" ");
            }
            self.write_line();
        }
        self.decrease_indent();
        self.write_indent();
        self.write("}");
    }

    fn emit_class_member(&mut self, member: &ClassMember) {
        match member {
            ClassMember::Method {
                key,
                kind,
                is_static,
                function,
            } => {
                if *is_static {
                    self.write("static ");
                }
                match kind {
                    MethodKind::Get => self.write("get "),
                    MethodKind::Set => self.write("set "),
                    MethodKind::Constructor | MethodKind::Method => {}
                }
                self.emit_method(key, function);
            }
            ClassMember::Property {
                key,
                annotation,
                value,
                is_static,
            } => {
                if *is_static {
                    self.write("static ");
                }
                self.emit_prop_key(key);
                if let Some(annotation) = annotation {
                    self.write(": ");
                    self.emit_type(annotation);
                }
                if let Some(value) = value {
                    self.write(" = ");
                    self.emit_expr(value, PREC_ASSIGN);
                }
                self.write(";");
            }
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn emit_prop_key(&mut self, key: &PropKey) {
        match key {
            PropKey::Ident(name) => self.write(name),
            PropKey::Str(value) => self.write(&quote_string(value)),
            PropKey::Num(text) => self.write(text),
            PropKey::Computed(expr) => {
                self.write("[");
                self.emit_expr(expr, PREC_ASSIGN);
                self.write("]");
            }
        }
    }

    fn emit_expr(&mut self, expr: &Expr, min_prec: u8) {
        let needs_parens = expr_precedence(expr) < min_prec;
        if needs_parens {
            self.write("(");
        }
        self.emit_expr_inner(expr);
        if needs_parens {
            self.write(")");
        }
    }

    fn emit_expr_inner(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(name) => self.write(name),
            Expr::This => self.write("this"),
            Expr::Super => self.write("super"),
            Expr::Null => self.write("null"),
            Expr::Bool(value) => self.write(if *value { "true" } else { "false" }),
            Expr::Num(text) => self.write(text),
            Expr::Str(value) => self.write(&quote_string(value)),
            Expr::Regex { pattern, flags } => {
                self.write("/");
                self.write(pattern);
                self.write("/");
                self.write(flags);
            }
            Expr::Template(template) => self.emit_template(template),
            Expr::TaggedTemplate { tag, quasi } => {
                self.emit_expr(tag, PREC_CALL);
                self.emit_template(quasi);
            }
            Expr::Array(elements) => {
                self.write("[");
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if let Some(element) = element {
                        self.emit_expr(element, PREC_ASSIGN);
                    } else if i + 1 == elements.len() {
                        // trailing hole needs its own comma
                        self.write(",");
                    }
                }
                self.write("]");
            }
            Expr::Object(props) => self.emit_object_literal(props),
            Expr::Function(func) => self.emit_function(func),
            Expr::Class(class) => self.emit_class(class),
            Expr::Member { object, property } => {
                self.emit_expr(object, PREC_CALL);
                match property {
                    MemberProp::Ident(name) => {
                        self.write(".");
                        self.write(name);
                    }
                    MemberProp::Computed(index) => {
                        self.write("[");
                        self.emit_expr(index, PREC_SEQ);
                        self.write("]");
                    }
                }
            }
            Expr::Call { callee, args } => {
                self.emit_expr(callee, PREC_CALL);
                self.emit_args(args);
            }
            Expr::New { callee, args } => {
                self.write("new ");
                self.emit_expr(callee, PREC_CALL);
                self.emit_args(args);
            }
            Expr::Unary { operator, argument } => {
                self.write(operator);
                if operator.chars().all(char::is_alphabetic) {
                    self.write(" ");
                }
                self.emit_expr(argument, PREC_UNARY);
            }
            Expr::Update {
                operator,
                prefix,
                argument,
            } => {
                if *prefix {
                    self.write(operator);
                    self.emit_expr(argument, PREC_UNARY);
                } else {
                    self.emit_expr(argument, PREC_CALL);
                    self.write(operator);
                }
            }
            Expr::Binary {
                operator,
                left,
                right,
            } => {
                let prec = binary_precedence(operator);
                self.emit_expr(left, prec);
                self.write(" ");
                self.write(operator);
                self.write(" ");
                self.emit_expr(right, prec + 1);
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.emit_expr(test, PREC_CONDITIONAL + 1);
                self.write(" ? ");
                self.emit_expr(consequent, PREC_ASSIGN);
                self.write(" : ");
                self.emit_expr(alternate, PREC_ASSIGN);
            }
            Expr::Assign {
                operator,
                target,
                value,
                ..
            } => {
                match target {
                    AssignTarget::Pattern(pattern) => self.emit_pattern(pattern),
                    AssignTarget::Expr(target) => self.emit_expr(target, PREC_CALL),
                }
                self.write(" ");
                self.write(operator);
                self.write(" ");
                self.emit_expr(value, PREC_ASSIGN);
            }
            Expr::Seq(exprs) => {
                self.emit_comma_separated(exprs, |p, e| p.emit_expr(e, PREC_ASSIGN));
            }
            Expr::Spread(arg) => {
                self.write("...");
                self.emit_expr(arg, PREC_ASSIGN);
            }
            Expr::Await(arg) => {
                self.write("await ");
                self.emit_expr(arg, PREC_UNARY);
            }
            Expr::Yield { argument, delegate } => {
                self.write(if *delegate { "yield*" } else { "yield" });
                if let Some(argument) = argument {
                    self.write(" ");
                    self.emit_expr(argument, PREC_ASSIGN);
                }
            }
            Expr::Paren(inner) => {
                self.write("(");
                self.emit_expr(inner, PREC_SEQ);
                self.write(")");
            }
            Expr::TypeCast {
                expr,
                annotation,
                optional,
                ..
            } => {
                self.write("(");
                self.emit_expr(expr, PREC_ASSIGN);
                if *optional {
                    self.write("?");
                }
                self.write(": ");
                self.emit_type(annotation);
                self.write(")");
            }
        }
    }

    fn emit_template(&mut self, template: &TemplateLiteral) {
        self.write("`");
        for (i, quasi) in template.quasis.iter().enumerate() {
            self.write(quasi);
            if let Some(expr) = template.exprs.get(i) {
                self.write("${");
                self.emit_expr(expr, PREC_SEQ);
                self.write("}");
            }
        }
        self.write("`");
    }

    fn emit_args(&mut self, args: &[Expr]) {
        self.write("(");
        self.emit_comma_separated(args, |p, arg| p.emit_expr(arg, PREC_ASSIGN));
        self.write(")");
    }

    fn emit_object_literal(&mut self, props: &[ObjectProp]) {
        if props.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{ ");
        self.emit_comma_separated(props, |p, prop| match prop {
            ObjectProp::KeyValue {
                key,
                value,
                shorthand,
            } => {
                let is_shorthand = *shorthand
                    && matches!((key, value), (PropKey::Ident(k), Expr::Ident(v)) if k == v);
                if is_shorthand {
                    p.emit_expr(value, PREC_ASSIGN);
                } else {
                    p.emit_prop_key(key);
                    p.write(": ");
                    p.emit_expr(value, PREC_ASSIGN);
                }
            }
            ObjectProp::Method { key, function } => p.emit_method(key, function),
            ObjectProp::Spread(arg) => {
                p.write("...");
                p.emit_expr(arg, PREC_ASSIGN);
            }
        });
        self.write(" }");
    }

    // =========================================================================
    // Patterns
    // =========================================================================

    fn emit_pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Ident(name) => self.write(name),
            Pattern::Object(props) => {
                if props.is_empty() {
                    self.write("{}");
                    return;
                }
                self.write("{ ");
                self.emit_comma_separated(props, |p, prop| p.emit_object_pattern_prop(prop));
                self.write(" }");
            }
            Pattern::Array(elements) => {
                self.write("[");
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if let Some(element) = element {
                        self.emit_pattern(element);
                    } else if i + 1 == elements.len() {
                        self.write(",");
                    }
                }
                self.write("]");
            }
            Pattern::Assign { left, right } => {
                self.emit_pattern(left);
                self.write(" = ");
                self.emit_expr(right, PREC_ASSIGN);
            }
            Pattern::Rest(inner) => {
                self.write("...");
                self.emit_pattern(inner);
            }
        }
    }

    fn emit_object_pattern_prop(&mut self, prop: &ObjectPatternProp) {
        match prop {
            ObjectPatternProp::KeyValue {
                key,
                value,
                shorthand,
            } => {
                if *shorthand && is_shorthand_of(key, value) {
                    self.emit_pattern(value);
                } else {
                    self.emit_prop_key(key);
                    self.write(": ");
                    self.emit_pattern(value);
                }
            }
            ObjectPatternProp::Rest(rest) => {
                self.write("...");
                self.emit_pattern(rest);
            }
        }
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn emit_type_params(&mut self, params: &[TypeParam]) {
        if params.is_empty() {
            return;
        }
        self.write("<");
        self.emit_comma_separated(params, |p, param| {
            p.write(&param.name);
            if let Some(bound) = &param.bound {
                p.write(": ");
                p.emit_type(bound);
            }
        });
        self.write(">");
    }

    fn emit_generic(&mut self, generic: &GenericRef) {
        self.write(&generic.name.to_string());
        if let Some(args) = &generic.type_args {
            self.write("<");
            self.emit_comma_separated(args, |p, arg| p.emit_type(arg));
            self.write(">");
        }
    }

    fn emit_type_wrapped(&mut self, annotation: &TypeAnnotation, wrap: bool) {
        if wrap {
            self.write("(");
            self.emit_type(annotation);
            self.write(")");
        } else {
            self.emit_type(annotation);
        }
    }

    fn emit_type(&mut self, annotation: &TypeAnnotation) {
        match annotation {
            TypeAnnotation::Primitive(primitive) => self.write(primitive.keyword()),
            TypeAnnotation::Existential => self.write("*"),
            TypeAnnotation::Typeof(name) => {
                self.write("typeof ");
                self.write(&name.to_string());
            }
            TypeAnnotation::List(elem) => {
                let wrap = matches!(
                    elem.as_ref(),
                    TypeAnnotation::Union(_)
                        | TypeAnnotation::Intersection(_)
                        | TypeAnnotation::Function(_)
                        | TypeAnnotation::Nullable(_)
                );
                self.emit_type_wrapped(elem, wrap);
                self.write("[]");
            }
            TypeAnnotation::Tuple(elems) => {
                self.write("[");
                self.emit_comma_separated(elems, |p, e| p.emit_type(e));
                self.write("]");
            }
            TypeAnnotation::Nullable(inner) => {
                self.write("?");
                let wrap = matches!(
                    inner.as_ref(),
                    TypeAnnotation::Union(_)
                        | TypeAnnotation::Intersection(_)
                        | TypeAnnotation::Function(_)
                );
                self.emit_type_wrapped(inner, wrap);
            }
            TypeAnnotation::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        self.write(" | ");
                    }
                    let wrap = matches!(member, TypeAnnotation::Function(_));
                    self.emit_type_wrapped(member, wrap);
                }
            }
            TypeAnnotation::Intersection(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        self.write(" & ");
                    }
                    let wrap =
                        matches!(member, TypeAnnotation::Function(_) | TypeAnnotation::Union(_));
                    self.emit_type_wrapped(member, wrap);
                }
            }
            TypeAnnotation::Object(shape) => self.emit_object_type(shape),
            TypeAnnotation::Function(shape) => self.emit_function_type(shape),
            TypeAnnotation::Generic(generic) => self.emit_generic(generic),
            TypeAnnotation::Literal(literal) => match literal {
                LiteralType::String(value) => self.write(&quote_string(value)),
                LiteralType::Number(text) => self.write(text),
                LiteralType::Boolean(value) => self.write(if *value { "true" } else { "false" }),
            },
            TypeAnnotation::Unsupported { kind } => self.write(kind),
        }
    }

    fn emit_object_type(&mut self, shape: &ObjectShape) {
        let (open, close) = if shape.exact { ("{|", "|}") } else { ("{", "}") };
        if shape.properties.is_empty() && shape.indexers.is_empty() {
            self.write(open);
            self.write(close);
            return;
        }
        self.write(open);
        self.write(" ");
        let mut first = true;
        for prop in &shape.properties {
            if !first {
                self.write(", ");
            }
            first = false;
            if is_identifier_name(&prop.key) {
                self.write(&prop.key);
            } else {
                self.write(&quote_string(&prop.key));
            }
            if prop.optional {
                self.write("?");
            }
            self.write(": ");
            self.emit_type(&prop.value);
        }
        for indexer in &shape.indexers {
            if !first {
                self.write(", ");
            }
            first = false;
            self.write("[");
            if let Some(id) = &indexer.id {
                self.write(id);
                self.write(": ");
            }
            self.emit_type(&indexer.key);
            self.write("]: ");
            self.emit_type(&indexer.value);
        }
        self.write(" ");
        self.write(close);
    }

    fn emit_function_type(&mut self, shape: &FunctionShape) {
        let emit_param = |p: &mut Self, param: &FunctionTypeParam| {
            if let Some(name) = &param.name {
                p.write(name);
                if param.optional {
                    p.write("?");
                }
                p.write(": ");
            }
            p.emit_type(&param.annotation);
        };
        self.write("(");
        self.emit_comma_separated(&shape.params, emit_param);
        if let Some(rest) = &shape.rest {
            if !shape.params.is_empty() {
                self.write(", ");
            }
            self.write("...");
            emit_param(self, rest.as_ref());
        }
        self.write(") => ");
        self.emit_type(&shape.return_type);
    }
}

fn is_shorthand_of(key: &PropKey, value: &Pattern) -> bool {
    let PropKey::Ident(key) = key else {
        return false;
    };
    match value {
        Pattern::Ident(name) => name == key,
        Pattern::Assign { left, .. } => matches!(left.as_ref(), Pattern::Ident(name) if name == key),
        _ => false,
    }
}

/// Expression statements may not start with `function`, `class` or `{`.
fn starts_with_ambiguous_token(expr: &Expr) -> bool {
    match expr {
        Expr::Function(func) => !func.is_arrow,
        Expr::Object(_) | Expr::Class(_) => true,
        Expr::Member { object, .. } => starts_with_ambiguous_token(object),
        Expr::Call { callee, .. } => starts_with_ambiguous_token(callee),
        Expr::TaggedTemplate { tag, .. } => starts_with_ambiguous_token(tag),
        Expr::Update {
            prefix: false,
            argument,
            ..
        } => starts_with_ambiguous_token(argument),
        Expr::Binary { left, .. } => starts_with_ambiguous_token(left),
        Expr::Conditional { test, .. } => starts_with_ambiguous_token(test),
        Expr::Seq(exprs) => exprs.first().is_some_and(starts_with_ambiguous_token),
        Expr::Assign {
            target: AssignTarget::Pattern(Pattern::Object(_)),
            ..
        } => true,
        _ => false,
    }
}

#[cfg(test)]
#[path = "../tests/printer.rs"]
mod tests;
