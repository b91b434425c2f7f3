use super::*;
use flowcheck_ast::node::{
    CatchClause, Class, ClassMember, ExportSpecifier, ForHead, ForInit, FunctionBody, MethodKind,
    SwitchCase, VarDeclarator,
};
use flowcheck_ast::{Function, GenericRef, Param, TypeParam};

// =============================================================================
// Builders
// =============================================================================

fn program(body: Vec<Stmt>) -> Program {
    Program {
        file_name: "input.js".to_string(),
        body,
    }
}

fn run(body: Vec<Stmt>) -> String {
    run_with(body, &TransformOptions::default())
}

fn run_with(body: Vec<Stmt>, options: &TransformOptions) -> String {
    let output = transform_program(program(body), options).unwrap();
    Printer::print_program(&output)
}

fn alias(name: &str, right: TypeAnnotation) -> Stmt {
    Stmt::TypeAlias(TypeAlias {
        id: name.to_string(),
        type_params: Vec::new(),
        right,
        recursive: false,
        span: Span::new(0, 10),
    })
}

fn declare(kind: VarKind, id: Pattern, annotation: Option<TypeAnnotation>, init: Option<Expr>) -> Stmt {
    Stmt::VarDecl(VarDecl {
        kind,
        declarations: vec![VarDeclarator {
            id,
            annotation,
            init,
            span: Span::dummy(),
        }],
        span: Span::dummy(),
    })
}

fn ident(name: &str) -> Pattern {
    Pattern::Ident(name.to_string())
}

fn assign(name: &str, value: Expr) -> Stmt {
    Stmt::expr(Expr::Assign {
        operator: "=".to_string(),
        target: AssignTarget::Pattern(ident(name)),
        value: Box::new(value),
        span: Span::dummy(),
    })
}

fn cast(expr: Expr, annotation: TypeAnnotation) -> Expr {
    Expr::TypeCast {
        expr: Box::new(expr),
        annotation,
        optional: false,
        span: Span::dummy(),
    }
}

fn typed_function(
    name: &str,
    params: Vec<Param>,
    return_type: Option<TypeAnnotation>,
    body: Vec<Stmt>,
) -> Function {
    Function {
        return_type,
        ..Function::declaration(name, params, body)
    }
}

// =============================================================================
// Type declarations
// =============================================================================

#[test]
fn test_type_alias_becomes_const_and_imports_library() {
    let output = run(vec![alias("Name", TypeAnnotation::string())]);
    assert_eq!(
        output,
        "import _t from \"tcomb\";\nconst Name = _t.String;\n"
    );
}

#[test]
fn test_named_combinator_for_alias() {
    let output = run(vec![alias(
        "Names",
        TypeAnnotation::list(TypeAnnotation::string()),
    )]);
    assert!(output.contains("const Names = _t.list(_t.String, \"Names\");"));
}

#[test]
fn test_runtime_library_option() {
    let options = TransformOptions {
        runtime_library: "tcomb-lite".to_string(),
        ..TransformOptions::default()
    };
    let output = run_with(vec![alias("A", TypeAnnotation::number())], &options);
    assert!(output.starts_with("import _t from \"tcomb-lite\";"));
}

#[test]
fn test_reserved_type_name_is_rejected() {
    let err = transform_program(
        program(vec![alias("$Reify", TypeAnnotation::string())]),
        &TransformOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.code, diagnostic_codes::RESERVED_TYPE_NAME);
    assert!(err.message_text.contains("$Reify"));
}

#[test]
fn test_lowering_error_carries_declaration_span() {
    let bad = Stmt::TypeAlias(TypeAlias {
        id: "L".to_string(),
        type_params: Vec::new(),
        right: TypeAnnotation::generic(
            "Array",
            vec![TypeAnnotation::string(), TypeAnnotation::number()],
        ),
        recursive: false,
        span: Span::new(10, 40),
    });
    let err = transform_program(program(vec![bad]), &TransformOptions::default()).unwrap_err();
    assert_eq!(err.code, diagnostic_codes::LIST_ARITY);
    assert_eq!(err.file, "input.js");
    assert_eq!(err.start, 10);
    assert_eq!(err.length, 30);
}

#[test]
fn test_recursive_alias_is_declared_then_defined_at_end() {
    let node = Stmt::TypeAlias(TypeAlias {
        id: "Node".to_string(),
        type_params: Vec::new(),
        right: TypeAnnotation::object([
            ("value", TypeAnnotation::number(), false),
            (
                "next",
                TypeAnnotation::nullable(TypeAnnotation::named("Node")),
                false,
            ),
        ]),
        recursive: true,
        span: Span::dummy(),
    });
    let output = run(vec![node, alias("After", TypeAnnotation::string())]);
    assert_eq!(
        output,
        "import _t from \"tcomb\";\n\
         const Node = _t.declare(\"Node\");\n\
         const After = _t.String;\n\
         Node.define(_t.interface({ value: _t.Number, next: _t.maybe(Node) }));\n"
    );
}

#[test]
fn test_interface_extension_emits_extend_helper() {
    let decl = Stmt::Interface(InterfaceDecl {
        id: "A".to_string(),
        type_params: Vec::new(),
        extends: vec![GenericRef::named("B")],
        body: match TypeAnnotation::object([("a", TypeAnnotation::string(), false)]) {
            TypeAnnotation::Object(shape) => shape,
            _ => unreachable!(),
        },
        recursive: false,
        span: Span::dummy(),
    });
    let output = run(vec![decl]);
    assert!(output.contains("const A = _extend([B, { a: _t.String }], \"A\");"));
    assert!(output.contains("function _extend(types, name) {"));
    assert!(!output.contains("function _assert("));
}

#[test]
fn test_plain_interface() {
    let decl = Stmt::Interface(InterfaceDecl {
        id: "P".to_string(),
        type_params: Vec::new(),
        extends: Vec::new(),
        body: match TypeAnnotation::object([("x", TypeAnnotation::number(), true)]) {
            TypeAnnotation::Object(shape) => shape,
            _ => unreachable!(),
        },
        recursive: false,
        span: Span::dummy(),
    });
    let output = run(vec![decl]);
    assert!(output.contains("const P = _t.interface({ x: _t.maybe(_t.Number) }, \"P\");"));
}

// =============================================================================
// Functions
// =============================================================================

#[test]
fn test_param_and_return_checks() {
    let func = typed_function(
        "foo",
        vec![Param::typed("x", TypeAnnotation::string())],
        Some(TypeAnnotation::string()),
        vec![Stmt::ret(Some(Expr::id("x")))],
    );
    let output = run(vec![Stmt::Function(func)]);
    assert!(output.starts_with("import _t from \"tcomb\";\nfunction foo(x) {\n"));
    assert!(output.contains("  _assert(x, _t.String, \"x\");\n"));
    assert!(output.contains("  return _assert(function () {"));
    assert!(output.contains("}.apply(this, arguments), _t.String, \"return value\");"));
    assert!(output.contains("function _assert(x, type, name) {"));
    assert!(!output.contains(": string"));
}

#[test]
fn test_empty_body_produces_void() {
    let func = typed_function("noop", Vec::new(), Some(TypeAnnotation::void()), Vec::new());
    let output = run(vec![Stmt::Function(func)]);
    assert!(output.contains("return _assert(void 0, _t.Nil, \"return value\");"));
}

#[test]
fn test_concise_arrow_is_wrapped_in_iife() {
    let arrow = Function {
        params: vec![Param::typed("x", TypeAnnotation::number())],
        body: FunctionBody::Expr(Box::new(Expr::id("x"))),
        return_type: Some(TypeAnnotation::number()),
        ..Function::arrow(Vec::new())
    };
    let output = run(vec![Stmt::const_decl(
        "f",
        Expr::function(arrow),
        Span::dummy(),
    )]);
    assert!(output.contains("const f = (x) => {"));
    assert!(output.contains("_assert(x, _t.Number, \"x\");"));
    assert!(output.contains("return _assert((() => {"));
    assert!(output.contains("})(), _t.Number, \"return value\");"));
}

#[test]
fn test_async_function_checks_promise() {
    let func = Function {
        is_async: true,
        ..typed_function(
            "load",
            Vec::new(),
            Some(TypeAnnotation::generic("Promise", vec![TypeAnnotation::string()])),
            vec![Stmt::ret(Some(Expr::string("a")))],
        )
    };
    let output = run(vec![Stmt::Function(func)]);
    assert!(output.contains("\nfunction load() {"));
    assert!(!output.contains("async function load"));
    assert!(output.contains("return _assert(async function () {"));
    assert!(output.contains("_t.Promise, \"return value\");"));
}

#[test]
fn test_optional_and_destructured_params() {
    let destructured = Param {
        pattern: Pattern::Object(vec![ObjectPatternProp::KeyValue {
            key: PropKey::Ident("x".to_string()),
            value: Pattern::Assign {
                left: Box::new(ident("x")),
                right: Box::new(Expr::string("x")),
            },
            shorthand: true,
        }]),
        annotation: Some(TypeAnnotation::object([("x", TypeAnnotation::string(), false)])),
        optional: false,
    };
    let optional = Param {
        optional: true,
        ..Param::typed("y", TypeAnnotation::string())
    };
    let func = typed_function("f", vec![destructured, optional], None, Vec::new());
    let output = run(vec![Stmt::Function(func)]);
    assert!(output.contains("function f({ x = \"x\" }, y) {"));
    assert!(output.contains(
        "_assert({ x }, _t.interface({ x: _t.String }), \"{ x = \\\"x\\\" }\");"
    ));
    assert!(output.contains("_assert(y, _t.maybe(_t.String), \"y\");"));
}

#[test]
fn test_any_params_are_still_checked() {
    let func = typed_function(
        "f",
        vec![Param::typed("x", TypeAnnotation::any())],
        None,
        vec![Stmt::expr(Expr::call(Expr::id("g"), vec![Expr::id("x")]))],
    );
    let output = run(vec![Stmt::Function(func)]);
    assert!(output.contains("_assert(x, _t.Any, \"x\");\n  g(x);"));
}

#[test]
fn test_function_type_params_erase_or_bound() {
    let func = Function {
        type_params: vec![
            TypeParam::new("T"),
            TypeParam::bounded("U", TypeAnnotation::string()),
        ],
        ..typed_function(
            "f",
            vec![
                Param::typed("t", TypeAnnotation::named("T")),
                Param::typed("u", TypeAnnotation::named("U")),
            ],
            None,
            Vec::new(),
        )
    };
    let output = run(vec![Stmt::Function(func)]);
    assert!(output.contains("_assert(t, _t.Any, \"t\");"));
    assert!(output.contains("_assert(u, _t.String, \"u\");"));
    assert!(!output.contains("<T"));
}

#[test]
fn test_class_type_params_reach_methods() {
    let method = Function {
        params: vec![Param::typed("x", TypeAnnotation::named("T"))],
        ..Function::anonymous(Vec::new())
    };
    let class = Class {
        id: Some("Box".to_string()),
        super_class: None,
        type_params: vec![TypeParam::bounded("T", TypeAnnotation::number())],
        body: vec![ClassMember::Method {
            key: PropKey::Ident("put".to_string()),
            kind: MethodKind::Method,
            is_static: false,
            function: method,
        }],
        span: Span::dummy(),
    };
    let output = run(vec![Stmt::Class(class)]);
    assert!(output.contains("class Box {"));
    assert!(output.contains("_assert(x, _t.Number, \"x\");"));
}

// =============================================================================
// Declarations and reassignment
// =============================================================================

#[test]
fn test_literal_initializer_is_not_checked() {
    let output = run(vec![declare(
        VarKind::Const,
        ident("a"),
        Some(TypeAnnotation::string()),
        Some(Expr::string("a")),
    )]);
    assert_eq!(output, "const a = \"a\";\n");
}

#[test]
fn test_declaration_initializer_is_checked() {
    let output = run(vec![declare(
        VarKind::Let,
        ident("a"),
        Some(TypeAnnotation::string()),
        Some(Expr::id("b")),
    )]);
    assert!(output.starts_with("import _t from \"tcomb\";\nlet a = _assert(b, _t.String, \"a\");\n"));
}

#[test]
fn test_var_is_not_checked() {
    let output = run(vec![declare(
        VarKind::Var,
        ident("a"),
        Some(TypeAnnotation::string()),
        Some(Expr::id("b")),
    )]);
    assert_eq!(output, "var a = b;\n");
}

#[test]
fn test_reassignment_through_destructuring_pattern() {
    // let { a: { b } }: { a: { b: string } } = init; b = c;
    let pattern = Pattern::Object(vec![ObjectPatternProp::KeyValue {
        key: PropKey::Ident("a".to_string()),
        value: Pattern::Object(vec![Pattern::shorthand("b")]),
        shorthand: false,
    }]);
    let declared = TypeAnnotation::object([(
        "a",
        TypeAnnotation::object([("b", TypeAnnotation::string(), false)]),
        false,
    )]);
    let output = run(vec![
        declare(VarKind::Let, pattern, Some(declared), None),
        assign("b", Expr::id("c")),
    ]);
    assert!(output.contains("b = _assert(c, _t.String, \"b\");"));
}

#[test]
fn test_reassignment_to_any_is_skipped() {
    let output = run(vec![
        declare(VarKind::Let, ident("x"), Some(TypeAnnotation::any()), None),
        assign("x", Expr::id("y")),
    ]);
    assert!(output.contains("x = y;"));
    assert!(!output.contains("_assert"));
}

#[test]
fn test_inner_untyped_binding_shadows_outer() {
    let output = run(vec![
        declare(VarKind::Let, ident("a"), Some(TypeAnnotation::string()), None),
        Stmt::Block(vec![
            declare(VarKind::Let, ident("a"), None, Some(Expr::number("1"))),
            assign("a", Expr::id("n")),
        ]),
        assign("a", Expr::id("s")),
    ]);
    assert!(output.contains("  a = n;"));
    assert!(output.contains("a = _assert(s, _t.String, \"a\");"));
}

#[test]
fn test_compound_assignment_is_not_checked() {
    let output = run(vec![
        declare(VarKind::Let, ident("a"), Some(TypeAnnotation::number()), None),
        Stmt::expr(Expr::Assign {
            operator: "+=".to_string(),
            target: AssignTarget::Pattern(ident("a")),
            value: Box::new(Expr::id("b")),
            span: Span::dummy(),
        }),
    ]);
    assert!(output.contains("a += b;"));
    assert!(!output.contains("_assert"));
}

// =============================================================================
// Casts
// =============================================================================

#[test]
fn test_cast_becomes_assertion_labelled_with_expression() {
    let output = run(vec![Stmt::expr(cast(
        Expr::call(Expr::id("f"), Vec::new()),
        TypeAnnotation::string(),
    ))]);
    assert!(output.contains("_assert(f(), _t.String, \"f()\");"));
}

#[test]
fn test_nested_cast_label_keeps_inner_cast_text() {
    let inner = cast(Expr::id("a"), TypeAnnotation::any());
    let output = run(vec![Stmt::expr(cast(inner, TypeAnnotation::any()))]);
    assert!(output.contains(
        "_assert(_assert(a, _t.Any, \"a\"), _t.Any, \"(a: any)\");"
    ));
}

#[test]
fn test_reify_becomes_type_reference() {
    let reified = cast(
        cast(Expr::Object(Vec::new()), TypeAnnotation::any()),
        TypeAnnotation::generic("$Reify", vec![TypeAnnotation::named("User")]),
    );
    let output = run(vec![Stmt::const_decl("R", reified, Span::dummy())]);
    assert_eq!(output, "const R = User;\n");
}

#[test]
fn test_invalid_reify_is_diagnosed() {
    let reified = cast(
        Expr::id("x"),
        TypeAnnotation::generic("$Reify", vec![TypeAnnotation::string()]),
    );
    let err = transform_program(
        program(vec![Stmt::expr(reified)]),
        &TransformOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.code, diagnostic_codes::INVALID_REIFY);
}

// =============================================================================
// Options and unit finalization
// =============================================================================

#[test]
fn test_skip_asserts_keeps_declarations_only() {
    let options = TransformOptions {
        skip_asserts: true,
        ..TransformOptions::default()
    };
    let func = typed_function(
        "f",
        vec![Param::typed("x", TypeAnnotation::string())],
        Some(TypeAnnotation::string()),
        vec![Stmt::ret(Some(cast(Expr::id("x"), TypeAnnotation::string())))],
    );
    let output = run_with(
        vec![alias("S", TypeAnnotation::string()), Stmt::Function(func)],
        &options,
    );
    assert_eq!(
        output,
        "import _t from \"tcomb\";\nconst S = _t.String;\nfunction f(x) {\n  return x;\n}\n"
    );
}

#[test]
fn test_skip_helpers_omits_helpers_and_import() {
    let options = TransformOptions {
        skip_helpers: true,
        ..TransformOptions::default()
    };
    let output = run_with(
        vec![Stmt::expr(cast(Expr::id("x"), TypeAnnotation::string()))],
        &options,
    );
    assert_eq!(output, "_assert(x, _t.String, \"x\");\n");
}

#[test]
fn test_helpers_emitted_once_after_defines() {
    let func = |name: &str| {
        Stmt::Function(typed_function(
            name,
            vec![Param::typed("x", TypeAnnotation::string())],
            None,
            Vec::new(),
        ))
    };
    let output = run(vec![func("a"), func("b")]);
    assert_eq!(output.matches("function _assert(").count(), 1);
    assert_eq!(output.matches("import _t from").count(), 1);
    let helper_at = output.find("function _assert(").unwrap();
    assert!(output.find("function b(").unwrap() < helper_at);
}

#[test]
fn test_generated_names_avoid_collisions() {
    let output = run(vec![
        Stmt::const_decl("_assert", Expr::number("1"), Span::dummy()),
        Stmt::expr(cast(Expr::id("x"), TypeAnnotation::string())),
    ]);
    assert!(output.contains("_assert2(x, _t.String, \"x\");"));
    assert!(output.contains("function _assert2(x, type, name) {"));
}

#[test]
fn test_warn_on_failure_helper() {
    let options = TransformOptions {
        warn_on_failure: true,
        ..TransformOptions::default()
    };
    let output = run_with(
        vec![Stmt::expr(cast(Expr::id("x"), TypeAnnotation::string()))],
        &options,
    );
    assert!(output.contains("console.warn(message);"));
}

#[test]
fn test_globals_erase_to_any() {
    let options = TransformOptions {
        globals: vec!["Buffer".to_string()],
        ..TransformOptions::default()
    };
    let output = run_with(
        vec![Stmt::expr(cast(Expr::id("x"), TypeAnnotation::named("Buffer")))],
        &options,
    );
    assert!(output.contains("_assert(x, _t.Any, \"x\");"));
}

// =============================================================================
// Imports and exports
// =============================================================================

#[test]
fn test_type_imports_become_value_imports() {
    let import = Stmt::Import(ImportDecl {
        specifiers: vec![ImportSpecifier::Named {
            imported: "A".to_string(),
            local: "A".to_string(),
            import_kind: None,
        }],
        source: "./a".to_string(),
        import_kind: ImportKind::Type,
    });
    let mixed = Stmt::Import(ImportDecl {
        specifiers: vec![
            ImportSpecifier::Default {
                local: "m".to_string(),
            },
            ImportSpecifier::Named {
                imported: "B".to_string(),
                local: "B".to_string(),
                import_kind: Some(ImportKind::Type),
            },
        ],
        source: "./b".to_string(),
        import_kind: ImportKind::Value,
    });
    let type_of = Stmt::Import(ImportDecl {
        specifiers: vec![ImportSpecifier::Default {
            local: "C".to_string(),
        }],
        source: "./c".to_string(),
        import_kind: ImportKind::Typeof,
    });
    let output = run(vec![import, mixed, type_of]);
    assert_eq!(
        output,
        "import { A } from \"./a\";\nimport m, { B } from \"./b\";\n"
    );
}

#[test]
fn test_exported_types_become_value_exports() {
    let export_alias = Stmt::Export(ExportDecl {
        declaration: Some(Box::new(alias("A", TypeAnnotation::string()))),
        specifiers: Vec::new(),
        source: None,
        export_kind: ImportKind::Type,
    });
    let export_names = Stmt::Export(ExportDecl {
        declaration: None,
        specifiers: vec![ExportSpecifier {
            local: "B".to_string(),
            exported: "B".to_string(),
        }],
        source: Some("./b".to_string()),
        export_kind: ImportKind::Type,
    });
    let output = run(vec![export_alias, export_names]);
    assert!(output.contains("export const A = _t.String;"));
    assert!(output.contains("export { B } from \"./b\";"));
}

#[test]
fn test_empty_async_body_keeps_async_wrapper() {
    let func = Function {
        is_async: true,
        ..typed_function(
            "load",
            Vec::new(),
            Some(TypeAnnotation::generic("Promise", vec![TypeAnnotation::void()])),
            Vec::new(),
        )
    };
    let output = run(vec![Stmt::Function(func)]);
    assert!(output.contains(
        "return _assert(async function () {}.apply(this, arguments), _t.Promise, \"return value\");"
    ));
    assert!(!output.contains("void 0"));
}

#[test]
fn test_label_shows_defaults_as_written() {
    // const { a = (b: number) }: { a: number } = obj;
    let pattern = Pattern::Object(vec![ObjectPatternProp::KeyValue {
        key: PropKey::Ident("a".to_string()),
        value: Pattern::Assign {
            left: Box::new(ident("a")),
            right: Box::new(cast(Expr::id("b"), TypeAnnotation::number())),
        },
        shorthand: true,
    }]);
    let declared = TypeAnnotation::object([("a", TypeAnnotation::number(), false)]);
    let output = run(vec![declare(
        VarKind::Const,
        pattern.clone(),
        Some(declared.clone()),
        Some(Expr::id("obj")),
    )]);
    assert!(output.contains(
        "const { a = _assert(b, _t.Number, \"b\") } = _assert(obj, _t.interface({ a: _t.Number }), \"{ a = (b: number) }\");"
    ));

    let param = Param {
        pattern,
        annotation: Some(declared),
        optional: false,
    };
    let output = run(vec![Stmt::Function(typed_function("f", vec![param], None, Vec::new()))]);
    assert!(output.contains(
        "_assert({ a }, _t.interface({ a: _t.Number }), \"{ a = (b: number) }\");"
    ));
}

// =============================================================================
// Hoisting
// =============================================================================

#[test]
fn test_nested_var_shadows_outer_typed_binding() {
    // let x: string = ""; function f() { if (c) { var x; } x = 5; }
    let func = Function::declaration(
        "f",
        Vec::new(),
        vec![
            Stmt::If {
                test: Expr::id("c"),
                consequent: Box::new(Stmt::Block(vec![declare(
                    VarKind::Var,
                    ident("x"),
                    None,
                    None,
                )])),
                alternate: None,
            },
            assign("x", Expr::number("5")),
        ],
    );
    let output = run(vec![
        declare(
            VarKind::Let,
            ident("x"),
            Some(TypeAnnotation::string()),
            Some(Expr::string("")),
        ),
        Stmt::Function(func),
    ]);
    assert!(output.contains("\n  x = 5;\n"));
    assert!(!output.contains("_assert"));
}

#[test]
fn test_later_function_declaration_shadows_outer_typed_binding() {
    // let g: number = 1; function f() { g = h; function g() {} }
    let func = Function::declaration(
        "f",
        Vec::new(),
        vec![
            assign("g", Expr::id("h")),
            Stmt::Function(Function::declaration("g", Vec::new(), Vec::new())),
        ],
    );
    let output = run(vec![
        declare(
            VarKind::Let,
            ident("g"),
            Some(TypeAnnotation::number()),
            Some(Expr::number("1")),
        ),
        Stmt::Function(func),
    ]);
    assert!(output.contains("\n  g = h;\n"));
    assert!(!output.contains("_assert"));
}

// =============================================================================
// Control flow
// =============================================================================

#[test]
fn test_typed_for_head_is_checked_and_scoped_to_the_loop() {
    // for (let i: number = n; i < 3; i++) { i = s; } i = s;
    let head = VarDecl {
        kind: VarKind::Let,
        declarations: vec![VarDeclarator {
            id: ident("i"),
            annotation: Some(TypeAnnotation::number()),
            init: Some(Expr::id("n")),
            span: Span::dummy(),
        }],
        span: Span::dummy(),
    };
    let output = run(vec![
        Stmt::For {
            init: Some(ForInit::VarDecl(head)),
            test: Some(Expr::binary(Expr::id("i"), "<", Expr::number("3"))),
            update: Some(Expr::Update {
                operator: "++".to_string(),
                prefix: false,
                argument: Box::new(Expr::id("i")),
            }),
            body: Box::new(Stmt::Block(vec![assign("i", Expr::id("s"))])),
        },
        assign("i", Expr::id("s")),
    ]);
    assert!(output.contains("for (let i = _assert(n, _t.Number, \"i\"); i < 3; i++) {\n"));
    assert!(output.contains("  i = _assert(s, _t.Number, \"i\");\n"));
    assert!(output.contains("\ni = s;\n"));
}

#[test]
fn test_for_of_head_annotation_is_erased_and_recorded() {
    // for (const item: string of items) { item = other; }
    let head = VarDecl {
        kind: VarKind::Const,
        declarations: vec![VarDeclarator {
            id: ident("item"),
            annotation: Some(TypeAnnotation::string()),
            init: None,
            span: Span::dummy(),
        }],
        span: Span::dummy(),
    };
    let output = run(vec![Stmt::ForOf {
        left: ForHead::VarDecl(head),
        right: Expr::id("items"),
        body: Box::new(Stmt::Block(vec![assign("item", Expr::id("other"))])),
        is_await: false,
    }]);
    assert!(output.contains("for (const item of items) {\n"));
    assert!(output.contains("item = _assert(other, _t.String, \"item\");"));
}

#[test]
fn test_catch_param_shadows_outer_typed_binding() {
    // let err: string = ""; try { run(); } catch (err) { err = e; } finally { (x: string); }
    let output = run(vec![
        declare(
            VarKind::Let,
            ident("err"),
            Some(TypeAnnotation::string()),
            Some(Expr::string("")),
        ),
        Stmt::Try {
            block: vec![Stmt::expr(Expr::call(Expr::id("run"), Vec::new()))],
            handler: Some(CatchClause {
                param: Some(ident("err")),
                body: vec![assign("err", Expr::id("e"))],
            }),
            finalizer: Some(vec![Stmt::expr(cast(Expr::id("x"), TypeAnnotation::string()))]),
        },
        assign("err", Expr::id("e")),
    ]);
    assert!(output.contains("} catch (err) {\n  err = e;\n} finally {\n"));
    assert!(output.contains("  _assert(x, _t.String, \"x\");\n"));
    assert!(output.contains("\nerr = _assert(e, _t.String, \"err\");\n"));
}

#[test]
fn test_switch_cases_share_one_scope() {
    // switch (k) { case 1: let a: number = v; break; default: a = w; }
    let output = run(vec![Stmt::Switch {
        discriminant: Expr::id("k"),
        cases: vec![
            SwitchCase {
                test: Some(Expr::number("1")),
                consequent: vec![
                    declare(VarKind::Let, ident("a"), Some(TypeAnnotation::number()), Some(Expr::id("v"))),
                    Stmt::Break(None),
                ],
            },
            SwitchCase {
                test: None,
                consequent: vec![assign("a", Expr::id("w"))],
            },
        ],
    }]);
    assert!(output.contains("let a = _assert(v, _t.Number, \"a\");"));
    assert!(output.contains("a = _assert(w, _t.Number, \"a\");"));
    assert!(output.contains("    break;\n  default:\n"));
}

#[test]
fn test_loop_bodies_and_nested_expressions_are_visited() {
    let generator = Function {
        is_generator: true,
        ..Function::declaration(
            "gen",
            Vec::new(),
            vec![Stmt::expr(Expr::Yield {
                argument: Some(Box::new(cast(Expr::id("v"), TypeAnnotation::string()))),
                delegate: false,
            })],
        )
    };
    let output = run(vec![
        Stmt::Labeled {
            label: "outer".to_string(),
            body: Box::new(Stmt::While {
                test: Expr::id("c"),
                body: Box::new(Stmt::Block(vec![
                    Stmt::expr(cast(Expr::id("a"), TypeAnnotation::number())),
                    Stmt::Continue(Some("outer".to_string())),
                ])),
            }),
        },
        Stmt::DoWhile {
            body: Box::new(Stmt::Block(Vec::new())),
            test: cast(Expr::id("b"), TypeAnnotation::boolean()),
        },
        Stmt::expr(Expr::Template(TemplateLiteral {
            quasis: vec!["n=".to_string(), String::new()],
            exprs: vec![cast(Expr::id("n"), TypeAnnotation::number())],
        })),
        Stmt::Function(generator),
    ]);
    assert!(output.contains("outer: while (c) {\n  _assert(a, _t.Number, \"a\");\n  continue outer;\n}"));
    assert!(output.contains("do {} while (_assert(b, _t.Boolean, \"b\"));"));
    assert!(output.contains("`n=${_assert(n, _t.Number, \"n\")}`;"));
    assert!(output.contains("yield _assert(v, _t.String, \"v\");"));
}

#[test]
fn test_update_expression_is_not_checked() {
    let output = run(vec![
        declare(VarKind::Let, ident("count"), Some(TypeAnnotation::number()), None),
        Stmt::expr(Expr::Update {
            operator: "++".to_string(),
            prefix: false,
            argument: Box::new(Expr::id("count")),
        }),
    ]);
    assert!(output.contains("let count;\ncount++;\n"));
    assert!(!output.contains("_assert"));
}

// =============================================================================
// Nested recursive types
// =============================================================================

#[test]
fn test_recursive_alias_in_function_is_defined_in_its_body() {
    let tree = Stmt::TypeAlias(TypeAlias {
        id: "Tree".to_string(),
        type_params: Vec::new(),
        right: TypeAnnotation::object([(
            "kids",
            TypeAnnotation::list(TypeAnnotation::named("Tree")),
            false,
        )]),
        recursive: true,
        span: Span::dummy(),
    });
    let func = Function::declaration(
        "build",
        Vec::new(),
        vec![
            tree,
            declare(
                VarKind::Let,
                ident("t"),
                Some(TypeAnnotation::named("Tree")),
                Some(Expr::call(Expr::id("make"), Vec::new())),
            ),
            Stmt::ret(Some(Expr::id("t"))),
        ],
    );
    let output = run(vec![Stmt::Function(func)]);
    assert!(output.contains(
        "function build() {\n\
         \x20 const Tree = _t.declare(\"Tree\");\n\
         \x20 Tree.define(_t.interface({ kids: _t.list(Tree) }));\n\
         \x20 let t = _assert(make(), Tree, \"t\");\n\
         \x20 return t;\n\
         }\n"
    ));
    assert_eq!(output.matches(".define(").count(), 1);
}
