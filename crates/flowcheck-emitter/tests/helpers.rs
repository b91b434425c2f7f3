use super::*;
use flowcheck_ast::{Printer, Program};

fn unit() -> CompilationUnitState {
    CompilationUnitState::new(&Program::default())
}

#[test]
fn test_library_import() {
    let import = library_import(&unit(), "tcomb");
    assert_eq!(Printer::stmt_to_string(&import), "import _t from \"tcomb\";");
}

#[test]
fn test_assert_helper_checks_combinators_and_classes() {
    let text = Printer::stmt_to_string(&assert_helper(&unit(), false));
    assert!(text.starts_with("function _assert(x, type, name) {"));
    assert!(text.contains("if (_t.isType(type) && type.meta.kind !== \"struct\")"));
    assert!(text.contains("if (!type.is(x))"));
    assert!(text.contains("type(x, [name + \": \" + _t.getTypeName(type)]);"));
    assert!(text.contains("} else if (!(x instanceof type)) {"));
    assert!(text.contains(
        "_t.fail(\"Invalid value \" + _t.stringify(x) + \" supplied to \" + name + \" (expected a \" + _t.getTypeName(type) + \")\");"
    ));
    assert!(text.contains("return x;"));
    assert!(!text.contains("console.warn"));
}

#[test]
fn test_warn_on_failure_overrides_fail() {
    let text = Printer::stmt_to_string(&assert_helper(&unit(), true));
    assert!(text.contains("_t.fail = function (message) {"));
    assert!(text.contains("console.warn(message);"));
}

#[test]
fn test_extend_helper_filters_any() {
    let text = Printer::stmt_to_string(&extend_helper(&unit()));
    assert!(text.starts_with("function _extend(types, name) {"));
    assert!(text.contains("const isAny = (type) => {"));
    assert!(text.contains("if (type === _t.Any)"));
    assert!(text.contains("type.meta.kind === \"maybe\""));
    assert!(text.contains("return isAny(type.meta.type);"));
    assert!(text.contains("return _t.interface.extend(types.filter((type) => !isAny(type)), name);"));
}

#[test]
fn test_helpers_use_generated_library_name() {
    use flowcheck_ast::Expr;
    use flowcheck_common::Span;

    let program = Program {
        file_name: String::new(),
        body: vec![Stmt::const_decl("_t", Expr::number("1"), Span::dummy())],
    };
    let unit = CompilationUnitState::new(&program);
    let text = Printer::stmt_to_string(&extend_helper(&unit));
    assert!(text.contains("_t2.interface.extend"));
    assert!(text.contains("type === _t2.Any"));
}
