use super::*;
use crate::recursive::RecursiveTypeRegistry;
use flowcheck_ast::Printer;
use flowcheck_common::Span;

fn render(combinator: &Combinator) -> String {
    Printer::concise_expr(&combinator.to_expr(&RuntimeNames::default()))
}

fn string_props(keys: &[&str]) -> IndexMap<String, Combinator> {
    keys.iter()
        .map(|k| ((*k).to_string(), Combinator::Builtin(Builtin::String)))
        .collect()
}

#[test]
fn test_named_list() {
    let list = Combinator::List {
        elem: Box::new(Combinator::Builtin(Builtin::String)),
        name: Some("Names".to_string()),
    };
    assert_eq!(render(&list), "_t.list(_t.String, \"Names\")");
}

#[test]
fn test_exact_interface_options() {
    let named = Combinator::Interface {
        props: string_props(&["x"]),
        name: Some("A".to_string()),
        exact: true,
    };
    assert_eq!(
        render(&named),
        "_t.interface({ x: _t.String }, { name: \"A\", strict: true })"
    );

    let anonymous = Combinator::Interface {
        props: string_props(&["x"]),
        name: None,
        exact: true,
    };
    assert_eq!(
        render(&anonymous),
        "_t.interface({ x: _t.String }, { strict: true })"
    );
}

#[test]
fn test_enum_uses_enums_of() {
    let e = Combinator::Enum {
        values: vec!["a".to_string(), "b".to_string()],
        name: Some("AB".to_string()),
    };
    assert_eq!(render(&e), "_t.enums.of([\"a\", \"b\"], \"AB\")");
}

#[test]
fn test_literal_refinement_predicate() {
    let one = Combinator::Refinement {
        base: Box::new(Combinator::Builtin(Builtin::Number)),
        predicate: Predicate::Equals(LiteralType::Number("1".to_string())),
        name: None,
    };
    assert_eq!(
        render(&one),
        "_t.refinement(_t.Number, function (n) { return n === 1; })"
    );

    let yes = Combinator::Refinement {
        base: Box::new(Combinator::Builtin(Builtin::Boolean)),
        predicate: Predicate::Equals(LiteralType::Boolean(true)),
        name: Some("Yes".to_string()),
    };
    assert_eq!(
        render(&yes),
        "_t.refinement(_t.Boolean, function (b) { return b === true; }, \"Yes\")"
    );
}

#[test]
fn test_qualified_reference_is_member_chain() {
    assert_eq!(
        render(&Combinator::Ref(TypeName::dotted("a.b.C"))),
        "a.b.C"
    );
}

#[test]
fn test_extend_calls_helper_with_bare_props() {
    let extend = Combinator::Extend {
        members: vec![
            Combinator::Ref(TypeName::simple("B")),
            Combinator::Props(string_props(&["a"])),
        ],
        name: Some("A".to_string()),
    };
    assert_eq!(render(&extend), "_extend([B, { a: _t.String }], \"A\")");
    assert!(extend.uses_extend());
}

#[test]
fn test_generated_names_are_respected() {
    let names = RuntimeNames {
        library: "_t2".to_string(),
        extend: "_extend2".to_string(),
    };
    let extend = Combinator::Extend {
        members: vec![Combinator::Builtin(Builtin::Any)],
        name: None,
    };
    assert_eq!(
        Printer::concise_expr(&extend.to_expr(&names)),
        "_extend2([_t2.Any])"
    );
}

#[test]
fn test_non_identifier_keys_are_quoted() {
    let iface = Combinator::Interface {
        props: string_props(&["foo-bar"]),
        name: None,
        exact: false,
    };
    assert_eq!(render(&iface), "_t.interface({ \"foo-bar\": _t.String })");
}

#[test]
fn test_recursive_flush_emits_define_in_order() {
    let names = RuntimeNames::default();
    let declare = RecursiveTypeRegistry::declare("Node", &names, Span::dummy());
    assert_eq!(
        Printer::stmt_to_string(&declare),
        "const Node = _t.declare(\"Node\");"
    );

    let mut registry = RecursiveTypeRegistry::new();
    registry.push("A", Combinator::Declare("B".to_string()), Span::dummy());
    registry.push(
        "B",
        Combinator::Interface {
            props: string_props(&["v"]),
            name: None,
            exact: false,
        },
        Span::dummy(),
    );
    let stmts = registry.flush(&names);
    assert!(registry.is_empty());
    let printed: Vec<String> = stmts.iter().map(Printer::stmt_to_string).collect();
    assert_eq!(
        printed,
        vec![
            "A.define(_t.declare(\"B\"));".to_string(),
            "B.define(_t.interface({ v: _t.String }));".to_string(),
        ]
    );
}

#[test]
fn test_flush_since_leaves_earlier_entries_queued() {
    let names = RuntimeNames::default();
    let mut registry = RecursiveTypeRegistry::new();
    registry.push("Outer", Combinator::Declare("Outer".to_string()), Span::dummy());
    let mark = registry.len();
    registry.push("Inner", Combinator::Declare("Inner".to_string()), Span::dummy());

    let inner: Vec<String> = registry
        .flush_since(mark, &names)
        .iter()
        .map(Printer::stmt_to_string)
        .collect();
    assert_eq!(inner, vec!["Inner.define(_t.declare(\"Inner\"));".to_string()]);
    assert_eq!(registry.len(), 1);
    assert!(registry.flush_since(5, &names).is_empty());
    assert_eq!(registry.flush(&names).len(), 1);
}

#[test]
fn test_display_names() {
    let list = Combinator::List {
        elem: Box::new(Combinator::Builtin(Builtin::String).maybe()),
        name: None,
    };
    assert_eq!(list.display_name(), "Array<?String>");
    assert_eq!(
        list.clone().named(Some("Names")).display_name(),
        "Names"
    );
    assert_eq!(Combinator::ANY.named(Some("X")), Combinator::ANY);
}

#[test]
fn test_any_like_detection() {
    assert!(Combinator::ANY.is_any_like());
    assert!(Combinator::ANY.maybe().maybe().is_any_like());
    assert!(!Combinator::Builtin(Builtin::String).maybe().is_any_like());
}
