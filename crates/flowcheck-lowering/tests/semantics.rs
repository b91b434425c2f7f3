use super::*;
use crate::extend::informative_members;
use crate::lower::lower_type;
use crate::type_env::TypeEnvironment;
use flowcheck_ast::TypeAnnotation;
use serde_json::json;

const STRING: Combinator = Combinator::Builtin(Builtin::String);

fn list_of_strings() -> Combinator {
    Combinator::List {
        elem: Box::new(STRING),
        name: None,
    }
}

#[test]
fn test_list_rejects_element_at_index() {
    let model = RuntimeModel::new();
    let list = list_of_strings();
    assert!(model.is(&list, &json!(["a", "b"])));
    let failure = model.validate(&list, &json!(["a", 1])).unwrap_err();
    assert_eq!(failure.path, vec!["1".to_string()]);
    assert_eq!(failure.actual, "1");
    assert_eq!(failure.expected, "String");
    assert_eq!(
        failure.to_string(),
        "Invalid value 1 supplied to Array<String>/1 (expected a String)"
    );
}

#[test]
fn test_enum_membership() {
    let env = TypeEnvironment::default();
    let union = TypeAnnotation::Union(vec![
        TypeAnnotation::string_literal("a"),
        TypeAnnotation::string_literal("b"),
    ]);
    let lowered = lower_type(&union, &env, None).unwrap();
    let model = RuntimeModel::new();
    assert!(model.is(&lowered, &json!("a")));
    assert!(model.is(&lowered, &json!("b")));
    assert!(!model.is(&lowered, &json!("c")));
    assert!(!model.is(&lowered, &json!(1)));
}

#[test]
fn test_recursive_type_rejects_nested_path() {
    // type Node = { value: number, next: ?Node }
    let env = TypeEnvironment::default();
    let body = TypeAnnotation::object([
        ("value", TypeAnnotation::number(), false),
        (
            "next",
            TypeAnnotation::nullable(TypeAnnotation::named("Node")),
            false,
        ),
    ]);
    let lowered = lower_type(&body, &env, None).unwrap();

    let mut model = RuntimeModel::new();
    model.define("Node", lowered);
    let node = Combinator::Declare("Node".to_string());

    assert!(model.is(&node, &json!({"value": 1, "next": {"value": 2, "next": null}})));
    let failure = model
        .validate(&node, &json!({"value": 1, "next": {"value": "x", "next": null}}))
        .unwrap_err();
    assert_eq!(failure.dotted_path(), "next.value");
    assert_eq!(failure.location, "Node/next/value");
}

#[test]
fn test_extend_ignores_any_members() {
    let mut props = IndexMap::new();
    props.insert("a".to_string(), STRING);
    let members = vec![
        Combinator::ANY,
        Combinator::ANY.maybe().maybe(),
        Combinator::Props(props),
    ];
    assert_eq!(informative_members(&members).len(), 1);

    let extend = Combinator::Extend {
        members,
        name: Some("A".to_string()),
    };
    let model = RuntimeModel::new();
    assert!(model.is(&extend, &json!({"a": "x"})));
    assert!(!model.is(&extend, &json!({"a": 1})));
}

#[test]
fn test_refinement_predicates() {
    let mut model = RuntimeModel::new();
    model.define_predicate("isPositive", |v| v.as_f64().is_some_and(|n| n > 0.0));
    let positive = Combinator::Refinement {
        base: Box::new(Combinator::Builtin(Builtin::Number)),
        predicate: Predicate::Ref(TypeName::simple("isPositive")),
        name: Some("Positive".to_string()),
    };
    assert!(model.is(&positive, &json!(3)));
    assert!(!model.is(&positive, &json!(-3)));
    assert!(!model.is(&positive, &json!("3")));

    let two = Combinator::Refinement {
        base: Box::new(Combinator::Builtin(Builtin::Number)),
        predicate: Predicate::Equals(LiteralType::Number("2".to_string())),
        name: None,
    };
    assert!(model.is(&two, &json!(2)));
    assert!(model.is(&two, &json!(2.0)));
    assert!(!model.is(&two, &json!(3)));
}

#[test]
fn test_exact_interface_rejects_extra_keys() {
    let mut props = IndexMap::new();
    props.insert("x".to_string(), STRING);
    let loose = Combinator::Interface {
        props: props.clone(),
        name: None,
        exact: false,
    };
    let exact = Combinator::Interface {
        props,
        name: None,
        exact: true,
    };
    let value = json!({"x": "a", "y": 1});
    let model = RuntimeModel::new();
    assert!(model.is(&loose, &value));
    let failure = model.validate(&exact, &value).unwrap_err();
    assert_eq!(failure.path, vec!["y".to_string()]);
}

#[test]
fn test_maybe_and_missing_properties() {
    let mut props = IndexMap::new();
    props.insert("nick".to_string(), STRING.maybe());
    let iface = Combinator::Interface {
        props,
        name: None,
        exact: false,
    };
    let model = RuntimeModel::new();
    assert!(model.is(&iface, &json!({})));
    assert!(model.is(&iface, &json!({"nick": null})));
    assert!(!model.is(&iface, &json!({"nick": 1})));
    assert!(!model.is(&iface, &json!(null)));
}

#[test]
fn test_dict_checks_keys_and_values() {
    let dict = Combinator::Dict {
        key: Box::new(Combinator::Enum {
            values: vec!["a".to_string(), "b".to_string()],
            name: None,
        }),
        value: Box::new(Combinator::Builtin(Builtin::Number)),
        name: None,
    };
    let model = RuntimeModel::new();
    assert!(model.is(&dict, &json!({"a": 1, "b": 2})));
    let failure = model.validate(&dict, &json!({"a": 1, "c": 2})).unwrap_err();
    assert_eq!(failure.path, vec!["c".to_string()]);
}

#[test]
fn test_warn_policy_passes_value_through() {
    let value = json!(["a", 1]);
    let list = list_of_strings();

    let strict = RuntimeModel::new();
    assert!(strict.assert(&value, &list, "xs").is_err());

    let lenient = RuntimeModel::new().with_policy(AssertPolicy::Warn);
    assert_eq!(lenient.assert(&value, &list, "xs").unwrap(), &value);
}

#[test]
fn test_assert_label_prefixes_location() {
    let model = RuntimeModel::new();
    let failure = model
        .assert(&json!(["a", 1]), &list_of_strings(), "xs")
        .unwrap_err();
    assert_eq!(failure.location, "xs/1");
}

#[test]
fn test_unknown_reference_fails() {
    let model = RuntimeModel::new();
    let reference = Combinator::Ref(TypeName::simple("Missing"));
    assert!(!model.is(&reference, &json!({})));
}

#[test]
fn test_function_and_promise_reject_json() {
    let model = RuntimeModel::new();
    for builtin in [Builtin::Function, Builtin::Promise] {
        assert!(!model.is(&Combinator::Builtin(builtin), &json!({})));
    }
    assert!(model.is(&Combinator::Builtin(Builtin::Object), &json!({})));
    assert!(model.is(&Combinator::ANY, &json!(null)));
}
