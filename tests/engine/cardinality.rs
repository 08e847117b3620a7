//! Cardinality bounds and the lower-bound policy

use crate::common::*;
use propgraph::CardinalityPolicy;
use proptest::prelude::*;

fn graph_with(policy: CardinalityPolicy) -> DocumentGraph {
    let config = EngineConfig {
        cardinality: policy,
        ..EngineConfig::default()
    };
    let mut graph = DocumentGraph::with_config(config).unwrap();
    graph.add_top_level(foo("a", "widget")).unwrap();
    graph
}

#[test]
fn add_on_full_singular_property_fails() {
    let mut a = foo("a", "widget");
    let err = a.add_value(NAME, "second").unwrap_err();
    match err {
        Error::Cardinality {
            count,
            lower,
            upper,
            ..
        } => {
            assert_eq!(count, 2);
            assert_eq!(lower, 1);
            assert_eq!(upper, Some(1));
        }
        other => panic!("expected Cardinality, got {:?}", other),
    }
    assert_eq!(a.values(NAME).unwrap().len(), 1);
}

#[test]
fn set_on_singular_property_replaces() {
    let mut a = foo("a", "widget");
    let previous = a.set_value(NAME, "gadget").unwrap();
    assert_eq!(previous, Some(Value::from("widget")));
    assert_eq!(a.value(NAME).unwrap(), Some(&Value::from("gadget")));
}

#[test]
fn second_owned_child_on_optional_property_fails() {
    let mut a = foo("a", "widget");
    let first = widget_schema()
        .instantiate(a.compose_child_identifier("w1", None).unwrap())
        .unwrap();
    let second = widget_schema()
        .instantiate(a.compose_child_identifier("w2", None).unwrap())
        .unwrap();
    a.add_owned(MAIN_WIDGET, first).unwrap();
    let err = a.add_owned(MAIN_WIDGET, second).unwrap_err();
    assert!(matches!(err, Error::Cardinality { .. }));
    assert_eq!(a.owned(MAIN_WIDGET).unwrap().len(), 1);
}

#[test]
fn lazy_policy_defers_lower_bound_to_serialization() {
    let mut graph = graph_with(CardinalityPolicy::Lazy);
    {
        let mut a = graph.entity_mut(&id("a")).unwrap();
        assert!(a.remove_value(NAME, &Value::from("widget")).unwrap());
        assert!(a.value(NAME).unwrap().is_none());
    }

    assert!(matches!(graph.validate(), Err(Error::Cardinality { .. })));
    let err = graph.serialize().unwrap_err();
    assert!(matches!(err, Error::Cardinality { count: 0, .. }));
}

#[test]
fn eager_policy_rejects_removal_below_lower_bound() {
    let mut graph = graph_with(CardinalityPolicy::Eager);
    let mut a = graph.entity_mut(&id("a")).unwrap();
    let err = a.remove_value(NAME, &Value::from("widget")).unwrap_err();
    assert!(matches!(err, Error::Cardinality { .. }));
    assert_eq!(a.value(NAME).unwrap(), Some(&Value::from("widget")));
}

#[test]
fn eager_policy_ignores_absent_values() {
    let mut graph = graph_with(CardinalityPolicy::Eager);
    let mut a = graph.entity_mut(&id("a")).unwrap();
    assert!(!a.remove_value(NAME, &Value::from("other")).unwrap());
}

#[test]
fn eager_policy_allows_removal_from_optional_property() {
    let mut graph = graph_with(CardinalityPolicy::Eager);
    let mut a = graph.entity_mut(&id("a")).unwrap();
    let child = a.compose_child_identifier("b", None).unwrap();
    a.add_owned(PARTS, part_schema().instantiate(child.clone()).unwrap())
        .unwrap();
    let removed = a.remove_owned(PARTS, &child).unwrap().unwrap();
    assert!(removed.owner().is_none());
    drop(a);
    assert!(!graph.contains(&child));
}

#[test]
fn missing_required_value_loads_but_fails_validation() {
    let a = id("a");
    let store: StatementStore = vec![Statement::type_of(a, &TypeTag::new(WIDGET))]
        .into_iter()
        .collect();
    // Loading tolerates the gap; only validation rejects it.
    let graph = DocumentGraph::deserialize(&store, &registry()).unwrap();
    assert!(matches!(graph.validate(), Err(Error::Cardinality { .. })));
}

#[test]
fn too_many_values_fail_the_load() {
    let a = id("a");
    let store: StatementStore = vec![
        Statement::type_of(a.clone(), &TypeTag::new(FOO)),
        Statement::new(a.clone(), PredicateTag::new(NAME), "one"),
        Statement::new(a, PredicateTag::new(NAME), "two"),
    ]
    .into_iter()
    .collect();
    let err = DocumentGraph::deserialize(&store, &registry()).unwrap_err();
    assert!(matches!(err, Error::Cardinality { .. }));
}

#[test]
fn parsed_bounds_match_constants() {
    assert_eq!(Cardinality::parse("0", "1").unwrap(), Cardinality::OPTIONAL);
    assert_eq!(Cardinality::parse("1", "*").unwrap(), Cardinality::AT_LEAST_ONE);
    assert!(matches!(
        Cardinality::parse("2", "1"),
        Err(Error::Config(_))
    ));
}

proptest! {
    #[test]
    fn unbounded_property_holds_every_added_value(count in 0usize..32) {
        let mut a = foo("a", "widget");
        for i in 0..count {
            let target = Identifier::new(format!("http://other.org/t{}", i)).unwrap();
            a.add_reference(USES, target).unwrap();
        }
        prop_assert_eq!(a.references(USES).unwrap().len(), count);
        prop_assert!(a.validate().is_ok());
    }

    #[test]
    fn singular_property_never_exceeds_one(values in prop::collection::vec("[a-z]{1,8}", 1..8)) {
        let mut a = foo("a", "first");
        for v in &values {
            prop_assert!(a.add_value(NAME, v.as_str()).is_err());
            a.set_value(NAME, v.as_str()).unwrap();
            prop_assert_eq!(a.values(NAME).unwrap().len(), 1);
        }
        let last = values.last().unwrap();
        prop_assert_eq!(a.value(NAME).unwrap(), Some(&Value::from(last.as_str())));
    }
}
