//! Exclusive ownership of sub-entities

use crate::common::*;

fn graph_with_part(root: &str) -> DocumentGraph {
    let mut a = foo(root, "owner");
    let b = part_schema()
        .instantiate(a.compose_child_identifier("b", None).unwrap())
        .unwrap();
    a.add_owned(PARTS, b).unwrap();
    let mut graph = DocumentGraph::new();
    graph.add_top_level(a).unwrap();
    graph
}

#[test]
fn owned_child_cannot_join_a_second_graph() {
    init_tracing();
    let first = graph_with_part("a");
    let mut second = DocumentGraph::new();
    second.add_top_level(foo("x", "other")).unwrap();

    let before_first = first.serialize().unwrap();
    let before_second = second.serialize().unwrap();

    let copy = first.find(&id("a/b")).unwrap().clone();
    let err = second
        .entity_mut(&id("x"))
        .unwrap()
        .add_owned(PARTS, copy.clone())
        .unwrap_err();
    match err {
        Error::OwnershipViolation { identifier, owner } => {
            assert_eq!(identifier, id("a/b"));
            assert_eq!(owner, id("a"));
        }
        other => panic!("expected OwnershipViolation, got {:?}", other),
    }

    let err = second.add_top_level(copy).unwrap_err();
    assert!(matches!(err, Error::OwnershipViolation { .. }));

    assert_eq!(first.serialize().unwrap(), before_first);
    assert_eq!(second.serialize().unwrap(), before_second);
    assert!(!second.contains(&id("a/b")));
}

#[test]
fn detached_child_can_be_reattached_elsewhere() {
    let mut first = graph_with_part("a");
    let mut second = DocumentGraph::new();
    second.add_top_level(foo("x", "other")).unwrap();

    let detached = first
        .entity_mut(&id("a"))
        .unwrap()
        .remove_owned(PARTS, &id("a/b"))
        .unwrap()
        .unwrap();
    assert!(detached.owner().is_none());
    assert!(!first.contains(&id("a/b")));

    second
        .entity_mut(&id("x"))
        .unwrap()
        .add_owned(PARTS, detached)
        .unwrap();
    let moved = second.find(&id("a/b")).unwrap();
    assert_eq!(moved.owner().unwrap().parent, id("x"));
    assert_eq!(moved.owner().unwrap().predicate, PredicateTag::new(PARTS));
}

#[test]
fn child_type_must_be_allowed() {
    let mut a = foo("a", "owner");
    let w = widget("w", "gear");
    let err = a.add_owned(PARTS, w).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
    assert!(a.owned(PARTS).unwrap().is_empty());
}

#[test]
fn set_owned_replaces_and_detaches_previous() {
    let mut graph = DocumentGraph::new();
    graph.add_top_level(foo("a", "owner")).unwrap();
    let mut a = graph.entity_mut(&id("a")).unwrap();

    let w1 = a.compose_child_identifier("w1", None).unwrap();
    let w2 = a.compose_child_identifier("w2", None).unwrap();
    let mut first = widget_schema().instantiate(w1.clone()).unwrap();
    first.set_value(LABEL, "one").unwrap();
    let mut second = widget_schema().instantiate(w2.clone()).unwrap();
    second.set_value(LABEL, "two").unwrap();

    assert!(a.set_owned(MAIN_WIDGET, first).unwrap().is_none());
    let previous = a.set_owned(MAIN_WIDGET, second).unwrap().unwrap();
    assert_eq!(previous.identifier(), &w1);
    assert!(previous.owner().is_none());
    drop(a);

    assert!(!graph.contains(&w1));
    assert!(graph.contains(&w2));
}

#[test]
fn removing_top_level_unindexes_subtree() {
    let mut graph = graph_with_part("a");
    let removed = graph.remove_top_level(&id("a")).unwrap();
    assert_eq!(removed.tree_ids().count(), 2);
    assert!(graph.is_empty());
    assert!(!graph.contains(&id("a/b")));
    assert_eq!(graph.top_level_types().count(), 0);
}

#[test]
fn subject_owned_twice_fails_the_load() {
    let a = id("a");
    let c = id("c");
    let shared = id("shared");
    let store: StatementStore = vec![
        Statement::type_of(a.clone(), &TypeTag::new(FOO)),
        Statement::new(a.clone(), PredicateTag::new(NAME), "a"),
        Statement::new(a, PredicateTag::new(PARTS), shared.clone()),
        Statement::type_of(c.clone(), &TypeTag::new(FOO)),
        Statement::new(c.clone(), PredicateTag::new(NAME), "c"),
        Statement::new(c, PredicateTag::new(PARTS), shared.clone()),
        Statement::type_of(shared, &TypeTag::new(PART)),
    ]
    .into_iter()
    .collect();

    let err = DocumentGraph::deserialize(&store, &registry()).unwrap_err();
    assert!(matches!(err, Error::OwnershipViolation { .. }));
}

#[test]
fn repeated_owned_link_attaches_the_child_once() {
    init_tracing();
    let a = id("a");
    let p = id("a/p");
    let store: StatementStore = vec![
        Statement::type_of(a.clone(), &TypeTag::new(FOO)),
        Statement::new(a.clone(), PredicateTag::new(NAME), "a"),
        Statement::new(a.clone(), PredicateTag::new(PARTS), p.clone()),
        Statement::new(a.clone(), PredicateTag::new(PARTS), p.clone()),
        Statement::type_of(p.clone(), &TypeTag::new(PART)),
    ]
    .into_iter()
    .collect();

    let graph = DocumentGraph::deserialize(&store, &registry()).unwrap();
    let root = graph.find(&a).unwrap();
    assert_eq!(root.owned(PARTS).unwrap().len(), 1);
    assert_eq!(root.annotation(PARTS), &[Value::Resource(p.clone())]);
    assert_eq!(graph.find(&p).unwrap().owner().unwrap().parent, a);
    assert_eq!(graph.top_level_entities().count(), 1);

    let written = graph.serialize().unwrap();
    assert_eq!(written.len(), store.len());
    let reloaded = DocumentGraph::deserialize(&written, &registry()).unwrap();
    assert_eq!(reloaded, graph);
    assert_eq!(reloaded.serialize().unwrap(), written);
}

#[test]
fn same_owner_under_two_predicates_fails_the_load() {
    let a = id("a");
    let w = id("a/w");
    let store: StatementStore = vec![
        Statement::type_of(a.clone(), &TypeTag::new(FOO)),
        Statement::new(a.clone(), PredicateTag::new(NAME), "a"),
        Statement::new(a.clone(), PredicateTag::new(PARTS), w.clone()),
        Statement::new(a, PredicateTag::new(MAIN_WIDGET), w.clone()),
        Statement::type_of(w.clone(), &TypeTag::new(WIDGET)),
        Statement::new(w, PredicateTag::new(LABEL), "gear"),
    ]
    .into_iter()
    .collect();

    let err = DocumentGraph::deserialize(&store, &registry()).unwrap_err();
    assert!(matches!(err, Error::OwnershipViolation { .. }));
}

#[test]
fn owned_cycle_fails_the_load() {
    let p1 = id("p1");
    let p2 = id("p2");
    let store: StatementStore = vec![
        Statement::type_of(p1.clone(), &TypeTag::new(PART)),
        Statement::new(p1.clone(), PredicateTag::new(PARTS), p2.clone()),
        Statement::type_of(p2.clone(), &TypeTag::new(PART)),
        Statement::new(p2, PredicateTag::new(PARTS), p1),
    ]
    .into_iter()
    .collect();

    let err = DocumentGraph::deserialize(&store, &registry()).unwrap_err();
    assert!(matches!(err, Error::OwnershipViolation { .. }));
}

#[test]
fn nesting_depth_is_bounded_on_load() {
    let mut a = foo("a", "deep");
    let mut p1 = part_schema()
        .instantiate(a.compose_child_identifier("p1", None).unwrap())
        .unwrap();
    let p2 = part_schema()
        .instantiate(p1.compose_child_identifier("p2", None).unwrap())
        .unwrap();
    p1.add_owned(PARTS, p2).unwrap();
    a.add_owned(PARTS, p1).unwrap();
    let mut graph = DocumentGraph::new();
    graph.add_top_level(a).unwrap();
    let store = graph.serialize().unwrap();

    let shallow = EngineConfig {
        max_nesting_depth: 2,
        ..EngineConfig::default()
    };
    let err = DocumentGraph::deserialize_with_config(&store, &registry(), shallow).unwrap_err();
    match err {
        Error::NestingTooDeep { identifier, limit } => {
            assert_eq!(identifier, id("a/p1/p2"));
            assert_eq!(limit, 2);
        }
        other => panic!("expected NestingTooDeep, got {:?}", other),
    }

    let enough = EngineConfig {
        max_nesting_depth: 3,
        ..EngineConfig::default()
    };
    let loaded = DocumentGraph::deserialize_with_config(&store, &registry(), enough).unwrap();
    assert_eq!(loaded, graph);
}
