//! Referenced-object properties

use crate::common::*;

fn config_with_homespace() -> EngineConfig {
    EngineConfig {
        homespace: Some(NS.to_string()),
        ..EngineConfig::default()
    }
}

#[test]
fn reference_resolves_inside_the_graph() {
    let mut graph = DocumentGraph::new();
    graph.add_top_level(foo("a", "user")).unwrap();
    graph.add_top_level(widget("w", "gear")).unwrap();

    let mut a = graph.entity_mut(&id("a")).unwrap();
    a.add_reference(USES, id("w")).unwrap();
    drop(a);

    let loaded = round_trip(&graph);
    let a = loaded.find(&id("a")).unwrap();
    let target = &a.references(USES).unwrap()[0];
    assert_eq!(loaded.type_of(target), Some(&TypeTag::new(WIDGET)));
    assert!(loaded.unresolved_references().is_empty());
}

#[test]
fn resolve_reference_only_returns_graph_members() {
    let mut graph = DocumentGraph::new();
    let mut old = widget("old", "old");
    old.set_reference(REPLACES, id("older")).unwrap();
    graph.add_top_level(old).unwrap();
    graph.add_top_level(widget("new", "new")).unwrap();

    let old = graph.entity_mut(&id("old")).unwrap();
    assert_eq!(old.resolve_reference(REPLACES).unwrap(), None);
    drop(old);

    let mut new = graph.entity_mut(&id("new")).unwrap();
    new.set_reference(REPLACES, id("old")).unwrap();
    assert_eq!(new.resolve_reference(REPLACES).unwrap(), Some(id("old")));
}

#[test]
fn reference_to_disallowed_type_in_graph_is_rejected() {
    let mut graph = DocumentGraph::new();
    graph.add_top_level(foo("a", "user")).unwrap();
    graph.add_top_level(foo("c", "other foo")).unwrap();

    let err = graph
        .entity_mut(&id("a"))
        .unwrap()
        .add_reference(USES, id("c"))
        .unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
}

#[test]
fn reference_to_disallowed_type_fails_the_load() {
    let a = id("a");
    let c = id("c");
    let store: StatementStore = vec![
        Statement::type_of(a.clone(), &TypeTag::new(FOO)),
        Statement::new(a.clone(), PredicateTag::new(NAME), "user"),
        Statement::new(a, PredicateTag::new(USES), c.clone()),
        Statement::type_of(c.clone(), &TypeTag::new(FOO)),
        Statement::new(c, PredicateTag::new(NAME), "other"),
    ]
    .into_iter()
    .collect();

    let err = DocumentGraph::deserialize(&store, &registry()).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
}

#[test]
fn literal_in_reference_position_fails_the_load() {
    let a = id("a");
    let store: StatementStore = vec![
        Statement::type_of(a.clone(), &TypeTag::new(FOO)),
        Statement::new(a.clone(), PredicateTag::new(NAME), "user"),
        Statement::new(a, PredicateTag::new(USES), "not a resource"),
    ]
    .into_iter()
    .collect();

    let err = DocumentGraph::deserialize(&store, &registry()).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
}

#[test]
fn dangling_and_external_references_are_told_apart() {
    init_tracing();
    let mut a = foo("a", "user");
    a.add_reference(USES, id("missing")).unwrap();
    a.add_reference(USES, Identifier::new("http://other.org/part").unwrap())
        .unwrap();

    let mut graph = DocumentGraph::with_config(config_with_homespace()).unwrap();
    graph.add_top_level(a).unwrap();

    let unresolved = graph.unresolved_references();
    assert_eq!(unresolved.len(), 2);

    let dangling = graph.dangling_references();
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].subject, id("a"));
    assert_eq!(dangling[0].target, id("missing"));
    assert!(dangling[0].to_string().starts_with("dangling"));

    let external = unresolved.iter().find(|r| !r.is_dangling()).unwrap();
    assert!(external.to_string().starts_with("external"));

    // Unresolved references never block serialization.
    let loaded = DocumentGraph::deserialize_with_config(
        &graph.serialize().unwrap(),
        &registry(),
        config_with_homespace(),
    )
    .unwrap();
    assert_eq!(loaded.dangling_references().len(), 1);
}

#[test]
fn without_homespace_nothing_is_dangling() {
    let mut a = foo("a", "user");
    a.add_reference(USES, id("missing")).unwrap();
    let mut graph = DocumentGraph::new();
    graph.add_top_level(a).unwrap();

    assert_eq!(graph.unresolved_references().len(), 1);
    assert!(graph.dangling_references().is_empty());
}

#[test]
fn variant_mismatch_is_a_type_error() {
    let mut a = foo("a", "user");
    let err = a.add_reference(NAME, id("w")).unwrap_err();
    match err {
        Error::TypeMismatch {
            expected, found, ..
        } => {
            assert_eq!(expected, "referenced property");
            assert_eq!(found, "scalar property");
        }
        other => panic!("expected TypeMismatch, got {:?}", other),
    }

    let err = a.add_reference("http://example.org/undeclared", id("w")).unwrap_err();
    assert!(matches!(err, Error::UnknownProperty { .. }));
}
