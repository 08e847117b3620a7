//! Data the registry does not recognize survives a round trip

use crate::common::*;
use propgraph::vocab::RDF_TYPE;

const UNKNOWN: &str = "http://example.org/Unknown";
const EXTRA: &str = "http://example.org/Extra";

fn mixed_store() -> StatementStore {
    let a = id("a");
    let x = id("x");
    vec![
        Statement::type_of(a.clone(), &TypeTag::new(FOO)),
        Statement::new(a.clone(), PredicateTag::new(NAME), "known"),
        Statement::type_of(x.clone(), &TypeTag::new(UNKNOWN)),
        Statement::new(x.clone(), PredicateTag::new(NOTE), "opaque"),
        Statement::new(x, PredicateTag::new(USES), a),
    ]
    .into_iter()
    .collect()
}

#[test]
fn unregistered_subject_is_kept_verbatim() {
    init_tracing();
    let store = mixed_store();
    let graph = DocumentGraph::deserialize(&store, &registry()).unwrap();

    assert_eq!(graph.len(), 1);
    let subjects: Vec<_> = graph.unrecognized_subjects().cloned().collect();
    assert_eq!(subjects, vec![id("x")]);
    assert_eq!(graph.unrecognized_statements(&id("x")).len(), 3);
    assert!(!graph.contains(&id("x")));

    let written = graph.serialize().unwrap();
    assert_eq!(written, store);
}

#[test]
fn removing_passthrough_drops_it_from_output() {
    let mut graph = DocumentGraph::deserialize(&mixed_store(), &registry()).unwrap();
    let removed = graph.remove_unrecognized(&id("x"));
    assert_eq!(removed.len(), 3);
    assert!(graph.remove_unrecognized(&id("x")).is_empty());

    let written = graph.serialize().unwrap();
    assert!(!written.contains_subject(&id("x")));
}

#[test]
fn unknown_predicates_become_annotations() {
    let a = id("a");
    let store: StatementStore = vec![
        Statement::type_of(a.clone(), &TypeTag::new(FOO)),
        Statement::new(a.clone(), PredicateTag::new(NAME), "annotated"),
        Statement::new(a, PredicateTag::new(NOTE), "free text"),
    ]
    .into_iter()
    .collect();

    let graph = DocumentGraph::deserialize(&store, &registry()).unwrap();
    let entity = graph.find(&id("a")).unwrap();
    assert_eq!(
        entity.annotation(NOTE),
        &[Value::from("free text")][..]
    );
    assert_eq!(graph.serialize().unwrap(), store);
}

#[test]
fn extra_type_statements_are_annotations() {
    let a = id("a");
    let store: StatementStore = vec![
        Statement::type_of(a.clone(), &TypeTag::new(EXTRA)),
        Statement::type_of(a.clone(), &TypeTag::new(FOO)),
        Statement::new(a, PredicateTag::new(NAME), "typed twice"),
    ]
    .into_iter()
    .collect();

    let graph = DocumentGraph::deserialize(&store, &registry()).unwrap();
    let entity = graph.find(&id("a")).unwrap();
    assert_eq!(entity.type_tag(), &TypeTag::new(FOO));
    let extra = entity.annotation(RDF_TYPE);
    assert_eq!(extra.len(), 1);
    assert_eq!(extra[0].as_resource().unwrap().as_str(), EXTRA);

    // The declared type moves first; nothing is lost.
    let written = graph.serialize().unwrap();
    assert_eq!(written.len(), store.len());
    assert_eq!(round_trip(&graph), graph);
}

#[test]
fn owned_link_to_unrecognized_child_is_kept() {
    let a = id("a");
    let x = id("x");
    let store: StatementStore = vec![
        Statement::type_of(a.clone(), &TypeTag::new(FOO)),
        Statement::new(a.clone(), PredicateTag::new(NAME), "owner"),
        Statement::new(a, PredicateTag::new(PARTS), x.clone()),
        Statement::type_of(x.clone(), &TypeTag::new(UNKNOWN)),
    ]
    .into_iter()
    .collect();

    let graph = DocumentGraph::deserialize(&store, &registry()).unwrap();
    let entity = graph.find(&id("a")).unwrap();
    assert!(entity.owned(PARTS).unwrap().is_empty());
    assert_eq!(entity.annotation(PARTS), &[Value::Resource(x.clone())][..]);
    assert_eq!(graph.unrecognized_statements(&x).len(), 1);

    assert_eq!(graph.serialize().unwrap(), store);
}

#[test]
fn subject_without_any_type_is_passthrough() {
    let loose = id("loose");
    let store: StatementStore = vec![Statement::new(
        loose.clone(),
        PredicateTag::new(NOTE),
        "no type",
    )]
    .into_iter()
    .collect();

    let graph = DocumentGraph::deserialize(&store, &registry()).unwrap();
    assert!(graph.is_empty());
    assert_eq!(graph.unrecognized_statements(&loose).len(), 1);
    assert_eq!(graph.serialize().unwrap(), store);
}

#[test]
fn empty_registry_keeps_everything() {
    let store = mixed_store();
    let graph = DocumentGraph::deserialize(&store, &EntityRegistry::new()).unwrap();
    assert!(graph.is_empty());
    assert_eq!(graph.unrecognized_subjects().count(), 2);
    assert_eq!(graph.serialize().unwrap(), store);
}
