//! Property-based round trips over generated graphs

use crate::common::*;
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct PartShape {
    name: Option<String>,
    count: Option<i64>,
    nested: usize,
}

#[derive(Debug, Clone)]
struct FooShape {
    name: String,
    parts: Vec<PartShape>,
    widget: Option<(String, f64, bool)>,
    uses_external: usize,
}

fn part_shape() -> impl Strategy<Value = PartShape> {
    (
        proptest::option::of("[a-z]{1,10}"),
        proptest::option::of(any::<i64>()),
        0usize..3,
    )
        .prop_map(|(name, count, nested)| PartShape {
            name,
            count,
            nested,
        })
}

fn foo_shape() -> impl Strategy<Value = FooShape> {
    (
        "[A-Za-z ]{1,16}",
        prop::collection::vec(part_shape(), 0..4),
        proptest::option::of(("[a-z]{1,8}", -1.0e6f64..1.0e6, any::<bool>())),
        0usize..3,
    )
        .prop_map(|(name, parts, widget, uses_external)| FooShape {
            name,
            parts,
            widget,
            uses_external,
        })
}

fn build(shapes: &[FooShape]) -> DocumentGraph {
    let mut graph = DocumentGraph::new();
    for (i, shape) in shapes.iter().enumerate() {
        let mut root = foo(&format!("foo{}", i), &shape.name);
        for (j, p) in shape.parts.iter().enumerate() {
            let pid = root.compose_child_identifier(&format!("p{}", j), None).unwrap();
            let mut part = part_schema().instantiate(pid).unwrap();
            if let Some(name) = &p.name {
                part.set_value(NAME, name.as_str()).unwrap();
            }
            if let Some(count) = p.count {
                part.set_value(COUNT, count).unwrap();
            }
            for k in 0..p.nested {
                let nid = part.compose_child_identifier(&format!("n{}", k), None).unwrap();
                part.add_owned(PARTS, part_schema().instantiate(nid).unwrap())
                    .unwrap();
            }
            root.add_owned(PARTS, part).unwrap();
        }
        if let Some((label, weight, enabled)) = &shape.widget {
            let wid = root.compose_child_identifier("main", None).unwrap();
            let mut w = widget_schema().instantiate(wid).unwrap();
            w.set_value(LABEL, label.as_str()).unwrap();
            w.set_value(WEIGHT, *weight).unwrap();
            w.set_value(ENABLED, *enabled).unwrap();
            root.set_owned(MAIN_WIDGET, w).unwrap();
        }
        for k in 0..shape.uses_external {
            let target = Identifier::new(format!("http://other.org/lib/{}", k)).unwrap();
            root.add_reference(USES, target).unwrap();
        }
        graph.add_top_level(root).unwrap();
    }
    graph
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generated_graphs_round_trip(shapes in prop::collection::vec(foo_shape(), 0..5)) {
        let graph = build(&shapes);
        let store = graph.serialize().unwrap();
        let loaded = DocumentGraph::deserialize(&store, &registry()).unwrap();
        prop_assert_eq!(&loaded, &graph);
        prop_assert_eq!(loaded.serialize().unwrap(), store);
    }

    #[test]
    fn index_covers_every_tree_node(shapes in prop::collection::vec(foo_shape(), 1..4)) {
        let graph = build(&shapes);
        let mut total = 0;
        for root in graph.top_level_entities() {
            for id in root.tree_ids() {
                prop_assert!(graph.contains(id));
                total += 1;
            }
        }
        prop_assert_eq!(graph.len(), total);
        prop_assert_eq!(graph.iter().count(), total);
    }

    #[test]
    fn every_child_points_back_at_its_owner(shapes in prop::collection::vec(foo_shape(), 1..4)) {
        let graph = build(&shapes);
        for entity in graph.iter() {
            for child in entity.children() {
                let link = child.owner().unwrap();
                prop_assert_eq!(&link.parent, entity.identifier());
            }
        }
    }
}
