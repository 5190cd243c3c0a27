use super::*;
use crate::error::StructureError;

fn abc() -> TreeModel {
    TreeModel::from_json(
        r#"{"name":"Root","children":[{"name":"A"},{"name":"B","url":"https://b.example"},{"name":"C"}]}"#,
    )
    .unwrap()
}

fn labels(tree: &TreeModel, ids: &[NodeId]) -> Vec<String> {
    ids.iter()
        .map(|id| tree.get(*id).unwrap().label.clone())
        .collect()
}

#[test]
fn literal_json_builds_ordered_children() {
    let tree = abc();
    let root = tree.root();
    assert_eq!(tree.root_node().label, "Root");
    assert_eq!(labels(&tree, tree.children(root)), ["A", "B", "C"]);
    let b = tree.children(root)[1];
    assert_eq!(tree.get(b).unwrap().link.as_deref(), Some("https://b.example"));
    assert_eq!(tree.parent(b), Some(root));
    assert!(tree.get(b).unwrap().is_leaf());
    assert_eq!(tree.len(), 4);
    tree.validate().unwrap();
}

#[test]
fn literal_round_trips_through_to_literal() {
    let literal = TreeLiteral::branch(
        "Root",
        vec![
            TreeLiteral::branch("Branch 1", vec![TreeLiteral::leaf("Leaf 3"), TreeLiteral::leaf("Leaf 4")]),
            TreeLiteral::leaf("Branch 2"),
        ],
    );
    let tree = TreeModel::from_literal(&literal);
    assert_eq!(tree.to_literal(), literal);
}

#[test]
fn keys_are_assigned_lazily_and_kept() {
    let mut tree = abc();
    let root = tree.root();
    let a = tree.children(root)[0];
    assert!(tree.key(a).is_none());

    let first = tree.ensure_key(a).unwrap();
    let root_key = tree.ensure_key(root).unwrap();
    assert_eq!(first.as_str(), "1");
    assert_eq!(root_key.as_str(), "2");
    assert_eq!(tree.ensure_key(a).unwrap(), first);
}

#[test]
fn key_source_is_injectable() {
    let mut tree = abc().with_key_source(PrefixedKeys::new("k"));
    let root = tree.root();
    assert_eq!(tree.ensure_key(root).unwrap().as_str(), "k1");
}

#[test]
fn explicit_literal_ids_become_keys() {
    let mut tree = TreeModel::from_json(r#"{"name":"Root","id":"root","children":[{"name":"A","id":"a"}]}"#)
        .unwrap();
    let root = tree.root();
    let a = tree.children(root)[0];
    assert_eq!(tree.key(root).unwrap().as_str(), "root");
    assert_eq!(tree.ensure_key(a).unwrap().as_str(), "a");
}

#[test]
fn remove_subtree_detaches_all_descendants() {
    let mut tree = abc();
    let root = tree.root();
    let b = tree.children(root)[1];
    let b1 = tree.add_child(b, "B1").unwrap();
    let removed = tree.remove_subtree(b).unwrap();
    assert_eq!(removed, vec![b, b1]);
    assert!(!tree.contains(b1));
    assert_eq!(labels(&tree, tree.children(root)), ["A", "C"]);
    tree.validate().unwrap();
}

#[test]
fn root_cannot_be_removed_or_moved() {
    let mut tree = abc();
    let root = tree.root();
    let a = tree.children(root)[0];
    assert_eq!(
        tree.remove_subtree(root).unwrap_err(),
        StructureError::RootImmutable { action: "removed" }
    );
    assert_eq!(
        tree.move_node(root, a).unwrap_err(),
        StructureError::RootImmutable { action: "moved" }
    );
}

#[test]
fn move_node_rejects_cycles() {
    let mut tree = abc();
    let root = tree.root();
    let a = tree.children(root)[0];
    let a1 = tree.add_child(a, "A1").unwrap();
    assert_eq!(
        tree.move_node(a, a1).unwrap_err(),
        StructureError::Cycle { node: a1 }
    );
    assert_eq!(tree.move_node(a, a).unwrap_err(), StructureError::Cycle { node: a });

    let c = tree.children(root)[2];
    tree.move_node(a1, c).unwrap();
    assert_eq!(tree.parent(a1), Some(c));
    assert!(tree.children(a).is_empty());
    tree.validate().unwrap();
}

#[test]
fn alternating_sides_split_ceil_and_floor() {
    for count in 0..7usize {
        let mut tree = TreeModel::new("root");
        let root = tree.root();
        for i in 0..count {
            tree.add_child(root, format!("c{i}")).unwrap();
        }
        let sides = RootSides::alternating(tree.children(root));
        assert_eq!(sides.right.len(), count.div_ceil(2));
        assert_eq!(sides.left.len(), count / 2);
        assert_eq!(RootSides::alternating(tree.children(root)), sides);
    }
}

#[test]
fn set_root_sides_requires_every_root_child_once() {
    let mut tree = abc();
    let root = tree.root();
    let kids = tree.children(root).to_vec();
    let err = tree
        .set_root_sides(RootSides {
            left: vec![kids[0]],
            right: vec![kids[1]],
        })
        .unwrap_err();
    assert_eq!(err, StructureError::SideMismatch { listed: 2, children: 3 });

    tree.set_root_sides(RootSides {
        left: vec![kids[2]],
        right: vec![kids[0], kids[1]],
    })
    .unwrap();
    assert_eq!(tree.get(kids[2]).unwrap().side, Some(Side::Left));
}

#[test]
fn late_root_children_join_a_side() {
    let mut tree = abc();
    let root = tree.root();
    let sides = RootSides::alternating(tree.children(root));
    tree.set_root_sides(sides).unwrap();

    let d = tree.add_child(root, "D").unwrap();
    assert_eq!(tree.root_sides().unwrap().side_of(d), Some(Side::Left));

    let b = tree.children(root)[1];
    tree.remove_subtree(b).unwrap();
    assert_eq!(tree.root_sides().unwrap().side_of(b), None);
    assert_eq!(tree.root_sides().unwrap().len(), 3);
}

#[test]
fn records_build_a_keyed_tree() {
    let records = vec![
        NodeRecord::new("r", None, "Root"),
        NodeRecord::new("a", Some("r"), "A"),
        NodeRecord::new("b", Some("r"), "B"),
        NodeRecord::new("a1", Some("a"), "A1"),
    ];
    let tree = TreeModel::from_records(&records).unwrap();
    let root = tree.root();
    assert_eq!(tree.key(root).unwrap().as_str(), "r");
    assert_eq!(labels(&tree, tree.children(root)), ["A", "B"]);
    let a = tree.children(root)[0];
    assert_eq!(labels(&tree, tree.children(a)), ["A1"]);
}

#[test]
fn records_with_two_roots_are_rejected() {
    let records = vec![NodeRecord::new("r", None, "Root"), NodeRecord::new("s", None, "Other")];
    let err = TreeModel::from_records(&records).unwrap_err();
    assert_eq!(
        err,
        StructureError::MultipleRoots {
            count: 2,
            roots: vec!["r".to_string(), "s".to_string()]
        }
    );
}

#[test]
fn records_with_a_cycle_are_rejected() {
    let records = vec![
        NodeRecord::new("r", None, "Root"),
        NodeRecord::new("x", Some("y"), "X"),
        NodeRecord::new("y", Some("x"), "Y"),
    ];
    let err = TreeModel::from_records(&records).unwrap_err();
    assert_eq!(err, StructureError::RecordCycle { id: "x".to_string() });
}

#[test]
fn records_with_missing_parent_or_duplicate_ids_are_rejected() {
    let missing = vec![NodeRecord::new("r", None, "Root"), NodeRecord::new("a", Some("zz"), "A")];
    assert_eq!(
        TreeModel::from_records(&missing).unwrap_err(),
        StructureError::MissingParent {
            id: "a".to_string(),
            parent: "zz".to_string()
        }
    );

    let dup = vec![NodeRecord::new("r", None, "Root"), NodeRecord::new("r", Some("r"), "R")];
    assert_eq!(
        TreeModel::from_records(&dup).unwrap_err(),
        StructureError::DuplicateRecord { id: "r".to_string() }
    );
}

#[test]
fn side_parse_ignores_case() {
    assert_eq!(Side::parse("LEFT"), Some(Side::Left));
    assert_eq!(Side::parse(" right "), Some(Side::Right));
    assert_eq!(Side::parse("up"), None);
    assert_eq!(Side::for_index(0), Side::Right);
    assert_eq!(Side::for_index(1), Side::Left);
}

#[test]
fn validate_reports_shared_orphaned_and_cyclic_nodes() {
    let mut tree = abc();
    let root = tree.root();
    let (a, c) = (tree.children(root)[0], tree.children(root)[2]);
    tree.get_mut(a).unwrap().children.push(c);
    assert_eq!(tree.validate(), Err(StructureError::ParentMismatch { node: c }));

    let mut tree = abc();
    let stray = tree.push_detached(Node::new("stray", Some(root)));
    assert_eq!(tree.validate(), Err(StructureError::Orphan { node: stray }));

    let mut tree = abc();
    tree.get_mut(root).unwrap().parent = Some(a);
    assert_eq!(tree.validate(), Err(StructureError::Cycle { node: root }));
}

#[test]
fn lazy_keys_skip_explicit_literal_ids() {
    let mut tree = TreeModel::from_json(
        r#"{"name":"Root","children":[{"name":"A","id":"1"},{"name":"B"}]}"#,
    )
    .unwrap();
    let root = tree.root();
    let (a, b) = (tree.children(root)[0], tree.children(root)[1]);
    assert_eq!(tree.ensure_key(root).unwrap().as_str(), "2");
    assert_eq!(tree.ensure_key(a).unwrap().as_str(), "1");
    assert_eq!(tree.ensure_key(b).unwrap().as_str(), "3");
}

#[test]
fn lazy_keys_skip_record_ids_and_set_keys() {
    let mut tree = TreeModel::from_records(&[
        NodeRecord::new("1", None, "Root"),
        NodeRecord::new("2", Some("1"), "Child"),
    ])
    .unwrap();
    let root = tree.root();
    let late = tree.add_child(root, "Late").unwrap();
    assert_eq!(tree.ensure_key(late).unwrap().as_str(), "3");

    let mut tree = TreeModel::new("root");
    let root = tree.root();
    let child = tree.add_child(root, "child").unwrap();
    tree.set_key(child, NodeKey::from("1")).unwrap();
    assert_eq!(tree.ensure_key(root).unwrap().as_str(), "2");
}

#[test]
fn literal_round_trip_keeps_imported_sides() {
    let imported = crate::import::import_freemind_str(
        r#"<map><node TEXT="root">
            <node TEXT="one" POSITION="left"/>
            <node TEXT="two" POSITION="left"/>
            <node TEXT="three" POSITION="right"/>
        </node></map>"#,
    )
    .unwrap();
    let json = serde_json::to_string(&imported.to_literal()).unwrap();
    let tree = TreeModel::from_json(&json).unwrap();

    let sides = tree.root_sides().expect("sides rebuilt from directions");
    assert_eq!(labels(&tree, &sides.left), ["one", "two"]);
    assert_eq!(labels(&tree, &sides.right), ["three"]);
    let three = tree.children(tree.root())[2];
    assert_eq!(tree.get(three).unwrap().side, Some(Side::Right));
}

#[test]
fn partially_tagged_literals_fill_gaps_by_alternation() {
    let tree = TreeModel::from_json(
        r#"{"name":"Root","children":[{"name":"A","direction":"left"},{"name":"B"},{"name":"C"}]}"#,
    )
    .unwrap();
    let sides = tree.root_sides().expect("sides installed");
    assert_eq!(labels(&tree, &sides.left), ["A", "B"]);
    assert_eq!(labels(&tree, &sides.right), ["C"]);

    assert_eq!(abc().root_sides(), None);
}
