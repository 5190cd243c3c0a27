use narwhal::{Error, IndexTree, NodePair, Sizing, TreeOptions};

fn sample_tree() -> IndexTree {
    IndexTree::from_children(vec![vec![1, 2], vec![3, 4], vec![5], vec![], vec![], vec![]]).unwrap()
}

#[test]
fn from_children_rejects_out_of_range_children() {
    let err = IndexTree::from_children(vec![vec![1, 7], vec![]]).unwrap_err();
    assert_eq!(
        err,
        Error::ChildOutOfRange {
            parent: 0,
            child: 7,
            len: 2
        }
    );
}

#[test]
fn from_children_rejects_shared_children() {
    let err = IndexTree::from_children(vec![vec![1, 2], vec![2], vec![]]).unwrap_err();
    assert_eq!(err, Error::SharedChild { child: 2 });
}

#[test]
fn from_children_rejects_the_root_as_a_child() {
    let err = IndexTree::from_children(vec![vec![1], vec![0]]).unwrap_err();
    assert_eq!(err, Error::SharedChild { child: 0 });
}

#[test]
fn from_children_rejects_detached_cycles() {
    let err = IndexTree::from_children(vec![vec![], vec![2], vec![1]]).unwrap_err();
    assert_eq!(err, Error::Unreachable { node: 1 });
}

#[test]
fn traversal_orders_follow_child_order() {
    let tree = sample_tree();
    assert_eq!(tree.pre_order(), vec![0, 1, 3, 4, 2, 5]);
    assert_eq!(tree.post_order(), vec![3, 4, 1, 5, 2, 0]);
    assert_eq!(tree.depths(), vec![0, 1, 1, 2, 2, 2]);
}

#[test]
fn layout_is_deterministic() {
    let tree = sample_tree();
    let options = TreeOptions::extent(480.0, 360.0);
    let first = narwhal::layout(&tree, &options);
    let second = narwhal::layout(&tree, &options);
    assert_eq!(first, second);
    for v in 0..tree.len() {
        assert_eq!(first.x[v].to_bits(), second.x[v].to_bits());
        assert_eq!(first.y[v].to_bits(), second.y[v].to_bits());
    }
}

#[test]
fn extent_layout_fits_the_requested_box() {
    let tree = sample_tree();
    let out = narwhal::layout(&tree, &TreeOptions::extent(480.0, 360.0));
    for v in 0..tree.len() {
        assert!(out.x[v] > 0.0 && out.x[v] < 480.0, "x[{v}] = {}", out.x[v]);
        assert!(out.y[v] >= 0.0 && out.y[v] <= 360.0, "y[{v}] = {}", out.y[v]);
    }
    assert_eq!(out.y[3], 360.0);
    assert_eq!(out.y[1], 180.0);
}

#[test]
fn custom_separation_widens_the_layout() {
    fn wide(pair: NodePair) -> f64 {
        if pair.same_parent { 3.0 } else { 4.0 }
    }
    let mut tree = IndexTree::new();
    let a = tree.push_child(0);
    let b = tree.push_child(0);
    let out = narwhal::layout(&tree, &TreeOptions::node_size(10.0, 20.0).with_separation(wide));
    assert_eq!(out.x[b] - out.x[a], 30.0);
    assert_eq!(out.y[a], 20.0);
    assert!(matches!(
        TreeOptions::node_size(10.0, 20.0).sizing,
        Sizing::NodeSize { .. }
    ));
}
