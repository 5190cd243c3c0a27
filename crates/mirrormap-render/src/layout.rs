//! Two mirrored tidy trees sharing one root.
//!
//! The root's children are split into a right and a left half. Each half is laid out on its own
//! by `narwhal` with the root as its top node; the right pass owns the root's coordinates and the
//! left pass is mirrored by negating its horizontal axis.
//!
//! Coordinates follow the dendrogram convention: `x` is the vertical offset inside the viewport,
//! `y` the signed horizontal distance from the root (negative on the left).

use crate::Result;
use indexmap::IndexMap;
use mirrormap_core::geom::{Point, point};
use mirrormap_core::{NodeId, RootSides, Side, TreeModel};
use narwhal::{IndexTree, TreeLayout, TreeOptions};

/// Depth given up by the left half so its labels clear the root.
pub const LEFT_GUTTER: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    /// `None` for the root.
    pub side: Option<Side>,
    pub depth: usize,
    pub position: Point,
}

/// Coordinates for every node of a tree, computed without touching the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct BidirectionalLayout {
    width: f64,
    height: f64,
    root: NodeId,
    sides: RootSides,
    nodes: IndexMap<NodeId, PlacedNode>,
}

/// The root's side lists: the stored ones when they cover every child, else parity alternation.
pub fn side_partition(tree: &TreeModel) -> RootSides {
    let children = tree.children(tree.root());
    match tree.root_sides() {
        Some(sides) if sides.len() == children.len() => sides.clone(),
        _ => RootSides::alternating(children),
    }
}

struct HalfPass {
    ids: Vec<NodeId>,
    index: IndexTree,
    layout: TreeLayout,
}

fn half_pass(tree: &TreeModel, top: &[NodeId], breadth: f64, depth: f64) -> HalfPass {
    let mut index = IndexTree::new();
    let mut ids = vec![tree.root()];
    for &child in top {
        index.push_child(0);
        ids.push(child);
    }
    // Indices are handed out in visiting order, so `cursor` is also the IndexTree index.
    let mut cursor = 1;
    while cursor < ids.len() {
        let id = ids[cursor];
        for &child in tree.children(id) {
            index.push_child(cursor);
            ids.push(child);
        }
        cursor += 1;
    }
    let layout = narwhal::layout(&index, &TreeOptions::extent(breadth, depth));
    HalfPass { ids, index, layout }
}

impl BidirectionalLayout {
    /// Lays out `tree` in a `width × height` viewport (margins already removed).
    pub fn compute(tree: &TreeModel, width: f64, height: f64) -> Result<Self> {
        tree.validate()?;
        let root = tree.root();
        let sides = side_partition(tree);

        let right = half_pass(tree, sides.get(Side::Right), height, width / 2.0);
        let left = half_pass(
            tree,
            sides.get(Side::Left),
            height,
            width / 2.0 - LEFT_GUTTER,
        );
        tracing::trace!(
            right = right.ids.len() - 1,
            left = left.ids.len() - 1,
            "laid out both halves"
        );

        let mut nodes: IndexMap<NodeId, PlacedNode> = IndexMap::with_capacity(tree.len());
        for i in right.index.pre_order() {
            let (x, y) = right.layout.position(i);
            nodes.insert(
                right.ids[i],
                PlacedNode {
                    id: right.ids[i],
                    parent: right.index.parent(i).map(|p| right.ids[p]),
                    side: (i != 0).then_some(Side::Right),
                    depth: right.layout.depth[i],
                    position: point(x, y),
                },
            );
        }
        for i in left.index.pre_order().into_iter().skip(1) {
            let (x, y) = left.layout.position(i);
            nodes.insert(
                left.ids[i],
                PlacedNode {
                    id: left.ids[i],
                    parent: left.index.parent(i).map(|p| left.ids[p]),
                    side: Some(Side::Left),
                    depth: left.layout.depth[i],
                    position: point(x, -y),
                },
            );
        }

        Ok(Self {
            width,
            height,
            root,
            sides,
            nodes,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn sides(&self) -> &RootSides {
        &self.sides
    }

    pub fn get(&self, id: NodeId) -> Option<&PlacedNode> {
        self.nodes.get(&id)
    }

    pub fn position(&self, id: NodeId) -> Option<Point> {
        self.get(id).map(|n| n.position)
    }

    /// Root first, then the right half in pre-order, then the left half in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Writes side lists, positions, depths and sides back onto the tree.
    pub fn apply(&self, tree: &mut TreeModel) -> Result<()> {
        tree.set_root_sides(self.sides.clone())?;
        for placed in self.nodes.values() {
            let Some(node) = tree.get_mut(placed.id) else {
                continue;
            };
            node.position = Some(placed.position);
            node.depth = placed.depth;
            node.side = placed.side;
        }
        Ok(())
    }
}
