use super::{KeySource, MonotonicKeys, Node, NodeId, NodeKey, Side};
use crate::error::StructureError;
use rustc_hash::FxHashSet;

pub type StructureResult<T> = std::result::Result<T, StructureError>;

/// The root's immediate children split into the two halves of the map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootSides {
    pub left: Vec<NodeId>,
    pub right: Vec<NodeId>,
}

impl RootSides {
    /// Even positions go right, odd positions left; order is preserved within each half.
    pub fn alternating(children: &[NodeId]) -> Self {
        let mut sides = Self::default();
        for (i, &child) in children.iter().enumerate() {
            sides.push(Side::for_index(i), child);
        }
        sides
    }

    pub fn get(&self, side: Side) -> &[NodeId] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn side_of(&self, id: NodeId) -> Option<Side> {
        if self.right.contains(&id) {
            Some(Side::Right)
        } else if self.left.contains(&id) {
            Some(Side::Left)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    pub(crate) fn push(&mut self, side: Side, id: NodeId) {
        match side {
            Side::Left => self.left.push(id),
            Side::Right => self.right.push(id),
        }
    }

    fn remove(&mut self, id: NodeId) {
        self.left.retain(|c| *c != id);
        self.right.retain(|c| *c != id);
    }
}

/// A single-rooted mind-map hierarchy.
///
/// Nodes live in an index arena; the parent link is a plain [`NodeId`] and children are kept in
/// order. Structural edits go through the methods below, which keep the tree acyclic and keep the
/// root's side lists in step with its children.
#[derive(Debug)]
pub struct TreeModel {
    slots: Vec<Option<Node>>,
    root: NodeId,
    sides: Option<RootSides>,
    keys: Box<dyn KeySource>,
    /// Every key ever placed on a node of this tree; the key source never reissues one.
    used_keys: FxHashSet<NodeKey>,
}

impl TreeModel {
    pub fn new(root_label: impl Into<String>) -> Self {
        Self {
            slots: vec![Some(Node::new(root_label, None))],
            root: NodeId(0),
            sides: None,
            keys: Box::new(MonotonicKeys::new()),
            used_keys: FxHashSet::default(),
        }
    }

    /// Replaces the identity counter. Keys already assigned are kept.
    pub fn with_key_source(mut self, keys: impl KeySource + 'static) -> Self {
        self.keys = Box::new(keys);
        self
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &Node {
        // The root slot is never vacated.
        match self.slots[self.root.0].as_ref() {
            Some(node) => node,
            None => unreachable!("root slot is always occupied"),
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn node(&self, id: NodeId) -> StructureResult<&Node> {
        self.get(id).ok_or(StructureError::UnknownNode { node: id })
    }

    pub fn node_mut(&mut self, id: NodeId) -> StructureResult<&mut Node> {
        self.get_mut(id).ok_or(StructureError::UnknownNode { node: id })
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        // The root always exists.
        false
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Live nodes in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|n| (NodeId(i), n)))
    }

    /// Nodes reachable from the root, parent before children, children in order.
    pub fn pre_order(&self) -> Vec<NodeId> {
        self.subtree(self.root)
    }

    /// `id` and all of its descendants in pre-order.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut seen: FxHashSet<NodeId> = FxHashSet::default();
        let mut stack = vec![id];
        while let Some(v) = stack.pop() {
            if !seen.insert(v) {
                continue;
            }
            let Some(node) = self.get(v) else {
                continue;
            };
            out.push(v);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    pub fn is_descendant(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut cur = Some(id);
        let mut steps = 0usize;
        while let Some(v) = cur {
            if v == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.slots.len() {
                return false;
            }
            cur = self.parent(v);
        }
        false
    }

    pub fn add_child(&mut self, parent: NodeId, label: impl Into<String>) -> StructureResult<NodeId> {
        self.node(parent)?;
        let id = NodeId(self.slots.len());
        self.slots.push(Some(Node::new(label, Some(parent))));
        self.attach(parent, id);
        Ok(id)
    }

    /// Detaches `id` and its descendants, returning the removed ids in pre-order.
    pub fn remove_subtree(&mut self, id: NodeId) -> StructureResult<Vec<NodeId>> {
        if id == self.root {
            return Err(StructureError::RootImmutable { action: "removed" });
        }
        self.node(id)?;
        self.detach(id);
        let removed = self.subtree(id);
        for v in &removed {
            self.slots[v.0] = None;
        }
        tracing::trace!(count = removed.len(), "removed subtree");
        Ok(removed)
    }

    /// Moves `id` (with its subtree) to the end of `new_parent`'s children.
    pub fn move_node(&mut self, id: NodeId, new_parent: NodeId) -> StructureResult<()> {
        if id == self.root {
            return Err(StructureError::RootImmutable { action: "moved" });
        }
        self.node(id)?;
        self.node(new_parent)?;
        if self.is_descendant(new_parent, id) {
            return Err(StructureError::Cycle { node: new_parent });
        }
        self.detach(id);
        if let Some(node) = self.get_mut(id) {
            node.parent = Some(new_parent);
        }
        self.attach(new_parent, id);
        Ok(())
    }

    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) -> StructureResult<()> {
        self.node_mut(id)?.label = label.into();
        Ok(())
    }

    pub fn set_link(&mut self, id: NodeId, link: Option<String>) -> StructureResult<()> {
        self.node_mut(id)?.link = link;
        Ok(())
    }

    pub fn key(&self, id: NodeId) -> Option<&NodeKey> {
        self.get(id).and_then(|n| n.key.as_ref())
    }

    pub fn set_key(&mut self, id: NodeId, key: NodeKey) -> StructureResult<()> {
        self.node_mut(id)?.key = Some(key.clone());
        self.used_keys.insert(key);
        Ok(())
    }

    /// Returns the node's key, drawing a fresh one from the key source the first time.
    ///
    /// Drawn keys that collide with an explicit key already in the tree are skipped.
    pub fn ensure_key(&mut self, id: NodeId) -> StructureResult<NodeKey> {
        if let Some(key) = self.node(id)?.key.clone() {
            return Ok(key);
        }
        let key = loop {
            let candidate = self.keys.next_key();
            if !self.used_keys.contains(&candidate) {
                break candidate;
            }
        };
        self.set_key(id, key.clone())?;
        Ok(key)
    }

    pub fn root_sides(&self) -> Option<&RootSides> {
        self.sides.as_ref()
    }

    /// Installs a side partition. It must list every child of the root exactly once.
    pub fn set_root_sides(&mut self, sides: RootSides) -> StructureResult<()> {
        let children = self.children(self.root);
        let mut listed: Vec<NodeId> = sides.left.iter().chain(&sides.right).copied().collect();
        let mut expected = children.to_vec();
        listed.sort();
        expected.sort();
        if listed != expected {
            return Err(StructureError::SideMismatch {
                listed: listed.len(),
                children: expected.len(),
            });
        }
        for side in [Side::Left, Side::Right] {
            for &child in sides.get(side) {
                if let Some(node) = self.get_mut(child) {
                    node.side = Some(side);
                }
            }
        }
        self.sides = Some(sides);
        Ok(())
    }

    pub fn clear_root_sides(&mut self) {
        self.sides = None;
    }

    /// Rebuilds the root's side lists from its children's `direction`s. Children without one take
    /// their alternation slot. Nothing is installed when no child carries a direction.
    pub(crate) fn sides_from_directions(&mut self) {
        let children = self.children(self.root).to_vec();
        let tagged = children
            .iter()
            .any(|&c| self.get(c).is_some_and(|n| n.direction.is_some()));
        if !tagged {
            return;
        }
        let mut sides = RootSides::default();
        for (i, &child) in children.iter().enumerate() {
            let side = self
                .get(child)
                .and_then(|n| n.direction)
                .unwrap_or_else(|| Side::for_index(i));
            sides.push(side, child);
            if let Some(node) = self.get_mut(child) {
                node.side = Some(side);
            }
        }
        self.sides = Some(sides);
    }

    /// Checks that every live node hangs off the root through consistent parent links, exactly
    /// once.
    pub fn validate(&self) -> StructureResult<()> {
        if self.root_node().parent.is_some() {
            return Err(StructureError::Cycle { node: self.root });
        }
        let mut seen: FxHashSet<NodeId> = FxHashSet::default();
        let mut stack = vec![self.root];
        while let Some(v) = stack.pop() {
            if !seen.insert(v) {
                return Err(StructureError::Cycle { node: v });
            }
            let node = self.node(v)?;
            for &child in &node.children {
                let child_node = self.node(child)?;
                if child_node.parent != Some(v) {
                    return Err(StructureError::ParentMismatch { node: child });
                }
                stack.push(child);
            }
        }
        if let Some((orphan, _)) = self.iter().find(|(id, _)| !seen.contains(id)) {
            return Err(StructureError::Orphan { node: orphan });
        }
        Ok(())
    }

    /// Overwrites the root's contents, keeping its place in the arena.
    pub(crate) fn replace_root(&mut self, node: Node) {
        if let Some(key) = &node.key {
            self.used_keys.insert(key.clone());
        }
        let root = self.root;
        self.slots[root.0] = Some(node);
    }

    pub(crate) fn push_detached(&mut self, node: Node) -> NodeId {
        if let Some(key) = &node.key {
            self.used_keys.insert(key.clone());
        }
        let id = NodeId(self.slots.len());
        self.slots.push(Some(node));
        id
    }

    fn attach(&mut self, parent: NodeId, id: NodeId) {
        let position = match self.get_mut(parent) {
            Some(p) => {
                p.children.push(id);
                p.children.len() - 1
            }
            None => return,
        };
        if parent != self.root || self.sides.is_none() {
            return;
        }
        // A late child of the root joins its imported direction, else the alternation slot.
        let side = self
            .get(id)
            .and_then(|n| n.direction)
            .unwrap_or_else(|| Side::for_index(position));
        if let Some(sides) = self.sides.as_mut() {
            sides.push(side, id);
        }
        if let Some(node) = self.get_mut(id) {
            node.side = Some(side);
        }
    }

    fn detach(&mut self, id: NodeId) {
        let parent = self.parent(id);
        if let Some(p) = parent.and_then(|p| self.get_mut(p)) {
            p.children.retain(|c| *c != id);
        }
        if parent == Some(self.root) {
            if let Some(sides) = self.sides.as_mut() {
                sides.remove(id);
            }
        }
    }
}
