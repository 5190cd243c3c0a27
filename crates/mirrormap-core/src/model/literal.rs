use super::{Node, NodeId, NodeKey, RootSides, Side, StructureResult, TreeModel};
use crate::error::StructureError;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// The plain nested shape a mind-map can be written in:
///
/// ```json
/// { "name": "Root", "children": [{ "name": "Branch", "url": "https://example.com" }] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeLiteral {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Explicit identity key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Side>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeLiteral>>,
}

impl TreeLiteral {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn branch(name: impl Into<String>, children: Vec<TreeLiteral>) -> Self {
        Self {
            name: name.into(),
            children: Some(children),
            ..Default::default()
        }
    }
}

/// One row of a flat parent-pointer listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub label: String,
}

impl NodeRecord {
    pub fn new(id: impl Into<String>, parent: Option<&str>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent: parent.map(str::to_string),
            label: label.into(),
        }
    }
}

fn node_from_literal(literal: &TreeLiteral, parent: Option<NodeId>) -> Node {
    let mut node = Node::new(literal.name.clone(), parent);
    node.key = literal.id.clone().map(NodeKey::new);
    node.link = literal.url.clone();
    node.direction = literal.direction;
    node.attributes = literal.attributes.clone();
    node
}

impl TreeModel {
    /// Builds a tree from its literal form. The root children's `direction`s, when present,
    /// become the root's side lists.
    pub fn from_literal(literal: &TreeLiteral) -> Self {
        let mut tree = TreeModel::new(String::new());
        let root = tree.root();
        tree.replace_root(node_from_literal(literal, None));

        let mut stack: Vec<(&TreeLiteral, NodeId)> = vec![(literal, root)];
        while let Some((lit, id)) = stack.pop() {
            let Some(children) = lit.children.as_ref() else {
                continue;
            };
            let mut ids = Vec::with_capacity(children.len());
            for child in children {
                let child_id = tree.push_detached(node_from_literal(child, Some(id)));
                ids.push(child_id);
                stack.push((child, child_id));
            }
            if let Some(node) = tree.get_mut(id) {
                node.children = ids;
            }
        }
        tree.sides_from_directions();
        tree
    }

    pub fn from_json(text: &str) -> crate::Result<Self> {
        let literal: TreeLiteral = serde_json::from_str(text)?;
        Ok(Self::from_literal(&literal))
    }

    /// Builds a tree from parent-pointer records. Record ids become identity keys.
    pub fn from_records(records: &[NodeRecord]) -> StructureResult<Self> {
        let mut index: FxHashMap<&str, usize> = FxHashMap::default();
        for (i, r) in records.iter().enumerate() {
            if index.insert(r.id.as_str(), i).is_some() {
                return Err(StructureError::DuplicateRecord { id: r.id.clone() });
            }
        }

        let roots: Vec<&NodeRecord> = records.iter().filter(|r| r.parent.is_none()).collect();
        let [root] = roots.as_slice() else {
            return Err(StructureError::MultipleRoots {
                count: roots.len(),
                roots: roots.iter().map(|r| r.id.clone()).collect(),
            });
        };

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
        for (i, r) in records.iter().enumerate() {
            let Some(parent) = r.parent.as_deref() else {
                continue;
            };
            let Some(&p) = index.get(parent) else {
                return Err(StructureError::MissingParent {
                    id: r.id.clone(),
                    parent: parent.to_string(),
                });
            };
            children[p].push(i);
        }

        let mut tree = TreeModel::new(root.label.clone());
        let root_id = tree.root();
        tree.set_key(root_id, NodeKey::new(root.id.clone()))?;

        let mut placed = vec![false; records.len()];
        let mut stack: Vec<(usize, NodeId)> = vec![(index[root.id.as_str()], root_id)];
        while let Some((rec, id)) = stack.pop() {
            placed[rec] = true;
            for &c in &children[rec] {
                let child_id = tree.add_child(id, records[c].label.clone())?;
                tree.set_key(child_id, NodeKey::new(records[c].id.clone()))?;
                stack.push((c, child_id));
            }
        }

        if let Some(i) = placed.iter().position(|p| !p) {
            return Err(StructureError::RecordCycle {
                id: records[i].id.clone(),
            });
        }
        Ok(tree)
    }

    /// Snapshot of the current structure in literal form.
    pub fn to_literal(&self) -> TreeLiteral {
        self.literal_of(self.root())
    }

    fn literal_of(&self, id: NodeId) -> TreeLiteral {
        let Some(node) = self.get(id) else {
            return TreeLiteral::default();
        };
        TreeLiteral {
            name: node.label.clone(),
            url: node.link.clone(),
            id: node.key.as_ref().map(|k| k.as_str().to_string()),
            direction: node.direction,
            attributes: node.attributes.clone(),
            children: if node.children.is_empty() {
                None
            } else {
                Some(node.children.iter().map(|c| self.literal_of(*c)).collect())
            },
        }
    }

    /// Attaches imported side lists built while the tree was assembled.
    pub(crate) fn install_sides(&mut self, left: Vec<NodeId>, right: Vec<NodeId>) -> StructureResult<()> {
        self.set_root_sides(RootSides { left, right })
    }
}
