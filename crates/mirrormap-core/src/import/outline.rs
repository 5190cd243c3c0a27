//! Outline nodes: FreeMind `<node>` elements with their direction resolved.

use super::xml::{XmlElement, XmlValue};
use crate::error::ImportError;
use crate::model::{NodeId, Side, TreeModel};
use indexmap::IndexMap;

pub const NODE_ELEMENT: &str = "node";
pub const MAP_ELEMENT: &str = "map";
const POSITION_FIELD: &str = "position";

/// Children of one outline node, grouped by their own resolved direction.
///
/// Entries are indices into [`OutlineNode::children`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectionBuckets {
    pub left: Vec<usize>,
    pub right: Vec<usize>,
}

impl DirectionBuckets {
    fn push(&mut self, side: Side, index: usize) {
        match side {
            Side::Left => self.left.push(index),
            Side::Right => self.right.push(index),
        }
    }

    pub fn get(&self, side: Side) -> &[usize] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutlineNode {
    /// Every attribute, name lower-cased.
    pub fields: IndexMap<String, String>,
    /// Own `POSITION`, else the nearest ancestor's direction.
    pub direction: Side,
    /// `None` for leaves.
    pub children: Option<Vec<OutlineNode>>,
    pub buckets: DirectionBuckets,
    /// Text of a `<richcontent TYPE="NODE">` body, for nodes without a `TEXT` attribute.
    pub rich_text: Option<String>,
}

impl OutlineNode {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn label(&self) -> String {
        self.field("text")
            .map(str::to_string)
            .or_else(|| self.rich_text.clone())
            .unwrap_or_default()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Number of outline nodes in this subtree.
    pub fn count(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(OutlineNode::count)
            .sum::<usize>()
    }

    /// Builds the tree model. The root's direction buckets become its side lists.
    pub fn into_tree_model(self) -> Result<TreeModel, ImportError> {
        let mut tree = TreeModel::new(self.label());
        let root = tree.root();
        fill_node(&mut tree, root, &self);

        let mut stack: Vec<(&OutlineNode, NodeId)> = vec![(&self, root)];
        let mut root_children: Vec<NodeId> = Vec::new();
        while let Some((outline, id)) = stack.pop() {
            for child in outline.children.iter().flatten() {
                let child_id = tree
                    .add_child(id, child.label())
                    .map_err(|e| ImportError::parse(e.to_string()))?;
                fill_node(&mut tree, child_id, child);
                if id == root {
                    root_children.push(child_id);
                }
                stack.push((child, child_id));
            }
        }

        let pick = |indices: &[usize]| -> Vec<NodeId> {
            indices
                .iter()
                .filter_map(|&i| root_children.get(i).copied())
                .collect()
        };
        let left = pick(self.buckets.get(Side::Left));
        let right = pick(self.buckets.get(Side::Right));
        tree.install_sides(left, right)
            .map_err(|e| ImportError::parse(e.to_string()))?;
        Ok(tree)
    }
}

fn fill_node(tree: &mut TreeModel, id: NodeId, outline: &OutlineNode) {
    let Some(node) = tree.get_mut(id) else {
        return;
    };
    node.attributes = outline.fields.clone();
    node.link = outline.field("link").map(str::to_string);
    node.direction = Some(outline.direction);
}

/// Resolves the single top-level `<node>` of a `<map>` document.
pub fn outline_from_document(doc: &XmlElement) -> Result<OutlineNode, ImportError> {
    if doc.name != MAP_ELEMENT {
        return Err(ImportError::parse(format!(
            "expected a <{MAP_ELEMENT}> root element, found <{}>",
            doc.name
        )));
    }
    let nodes: Vec<&XmlValue> = doc.children_named(NODE_ELEMENT).collect();
    match nodes.as_slice() {
        [] => Err(ImportError::parse("the map has no <node> element")),
        [XmlValue::Element(root)] => Ok(outline_from_element(root, Side::Right)),
        [XmlValue::Text(_)] => Err(ImportError::parse("the map's <node> is not an element")),
        many => Err(ImportError::parse(format!(
            "the map has {} top-level <node> elements; exactly one root is required",
            many.len()
        ))),
    }
}

/// Converts one `<node>` element. `inherited` is the caller's effective direction.
pub fn outline_from_element(el: &XmlElement, inherited: Side) -> OutlineNode {
    let mut fields: IndexMap<String, String> = IndexMap::with_capacity(el.attributes.len());
    for (name, value) in &el.attributes {
        fields.insert(name.to_lowercase(), value.clone());
    }

    let own = match fields.get(POSITION_FIELD) {
        Some(raw) => {
            let parsed = Side::parse(raw);
            if parsed.is_none() {
                tracing::warn!(position = %raw, "ignoring unknown POSITION value");
            }
            parsed
        }
        None => None,
    };
    let direction = own.unwrap_or(inherited);

    let rich_text = el
        .children_named("richcontent")
        .filter_map(XmlValue::as_element)
        .find(|rc| rc.attribute("TYPE").is_none_or(|t| t.eq_ignore_ascii_case("node")))
        .map(XmlElement::text_content)
        .filter(|t| !t.is_empty());

    let mut buckets = DirectionBuckets::default();
    let mut children: Vec<OutlineNode> = Vec::new();
    for child in el.children_named(NODE_ELEMENT).filter_map(XmlValue::as_element) {
        let child = outline_from_element(child, direction);
        buckets.push(child.direction, children.len());
        children.push(child);
    }

    OutlineNode {
        fields,
        direction,
        children: if children.is_empty() {
            None
        } else {
            Some(children)
        },
        buckets,
        rich_text,
    }
}
