use crate::geom::Point;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Arena index of a node inside one [`TreeModel`](super::TreeModel).
///
/// Ids are never reused: removing a subtree leaves its slots empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Stable identity of a node across render cycles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(String);

impl NodeKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for NodeKey {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for NodeKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which half of the mind-map a subtree is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    /// Parses `left`/`right`, ignoring ASCII case and surrounding whitespace.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("left") {
            Some(Side::Left)
        } else if raw.eq_ignore_ascii_case("right") {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// Even child indices go right, odd ones left.
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 1 { Side::Left } else { Side::Right }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) key: Option<NodeKey>,
    pub label: String,
    pub link: Option<String>,
    /// Imported attributes, names lower-cased, in document order.
    pub attributes: IndexMap<String, String>,
    /// Direction resolved at import time.
    pub direction: Option<Side>,
    /// Half assigned by the last committed layout.
    pub side: Option<Side>,
    /// Depth assigned by the last committed layout (root = 0).
    pub depth: usize,
    /// Position assigned by the last committed layout: `x` is the vertical offset, `y` the signed
    /// horizontal distance from the root.
    pub position: Option<Point>,
    /// Animation baseline for the next render cycle.
    pub previous: Option<Point>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(label: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            key: None,
            label: label.into(),
            link: None,
            attributes: IndexMap::new(),
            direction: None,
            side: None,
            depth: 0,
            position: None,
            previous: None,
            parent,
            children: Vec::new(),
        }
    }

    pub fn key(&self) -> Option<&NodeKey> {
        self.key.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}
