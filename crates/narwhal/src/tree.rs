//! Input and output types for the tidy tree layout.

use crate::{Error, Result};

/// An ordered rooted tree addressed by dense indices. Node `0` is the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTree {
    children: Vec<Vec<usize>>,
    parents: Vec<Option<usize>>,
}

impl Default for IndexTree {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexTree {
    /// A tree holding only the root.
    pub fn new() -> Self {
        Self {
            children: vec![Vec::new()],
            parents: vec![None],
        }
    }

    /// Builds a tree from per-node child lists.
    ///
    /// Every index other than `0` must appear exactly once as a child and be reachable from the
    /// root.
    pub fn from_children(children: Vec<Vec<usize>>) -> Result<Self> {
        if children.is_empty() {
            return Ok(Self::new());
        }
        let len = children.len();
        let mut parents: Vec<Option<usize>> = vec![None; len];
        for (parent, kids) in children.iter().enumerate() {
            for &child in kids {
                if child >= len {
                    return Err(Error::ChildOutOfRange { parent, child, len });
                }
                if child == 0 || parents[child].is_some() {
                    return Err(Error::SharedChild { child });
                }
                parents[child] = Some(parent);
            }
        }

        let mut seen = vec![false; len];
        let mut stack = vec![0usize];
        while let Some(v) = stack.pop() {
            seen[v] = true;
            stack.extend(children[v].iter().copied());
        }
        if let Some(node) = seen.iter().position(|s| !s) {
            return Err(Error::Unreachable { node });
        }

        Ok(Self { children, parents })
    }

    /// Appends a new node under `parent` and returns its index.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a node of this tree.
    pub fn push_child(&mut self, parent: usize) -> usize {
        assert!(parent < self.children.len(), "unknown parent {parent}");
        let id = self.children.len();
        self.children.push(Vec::new());
        self.parents.push(Some(parent));
        self.children[parent].push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root always exists.
        false
    }

    pub fn children(&self, node: usize) -> &[usize] {
        &self.children[node]
    }

    pub fn parent(&self, node: usize) -> Option<usize> {
        self.parents[node]
    }

    /// Nodes in pre-order (parent before children, children left to right).
    pub fn pre_order(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack = vec![0usize];
        while let Some(v) = stack.pop() {
            out.push(v);
            stack.extend(self.children[v].iter().rev().copied());
        }
        out
    }

    /// Nodes in post-order (children left to right before their parent).
    pub fn post_order(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack = vec![0usize];
        while let Some(v) = stack.pop() {
            out.push(v);
            stack.extend(self.children[v].iter().copied());
        }
        out.reverse();
        out
    }

    /// Depth of every node (root = 0).
    pub fn depths(&self) -> Vec<usize> {
        let mut depth = vec![0usize; self.len()];
        for v in self.pre_order() {
            if let Some(p) = self.parents[v] {
                depth[v] = depth[p] + 1;
            }
        }
        depth
    }
}

/// The two nodes a separation is measured between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodePair {
    pub a: usize,
    pub b: usize,
    /// Both nodes hang off the same parent (the root counts as its own sibling).
    pub same_parent: bool,
    pub depth: usize,
}

/// Minimum distance between two adjacent nodes, in breadth units.
pub type Separation = fn(NodePair) -> f64;

/// Siblings sit one unit apart, cousins two.
pub fn default_separation(pair: NodePair) -> f64 {
    if pair.same_parent { 1.0 } else { 2.0 }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sizing {
    /// Scale the whole tree into `breadth × depth`.
    Extent { breadth: f64, depth: f64 },
    /// Fixed spacing per breadth unit and per level. The root sits at breadth `0`.
    NodeSize { breadth: f64, depth: f64 },
}

#[derive(Debug, Clone, Copy)]
pub struct TreeOptions {
    pub sizing: Sizing,
    pub separation: Separation,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            sizing: Sizing::Extent {
                breadth: 1.0,
                depth: 1.0,
            },
            separation: default_separation,
        }
    }
}

impl TreeOptions {
    pub fn extent(breadth: f64, depth: f64) -> Self {
        Self {
            sizing: Sizing::Extent { breadth, depth },
            ..Default::default()
        }
    }

    pub fn node_size(breadth: f64, depth: f64) -> Self {
        Self {
            sizing: Sizing::NodeSize { breadth, depth },
            ..Default::default()
        }
    }

    pub fn with_separation(mut self, separation: Separation) -> Self {
        self.separation = separation;
        self
    }
}

/// Final coordinates, indexed like the input tree.
///
/// `x` runs along the breadth axis (siblings are spread along it), `y` along the depth axis.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeLayout {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub depth: Vec<usize>,
}

impl TreeLayout {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn position(&self, node: usize) -> (f64, f64) {
        (self.x[node], self.y[node])
    }
}
