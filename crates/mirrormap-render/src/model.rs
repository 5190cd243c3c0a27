//! Serializable layout output.

use crate::config::MindMapConfig;
use crate::connector::Link;
use crate::layout::BidirectionalLayout;
use mirrormap_core::{Side, TreeModel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutNode {
    /// Arena index of the node.
    pub id: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    pub depth: usize,
    /// Vertical offset inside the drawing area.
    pub x: f64,
    /// Signed horizontal distance from the root.
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub source: usize,
    pub target: usize,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MindMapLayout {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    /// Bounds of the node positions in screen orientation (`x` horizontal).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
}

impl MindMapLayout {
    pub fn from_layout(tree: &TreeModel, layout: &BidirectionalLayout, config: &MindMapConfig) -> Self {
        let mut nodes = Vec::with_capacity(layout.len());
        let mut edges = Vec::with_capacity(layout.len().saturating_sub(1));
        for placed in layout.iter() {
            let Some(node) = tree.get(placed.id) else {
                continue;
            };
            nodes.push(LayoutNode {
                id: placed.id.index(),
                key: node.key().map(|k| k.as_str().to_string()),
                label: config.label(node),
                parent: placed.parent.map(|p| p.index()),
                side: placed.side,
                depth: placed.depth,
                x: placed.position.x,
                y: placed.position.y,
            });
            let Some(parent) = placed.parent else {
                continue;
            };
            let Some(source) = layout.position(parent) else {
                continue;
            };
            edges.push(LayoutEdge {
                source: parent.index(),
                target: placed.id.index(),
                path: config.connect(&Link::new(source, placed.position)),
            });
        }
        let bounds = Bounds::from_points(nodes.iter().map(|n| (n.y, n.x)));
        Self {
            width: config.width(),
            height: config.height(),
            nodes,
            edges,
            bounds,
        }
    }
}
