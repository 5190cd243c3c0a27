//! Keyed diff between the scene on screen and a freshly laid out tree.
//!
//! Every element (node, or the edge into a node) is matched by identity key and lands in exactly
//! one partition:
//! - entering: grows out of the selected node's previous position
//! - persisting: moves from its previous position to its new one
//! - exiting: shrinks into the selected node's new position, then leaves the scene

use crate::config::VisualHooks;
use crate::connector::Link;
use crate::scene::Scene;
use crate::transition::Interpolate;
use mirrormap_core::geom::Point;
use mirrormap_core::{NodeId, NodeKey};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

/// Radius and opacity used for "not visible yet" / "no longer visible".
pub const HIDDEN: f64 = 1e-6;
pub const NODE_RADIUS: f64 = 4.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Enter,
    Update,
    Exit,
}

/// Everything a surface needs to draw one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeVisual {
    pub position: Point,
    pub radius: f64,
    pub label_opacity: f64,
    pub label: String,
    pub link: Option<String>,
}

impl NodeVisual {
    pub fn new(position: Point, label: impl Into<String>, link: Option<String>) -> Self {
        Self {
            position,
            radius: NODE_RADIUS,
            label_opacity: 1.0,
            label: label.into(),
            link,
        }
    }
}

impl Interpolate for NodeVisual {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Self {
            position: self.position.interpolate(&to.position, t),
            radius: self.radius.interpolate(&to.radius, t),
            label_opacity: self.label_opacity.interpolate(&to.label_opacity, t),
            label: to.label.clone(),
            link: to.link.clone(),
        }
    }
}

/// Keys split three ways. Entering and persisting keep the new order; exiting keeps the old one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Partition {
    pub entering: Vec<NodeKey>,
    pub persisting: Vec<NodeKey>,
    pub exiting: Vec<NodeKey>,
}

pub fn partition<'a>(
    previous: impl IntoIterator<Item = &'a NodeKey>,
    next: impl IntoIterator<Item = &'a NodeKey>,
) -> Partition {
    let previous: Vec<&NodeKey> = previous.into_iter().collect();
    let before: FxHashSet<&NodeKey> = previous.iter().copied().collect();
    let mut after: FxHashSet<&NodeKey> = FxHashSet::default();
    let mut out = Partition::default();
    for key in next {
        if !after.insert(key) {
            continue;
        }
        if before.contains(key) {
            out.persisting.push(key.clone());
        } else {
            out.entering.push(key.clone());
        }
    }
    out.exiting = previous
        .into_iter()
        .filter(|k| !after.contains(k))
        .cloned()
        .collect();
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeTransition {
    pub key: NodeKey,
    /// `None` once the node has left the tree.
    pub node: Option<NodeId>,
    pub phase: Phase,
    pub from: NodeVisual,
    pub to: NodeVisual,
}

/// The edge into `key` from its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeTransition {
    pub key: NodeKey,
    pub phase: Phase,
    pub from: Link,
    pub to: Link,
}

/// Outcome of one render cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    pub nodes: Partition,
    pub edges: Partition,
    pub node_transitions: Vec<NodeTransition>,
    pub edge_transitions: Vec<EdgeTransition>,
}

impl Reconciliation {
    pub fn entering(&self) -> &[NodeKey] {
        &self.nodes.entering
    }

    pub fn persisting(&self) -> &[NodeKey] {
        &self.nodes.persisting
    }

    pub fn exiting(&self) -> &[NodeKey] {
        &self.nodes.exiting
    }

    pub fn node(&self, key: &NodeKey) -> Option<&NodeTransition> {
        self.node_transitions.iter().find(|t| &t.key == key)
    }

    pub fn edge(&self, key: &NodeKey) -> Option<&EdgeTransition> {
        self.edge_transitions.iter().find(|t| &t.key == key)
    }
}

/// One laid-out node, ready to be diffed.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedNode {
    pub key: NodeKey,
    pub id: NodeId,
    pub parent: Option<NodeKey>,
    /// Where the node was when the last cycle committed.
    pub previous: Option<Point>,
    pub target: NodeVisual,
}

/// The selected node's position before and after this cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub previous: Point,
    pub current: Point,
}

pub(crate) fn reconcile(
    planned: &[PlannedNode],
    scene: &Scene,
    anchor: Anchor,
    hooks: &VisualHooks,
) -> Reconciliation {
    let nodes = partition(scene.node_keys(), planned.iter().map(|p| &p.key));
    let edges = partition(
        scene.edge_keys(),
        planned
            .iter()
            .filter(|p| p.parent.is_some())
            .map(|p| &p.key),
    );
    let entering: FxHashSet<&NodeKey> = nodes.entering.iter().collect();
    let entering_edges: FxHashSet<&NodeKey> = edges.entering.iter().collect();

    let mut node_transitions = Vec::with_capacity(planned.len() + nodes.exiting.len());
    let mut edge_transitions = Vec::with_capacity(planned.len() + edges.exiting.len());

    for p in planned {
        let mut to = p.target.clone();
        (hooks.update)(&p.key, &mut to);

        let (phase, from) = if entering.contains(&p.key) {
            let mut from = p.target.clone();
            from.position = anchor.previous;
            (hooks.enter)(&p.key, &mut from);
            (Phase::Enter, from)
        } else {
            let mut from = scene
                .current_node(&p.key)
                .unwrap_or_else(|| p.target.clone());
            // A node still in flight continues from where it is drawn, matching its edge.
            let in_flight = scene
                .node(&p.key)
                .is_some_and(|n| !n.tween.progress.is_finished());
            if let Some(previous) = p.previous.filter(|_| !in_flight) {
                from.position = previous;
            }
            (Phase::Update, from)
        };
        node_transitions.push(NodeTransition {
            key: p.key.clone(),
            node: Some(p.id),
            phase,
            from,
            to,
        });
    }

    for key in &nodes.exiting {
        let Some(from) = scene.current_node(key) else {
            continue;
        };
        let mut to = from.clone();
        to.position = anchor.current;
        (hooks.exit)(key, &mut to);
        node_transitions.push(NodeTransition {
            key: key.clone(),
            node: scene.node(key).and_then(|n| n.node),
            phase: Phase::Exit,
            from,
            to,
        });
    }

    let positions: FxHashMap<&NodeKey, Point> = planned
        .iter()
        .map(|p| (&p.key, p.target.position))
        .collect();
    for p in planned {
        let Some(parent) = p.parent.as_ref() else {
            continue;
        };
        let Some(&source) = positions.get(parent) else {
            continue;
        };
        let to = Link::new(source, p.target.position);
        let (phase, from) = if entering_edges.contains(&p.key) {
            (Phase::Enter, Link::collapsed(anchor.previous))
        } else {
            (Phase::Update, scene.current_edge(&p.key).unwrap_or(to))
        };
        edge_transitions.push(EdgeTransition {
            key: p.key.clone(),
            phase,
            from,
            to,
        });
    }

    for key in &edges.exiting {
        let Some(from) = scene.current_edge(key) else {
            continue;
        };
        edge_transitions.push(EdgeTransition {
            key: key.clone(),
            phase: Phase::Exit,
            from,
            to: Link::collapsed(anchor.current),
        });
    }

    Reconciliation {
        nodes,
        edges,
        node_transitions,
        edge_transitions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(raw: &[&str]) -> Vec<NodeKey> {
        raw.iter().map(|k| NodeKey::from(*k)).collect()
    }

    #[test]
    fn partitions_are_disjoint_and_exhaustive() {
        let previous = keys(&["1", "2", "3", "4"]);
        let next = keys(&["5", "3", "1", "6"]);
        let p = partition(&previous, &next);
        assert_eq!(p.entering, keys(&["5", "6"]));
        assert_eq!(p.persisting, keys(&["3", "1"]));
        assert_eq!(p.exiting, keys(&["2", "4"]));

        let mut all: Vec<NodeKey> = p
            .entering
            .iter()
            .chain(&p.persisting)
            .chain(&p.exiting)
            .cloned()
            .collect();
        let total = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), total);

        let mut union: Vec<NodeKey> = previous.iter().chain(&next).cloned().collect();
        union.sort();
        union.dedup();
        assert_eq!(all, union);
    }

    #[test]
    fn first_render_is_all_entering() {
        let next = keys(&["a", "b"]);
        let p = partition(std::iter::empty(), &next);
        assert_eq!(p.entering, next);
        assert!(p.persisting.is_empty() && p.exiting.is_empty());
    }

    #[test]
    fn unchanged_sets_only_persist() {
        let set = keys(&["a", "b", "c"]);
        let p = partition(&set, &set);
        assert!(p.entering.is_empty());
        assert!(p.exiting.is_empty());
        assert_eq!(p.persisting, set);
    }

    #[test]
    fn visuals_interpolate_geometry_and_take_the_target_text() {
        use mirrormap_core::geom::point;
        let from = NodeVisual {
            radius: HIDDEN,
            ..NodeVisual::new(point(0.0, 0.0), "old", None)
        };
        let to = NodeVisual::new(point(10.0, 20.0), "new", Some("https://x".into()));
        let mid = from.interpolate(&to, 0.5);
        assert_eq!(mid.position, point(5.0, 10.0));
        assert!((mid.radius - (HIDDEN + NODE_RADIUS) / 2.0).abs() < 1e-12);
        assert_eq!(mid.label, "new");
        assert_eq!(from.interpolate(&to, 1.0), to);
    }
}
