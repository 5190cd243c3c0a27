//! Elements currently on screen and their running animations.

use crate::config::MindMapConfig;
use crate::connector::Link;
use crate::reconcile::{NodeVisual, Phase, Reconciliation};
use crate::surface::{EdgeFrame, FrameInfo, NodeFrame, Surface};
use crate::transition::{Easing, Tween, cubic_in_out};
use indexmap::IndexMap;
use mirrormap_core::{NodeId, NodeKey};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct LiveNode {
    pub key: NodeKey,
    pub node: Option<NodeId>,
    pub phase: Phase,
    pub tween: Tween<NodeVisual>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveEdge {
    pub key: NodeKey,
    pub phase: Phase,
    pub tween: Tween<Link>,
}

/// The live set: everything drawn by the last cycle plus exits still shrinking.
#[derive(Debug, Clone)]
pub struct Scene {
    easing: Easing,
    nodes: IndexMap<NodeKey, LiveNode>,
    edges: IndexMap<NodeKey, LiveEdge>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(cubic_in_out)
    }
}

impl Scene {
    pub fn new(easing: Easing) -> Self {
        Self {
            easing,
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
        }
    }

    pub fn node_keys(&self) -> impl Iterator<Item = &NodeKey> {
        self.nodes.keys()
    }

    pub fn edge_keys(&self) -> impl Iterator<Item = &NodeKey> {
        self.edges.keys()
    }

    pub fn node(&self, key: &NodeKey) -> Option<&LiveNode> {
        self.nodes.get(key)
    }

    pub fn edge(&self, key: &NodeKey) -> Option<&LiveEdge> {
        self.edges.get(key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node's visual at this instant.
    pub fn current_node(&self, key: &NodeKey) -> Option<NodeVisual> {
        self.nodes.get(key).map(|n| n.tween.sample(self.easing))
    }

    /// The edge's geometry at this instant.
    pub fn current_edge(&self, key: &NodeKey) -> Option<Link> {
        self.edges.get(key).map(|e| e.tween.sample(self.easing))
    }

    pub fn is_animating(&self) -> bool {
        self.nodes.values().any(|n| !n.tween.progress.is_finished())
            || self.edges.values().any(|e| !e.tween.progress.is_finished())
    }

    /// Replaces the live set with the outcome of a new cycle. Animations restart from zero.
    pub(crate) fn apply(&mut self, rec: &Reconciliation, duration: Duration) {
        let mut nodes = IndexMap::with_capacity(rec.node_transitions.len());
        for t in &rec.node_transitions {
            nodes.insert(
                t.key.clone(),
                LiveNode {
                    key: t.key.clone(),
                    node: t.node,
                    phase: t.phase,
                    tween: Tween::new(t.from.clone(), t.to.clone(), duration),
                },
            );
        }
        let mut edges = IndexMap::with_capacity(rec.edge_transitions.len());
        for t in &rec.edge_transitions {
            edges.insert(
                t.key.clone(),
                LiveEdge {
                    key: t.key.clone(),
                    phase: t.phase,
                    tween: Tween::new(t.from, t.to, duration),
                },
            );
        }
        self.nodes = nodes;
        self.edges = edges;
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        for n in self.nodes.values_mut() {
            n.tween.progress.advance(dt);
        }
        for e in self.edges.values_mut() {
            e.tween.progress.advance(dt);
        }
    }

    /// Drops exiting elements whose animation has finished. Returns how many nodes left.
    pub(crate) fn prune(&mut self) -> usize {
        let before = self.nodes.len();
        self.nodes
            .retain(|_, n| !(n.phase == Phase::Exit && n.tween.progress.is_finished()));
        self.edges
            .retain(|_, e| !(e.phase == Phase::Exit && e.tween.progress.is_finished()));
        before - self.nodes.len()
    }

    /// Pushes the current state of every element to `surface`.
    pub(crate) fn draw(&self, config: &MindMapConfig, cycle: u64, surface: &mut dyn Surface) {
        surface.begin_frame(&FrameInfo {
            width: config.width(),
            height: config.height(),
            origin: config.origin(),
            cycle,
        });
        for e in self.edges.values() {
            let link = e.tween.sample(self.easing);
            surface.draw_edge(&EdgeFrame {
                key: e.key.clone(),
                phase: e.phase,
                path: config.connect(&link),
                link,
            });
        }
        for n in self.nodes.values() {
            surface.draw_node(&NodeFrame {
                key: n.key.clone(),
                phase: n.phase,
                visual: n.tween.sample(self.easing),
            });
        }
        surface.end_frame();
    }
}
