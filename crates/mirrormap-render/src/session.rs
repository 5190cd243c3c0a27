//! The render entry point.
//!
//! A [`RenderSession`] is bound to one surface and re-rendered whenever the tree changes. Each
//! cycle lays the tree out, diffs it against the live scene and only then commits: a failed cycle
//! leaves the tree's positions, previous positions and side lists, and the scene, as they were.

use crate::config::{ClickOutcome, MindMapConfig};
use crate::layout::BidirectionalLayout;
use crate::reconcile::{Anchor, NodeVisual, PlannedNode, Reconciliation, reconcile};
use crate::scene::Scene;
use crate::surface::Surface;
use crate::Result;
use mirrormap_core::geom::point;
use mirrormap_core::{NodeId, NodeKey, TreeModel};
use rustc_hash::FxHashMap;
use std::time::Duration;

pub struct RenderSession<S> {
    config: MindMapConfig,
    surface: S,
    scene: Scene,
    selected: Option<NodeKey>,
    cycles: u64,
}

impl<S: Surface> RenderSession<S> {
    pub fn new(config: MindMapConfig, surface: S) -> Self {
        let scene = Scene::new(config.easing());
        Self {
            config,
            surface,
            scene,
            selected: None,
            cycles: 0,
        }
    }

    pub fn config(&self) -> &MindMapConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Completed render cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// The node new elements grow out of and exiting ones collapse into. `None` means the root.
    pub fn selected(&self) -> Option<&NodeKey> {
        self.selected.as_ref()
    }

    pub fn select(&mut self, key: Option<NodeKey>) {
        self.selected = key;
    }

    /// Runs one render cycle and draws its first frame.
    pub fn render(&mut self, tree: &mut TreeModel) -> Result<Reconciliation> {
        let (w, h) = self.config.inner_size();
        let layout = BidirectionalLayout::compute(tree, w, h)?;

        let ids: Vec<NodeId> = layout.iter().map(|n| n.id).collect();
        let keys = self.config.identity().resolve_all(tree, &ids)?;
        let key_of: FxHashMap<NodeId, &NodeKey> = ids.iter().copied().zip(&keys).collect();

        let root = tree.root();
        // The root always animates out of the middle of its own column.
        let root_origin = point(h / 2.0, 0.0);

        let mut planned = Vec::with_capacity(ids.len());
        for placed in layout.iter() {
            let node = tree.node(placed.id)?;
            let previous = if placed.id == root {
                Some(root_origin)
            } else {
                node.previous
            };
            planned.push(PlannedNode {
                key: key_of[&placed.id].clone(),
                id: placed.id,
                parent: placed.parent.map(|p| key_of[&p].clone()),
                previous,
                target: NodeVisual::new(placed.position, self.config.label(node), node.link.clone()),
            });
        }

        let selected = self
            .selected
            .as_ref()
            .and_then(|key| planned.iter().find(|p| &p.key == key))
            .unwrap_or(&planned[0]);
        let anchor = Anchor {
            previous: selected
                .previous
                .unwrap_or(selected.target.position),
            current: selected.target.position,
        };

        let rec = reconcile(&planned, &self.scene, anchor, self.config.hooks());

        // Commit.
        layout.apply(tree)?;
        for placed in layout.iter() {
            if let Some(node) = tree.get_mut(placed.id) {
                node.previous = Some(placed.position);
            }
        }
        self.scene.apply(&rec, self.config.duration());
        self.cycles += 1;
        tracing::debug!(
            cycle = self.cycles,
            entering = rec.entering().len(),
            persisting = rec.persisting().len(),
            exiting = rec.exiting().len(),
            "render cycle"
        );
        self.scene.draw(&self.config, self.cycles, &mut self.surface);
        Ok(rec)
    }

    /// Advances every running animation by `elapsed` and draws the resulting frame.
    ///
    /// Returns whether anything is still animating.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        self.scene.advance(elapsed);
        let removed = self.scene.prune();
        if removed > 0 {
            tracing::trace!(removed, "exit animations finished");
        }
        self.scene.draw(&self.config, self.cycles, &mut self.surface);
        self.scene.is_animating()
    }

    /// Runs the current animations to completion and draws the settled frame.
    pub fn finish(&mut self) {
        let duration = self.config.duration();
        self.tick(duration);
    }

    pub fn is_animating(&self) -> bool {
        self.scene.is_animating()
    }

    /// Handles a click on the node drawn under `key`.
    ///
    /// The clicked node becomes the selected node; when the configured handler reports a change
    /// a new cycle is rendered. Clicks on unknown or exiting elements are ignored.
    pub fn click(&mut self, tree: &mut TreeModel, key: &NodeKey) -> Result<Option<Reconciliation>> {
        let Some(id) = self.scene.node(key).and_then(|n| n.node) else {
            return Ok(None);
        };
        if !tree.contains(id) {
            return Ok(None);
        }
        self.selected = Some(key.clone());
        let outcome = match self.config.click_handler() {
            Some(handler) => handler(tree, id),
            None => ClickOutcome::Ignore,
        };
        match outcome {
            ClickOutcome::Rerender => self.render(tree).map(Some),
            ClickOutcome::Ignore => Ok(None),
        }
    }
}
