//! Drawing seam between the engine and whatever shows the map.

use crate::connector::Link;
use crate::reconcile::{NodeVisual, Phase};
use mirrormap_core::NodeKey;

/// Frame-wide parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub width: f64,
    pub height: f64,
    /// Surface offset of the layout origin (screen `x`, screen `y`).
    pub origin: (f64, f64),
    /// Render cycle that produced the frame, starting at 1.
    pub cycle: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeFrame {
    pub key: NodeKey,
    pub phase: Phase,
    pub visual: NodeVisual,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeFrame {
    pub key: NodeKey,
    pub phase: Phase,
    pub link: Link,
    /// SVG path data from the configured connector.
    pub path: String,
}

/// Receives one frame at a time: `begin_frame`, every edge, every node, `end_frame`.
pub trait Surface {
    fn begin_frame(&mut self, info: &FrameInfo);
    fn draw_edge(&mut self, edge: &EdgeFrame);
    fn draw_node(&mut self, node: &NodeFrame);
    fn end_frame(&mut self);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn begin_frame(&mut self, info: &FrameInfo) {
        (**self).begin_frame(info)
    }

    fn draw_edge(&mut self, edge: &EdgeFrame) {
        (**self).draw_edge(edge)
    }

    fn draw_node(&mut self, node: &NodeFrame) {
        (**self).draw_node(node)
    }

    fn end_frame(&mut self) {
        (**self).end_frame()
    }
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn begin_frame(&mut self, info: &FrameInfo) {
        (**self).begin_frame(info)
    }

    fn draw_edge(&mut self, edge: &EdgeFrame) {
        (**self).draw_edge(edge)
    }

    fn draw_node(&mut self, node: &NodeFrame) {
        (**self).draw_node(node)
    }

    fn end_frame(&mut self) {
        (**self).end_frame()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub info: FrameInfo,
    pub edges: Vec<EdgeFrame>,
    pub nodes: Vec<NodeFrame>,
}

impl Frame {
    pub fn node(&self, key: &NodeKey) -> Option<&NodeFrame> {
        self.nodes.iter().find(|n| &n.key == key)
    }

    pub fn edge(&self, key: &NodeKey) -> Option<&EdgeFrame> {
        self.edges.iter().find(|e| &e.key == key)
    }
}

/// Keeps every frame it is handed.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    frames: Vec<Frame>,
    open: Option<Frame>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl Surface for RecordingSurface {
    fn begin_frame(&mut self, info: &FrameInfo) {
        self.open = Some(Frame {
            info: *info,
            edges: Vec::new(),
            nodes: Vec::new(),
        });
    }

    fn draw_edge(&mut self, edge: &EdgeFrame) {
        if let Some(frame) = self.open.as_mut() {
            frame.edges.push(edge.clone());
        }
    }

    fn draw_node(&mut self, node: &NodeFrame) {
        if let Some(frame) = self.open.as_mut() {
            frame.nodes.push(node.clone());
        }
    }

    fn end_frame(&mut self) {
        if let Some(frame) = self.open.take() {
            self.frames.push(frame);
        }
    }
}
