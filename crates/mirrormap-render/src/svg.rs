//! SVG output surface.

use crate::connector::fmt_path;
use crate::surface::{EdgeFrame, FrameInfo, NodeFrame, Surface};
use std::fmt::Write as _;

/// Keeps the most recent frame as a standalone SVG document.
#[derive(Debug, Clone, Default)]
pub struct SvgSurface {
    document: String,
    edges: String,
    nodes: String,
    frames: u64,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last completed frame; empty before the first one.
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn into_document(self) -> String {
        self.document
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames
    }
}

impl Surface for SvgSurface {
    fn begin_frame(&mut self, info: &FrameInfo) {
        self.edges.clear();
        self.nodes.clear();
        self.document.clear();
        let _ = write!(
            self.document,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{}" height="{}" class="mindmap">"#,
            fmt(info.width),
            fmt(info.height)
        );
        let _ = write!(
            self.document,
            r#"<g transform="translate({},{})">"#,
            fmt(info.origin.0),
            fmt(info.origin.1)
        );
    }

    fn draw_edge(&mut self, edge: &EdgeFrame) {
        let _ = write!(
            self.edges,
            r#"<path class="link" data-key="{}" d="{}"/>"#,
            escape_attr(edge.key.as_str()),
            escape_attr(&edge.path)
        );
    }

    fn draw_node(&mut self, node: &NodeFrame) {
        let v = &node.visual;
        let _ = write!(
            self.nodes,
            r#"<g class="node" data-key="{}" transform="translate({},{})"><circle r="{}"/>"#,
            escape_attr(node.key.as_str()),
            fmt_path(v.position.y),
            fmt_path(v.position.x),
            fmt(v.radius)
        );
        let text = format!(
            r#"<text text-anchor="middle" dy="16" style="fill-opacity: {}">{}</text>"#,
            fmt(v.label_opacity),
            escape_xml(&v.label)
        );
        match &v.link {
            Some(href) => {
                let _ = write!(
                    self.nodes,
                    r#"<a xlink:href="{}" target="_blank">{text}</a>"#,
                    escape_attr(href)
                );
            }
            None => self.nodes.push_str(&text),
        }
        self.nodes.push_str("</g>");
    }

    fn end_frame(&mut self) {
        // Links go below nodes.
        self.document.push_str(&self.edges);
        self.document.push_str(&self.nodes);
        self.document.push_str("</g></svg>");
        self.frames += 1;
    }
}

fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    escape_xml(text)
}
