//! Render options.

use crate::connector::{ConnectorFn, Link, default_connector};
use crate::identity::IdentityFn;
use crate::reconcile::{HIDDEN, NODE_RADIUS, NodeVisual};
use crate::transition::{Easing, cubic_in_out};
use crate::{Error, Result};
use mirrormap_core::{JsonConfig, Node, NodeId, NodeKey, TreeModel};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_WIDTH: f64 = 960.0;
pub const DEFAULT_HEIGHT: f64 = 500.0;
pub const DEFAULT_DURATION: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 120.0,
            bottom: 20.0,
            left: 120.0,
        }
    }
}

/// A margin change that leaves unnamed sides alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarginUpdate {
    #[serde(default)]
    pub top: Option<f64>,
    #[serde(default)]
    pub right: Option<f64>,
    #[serde(default)]
    pub bottom: Option<f64>,
    #[serde(default)]
    pub left: Option<f64>,
}

impl Margin {
    pub fn update(&mut self, update: MarginUpdate) {
        self.top = update.top.unwrap_or(self.top);
        self.right = update.right.unwrap_or(self.right);
        self.bottom = update.bottom.unwrap_or(self.bottom);
        self.left = update.left.unwrap_or(self.left);
    }
}

/// Rewrites the visual of one node. Receives the node's identity key.
pub type NodeHook = Arc<dyn Fn(&NodeKey, &mut NodeVisual) + Send + Sync>;
/// Label text for a node.
pub type TextFn = Arc<dyn Fn(&Node) -> String + Send + Sync>;
/// Called when a node is clicked; may edit the tree.
pub type ClickHandler = Arc<dyn Fn(&mut TreeModel, NodeId) -> ClickOutcome + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickOutcome {
    #[default]
    Ignore,
    /// The handler changed the tree; run a new render cycle.
    Rerender,
}

/// Per-partition visual hooks.
///
/// `enter` shapes where entering nodes start, `update` where entering and persisting nodes end
/// up, `exit` where exiting nodes end up.
#[derive(Clone)]
pub struct VisualHooks {
    pub enter: NodeHook,
    pub update: NodeHook,
    pub exit: NodeHook,
}

impl Default for VisualHooks {
    fn default() -> Self {
        Self {
            enter: Arc::new(|_: &NodeKey, v: &mut NodeVisual| {
                v.radius = HIDDEN;
                v.label_opacity = 1.0;
            }),
            update: Arc::new(|_: &NodeKey, v: &mut NodeVisual| v.radius = NODE_RADIUS),
            exit: Arc::new(|_: &NodeKey, v: &mut NodeVisual| {
                v.radius = HIDDEN;
                v.label_opacity = HIDDEN;
            }),
        }
    }
}

impl fmt::Debug for VisualHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualHooks").finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct MindMapConfig {
    width: f64,
    height: f64,
    duration: Duration,
    margin: Margin,
    easing: Easing,
    identity: IdentityFn,
    text: TextFn,
    connector: ConnectorFn,
    hooks: VisualHooks,
    on_click: Option<ClickHandler>,
}

impl Default for MindMapConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            duration: DEFAULT_DURATION,
            margin: Margin::default(),
            easing: cubic_in_out,
            identity: IdentityFn::default(),
            text: Arc::new(|node: &Node| node.label.clone()),
            connector: default_connector(),
            hooks: VisualHooks::default(),
            on_click: None,
        }
    }
}

impl fmt::Debug for MindMapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MindMapConfig")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("duration", &self.duration)
            .field("margin", &self.margin)
            .field("identity", &self.identity)
            .field("on_click", &self.on_click.is_some())
            .finish_non_exhaustive()
    }
}

fn number(cfg: &JsonConfig, key: &str) -> Result<Option<f64>> {
    match cfg.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v.as_f64().map(Some).ok_or_else(|| Error::InvalidConfig {
            key: key.to_string(),
            message: format!("expected a number, got {v}"),
        }),
    }
}

impl MindMapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `width`, `height`, `duration` (milliseconds) and `margin.{top,right,bottom,left}`
    /// on top of the defaults. Other keys are ignored.
    pub fn from_json(value: &Value) -> Result<Self> {
        let cfg = JsonConfig::from_value(value.clone());
        let mut out = Self::default();
        if let Some(width) = number(&cfg, "width")? {
            out = out.with_width(width);
        }
        if let Some(height) = number(&cfg, "height")? {
            out = out.with_height(height);
        }
        if let Some(ms) = number(&cfg, "duration")? {
            if !(ms >= 0.0 && ms.is_finite()) {
                return Err(Error::InvalidConfig {
                    key: "duration".to_string(),
                    message: format!("expected a non-negative number of milliseconds, got {ms}"),
                });
            }
            out = out.with_duration(Duration::from_secs_f64(ms / 1000.0));
        }
        let margin = MarginUpdate {
            top: number(&cfg, "margin.top")?,
            right: number(&cfg, "margin.right")?,
            bottom: number(&cfg, "margin.bottom")?,
            left: number(&cfg, "margin.left")?,
        };
        Ok(out.with_margin(margin))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(&value)
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_margin(mut self, update: MarginUpdate) -> Self {
        self.margin.update(update);
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_identity(mut self, identity: IdentityFn) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_text(mut self, text: impl Fn(&Node) -> String + Send + Sync + 'static) -> Self {
        self.text = Arc::new(text);
        self
    }

    pub fn with_connector(mut self, connector: impl Fn(&Link) -> String + Send + Sync + 'static) -> Self {
        self.connector = Arc::new(connector);
        self
    }

    pub fn with_enter(mut self, hook: impl Fn(&NodeKey, &mut NodeVisual) + Send + Sync + 'static) -> Self {
        self.hooks.enter = Arc::new(hook);
        self
    }

    pub fn with_update(mut self, hook: impl Fn(&NodeKey, &mut NodeVisual) + Send + Sync + 'static) -> Self {
        self.hooks.update = Arc::new(hook);
        self
    }

    pub fn with_exit(mut self, hook: impl Fn(&NodeKey, &mut NodeVisual) + Send + Sync + 'static) -> Self {
        self.hooks.exit = Arc::new(hook);
        self
    }

    pub fn with_click(
        mut self,
        handler: impl Fn(&mut TreeModel, NodeId) -> ClickOutcome + Send + Sync + 'static,
    ) -> Self {
        self.on_click = Some(Arc::new(handler));
        self
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn margin(&self) -> Margin {
        self.margin
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn identity(&self) -> &IdentityFn {
        &self.identity
    }

    pub fn hooks(&self) -> &VisualHooks {
        &self.hooks
    }

    pub fn click_handler(&self) -> Option<&ClickHandler> {
        self.on_click.as_ref()
    }

    pub fn label(&self, node: &Node) -> String {
        (self.text)(node)
    }

    pub fn connect(&self, link: &Link) -> String {
        (self.connector)(link)
    }

    /// Drawing area inside the margins, as `(width, height)`.
    pub fn inner_size(&self) -> (f64, f64) {
        (
            self.width - self.margin.left - self.margin.right,
            self.height - self.margin.top - self.margin.bottom,
        )
    }

    /// Offset of the layout origin on the surface: the root's column sits in the middle of the
    /// drawing area.
    pub fn origin(&self) -> (f64, f64) {
        let (w, _) = self.inner_size();
        (w / 2.0 + self.margin.left, self.margin.top)
    }
}
