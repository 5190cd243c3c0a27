//! Connector curves between a node and its parent.

use crate::transition::Interpolate;
use mirrormap_core::geom::Point;
use std::fmt::Write as _;
use std::sync::Arc;

/// Endpoints of one edge in layout coordinates (`x` vertical, `y` horizontal).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub source: Point,
    pub target: Point,
}

impl Link {
    pub fn new(source: Point, target: Point) -> Self {
        Self { source, target }
    }

    /// Both ends at one point; entering edges grow out of this and exiting edges shrink into it.
    pub fn collapsed(at: Point) -> Self {
        Self {
            source: at,
            target: at,
        }
    }
}

impl Interpolate for Link {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Self {
            source: self.source.interpolate(&to.source, t),
            target: self.target.interpolate(&to.target, t),
        }
    }
}

/// Turns a link into SVG path data.
pub type ConnectorFn = Arc<dyn Fn(&Link) -> String + Send + Sync>;

/// Horizontal cubic elbow: leaves the source level, bends at half the horizontal distance and
/// arrives level at the target.
pub fn elbow(link: &Link) -> String {
    let (sx, sy) = (link.source.x, link.source.y);
    let (tx, ty) = (link.target.x, link.target.y);
    let my = (sy + ty) / 2.0;
    let mut d = String::with_capacity(64);
    let _ = write!(
        d,
        "M{},{}C{},{} {},{} {},{}",
        fmt_path(sy),
        fmt_path(sx),
        fmt_path(my),
        fmt_path(sx),
        fmt_path(my),
        fmt_path(tx),
        fmt_path(ty),
        fmt_path(tx)
    );
    d
}

/// Straight segment, mostly useful for debugging layouts.
pub fn straight(link: &Link) -> String {
    format!(
        "M{},{}L{},{}",
        fmt_path(link.source.y),
        fmt_path(link.source.x),
        fmt_path(link.target.y),
        fmt_path(link.target.x)
    )
}

pub fn default_connector() -> ConnectorFn {
    Arc::new(elbow)
}

/// Path numbers keep at most three fractional digits, rounded half-up.
pub(crate) fn fmt_path(v: f64) -> String {
    if !v.is_finite() || v.abs() < 0.0005 {
        return "0".to_string();
    }
    let r = (v * 1000.0 + 0.5).floor() / 1000.0;
    if r == 0.0 {
        return "0".to_string();
    }
    let s = format!("{r}");
    if s == "-0" { "0".to_string() } else { s }
}
