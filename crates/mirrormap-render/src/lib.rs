#![forbid(unsafe_code)]

//! Headless mind-map layout and rendering.
//!
//! - [`layout`]: two mirrored tidy trees around a shared root
//! - [`reconcile`]: entering / persisting / exiting diff keyed by node identity
//! - [`session`]: render cycles, animation ticks and click handling against a [`Surface`]
//!
//! Coordinates use the dendrogram convention throughout: `x` is vertical, `y` horizontal.

pub mod config;
pub mod connector;
pub mod error;
pub mod identity;
pub mod layout;
pub mod model;
pub mod reconcile;
pub mod scene;
pub mod session;
pub mod surface;
pub mod svg;
pub mod transition;

pub use config::{ClickOutcome, Margin, MarginUpdate, MindMapConfig};
pub use connector::{Link, elbow};
pub use error::{Error, Result};
pub use identity::IdentityFn;
pub use layout::BidirectionalLayout;
pub use model::MindMapLayout;
pub use reconcile::{NodeVisual, Partition, Phase, Reconciliation};
pub use session::RenderSession;
pub use surface::{RecordingSurface, Surface};
pub use svg::SvgSurface;

use mirrormap_core::TreeModel;

/// Lays `tree` out without touching it.
pub fn layout_mindmap(tree: &TreeModel, config: &MindMapConfig) -> Result<MindMapLayout> {
    let (w, h) = config.inner_size();
    let layout = BidirectionalLayout::compute(tree, w, h)?;
    Ok(MindMapLayout::from_layout(tree, &layout, config))
}

/// Renders one cycle, lets it settle and returns the final frame as SVG.
pub fn render_svg(tree: &mut TreeModel, config: &MindMapConfig) -> Result<String> {
    let mut session = RenderSession::new(config.clone(), SvgSurface::new());
    session.render(tree)?;
    session.finish();
    Ok(session.into_surface().into_document())
}
