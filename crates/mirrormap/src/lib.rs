#![forbid(unsafe_code)]

//! `mirrormap` draws a rooted hierarchy as two mirrored dendrograms growing left and right from a
//! central root, and re-renders it incrementally as the hierarchy changes.
//!
//! # Features
//!
//! - `render`: enable layout, reconciliation and SVG output (`mirrormap::render`)

pub use mirrormap_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use mirrormap_render::config::{ClickHandler, NodeHook, TextFn, VisualHooks};
    pub use mirrormap_render::connector::{ConnectorFn, straight};
    pub use mirrormap_render::model::{Bounds, LayoutEdge, LayoutNode};
    pub use mirrormap_render::surface::{EdgeFrame, Frame, FrameInfo, NodeFrame};
    pub use mirrormap_render::transition::{Easing, cubic_in_out, linear};
    pub use mirrormap_render::*;

    use mirrormap_core::{OutlineSource, TreeModel};

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Core(#[from] mirrormap_core::Error),
        #[error(transparent)]
        Import(#[from] mirrormap_core::ImportError),
        #[error(transparent)]
        Render(#[from] mirrormap_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Reads a tree from either FreeMind XML or the JSON tree literal, whichever `text` looks like.
    pub fn parse_tree(text: &str) -> Result<TreeModel> {
        if text.trim_start().starts_with('<') {
            Ok(mirrormap_core::import_freemind_str(text)?)
        } else {
            Ok(TreeModel::from_json(text)?)
        }
    }

    /// Imports `text` and renders its settled frame as SVG.
    pub fn render_freemind_svg(text: &str, config: &MindMapConfig) -> Result<String> {
        let mut tree = mirrormap_core::import_freemind_str(text)?;
        Ok(render_svg(&mut tree, config)?)
    }

    /// Loads an outline through `source` and renders it, reporting through `callback` once.
    pub fn load_and_render<S, F, R>(source: &S, locator: &str, config: &MindMapConfig, callback: F) -> R
    where
        S: OutlineSource + ?Sized,
        F: FnOnce(Result<(TreeModel, String)>) -> R,
    {
        mirrormap_core::load_freemind(source, locator, |loaded| {
            let result = loaded.map_err(HeadlessError::from).and_then(|mut tree| {
                let svg = render_svg(&mut tree, config)?;
                Ok((tree, svg))
            });
            callback(result)
        })
    }
}
