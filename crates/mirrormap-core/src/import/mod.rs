//! FreeMind outline import.
//!
//! Import runs in three stages, each usable on its own:
//! 1. [`parse_document`]: XML text → [`XmlElement`] (generic element/text value tree)
//! 2. [`outline_from_document`]: `<map>` → [`OutlineNode`] with directions resolved
//! 3. [`OutlineNode::into_tree_model`]: → [`TreeModel`](crate::TreeModel)
//!
//! A node's direction is its own `POSITION` attribute when it has one, otherwise the direction of
//! its nearest ancestor; the root defaults to `right`.

mod outline;
mod source;
mod xml;


pub use outline::{
    DirectionBuckets, MAP_ELEMENT, NODE_ELEMENT, OutlineNode, outline_from_document,
    outline_from_element,
};
pub use source::{FileSource, OutlineSource, StaticSource};
pub use xml::{TEXT_NAME, XmlChildren, XmlElement, XmlValue, parse_document};

use crate::error::ImportError;
use crate::model::TreeModel;

/// Imports a FreeMind document held in memory.
pub fn import_freemind_str(text: &str) -> Result<TreeModel, ImportError> {
    let doc = parse_document(text)?;
    let outline = outline_from_document(&doc)?;
    let count = outline.count();
    let tree = outline.into_tree_model()?;
    tracing::debug!(nodes = count, "imported FreeMind outline");
    Ok(tree)
}

/// Reads `locator` from `source`, imports it and hands the outcome to `callback` exactly once.
///
/// On failure the callback receives the error and no tree; a partially built tree is never
/// handed out.
pub fn load_freemind<S, F, R>(source: &S, locator: &str, callback: F) -> R
where
    S: OutlineSource + ?Sized,
    F: FnOnce(Result<TreeModel, ImportError>) -> R,
{
    let result = source
        .read(locator)
        .and_then(|text| import_freemind_str(&text));
    if let Err(err) = &result {
        tracing::debug!(locator, error = %err, "outline import failed");
    }
    callback(result)
}
