#![forbid(unsafe_code)]

//! Mind-map tree model + FreeMind outline importer (headless).
//!
//! Design goals:
//! - one arena-backed [`TreeModel`] that every producer (JSON literal, parent-pointer records,
//!   FreeMind import, programmatic edits) ends up in
//! - stable identity keys that survive across render cycles
//! - import that either yields a complete tree or an error, never a partial one

pub mod config;
pub mod error;
pub mod geom;
pub mod import;
pub mod model;

pub use config::JsonConfig;
pub use error::{Error, ImportError, Result, StructureError};
pub use import::{FileSource, OutlineSource, StaticSource, import_freemind_str, load_freemind};
pub use model::{
    KeySource, MonotonicKeys, Node, NodeId, NodeKey, NodeRecord, PrefixedKeys, RootSides, Side,
    StructureResult, TreeLiteral, TreeModel,
};
