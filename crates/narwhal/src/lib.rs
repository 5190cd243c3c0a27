#![forbid(unsafe_code)]

//! Headless tidy tree layout.
//!
//! `narwhal` implements the layered Reingold-Tilford layout with the Buchheim/Jünger/Leipert
//! linear-time apportion step. It works on a plain index tree (node `0` is the root) and is used by
//! `mirrormap-render` once per mind-map half.
//!
//! The layout is a pure function of the tree shape and the options: identical inputs always yield
//! bit-identical coordinates.

pub mod error;
pub mod tree;

mod tidy;

pub use error::{Error, Result};
pub use tree::{IndexTree, NodePair, Separation, Sizing, TreeLayout, TreeOptions, default_separation};

/// Headless layout entry point.
pub fn layout(tree: &IndexTree, options: &TreeOptions) -> TreeLayout {
    tidy::layout(tree, options)
}
