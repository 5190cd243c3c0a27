//! The in-memory mind-map: nodes, identity keys and the root's side partition.

mod keys;
mod literal;
mod node;
mod tree;

#[cfg(test)]
mod tests;

pub use keys::{KeySource, MonotonicKeys, PrefixedKeys};
pub use literal::{NodeRecord, TreeLiteral};
pub use node::{Node, NodeId, NodeKey, Side};
pub use tree::{RootSides, StructureResult, TreeModel};
