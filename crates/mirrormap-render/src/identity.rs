//! Identity keys used to match nodes across render cycles.

use crate::{Error, Result};
use mirrormap_core::{Node, NodeId, NodeKey, TreeModel};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

type KeyFn = dyn Fn(&Node) -> Option<NodeKey> + Send + Sync;

/// Maps a node to its identity key.
///
/// When the function yields nothing the node's stored key is used, and a node without one gets a
/// fresh key from the tree's key source; that key stays on the node for its lifetime.
#[derive(Clone, Default)]
pub struct IdentityFn(Option<Arc<KeyFn>>);

impl fmt::Debug for IdentityFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            None => f.write_str("IdentityFn::stored"),
            Some(_) => f.write_str("IdentityFn::custom"),
        }
    }
}

impl IdentityFn {
    /// Uses the key stored on the node, assigning one lazily.
    pub fn stored() -> Self {
        Self(None)
    }

    pub fn new(f: impl Fn(&Node) -> Option<NodeKey> + Send + Sync + 'static) -> Self {
        Self(Some(Arc::new(f)))
    }

    /// Reads the key from an imported attribute, e.g. FreeMind's `id`.
    pub fn attribute(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(move |node| node.attribute(&name).map(NodeKey::from))
    }

    pub fn resolve(&self, tree: &mut TreeModel, id: NodeId) -> Result<NodeKey> {
        if let Some(f) = &self.0 {
            if let Some(key) = f(tree.node(id)?) {
                return Ok(key);
            }
        }
        Ok(tree.ensure_key(id)?)
    }

    /// Resolves every node in `ids`, rejecting two nodes that share a key.
    pub fn resolve_all(&self, tree: &mut TreeModel, ids: &[NodeId]) -> Result<Vec<NodeKey>> {
        let mut seen: FxHashMap<NodeKey, NodeId> = FxHashMap::default();
        let mut keys = Vec::with_capacity(ids.len());
        for &id in ids {
            let key = self.resolve(tree, id)?;
            if let Some(&first) = seen.get(&key) {
                return Err(Error::IdentityCollision {
                    key,
                    first,
                    second: id,
                });
            }
            seen.insert(key.clone(), id);
            keys.push(key);
        }
        Ok(keys)
    }
}
