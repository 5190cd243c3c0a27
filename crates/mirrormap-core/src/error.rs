use crate::model::NodeId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("tree literal JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The hierarchy is not a single-rooted tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    #[error("cycle detected: node {node:?} is reachable from itself")]
    Cycle { node: NodeId },

    #[error("cycle detected: node record `{id}` never reaches the root")]
    RecordCycle { id: String },

    #[error("node {node:?} does not point back at the parent listing it")]
    ParentMismatch { node: NodeId },

    #[error("side lists name {listed} nodes but the root has {children} children")]
    SideMismatch { listed: usize, children: usize },

    #[error("a tree has exactly one root, found {count}: {roots:?}")]
    MultipleRoots { count: usize, roots: Vec<String> },

    #[error("node record `{id}` references missing parent `{parent}`")]
    MissingParent { id: String, parent: String },

    #[error("duplicate node record `{id}`")]
    DuplicateRecord { id: String },

    #[error("node {node:?} is not part of this tree")]
    UnknownNode { node: NodeId },

    #[error("node {node:?} is not reachable from the root")]
    Orphan { node: NodeId },

    #[error("the root cannot be {action}")]
    RootImmutable { action: &'static str },
}

/// Outline documents that cannot be turned into a tree.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("outline parse error: {message}")]
    Parse { message: String },

    #[error("outline XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("outline source `{locator}` is unreachable: {message}")]
    Unreachable { locator: String, message: String },
}

impl ImportError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}
