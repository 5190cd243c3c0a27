use mirrormap_core::{NodeId, NodeKey, StructureError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error("identity collision: nodes {first:?} and {second:?} both resolve to key `{key}`")]
    IdentityCollision {
        key: NodeKey,
        first: NodeId,
        second: NodeId,
    },

    #[error("invalid render option `{key}`: {message}")]
    InvalidConfig { key: String, message: String },

    #[error("render config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
