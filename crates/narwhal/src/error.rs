#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("node {parent} lists child {child}, but the tree only has {len} nodes")]
    ChildOutOfRange {
        parent: usize,
        child: usize,
        len: usize,
    },
    #[error("node {child} is listed as a child more than once")]
    SharedChild { child: usize },
    #[error("node {node} is not reachable from the root")]
    Unreachable { node: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
