use super::NodeKey;

/// Hands out identity keys for nodes that do not carry one.
///
/// A tree owns exactly one source; keys it hands out are stored on the node and never reissued.
pub trait KeySource: std::fmt::Debug + Send {
    fn next_key(&mut self) -> NodeKey;
}

/// `1`, `2`, `3`, ...
#[derive(Debug, Clone, Default)]
pub struct MonotonicKeys {
    last: u64,
}

impl MonotonicKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue counting after `last`.
    pub fn starting_after(last: u64) -> Self {
        Self { last }
    }
}

impl KeySource for MonotonicKeys {
    fn next_key(&mut self) -> NodeKey {
        self.last += 1;
        NodeKey::from(self.last)
    }
}

/// Prefixes a counter, e.g. `node-1`, `node-2`. Handy when explicit keys are numeric.
#[derive(Debug, Clone)]
pub struct PrefixedKeys {
    prefix: String,
    inner: MonotonicKeys,
}

impl PrefixedKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            inner: MonotonicKeys::new(),
        }
    }
}

impl KeySource for PrefixedKeys {
    fn next_key(&mut self) -> NodeKey {
        let n = self.inner.next_key();
        NodeKey::new(format!("{}{}", self.prefix, n))
    }
}
