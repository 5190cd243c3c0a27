use crate::error::ImportError;
use rustc_hash::FxHashMap;
use std::path::PathBuf;

/// Where outline documents come from.
pub trait OutlineSource {
    fn read(&self, locator: &str) -> Result<String, ImportError>;
}

/// Reads locators as filesystem paths, optionally relative to a base directory.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    base_dir: Option<PathBuf>,
}

impl FileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn resolve(&self, locator: &str) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(locator),
            None => PathBuf::from(locator),
        }
    }
}

impl OutlineSource for FileSource {
    fn read(&self, locator: &str) -> Result<String, ImportError> {
        let path = self.resolve(locator);
        std::fs::read_to_string(&path).map_err(|e| ImportError::Unreachable {
            locator: locator.to_string(),
            message: e.to_string(),
        })
    }
}

/// In-memory documents keyed by locator.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    documents: FxHashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, locator: impl Into<String>, document: impl Into<String>) -> Self {
        self.insert(locator, document);
        self
    }

    pub fn insert(&mut self, locator: impl Into<String>, document: impl Into<String>) {
        self.documents.insert(locator.into(), document.into());
    }
}

impl OutlineSource for StaticSource {
    fn read(&self, locator: &str) -> Result<String, ImportError> {
        self.documents
            .get(locator)
            .cloned()
            .ok_or_else(|| ImportError::Unreachable {
                locator: locator.to_string(),
                message: "no such document".to_string(),
            })
    }
}
