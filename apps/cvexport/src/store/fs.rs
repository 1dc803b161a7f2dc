use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::errors::StoreError;
use crate::store::PartialStore;

/// Serves partials from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsPartialStore {
    root: PathBuf,
}

impl FsPartialStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Only plain relative names resolve; anything reaching outside the root is unknown.
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let is_plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if name.is_empty() || !is_plain {
            return None;
        }
        Some(self.root.join(relative))
    }
}

#[async_trait]
impl PartialStore for FsPartialStore {
    async fn get(&self, name: &str) -> Result<String, StoreError> {
        let path = self
            .resolve(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;

        debug!("Reading partial '{}' from {}", name, path.display());

        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(name.to_string())),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}
