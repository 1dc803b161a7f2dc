use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::store::PartialStore;

/// A fixed set of partials held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPartialStore {
    partials: HashMap<String, String>,
}

impl InMemoryPartialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_partial(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.partials.insert(name.into(), text.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.partials.remove(name)
    }
}

#[async_trait]
impl PartialStore for InMemoryPartialStore {
    async fn get(&self, name: &str) -> Result<String, StoreError> {
        self.partials
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }
}
