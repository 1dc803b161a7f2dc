//! Partial Store — read-only source of raw template text, keyed by partial name.
//!
//! The composer only ever calls [`PartialStore::get`]; backends differ in where
//! the text lives:
//! - `FsPartialStore`: a templates directory on disk (CLI default).
//! - `HttpPartialStore`: a static file server (`<base_url>/<name>`).
//! - `InMemoryPartialStore`: a map, for embedding and tests.
//!
//! Timeouts are the backend's concern, not the pipeline's.

use async_trait::async_trait;

use crate::errors::StoreError;

pub mod fs;
pub mod http;
pub mod memory;

pub use fs::FsPartialStore;
pub use http::HttpPartialStore;
pub use memory::InMemoryPartialStore;

#[async_trait]
pub trait PartialStore: Send + Sync {
    /// Returns the raw UTF-8 text of the named partial.
    async fn get(&self, name: &str) -> Result<String, StoreError>;
}
