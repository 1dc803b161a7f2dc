use thiserror::Error;

use crate::inject::Slot;

/// Failure to retrieve a named partial from a [`PartialStore`](crate::store::PartialStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Partial not found: {0}")]
    NotFound(String),

    #[error("Transport error fetching '{name}': {message}")]
    Transport { name: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reported by a [`RenderEngine`](crate::engine::RenderEngine).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to launch rendering engine '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rendering engine exited with {status}: {stderr}")]
    Compile { status: String, stderr: String },
}

/// Pipeline-level error type.
/// Every fatal condition of a compose or export request surfaces as one of these.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Template source unavailable: partial '{partial}'")]
    SourceUnavailable {
        partial: String,
        #[source]
        source: StoreError,
    },

    #[error("Placeholder for {slot} not found in template")]
    PlaceholderMissing { slot: Slot },

    #[error("Failed to serialize injection payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Rendering failed: {reason}")]
    RenderFailed {
        reason: String,
        #[source]
        source: Option<EngineError>,
    },

    #[error("Unknown section identifier: {0}")]
    InvalidSection(String),
}

impl PipelineError {
    pub fn source_unavailable(partial: &str, source: StoreError) -> Self {
        PipelineError::SourceUnavailable {
            partial: partial.to_string(),
            source,
        }
    }
}
