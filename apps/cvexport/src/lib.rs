//! # cvexport – resume template composition and PDF export
//!
//! Stages, in order:
//!
//! 1. **Fetch** – read the top-level template and its three supporting
//!    partials from a [`store::PartialStore`], concurrently.
//! 2. **Compose** – inline the partials bottom-up into one source ([`composer`]).
//! 3. **Inject** – embed the resume data and section order as string literals
//!    in their placeholder declarations ([`inject`]).
//! 4. **Export** – compile the source to PDF with a [`engine::RenderEngine`].
//!
//! [`pipeline::Pipeline`] ties the stages together.

pub mod composer;
pub mod config;
pub mod engine;
pub mod errors;
pub mod inject;
pub mod models;
pub mod pipeline;
pub mod store;

pub use engine::{Artifact, RenderEngine, TypstCliEngine};
pub use errors::{EngineError, PipelineError, StoreError};
pub use inject::{ComposedSource, PlaceholderPolicy, Slot};
pub use models::{ResumeData, SectionOrder};
pub use pipeline::{Pipeline, PipelineOptions};
