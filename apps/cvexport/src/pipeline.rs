//! Export pipeline — Partial Store → Composer → Injector → Export Invoker.
//!
//! Each request is independent: the pipeline holds only read-only collaborators
//! and per-instance options, never request state.

use std::sync::Arc;

use crate::composer::compose;
use crate::engine::{export_artifact, Artifact, RenderEngine};
use crate::errors::PipelineError;
use crate::inject::{inject, ComposedSource, PlaceholderPolicy};
use crate::models::{ResumeData, SectionOrder};
use crate::store::PartialStore;

/// Per-pipeline settings, passed in rather than read from ambient state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    pub placeholder_policy: PlaceholderPolicy,
}

#[derive(Clone)]
pub struct Pipeline {
    store: Arc<dyn PartialStore>,
    engine: Arc<dyn RenderEngine>,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn PartialStore>,
        engine: Arc<dyn RenderEngine>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            store,
            engine,
            options,
        }
    }

    /// Composes `template_name` with its partials and injects `data` and `order`.
    ///
    /// Fails with `SourceUnavailable` if any partial cannot be retrieved. A missing
    /// placeholder is recorded on the result (lenient) or fails (strict).
    pub async fn compose_and_inject(
        &self,
        template_name: &str,
        data: &ResumeData,
        order: &SectionOrder,
    ) -> Result<ComposedSource, PipelineError> {
        let template = compose(self.store.as_ref(), template_name).await?;
        inject(&template, data, order, self.options.placeholder_policy)
    }

    /// Renders a composed source. Fails with `RenderFailed` if no artifact comes back.
    pub async fn export_artifact(&self, source: &ComposedSource) -> Result<Artifact, PipelineError> {
        export_artifact(self.engine.as_ref(), source).await
    }

    /// `compose_and_inject` followed by `export_artifact`.
    pub async fn export(
        &self,
        template_name: &str,
        data: &ResumeData,
        order: &SectionOrder,
    ) -> Result<Artifact, PipelineError> {
        let source = self.compose_and_inject(template_name, data, order).await?;
        self.export_artifact(&source).await
    }
}
