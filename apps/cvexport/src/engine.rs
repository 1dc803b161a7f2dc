//! Export Invoker — hands a composed source to the rendering engine.
//!
//! The engine is treated as deterministic: the same source fails the same way
//! twice, so there is no retry here. Timeouts belong to the engine.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::process::Command;
use tracing::{debug, error, info};

use crate::errors::{EngineError, PipelineError};
use crate::inject::ComposedSource;

const SOURCE_FILE: &str = "main.typ";
const OUTPUT_FILE: &str = "main.pdf";

/// A single-document compiler. `Ok(None)` means the engine ran but produced nothing.
#[async_trait]
pub trait RenderEngine: Send + Sync {
    async fn compile(&self, source: &str) -> Result<Option<Bytes>, EngineError>;
}

/// The rendered document. Transient: the caller displays, saves, or drops it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    bytes: Bytes,
}

impl Artifact {
    pub fn new(bytes: Bytes) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn looks_like_pdf(&self) -> bool {
        self.bytes.starts_with(b"%PDF-")
    }

    pub async fn write_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(path, &self.bytes).await
    }
}

/// Submits `source` to `engine`. No artifact, or an empty one, is `RenderFailed`;
/// engine errors are wrapped as the failure's source.
pub async fn export_artifact(
    engine: &dyn RenderEngine,
    source: &ComposedSource,
) -> Result<Artifact, PipelineError> {
    match engine.compile(source.as_str()).await {
        Ok(Some(bytes)) if !bytes.is_empty() => {
            info!("Rendered artifact ({} bytes)", bytes.len());
            Ok(Artifact::new(bytes))
        }
        Ok(_) => {
            error!("Rendering engine returned no artifact");
            Err(PipelineError::RenderFailed {
                reason: "engine produced no artifact".to_string(),
                source: None,
            })
        }
        Err(e) => {
            error!("Rendering engine failed: {e}");
            Err(PipelineError::RenderFailed {
                reason: e.to_string(),
                source: Some(e),
            })
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Typst CLI backend
// ────────────────────────────────────────────────────────────────────────────

/// Runs `typst compile` against a scratch directory holding the source.
#[derive(Debug, Clone)]
pub struct TypstCliEngine {
    program: PathBuf,
    font_paths: Vec<PathBuf>,
}

impl TypstCliEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            font_paths: Vec::new(),
        }
    }

    pub fn with_font_paths(mut self, font_paths: Vec<PathBuf>) -> Self {
        self.font_paths = font_paths;
        self
    }

    fn command(&self, workdir: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("compile")
            .arg("--root")
            .arg(workdir)
            .arg(workdir.join(SOURCE_FILE))
            .arg(workdir.join(OUTPUT_FILE));
        for font_path in &self.font_paths {
            cmd.arg("--font-path").arg(font_path);
        }
        cmd.kill_on_drop(true);
        cmd
    }
}

impl Default for TypstCliEngine {
    fn default() -> Self {
        Self::new("typst")
    }
}

#[async_trait]
impl RenderEngine for TypstCliEngine {
    async fn compile(&self, source: &str) -> Result<Option<Bytes>, EngineError> {
        let workdir = tempfile::tempdir()?;
        tokio::fs::write(workdir.path().join(SOURCE_FILE), source).await?;

        debug!(
            "Running {} compile in {}",
            self.program.display(),
            workdir.path().display()
        );

        let output = self
            .command(workdir.path())
            .output()
            .await
            .map_err(|source| EngineError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(EngineError::Compile {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        match tokio::fs::read(workdir.path().join(OUTPUT_FILE)).await {
            Ok(pdf) if pdf.is_empty() => Ok(None),
            Ok(pdf) => Ok(Some(Bytes::from(pdf))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(EngineError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    /// Engine returning a canned result for every compile call.
    struct ScriptedEngine(fn() -> Result<Option<Bytes>, EngineError>);

    #[async_trait]
    impl RenderEngine for ScriptedEngine {
        async fn compile(&self, _source: &str) -> Result<Option<Bytes>, EngineError> {
            (self.0)()
        }
    }

    fn source() -> ComposedSource {
        ComposedSource::new("= Hello".to_string(), vec![])
    }

    #[tokio::test]
    async fn test_export_returns_engine_bytes() {
        let engine = ScriptedEngine(|| Ok(Some(Bytes::from_static(b"%PDF-1.7 body"))));

        let artifact = export_artifact(&engine, &source()).await.unwrap();

        assert!(artifact.looks_like_pdf());
        assert_eq!(artifact.len(), 13);
    }

    #[tokio::test]
    async fn test_null_artifact_is_render_failed() {
        let engine = ScriptedEngine(|| Ok(None));

        let err = export_artifact(&engine, &source()).await.unwrap_err();

        assert!(matches!(err, PipelineError::RenderFailed { source: None, .. }));
    }

    #[tokio::test]
    async fn test_empty_artifact_is_render_failed() {
        let engine = ScriptedEngine(|| Ok(Some(Bytes::new())));
        let err = export_artifact(&engine, &source()).await.unwrap_err();
        assert!(matches!(err, PipelineError::RenderFailed { .. }));
    }

    #[tokio::test]
    async fn test_engine_error_is_wrapped_not_swallowed() {
        let engine = ScriptedEngine(|| {
            Err(EngineError::Compile {
                status: "exit status: 1".to_string(),
                stderr: "error: unknown variable: cv".to_string(),
            })
        });

        let err = export_artifact(&engine, &source()).await.unwrap_err();

        assert!(err.to_string().contains("unknown variable: cv"));
        let inner = err.source().expect("engine error chained");
        assert!(inner.to_string().contains("exit status: 1"));
    }

    #[tokio::test]
    async fn test_missing_typst_binary_is_spawn_error() {
        let engine = TypstCliEngine::new("/nonexistent/typst-binary-for-tests");

        let err = engine.compile("= Hello").await.unwrap_err();

        assert!(matches!(err, EngineError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_compile_error() {
        let engine = TypstCliEngine::new("false");

        let err = engine.compile("= Hello").await.unwrap_err();

        match err {
            EngineError::Compile { status, .. } => assert!(status.contains('1'), "{status}"),
            other => panic!("expected Compile, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_clean_exit_without_output_is_no_artifact() {
        let engine = TypstCliEngine::new("true");

        assert!(engine.compile("= Hello").await.unwrap().is_none());

        let err = export_artifact(&engine, &source()).await.unwrap_err();
        assert!(matches!(err, PipelineError::RenderFailed { source: None, .. }));
    }

    #[test]
    fn test_command_passes_font_paths() {
        let engine = TypstCliEngine::new("typst").with_font_paths(vec![PathBuf::from("/fonts")]);
        let cmd = engine.command(Path::new("/tmp/work"));
        let args: Vec<String> = cmd
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "compile",
                "--root",
                "/tmp/work",
                "/tmp/work/main.typ",
                "/tmp/work/main.pdf",
                "--font-path",
                "/fonts"
            ]
        );
    }

    #[tokio::test]
    async fn test_artifact_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("resume.pdf");
        let artifact = Artifact::new(Bytes::from_static(b"%PDF-1.7"));

        artifact.write_to(&path).await.unwrap();

        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"%PDF-1.7");
    }
}
