mod cli;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::io::AsyncWriteExt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cvexport::config::Config;
use cvexport::store::{FsPartialStore, HttpPartialStore, PartialStore};
use cvexport::{
    Pipeline, PipelineOptions, PlaceholderPolicy, ResumeData, SectionOrder, TypstCliEngine,
};

use crate::cli::{Cli, Commands, RenderInput};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Logs go to stderr so `compose` can stream the source to stdout.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Init { output, force } => {
            if !force && tokio::fs::try_exists(&output).await.unwrap_or(false) {
                bail!("'{}' already exists (pass --force to overwrite)", output.display());
            }
            ResumeData::default().save(&output).await?;
            info!("Wrote empty resume to {}", output.display());
        }

        Commands::Compose { input, output } => {
            let (pipeline, template, data, order) = prepare(&config, &input).await?;
            let composed = pipeline.compose_and_inject(&template, &data, &order).await?;

            match output {
                Some(path) => {
                    tokio::fs::write(&path, composed.as_str())
                        .await
                        .with_context(|| format!("Failed to write '{}'", path.display()))?;
                    info!("Wrote composed source to {}", path.display());
                }
                None => {
                    let mut stdout = tokio::io::stdout();
                    stdout.write_all(composed.as_str().as_bytes()).await?;
                    stdout.flush().await?;
                }
            }
        }

        Commands::Export { input, output } => {
            let (pipeline, template, data, order) = prepare(&config, &input).await?;
            let composed = pipeline.compose_and_inject(&template, &data, &order).await?;

            let artifact = pipeline.export_artifact(&composed).await?;
            artifact
                .write_to(&output)
                .await
                .with_context(|| format!("Failed to write '{}'", output.display()))?;
            info!("Wrote {} ({} bytes)", output.display(), artifact.len());
        }
    }

    Ok(())
}

/// Builds the pipeline from config plus per-invocation flags, and loads the inputs.
async fn prepare(
    config: &Config,
    input: &RenderInput,
) -> Result<(Pipeline, String, ResumeData, SectionOrder)> {
    let store: Arc<dyn PartialStore> = match &config.templates_url {
        Some(url) => {
            info!("Fetching templates from {url}");
            Arc::new(HttpPartialStore::new(url.clone(), config.http_timeout)?)
        }
        None => {
            info!("Reading templates from {}", config.templates_dir.display());
            Arc::new(FsPartialStore::new(&config.templates_dir))
        }
    };

    let engine = TypstCliEngine::new(&config.typst_bin).with_font_paths(config.font_paths.clone());

    let placeholder_policy = if input.strict {
        PlaceholderPolicy::Strict
    } else {
        config.placeholder_policy
    };

    let pipeline = Pipeline::new(
        store,
        Arc::new(engine),
        PipelineOptions { placeholder_policy },
    );

    let template = input
        .template
        .clone()
        .unwrap_or_else(|| config.language.default_template().to_string());

    let data = ResumeData::load(&input.data).await?;
    info!(
        "Loaded resume data from {} ({} entries)",
        input.data.display(),
        data.entry_count()
    );

    let order = match &input.order {
        Some(list) => SectionOrder::parse_list(list)?,
        None => SectionOrder::default(),
    };

    Ok((pipeline, template, data, order))
}
