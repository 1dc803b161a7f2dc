//! CLI command structure using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cvexport")]
#[command(version, about = "Compose resume templates and export them to PDF", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write an empty resume JSON document to fill in
    Init {
        /// Output path
        #[arg(short, long, default_value = "resume.json")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Write the composed, data-injected template source
    Compose {
        #[command(flatten)]
        input: RenderInput,

        /// Output path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compose the template and render it to PDF
    Export {
        #[command(flatten)]
        input: RenderInput,

        /// Output path
        #[arg(short, long, default_value = "resume.pdf")]
        output: PathBuf,
    },
}

#[derive(Args)]
pub struct RenderInput {
    /// Resume data JSON file
    #[arg(short, long)]
    pub data: PathBuf,

    /// Comma-separated section order (default: every known section)
    #[arg(long)]
    pub order: Option<String>,

    /// Top-level template name (default: chosen by CVEXPORT_LANGUAGE)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Fail when a placeholder declaration is missing instead of skipping it
    #[arg(long)]
    pub strict: bool,
}
