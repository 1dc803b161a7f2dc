use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::inject::PlaceholderPolicy;

/// Resume language; selects the default top-level template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    Cn,
    En,
}

impl Language {
    pub fn default_template(self) -> &'static str {
        match self {
            Language::Cn => "resume-cn.typ",
            Language::En => "resume-en.typ",
        }
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cn" | "zh" | "zh-cn" => Ok(Language::Cn),
            "en" | "en-us" => Ok(Language::En),
            other => Err(anyhow!("unsupported language '{other}' (expected cn or en)")),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub templates_dir: PathBuf,
    /// When set, partials are fetched from `<templates_url>/<name>` instead of `templates_dir`.
    pub templates_url: Option<String>,
    pub language: Language,
    pub placeholder_policy: PlaceholderPolicy,
    pub typst_bin: PathBuf,
    pub font_paths: Vec<PathBuf>,
    pub http_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let language = match lookup("CVEXPORT_LANGUAGE") {
            Some(v) => v
                .parse::<Language>()
                .context("CVEXPORT_LANGUAGE is invalid")?,
            None => Language::default(),
        };

        let placeholder_policy = match lookup("CVEXPORT_PLACEHOLDER_POLICY") {
            Some(v) => v
                .parse::<PlaceholderPolicy>()
                .map_err(|e| anyhow!(e))
                .context("CVEXPORT_PLACEHOLDER_POLICY is invalid")?,
            None => PlaceholderPolicy::default(),
        };

        let http_timeout_secs = lookup("CVEXPORT_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse::<u64>()
            .context("CVEXPORT_HTTP_TIMEOUT_SECS must be a whole number of seconds")?;

        let font_paths = lookup("TYPST_FONT_PATHS")
            .map(|v| std::env::split_paths(&v).collect())
            .unwrap_or_default();

        Ok(Config {
            templates_dir: lookup("CVEXPORT_TEMPLATES_DIR")
                .unwrap_or_else(|| "templates".to_string())
                .into(),
            templates_url: lookup("CVEXPORT_TEMPLATES_URL").filter(|v| !v.trim().is_empty()),
            language,
            placeholder_policy,
            typst_bin: lookup("TYPST_BIN")
                .unwrap_or_else(|| "typst".to_string())
                .into(),
            font_paths,
            http_timeout: Duration::from_secs(http_timeout_secs),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
