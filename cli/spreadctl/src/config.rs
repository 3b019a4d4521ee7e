//! Configuration loading.
//!
//! Handles:
//! - Optional config file in the platform config directory
//! - Environment overrides (`SPREAD_LOG_LEVEL`, `SPREAD_LOG_JSON`, `SPREAD_FORMAT`)
//! - Tracing initialization

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Configuration file name.
const CONFIG_FILE: &str = "config.json";

/// Qualifier, organization and application of the config directory.
const PROJECT_DIRS: (&str, &str, &str) = ("dev", "spread", "spread");

/// Get the config directory path.
fn config_dir() -> Result<PathBuf> {
    let (qualifier, organization, application) = PROJECT_DIRS;
    ProjectDirs::from(qualifier, organization, application)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
}

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Log filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,

    /// Default output format when `--format` is not given.
    #[serde(default)]
    pub format: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            format: None,
        }
    }
}

impl Config {
    /// Load config from disk (or defaults), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = config_dir()?.join(CONFIG_FILE);

        let config = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config from {:?}", path))?;
            Self::from_json(&contents)
                .with_context(|| format!("Failed to parse config from {:?}", path))?
        } else {
            Self::default()
        };

        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Apply `SPREAD_*` overrides looked up through `lookup`.
    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("SPREAD_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(json) = lookup("SPREAD_LOG_JSON") {
            self.log_json = json == "1" || json.to_lowercase() == "true";
        }
        if let Some(format) = lookup("SPREAD_FORMAT") {
            self.format = Some(format);
        }
        self
    }

    /// Initialize tracing to stderr (prefer RUST_LOG, fallback to the configured level).
    pub fn init_tracing(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| self.log_level.clone().into());
        let registry = tracing_subscriber::registry().with(filter);

        // A subscriber may already be installed (tests); keep it.
        let _ = if self.log_json {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()
        } else {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()
        };
    }
}
