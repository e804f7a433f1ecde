use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use veille_core::pipelines::ReportOptions;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Runtime configuration: an optional TOML file, then `VEILLE_*` environment overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub report: ReportOptions,
}

impl AppConfig {
    /// Loads `.env`, then the TOML file at `path` (or `VEILLE_CONFIG`) when given, then
    /// applies `VEILLE_BIND_ADDR` and `VEILLE_MAX_UPLOAD_BYTES`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let path: Option<PathBuf> = path
            .map(Path::to_path_buf)
            .or_else(|| env::var_os("VEILLE_CONFIG").map(PathBuf::from));

        let mut config = match path {
            Some(path) => {
                let raw = fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                Self::from_toml(&raw)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => Self::default(),
        };

        if let Ok(bind_addr) = env::var("VEILLE_BIND_ADDR") {
            config.server.bind_addr = bind_addr;
        }
        if let Ok(raw) = env::var("VEILLE_MAX_UPLOAD_BYTES") {
            config.server.max_upload_bytes = raw
                .trim()
                .parse()
                .with_context(|| format!("VEILLE_MAX_UPLOAD_BYTES must be a byte count, got '{raw}'"))?;
        }

        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("failed to parse TOML configuration")
    }
}
