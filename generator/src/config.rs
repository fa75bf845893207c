use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Upstream JSON feed of the full IEEE registry.
pub const DEFAULT_SOURCE: &str = "https://maclookup.app/downloads/json-database/get-db";

/// Generator configuration loaded from a TOML file or defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Source registry: an `http(s)://` URL or a local file path.
    #[serde(default = "default_source")]
    pub source: String,

    /// Where the compressed artifact is written.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// zstd level (1-22).
    #[serde(default = "default_compression_level")]
    pub compression_level: i32,

    /// HTTP timeout for remote sources, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

fn default_output() -> PathBuf {
    PathBuf::from("embedb.bin.zst")
}

fn default_compression_level() -> i32 {
    macvendor_core::codec::DEFAULT_COMPRESSION_LEVEL
}

fn default_timeout() -> u64 {
    60
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            output: default_output(),
            compression_level: default_compression_level(),
            timeout_secs: default_timeout(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
        let config: GeneratorConfig =
            toml::de::from_str(&contents).with_context(|| format!("parsing config {path}"))?;
        Ok(config)
    }
}
