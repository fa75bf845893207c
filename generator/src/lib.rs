//! Offline generation of the vendor registry artifact.
//!
//! source feed → normalize → trie → zstd artifact on disk.

pub mod config;
pub mod source;

use std::time::Duration;

use anyhow::{Context, Result};
use macvendor_core::{codec, normalize, Trie};
use tracing::info;

use crate::config::GeneratorConfig;

/// Summary of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub records: usize,
    pub raw_bytes: usize,
    pub artifact_bytes: usize,
}

/// Run the whole pipeline for `config`.
///
/// Any invalid source record aborts the run before the output is written.
pub async fn generate(config: &GeneratorConfig) -> Result<GenerationReport> {
    let body = source::fetch(&config.source, Duration::from_secs(config.timeout_secs)).await?;

    let records = normalize::load_records(body.as_slice())
        .with_context(|| format!("normalizing {}", config.source))?;
    let trie = Trie::from_records(records)?;

    let raw_bytes = codec::serialize(&trie)?.len();
    let artifact = codec::encode_with_level(&trie, config.compression_level)?;

    tokio::fs::write(&config.output, &artifact)
        .await
        .with_context(|| format!("writing {}", config.output.display()))?;

    let report = GenerationReport {
        records: trie.len(),
        raw_bytes,
        artifact_bytes: artifact.len(),
    };
    info!(
        records = report.records,
        raw_bytes = report.raw_bytes,
        artifact_bytes = report.artifact_bytes,
        output = %config.output.display(),
        "Artifact written"
    );
    Ok(report)
}
