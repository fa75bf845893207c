use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::info;

/// Whether `source` names a remote feed rather than a local file.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Read the raw registry feed from a URL or a file path.
pub async fn fetch(source: &str, timeout: Duration) -> Result<Vec<u8>> {
    let body = if is_remote(source) {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        let resp = client
            .get(source)
            .send()
            .await
            .with_context(|| format!("requesting {source}"))?;
        if !resp.status().is_success() {
            bail!("HTTP request to {source} failed with status {}", resp.status());
        }
        resp.bytes()
            .await
            .with_context(|| format!("reading response from {source}"))?
            .to_vec()
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("reading {source}"))?
    };

    info!(source, bytes = body.len(), "Fetched source registry");
    Ok(body)
}
