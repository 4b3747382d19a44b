//! URL-list resolution: read one CSV column from a file, URL, or stdin.
//!
//! The source is read fully into memory before parsing. URL lists are small
//! (thousands of rows at most) and buffering the whole thing keeps the
//! parse step synchronous and trivially testable.

use crate::config::RunConfig;
use crate::error::Snap2PdfError;
use std::path::PathBuf;
use tracing::{debug, info};

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Load the URL list named by `config.src` and extract `config.column`.
pub async fn load_urls(config: &RunConfig) -> Result<Vec<String>, Snap2PdfError> {
    let raw = fetch_source(&config.src, config.download_timeout_secs).await?;
    let urls = parse_column(&raw, &config.column)?;
    debug!("loaded {} urls from {:?}", urls.len(), config.src);
    Ok(urls)
}

/// Read the raw CSV bytes from stdin, a local file, or a remote URL.
async fn fetch_source(src: &str, timeout_secs: u64) -> Result<Vec<u8>, Snap2PdfError> {
    if src.is_empty() || src == "-" {
        use tokio::io::AsyncReadExt;
        let mut buf = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buf)
            .await
            .map_err(|e| Snap2PdfError::SourceRead {
                path: PathBuf::from("<stdin>"),
                source: e,
            })?;
        return Ok(buf);
    }

    if is_url(src) {
        return download_source(src, timeout_secs).await;
    }

    let path = PathBuf::from(src);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(Snap2PdfError::SourceNotFound { path })
        }
        Err(e) => Err(Snap2PdfError::SourceRead { path, source: e }),
    }
}

/// Download a remote URL list.
async fn download_source(url: &str, timeout_secs: u64) -> Result<Vec<u8>, Snap2PdfError> {
    info!("downloading URL list from {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Snap2PdfError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            Snap2PdfError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            Snap2PdfError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(Snap2PdfError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Snap2PdfError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    Ok(bytes.to_vec())
}

/// Extract the named column's values, in file order.
///
/// Empty cells are dropped: a blank `url` field has nothing to screenshot
/// and would otherwise produce an artifact keyed on the empty string.
pub fn parse_column(bytes: &[u8], column: &str) -> Result<Vec<String>, Snap2PdfError> {
    let mut reader = csv::ReaderBuilder::new().from_reader(bytes);

    let headers = reader.headers()?.clone();
    let idx = headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| Snap2PdfError::ColumnMissing {
            column: column.to_string(),
            available: headers.iter().map(String::from).collect(),
        })?;

    let mut urls = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(value) = record.get(idx) {
            let value = value.trim();
            if !value.is_empty() {
                urls.push(value.to_string());
            }
        }
    }
    Ok(urls)
}
