//! Concurrent decoding of many product files.
//!
//! Each decode runs on tokio's blocking pool; the finished product is moved
//! back to the async side with no shared state between decodes.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use level3_parser::{decode_with_options, DecoderOptions, RadarProduct};
use tracing::{debug, info, warn};

/// Outcome of decoding one file.
#[derive(Debug)]
pub struct BatchResult {
    pub path: PathBuf,
    pub product: Result<RadarProduct>,
}

/// Decode a single file synchronously.
pub fn decode_file(path: &Path, options: DecoderOptions) -> Result<RadarProduct> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let product = decode_with_options(BufReader::new(file), options)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    debug!(
        path = %path.display(),
        product_code = product.product_code(),
        radials = product.scan.num_radials,
        "Decoded product"
    );
    Ok(product)
}

/// Decode `paths` with at most `max_concurrent` decodes in flight.
///
/// Results come back in completion order. A failed file does not stop the
/// others.
pub async fn decode_files(
    paths: Vec<PathBuf>,
    max_concurrent: usize,
    options: DecoderOptions,
) -> Vec<BatchResult> {
    let total = paths.len();

    let results: Vec<BatchResult> = stream::iter(paths)
        .map(|path| async move {
            let task_path = path.clone();
            let product = tokio::task::spawn_blocking(move || decode_file(&task_path, options))
                .await
                .context("Decode task panicked")
                .and_then(|result| result);

            if let Err(e) = &product {
                warn!(path = %path.display(), error = %format!("{:#}", e), "Decode failed");
            }
            BatchResult { path, product }
        })
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;

    let succeeded = results.iter().filter(|r| r.product.is_ok()).count();
    info!(
        total,
        succeeded,
        failed = total - succeeded,
        "Batch decode complete"
    );
    results
}
