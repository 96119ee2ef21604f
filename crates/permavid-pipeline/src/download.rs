//! Stage 4: download legacy-hosted videos, deduplicated by source URL.
//!
//! Unique URLs are processed in bounded-size batches; each batch runs to
//! completion before the next starts, capping simultaneous disk and memory
//! pressure from large files. A failed download is fatal for the stage after
//! its batch settles.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;

use permavid_core::{DownloadedVideo, MigratableToken, MigrationResult};
use permavid_legacy::LegacyHost;

#[tracing::instrument(skip_all, fields(token_count = tokens.len(), concurrency = concurrency))]
pub async fn download_videos(
    host: &Arc<dyn LegacyHost>,
    tokens: &[MigratableToken],
    concurrency: usize,
) -> MigrationResult<HashMap<String, DownloadedVideo>> {
    // Dedup while preserving first-seen order
    let mut seen = HashSet::new();
    let unique_urls: Vec<&str> = tokens
        .iter()
        .map(|t| t.source_url.as_str())
        .filter(|url| seen.insert(*url))
        .collect();

    tracing::info!(
        unique_urls = unique_urls.len(),
        total_references = tokens.len(),
        "downloading legacy videos"
    );

    let total_batches = unique_urls.len().div_ceil(concurrency.max(1));
    let mut videos = HashMap::new();

    for (batch_index, batch) in unique_urls.chunks(concurrency.max(1)).enumerate() {
        let downloads = batch.iter().map(|url| {
            let host = Arc::clone(host);
            async move { (url.to_string(), host.download(url).await) }
        });

        for (url, result) in join_all(downloads).await {
            let video = result?;
            videos.insert(url, video);
        }

        tracing::info!(
            batch = batch_index + 1,
            total_batches,
            completed = videos.len(),
            total = unique_urls.len(),
            "download batch completed"
        );
    }

    Ok(videos)
}
