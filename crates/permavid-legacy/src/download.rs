//! Streaming video download with bounded retries.
//!
//! Response bodies are streamed chunk-by-chunk into an anonymous tempfile
//! instead of being buffered in memory; the OS unlinks the file as soon as
//! the returned handle drops, so disk space is reclaimed on every exit path.

use std::io::SeekFrom;
use std::time::Duration;

use futures::StreamExt;
use percent_encoding::percent_decode_str;
use rand::Rng;
use tokio::fs::File;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};

use permavid_core::config::DownloadRetryConfig;
use permavid_core::{DownloadedVideo, DEFAULT_VIDEO_MIME};

use crate::client::{LegacyError, LegacyResult};

const FALLBACK_FILENAME: &str = "new-video.mp4";

/// Download a video, retrying transient failures with multiplicative backoff
/// and random jitter. Non-transient HTTP errors (4xx other than 408/429)
/// fail immediately.
pub async fn download_video(
    client: &reqwest::Client,
    url: &str,
    retry: &DownloadRetryConfig,
) -> LegacyResult<DownloadedVideo> {
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match try_download(client, url).await {
            Ok(video) => {
                tracing::info!(
                    url,
                    bytes = video.len,
                    content_type = %video.content_type,
                    attempt,
                    "video downloaded"
                );
                return Ok(video);
            }
            Err(err) if !err.is_transient() => return Err(err),
            Err(err) => {
                if attempt >= retry.max_attempts {
                    return Err(LegacyError::RetriesExhausted {
                        url: url.to_string(),
                        attempts: attempt,
                        reason: err.to_string(),
                    });
                }
                let delay = backoff_delay(attempt, retry);
                tracing::warn!(
                    url,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "download failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

async fn try_download(client: &reqwest::Client, url: &str) -> LegacyResult<DownloadedVideo> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LegacyError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_VIDEO_MIME)
        .to_string();

    // Anonymous tempfile: already unlinked, deleted when the handle drops.
    let mut file = File::from_std(tempfile::tempfile()?);
    let mut len = 0u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        len += chunk.len() as u64;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    file.seek(SeekFrom::Start(0)).await?;

    Ok(DownloadedVideo {
        source_url: url.to_string(),
        file: file.into_std().await,
        content_type,
        filename: filename_from_url(url),
        len,
    })
}

/// Multiplicative backoff with random jitter, capped.
fn backoff_delay(attempt: u32, retry: &DownloadRetryConfig) -> Duration {
    let base = retry
        .backoff_base_ms
        .saturating_mul(1u64 << (attempt - 1).min(16))
        .min(retry.backoff_cap_ms);
    let jitter = rand::rng().random_range(0..=base / 2);
    Duration::from_millis(base + jitter)
}

/// Last path segment of the URL, percent-decoded, query and fragment
/// stripped; falls back to a generic name when the path has none.
fn filename_from_url(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let after_scheme = without_query
        .split_once("://")
        .map_or(without_query, |(_, rest)| rest);
    // Host alone carries no filename
    let Some((_, path)) = after_scheme.split_once('/') else {
        return FALLBACK_FILENAME.to_string();
    };
    let segment = path.trim_end_matches('/').rsplit('/').next().unwrap_or("");
    if segment.is_empty() {
        return FALLBACK_FILENAME.to_string();
    }
    match percent_decode_str(segment).decode_utf8() {
        Ok(decoded) if !decoded.is_empty() => decoded.into_owned(),
        _ => FALLBACK_FILENAME.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retry_config() -> DownloadRetryConfig {
        DownloadRetryConfig {
            max_attempts: 4,
            backoff_base_ms: 1_000,
            backoff_cap_ms: 30_000,
        }
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let retry = retry_config();
        for (attempt, expected_base) in [(1u32, 1_000u64), (2, 2_000), (3, 4_000), (10, 30_000)] {
            let delay = backoff_delay(attempt, &retry).as_millis() as u64;
            assert!(delay >= expected_base, "attempt {}: {}", attempt, delay);
            assert!(delay <= expected_base + expected_base / 2);
        }
    }

    #[test]
    fn filename_comes_from_the_url_path() {
        assert_eq!(
            filename_from_url("https://mux.com/downloads/live%20set.mp4?sig=x"),
            "live set.mp4"
        );
        assert_eq!(
            filename_from_url("https://mux.com/downloads/set.mp4#t=1"),
            "set.mp4"
        );
    }

    #[test]
    fn pathless_urls_fall_back_to_default_name() {
        assert_eq!(filename_from_url("https://mux.com/"), FALLBACK_FILENAME);
        assert_eq!(filename_from_url("https://mux.com"), FALLBACK_FILENAME);
    }
}
