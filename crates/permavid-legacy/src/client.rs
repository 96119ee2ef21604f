//! Legacy host boundary trait and its REST client.
//!
//! The hosted video API is token-authenticated (basic auth with a token
//! id/secret pair). Downloads go to the public asset URLs; lookup and delete
//! go through the management API.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use permavid_core::config::DownloadRetryConfig;
use permavid_core::{DownloadedVideo, MigrationError};

use crate::download::download_video;
use crate::urls::playback_id_from_url;

/// Legacy host operation errors
#[derive(Debug, Error)]
pub enum LegacyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("download of {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("download of {url} failed after {attempts} attempts: {reason}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        reason: String,
    },

    #[error("not a recognized playback URL: {0}")]
    InvalidPlaybackUrl(String),

    #[error("no asset found for playback id {0}")]
    AssetNotFound(String),

    #[error("legacy API returned {status}: {detail}")]
    Api { status: u16, detail: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for legacy host operations
pub type LegacyResult<T> = Result<T, LegacyError>;

impl From<LegacyError> for MigrationError {
    fn from(err: LegacyError) -> Self {
        MigrationError::LegacyHost(err.to_string())
    }
}

impl LegacyError {
    /// Whether a retry could plausibly succeed. Connection-level failures,
    /// server errors, and throttling are transient; other client errors and
    /// local IO failures are not.
    pub fn is_transient(&self) -> bool {
        match self {
            LegacyError::Http(_) => true,
            LegacyError::Status { status, .. } => {
                *status >= 500 || *status == 408 || *status == 429
            }
            _ => false,
        }
    }
}

/// Boundary to the legacy hosted video service.
#[async_trait]
pub trait LegacyHost: Send + Sync {
    /// Download the video at `url`, spilled to temporary storage.
    async fn download(&self, url: &str) -> LegacyResult<DownloadedVideo>;

    /// Resolve the host's internal asset id from a streaming playback URL.
    async fn asset_id_for_playback(&self, playback_url: &str) -> LegacyResult<String>;

    /// Delete a hosted asset by its internal id.
    async fn delete_asset(&self, asset_id: &str) -> LegacyResult<()>;
}

/// REST client for the hosted video service.
#[derive(Clone)]
pub struct HostedVideoClient {
    client: reqwest::Client,
    api_base: String,
    token_id: String,
    token_secret: String,
    retry: DownloadRetryConfig,
}

#[derive(Debug, Deserialize)]
struct PlaybackIdResponse {
    data: PlaybackIdData,
}

#[derive(Debug, Deserialize)]
struct PlaybackIdData {
    object: PlaybackIdObject,
}

#[derive(Debug, Deserialize)]
struct PlaybackIdObject {
    id: String,
}

impl HostedVideoClient {
    pub fn new(
        client: reqwest::Client,
        api_base: impl Into<String>,
        token_id: impl Into<String>,
        token_secret: impl Into<String>,
        retry: DownloadRetryConfig,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token_id: token_id.into(),
            token_secret: token_secret.into(),
            retry,
        }
    }

    async fn check(&self, response: reqwest::Response) -> LegacyResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response.text().await.unwrap_or_default();
        Err(LegacyError::Api {
            status: status.as_u16(),
            detail,
        })
    }
}

#[async_trait]
impl LegacyHost for HostedVideoClient {
    async fn download(&self, url: &str) -> LegacyResult<DownloadedVideo> {
        download_video(&self.client, url, &self.retry).await
    }

    async fn asset_id_for_playback(&self, playback_url: &str) -> LegacyResult<String> {
        let playback_id = playback_id_from_url(playback_url)
            .ok_or_else(|| LegacyError::InvalidPlaybackUrl(playback_url.to_string()))?;

        let url = format!("{}/video/v1/playback-ids/{}", self.api_base, playback_id);
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.token_id, Some(&self.token_secret))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(LegacyError::AssetNotFound(playback_id.to_string()));
        }
        let body: PlaybackIdResponse = self.check(response).await?.json().await?;
        Ok(body.data.object.id)
    }

    async fn delete_asset(&self, asset_id: &str) -> LegacyResult<()> {
        let url = format!("{}/video/v1/assets/{}", self.api_base, asset_id);
        let response = self
            .client
            .delete(&url)
            .basic_auth(&self.token_id, Some(&self.token_secret))
            .send()
            .await?;
        self.check(response).await?;
        tracing::info!(asset_id, "legacy asset deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_statuses() {
        let transient = LegacyError::Status {
            url: "u".to_string(),
            status: 503,
        };
        assert!(transient.is_transient());
        let throttled = LegacyError::Status {
            url: "u".to_string(),
            status: 429,
        };
        assert!(throttled.is_transient());
        let forbidden = LegacyError::Status {
            url: "u".to_string(),
            status: 403,
        };
        assert!(!forbidden.is_transient());
    }

    #[test]
    fn playback_lookup_response_shape() {
        let body: PlaybackIdResponse = serde_json::from_str(
            r#"{"data":{"object":{"id":"asset-123","type":"asset"}}}"#,
        )
        .unwrap();
        assert_eq!(body.data.object.id, "asset-123");
    }
}
