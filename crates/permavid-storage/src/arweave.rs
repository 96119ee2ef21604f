//! Chunked, authenticated uploads to the permanent storage network.
//!
//! Protocol: create an upload session carrying the payload size and tags,
//! push the payload in fixed-size chunks, then finalize; the network returns
//! the content-addressed transaction id. A failed chunk is retried a fixed
//! number of times with linearly increasing delay before the whole upload is
//! fatal. After completion the record is additionally broadcast; a broadcast
//! failure is only a warning, since the record may already be visible.
//!
//! Every request is signed with the caller-held key: HMAC-SHA256 over the
//! request body, sent hex-encoded in the `x-signature` header.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::json;
use sha2::Sha256;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use permavid_core::DownloadedVideo;

use crate::traits::{PermanentStore, StoreError, StoreResult, UploadTags};

const CHUNK_SIZE: usize = 256 * 1024;

type HmacSha256 = Hmac<Sha256>;

/// Client for the permanent storage upload service.
#[derive(Clone)]
pub struct ArweaveStore {
    client: reqwest::Client,
    endpoint: String,
    key: Vec<u8>,
    chunk_max_attempts: u32,
    chunk_retry_step_ms: u64,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CompleteResponse {
    id: String,
}

impl ArweaveStore {
    /// `key_b64` is the caller-held signing key, base64-encoded as stored in
    /// the environment.
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        key_b64: &str,
        chunk_max_attempts: u32,
        chunk_retry_step_ms: u64,
    ) -> StoreResult<Self> {
        let key = base64::engine::general_purpose::STANDARD
            .decode(key_b64)
            .map_err(|e| StoreError::Key(e.to_string()))?;
        if key.is_empty() {
            return Err(StoreError::Key("key must not be empty".to_string()));
        }
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            key,
            chunk_max_attempts,
            chunk_retry_step_ms,
        })
    }

    fn sign(&self, body: &[u8]) -> String {
        // Key length is unconstrained for HMAC, so new_from_slice cannot fail
        // on a non-empty key.
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC accepts any key length");
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    async fn post_signed(&self, url: &str, body: Vec<u8>) -> StoreResult<reqwest::Response> {
        let signature = self.sign(&body);
        let response = self
            .client
            .post(url)
            .header("x-signature", signature)
            .body(body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(response)
    }

    async fn create_session(&self, size: u64, tags: &UploadTags) -> StoreResult<String> {
        let tag_list: Vec<_> = tags
            .as_pairs()
            .into_iter()
            .map(|(name, value)| json!({ "name": name, "value": value }))
            .collect();
        let body = serde_json::to_vec(&json!({ "size": size, "tags": tag_list }))
            .map_err(|e| StoreError::InvalidDocument {
                url: self.endpoint.clone(),
                reason: e.to_string(),
            })?;
        let session: SessionResponse = self
            .post_signed(&format!("{}/tx", self.endpoint), body)
            .await?
            .json()
            .await?;
        Ok(session.id)
    }

    /// Upload one chunk, retrying with linearly increasing delay.
    async fn put_chunk(&self, session_id: &str, offset: u64, chunk: &[u8]) -> StoreResult<()> {
        let url = format!("{}/tx/{}/chunk/{}", self.endpoint, session_id, offset);
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.post_signed(&url, chunk.to_vec()).await {
                Ok(_) => return Ok(()),
                Err(err) => {
                    if attempt >= self.chunk_max_attempts {
                        return Err(StoreError::ChunkRetriesExhausted {
                            attempts: attempt,
                            reason: err.to_string(),
                        });
                    }
                    let delay = self.chunk_retry_step_ms * attempt as u64;
                    tracing::warn!(
                        session_id,
                        offset,
                        attempt,
                        delay_ms = delay,
                        error = %err,
                        "chunk upload failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
            }
        }
    }

    async fn finalize(&self, session_id: &str) -> StoreResult<String> {
        let complete: CompleteResponse = self
            .post_signed(&format!("{}/tx/{}/complete", self.endpoint, session_id), vec![])
            .await?
            .json()
            .await?;

        // Best effort: the record may already have propagated, so a failed
        // broadcast must not fail the upload.
        let broadcast_url = format!("{}/tx/{}/broadcast", self.endpoint, complete.id);
        if let Err(err) = self.post_signed(&broadcast_url, vec![]).await {
            tracing::warn!(id = %complete.id, error = %err, "broadcast failed after upload");
        }

        Ok(format!("ar://{}", complete.id))
    }
}

#[async_trait]
impl PermanentStore for ArweaveStore {
    async fn store_video(
        &self,
        video: &DownloadedVideo,
        tags: &UploadTags,
    ) -> StoreResult<String> {
        let session_id = self.create_session(video.len, tags).await?;
        tracing::info!(
            session_id = %session_id,
            size_mb = format!("{:.2}", video.len as f64 / (1024.0 * 1024.0)),
            filename = %video.filename,
            "starting video upload"
        );

        // The cloned handle shares its cursor with the original; rewind so
        // the read starts at the beginning regardless of prior use.
        let mut file = File::from_std(video.file.try_clone()?);
        file.seek(std::io::SeekFrom::Start(0)).await?;
        let mut buffer = vec![0u8; CHUNK_SIZE];
        let mut offset = 0u64;
        loop {
            let read = file.read(&mut buffer).await?;
            if read == 0 {
                break;
            }
            self.put_chunk(&session_id, offset, &buffer[..read]).await?;
            offset += read as u64;
        }

        let id = self.finalize(&session_id).await?;
        tracing::info!(id = %id, bytes = offset, "video upload complete");
        Ok(id)
    }

    async fn store_bytes(&self, data: Bytes, tags: &UploadTags) -> StoreResult<String> {
        let session_id = self.create_session(data.len() as u64, tags).await?;
        let mut offset = 0u64;
        for chunk in data.chunks(CHUNK_SIZE) {
            self.put_chunk(&session_id, offset, chunk).await?;
            offset += chunk.len() as u64;
        }
        let id = self.finalize(&session_id).await?;
        tracing::info!(id = %id, bytes = data.len(), "payload upload complete");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ArweaveStore {
        let key_b64 = base64::engine::general_purpose::STANDARD.encode(b"test-signing-key");
        ArweaveStore::new(
            reqwest::Client::new(),
            "https://store.example/",
            &key_b64,
            3,
            10,
        )
        .unwrap()
    }

    #[test]
    fn endpoint_trailing_slash_is_normalized() {
        assert_eq!(store().endpoint, "https://store.example");
    }

    #[test]
    fn rejects_undecodable_or_empty_keys() {
        let client = reqwest::Client::new();
        assert!(matches!(
            ArweaveStore::new(client.clone(), "https://s", "not base64!!", 3, 10),
            Err(StoreError::Key(_))
        ));
        assert!(matches!(
            ArweaveStore::new(client, "https://s", "", 3, 10),
            Err(StoreError::Key(_))
        ));
    }

    #[test]
    fn signatures_are_stable_and_body_dependent() {
        let store = store();
        let a = store.sign(b"chunk-a");
        assert_eq!(a, store.sign(b"chunk-a"));
        assert_ne!(a, store.sign(b"chunk-b"));
        assert_eq!(a.len(), 64); // hex-encoded SHA-256 output
    }

    #[test]
    fn tags_include_filename_only_when_present() {
        let with = UploadTags {
            content_type: "video/mp4".to_string(),
            filename: Some("set.mp4".to_string()),
            app_name: "permavid".to_string(),
            app_version: "0.1.0".to_string(),
        };
        assert_eq!(with.as_pairs().len(), 4);

        let without = UploadTags {
            filename: None,
            ..with
        };
        assert_eq!(without.as_pairs().len(), 3);
    }
}
