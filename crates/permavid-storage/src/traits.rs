//! Permanent store and metadata gateway traits
//!
//! Both boundaries are traits so the pipeline can run against fakes in
//! tests: [`PermanentStore`] for content-addressed uploads and
//! [`MetadataGateway`] for resolving and fetching metadata documents.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use permavid_core::{DownloadedVideo, MigrationError, TokenMetadata};

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store API returned {status}: {detail}")]
    Api { status: u16, detail: String },

    #[error("chunk upload failed after {attempts} attempts: {reason}")]
    ChunkRetriesExhausted { attempts: u32, reason: String },

    #[error("invalid signing key: {0}")]
    Key(String),

    #[error("invalid metadata pointer: {0}")]
    InvalidPointer(String),

    #[error("metadata at {url} is not a valid document: {reason}")]
    InvalidDocument { url: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for MigrationError {
    fn from(err: StoreError) -> Self {
        MigrationError::Store(err.to_string())
    }
}

/// Tags attached to an upload for discoverability on the storage network.
#[derive(Debug, Clone)]
pub struct UploadTags {
    pub content_type: String,
    pub filename: Option<String>,
    pub app_name: String,
    pub app_version: String,
}

impl UploadTags {
    /// Tag list in wire order: content type, app identity, then the optional
    /// filename.
    pub fn as_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![
            ("Content-Type", self.content_type.as_str()),
            ("App-Name", self.app_name.as_str()),
            ("App-Version", self.app_version.as_str()),
        ];
        if let Some(filename) = &self.filename {
            pairs.push(("File-Name", filename.as_str()));
        }
        pairs
    }
}

/// Content-addressed permanent storage.
///
/// Identifiers are assigned by the network from the content itself, never by
/// the caller; both methods return them in `ar://<id>` form.
#[async_trait]
pub trait PermanentStore: Send + Sync {
    /// Upload a downloaded video from its tempfile handle.
    async fn store_video(&self, video: &DownloadedVideo, tags: &UploadTags)
        -> StoreResult<String>;

    /// Upload an in-memory payload (rewritten metadata documents).
    async fn store_bytes(&self, data: Bytes, tags: &UploadTags) -> StoreResult<String>;
}

/// Resolution of a metadata pointer to a parsed document.
#[async_trait]
pub trait MetadataGateway: Send + Sync {
    async fn fetch_metadata(&self, pointer: &str) -> StoreResult<TokenMetadata>;
}
