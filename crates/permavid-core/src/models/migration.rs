use std::fs::File;

use serde::{Deserialize, Serialize};

use super::metadata::TokenMetadata;
use super::token::TokenId;

/// A token whose metadata still references the legacy video host.
/// Produced by the migration filter; tokens that do not qualify never get one.
#[derive(Debug, Clone)]
pub struct MigratableToken {
    pub token_id: TokenId,
    pub metadata: TokenMetadata,
    /// Direct download URL for the hosted video file.
    pub source_url: String,
    /// Streaming URL on the legacy host, kept only so cleanup can resolve the
    /// asset later. `None` disables cleanup for this token.
    pub playback_url: Option<String>,
}

/// A video downloaded from the legacy host, spilled to an anonymous tempfile.
/// The file is unlinked by the OS when the handle drops, so temporary disk
/// space is reclaimed on every exit path.
#[derive(Debug)]
pub struct DownloadedVideo {
    pub source_url: String,
    pub file: File,
    pub content_type: String,
    pub filename: String,
    pub len: u64,
}

/// A unique video persisted on the permanent store. Shared by every token
/// that referenced the same source URL.
#[derive(Debug)]
pub struct PermanentUpload {
    pub source_url: String,
    /// Content-addressed identifier, e.g. `ar://<tx-id>`.
    pub content_id: String,
    pub video: DownloadedVideo,
}

/// One token's rewritten metadata, ready for upload.
#[derive(Debug, Clone)]
pub struct MetadataUpdate {
    pub token_id: TokenId,
    pub original: TokenMetadata,
    pub updated: TokenMetadata,
    pub content_id: String,
}

/// Per-token migration outcome included in the final report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenMigration {
    pub token_id: TokenId,
    pub content_id: String,
    pub metadata_id: String,
}

/// Outcome of one legacy asset deletion attempt. Failures are reported, not
/// escalated; the on-chain state has already moved by the time cleanup runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupOutcome {
    pub token_id: TokenId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CleanupOutcome {
    pub fn succeeded(token_id: TokenId, asset_id: String) -> Self {
        Self {
            token_id,
            asset_id: Some(asset_id),
            success: true,
            error: None,
        }
    }

    pub fn failed(token_id: TokenId, asset_id: Option<String>, error: impl Into<String>) -> Self {
        Self {
            token_id,
            asset_id,
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Structured result of a completed migration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationReport {
    pub success: bool,
    pub transaction_hash: String,
    pub tokens: Vec<TokenMigration>,
    pub cleanup: Vec<CleanupOutcome>,
}
