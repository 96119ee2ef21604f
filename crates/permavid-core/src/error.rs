//! Error types module
//!
//! This module provides the unified error type for the migration pipeline.
//! Boundary crates (chain, legacy host, permanent store) define their own
//! error enums and convert into `MigrationError` at the crate seam, so the
//! pipeline surfaces a single descriptive error wrapping the root cause.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// No token resolved to a fetchable metadata document; nothing to do.
    #[error("no token metadata found")]
    NoMetadataFound,

    /// Every fetched document already points away from the legacy host.
    #[error("no tokens with legacy host URLs found")]
    NothingToMigrate,

    /// Every migratable token lost its upload result upstream.
    #[error("no metadata updates prepared")]
    NoUpdatesPrepared,

    /// The committer was handed an empty token -> metadata id map.
    #[error("no token metadata to update on-chain")]
    NothingToCommit,

    /// The reserved collection token's document is missing its name field.
    #[error("collection metadata must have a name field")]
    MissingCollectionName,

    #[error("chain error: {0}")]
    Chain(String),

    #[error("legacy host error: {0}")]
    LegacyHost(String),

    #[error("permanent store error: {0}")]
    Store(String),

    #[error("metadata fetch failed for {pointer}: {reason}")]
    MetadataFetch { pointer: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for migration operations
pub type MigrationResult<T> = Result<T, MigrationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_variants_render_their_cause() {
        let err = MigrationError::MetadataFetch {
            pointer: "ipfs://bafy".to_string(),
            reason: "timed out".to_string(),
        };
        assert!(err.to_string().contains("ipfs://bafy"));
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn io_errors_convert() {
        let io_err = io::Error::new(io::ErrorKind::Other, "disk full");
        let err: MigrationError = io_err.into();
        assert!(matches!(err, MigrationError::Io(_)));
    }
}
