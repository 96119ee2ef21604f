//! Permavid Core Library
//!
//! This crate provides the shared data model, error types, and configuration
//! used across all Permavid components. The pipeline, the on-chain boundary,
//! the legacy host client, and the permanent store client all build on the
//! types defined here.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::MigrationConfig;
pub use error::{MigrationError, MigrationResult};
pub use models::{
    CleanupOutcome, DownloadedVideo, MediaContent, MetadataUpdate, MigratableToken,
    MigrationReport, Network, PermanentUpload, TokenAttribute, TokenId, TokenMetadata,
    TokenMigration, DEFAULT_VIDEO_MIME,
};
