//! Permavid Pipeline Library
//!
//! The migration pipeline: nine sequential stages that take a list of token
//! ids for one collection and produce permanently stored video content,
//! updated metadata documents, and a single batched on-chain transaction,
//! followed by best-effort cleanup of the legacy-hosted copies.
//!
//! Stages fan out over their deduplicated unit count and fan back in before
//! the next stage starts; the explicit maps passed stage-to-stage are the
//! only state that crosses a stage boundary.

pub mod cleanup;
pub mod commit;
pub mod deps;
pub mod download;
pub mod fetch;
pub mod filter;
pub mod migrate;
pub mod resolve;
pub mod rewrite;
pub mod upload_metadata;
pub mod upload_videos;

// Re-export commonly used types
pub use deps::{MigrationDeps, MigrationRequest, UploadContext};
pub use migrate::migrate_collection;
