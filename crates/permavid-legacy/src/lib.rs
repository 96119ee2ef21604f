//! Permavid Legacy Host Library
//!
//! Client for the legacy hosted video service being migrated away from:
//! streaming downloads with retry and tempfile spilling, playback-URL to
//! asset-id resolution, and asset deletion.

pub mod client;
pub mod download;
pub mod urls;

// Re-export commonly used types
pub use client::{HostedVideoClient, LegacyError, LegacyHost, LegacyResult};
pub use urls::{is_legacy_source, is_legacy_playback, playback_id_from_url};
