//! Configuration module
//!
//! Migration settings loaded from the environment. The config is constructed
//! once at the entry point and passed into the pipeline explicitly; no part
//! of the system reads process-global state after startup.

use std::env;

use crate::error::{MigrationError, MigrationResult};

// Defaults for tunables that rarely need overriding
const DOWNLOAD_CONCURRENCY: usize = 2;
const DOWNLOAD_MAX_ATTEMPTS: u32 = 4;
const DOWNLOAD_BACKOFF_BASE_MS: u64 = 1_000;
const DOWNLOAD_BACKOFF_CAP_MS: u64 = 30_000;
const CHUNK_MAX_ATTEMPTS: u32 = 3;
const CHUNK_RETRY_STEP_MS: u64 = 1_000;

const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";
const DEFAULT_PERMANENT_GATEWAY: &str = "https://arweave.net/";

/// Retry tuning for the streaming video download.
#[derive(Clone, Debug)]
pub struct DownloadRetryConfig {
    /// Maximum number of attempts per URL before the download is fatal.
    pub max_attempts: u32,
    /// Base delay for the first retry; doubled on each subsequent attempt.
    pub backoff_base_ms: u64,
    /// Upper bound on the computed delay, before jitter.
    pub backoff_cap_ms: u64,
}

impl Default for DownloadRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DOWNLOAD_MAX_ATTEMPTS,
            backoff_base_ms: DOWNLOAD_BACKOFF_BASE_MS,
            backoff_cap_ms: DOWNLOAD_BACKOFF_CAP_MS,
        }
    }
}

/// Application configuration for one migration run.
#[derive(Clone, Debug)]
pub struct MigrationConfig {
    // On-chain boundary
    pub rpc_url_mainnet: String,
    pub rpc_url_testnet: String,
    pub relay_url: String,
    pub relay_api_key: Option<String>,

    // Legacy video host (token-authenticated REST API)
    pub legacy_api_base: String,
    pub legacy_token_id: String,
    pub legacy_token_secret: String,

    // Permanent store
    pub store_endpoint: String,
    /// Caller-held signing key, base64-encoded in the environment.
    pub store_key_b64: String,

    // Metadata gateways
    pub ipfs_gateway: String,
    pub permanent_gateway: String,

    // Pipeline tunables
    pub download_concurrency: usize,
    pub download_retry: DownloadRetryConfig,
    pub chunk_max_attempts: u32,
    pub chunk_retry_step_ms: u64,

    // Tags attached to permanent uploads for discoverability
    pub app_name: String,
    pub app_version: String,
}

impl MigrationConfig {
    /// Load configuration from environment variables.
    ///
    /// Credentials (legacy host token, permanent store key, relay URL) are
    /// required; tunables fall back to defaults.
    pub fn from_env() -> MigrationResult<Self> {
        let require = |key: &str| {
            env::var(key).map_err(|_| {
                MigrationError::Config(format!("missing required environment variable {}", key))
            })
        };

        Ok(Self {
            rpc_url_mainnet: require("RPC_URL_MAINNET")?,
            rpc_url_testnet: require("RPC_URL_TESTNET")?,
            relay_url: require("RELAY_URL")?,
            relay_api_key: env::var("RELAY_API_KEY").ok(),
            legacy_api_base: env::var("LEGACY_API_BASE")
                .unwrap_or_else(|_| "https://api.mux.com".to_string()),
            legacy_token_id: require("LEGACY_TOKEN_ID")?,
            legacy_token_secret: require("LEGACY_TOKEN_SECRET")?,
            store_endpoint: require("STORE_ENDPOINT")?,
            store_key_b64: require("STORE_KEY")?,
            ipfs_gateway: env::var("IPFS_GATEWAY")
                .unwrap_or_else(|_| DEFAULT_IPFS_GATEWAY.to_string()),
            permanent_gateway: env::var("PERMANENT_GATEWAY")
                .unwrap_or_else(|_| DEFAULT_PERMANENT_GATEWAY.to_string()),
            download_concurrency: env::var("DOWNLOAD_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DOWNLOAD_CONCURRENCY),
            download_retry: DownloadRetryConfig {
                max_attempts: env::var("DOWNLOAD_MAX_ATTEMPTS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DOWNLOAD_MAX_ATTEMPTS),
                ..DownloadRetryConfig::default()
            },
            chunk_max_attempts: CHUNK_MAX_ATTEMPTS,
            chunk_retry_step_ms: CHUNK_RETRY_STEP_MS,
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "permavid".to_string()),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_retry_defaults() {
        let retry = DownloadRetryConfig::default();
        assert_eq!(retry.max_attempts, 4);
        assert!(retry.backoff_cap_ms >= retry.backoff_base_ms);
    }
}
