//! On-chain boundary traits
//!
//! The pipeline touches the chain through these two traits so tests can
//! substitute fakes: [`PointerReader`] for batched metadata pointer reads and
//! [`TransactionSender`] for the single batched update transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use permavid_core::{MigrationError, Network, TokenId};

use crate::calls::UpdateCall;

/// Chain operation errors
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ABI decode error: {0}")]
    Decode(String),

    #[error("invalid token id {0}: expected a decimal integer")]
    InvalidTokenId(String),

    #[error("relay error: {0}")]
    Relay(String),
}

/// Result type for chain operations
pub type ChainResult<T> = Result<T, ChainError>;

impl From<ChainError> for MigrationError {
    fn from(err: ChainError) -> Self {
        MigrationError::Chain(err.to_string())
    }
}

/// Batched read of metadata pointers for a collection.
///
/// One call covers the whole token list in a single network round trip.
/// The returned map contains only tokens whose read succeeded with a
/// non-empty pointer; callers treat missing entries as skips, not failures.
#[async_trait]
pub trait PointerReader: Send + Sync {
    async fn read_pointers(
        &self,
        collection: &str,
        token_ids: &[TokenId],
    ) -> ChainResult<HashMap<TokenId, String>>;
}

/// Submission of pointer updates as one batched transaction via a
/// smart-account sender. Returns the transaction hash.
#[async_trait]
pub trait TransactionSender: Send + Sync {
    async fn submit(
        &self,
        network: Network,
        account: &str,
        calls: &[UpdateCall],
    ) -> ChainResult<String>;
}
