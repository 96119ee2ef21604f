//! Stage 8: commit every pointer update in one batched transaction.
//!
//! The reserved collection token becomes a contract-level metadata call and
//! must carry a non-empty collection name; all other tokens become plain
//! token-URI calls. One submission covers the full set, so either every
//! included pointer moves or none do.

use std::collections::HashMap;

use permavid_chain::{TransactionSender, UpdateCall};
use permavid_core::{MigrationError, MigrationResult, Network, TokenId, TokenMetadata};

#[tracing::instrument(
    skip_all,
    fields(collection = %collection, chain_id = chain_id, token_count = metadata_ids.len())
)]
pub async fn commit_updates(
    sender: &dyn TransactionSender,
    collection: &str,
    metadata_ids: &HashMap<TokenId, String>,
    metadata_map: &HashMap<TokenId, TokenMetadata>,
    chain_id: u64,
    account: &str,
) -> MigrationResult<String> {
    if metadata_ids.is_empty() {
        return Err(MigrationError::NothingToCommit);
    }

    let calls = build_calls(collection, metadata_ids, metadata_map)?;
    for call in &calls {
        tracing::debug!(kind = call.kind(), to = call.to(), "update call prepared");
    }

    let network = Network::from_chain_id(chain_id);
    let transaction_hash = sender.submit(network, account, &calls).await?;

    tracing::info!(
        transaction_hash = %transaction_hash,
        calls = calls.len(),
        "pointer updates committed on-chain"
    );

    Ok(transaction_hash)
}

/// Resolve each token to its call variant. Deterministic order so the
/// batched transaction is reproducible for a given input set.
fn build_calls(
    collection: &str,
    metadata_ids: &HashMap<TokenId, String>,
    metadata_map: &HashMap<TokenId, TokenMetadata>,
) -> MigrationResult<Vec<UpdateCall>> {
    let mut token_ids: Vec<&TokenId> = metadata_ids.keys().collect();
    token_ids.sort();

    let mut calls = Vec::with_capacity(token_ids.len());
    for token_id in token_ids {
        let metadata_uri = metadata_ids[token_id].clone();
        if token_id.is_collection() {
            let name = metadata_map
                .get(token_id)
                .map(|doc| doc.name.trim())
                .filter(|name| !name.is_empty())
                .ok_or(MigrationError::MissingCollectionName)?;
            calls.push(UpdateCall::Collection {
                collection: collection.to_string(),
                metadata_uri,
                name: name.to_string(),
            });
        } else {
            calls.push(UpdateCall::Token {
                collection: collection.to_string(),
                token_id: token_id.clone(),
                metadata_uri,
            });
        }
    }
    Ok(calls)
}
