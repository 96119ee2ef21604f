//! Stage 1: resolve each token id to its current metadata pointer.
//!
//! One batched read covers the whole list; tokens whose read failed or came
//! back empty are simply absent from the result and reported as skipped by
//! the caller.

use std::collections::HashMap;

use permavid_chain::PointerReader;
use permavid_core::{MigrationResult, TokenId};

#[tracing::instrument(skip(reader, token_ids), fields(token_count = token_ids.len()))]
pub async fn resolve_pointers(
    reader: &dyn PointerReader,
    collection: &str,
    token_ids: &[TokenId],
) -> MigrationResult<HashMap<TokenId, String>> {
    let pointers = reader.read_pointers(collection, token_ids).await?;

    for token_id in token_ids {
        if !pointers.contains_key(token_id) {
            tracing::warn!(token_id = %token_id, "skipping token: no metadata pointer found");
        }
    }

    tracing::info!(
        total = token_ids.len(),
        resolved = pointers.len(),
        "token pointers identified"
    );

    Ok(pointers)
}
