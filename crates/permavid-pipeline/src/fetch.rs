//! Stage 2: fetch metadata documents, deduplicated by pointer.
//!
//! Tokens are grouped by identical pointer value before fetching, so a
//! pointer shared by N tokens costs one fetch. A failed fetch drops every
//! token in its group with a logged reason; other groups proceed.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use futures::future::join_all;

use permavid_core::{MigrationResult, TokenId, TokenMetadata};
use permavid_storage::MetadataGateway;

#[tracing::instrument(skip_all, fields(token_count = token_ids.len()))]
pub async fn fetch_metadata_batch(
    gateway: &Arc<dyn MetadataGateway>,
    token_ids: &[TokenId],
    pointers: &HashMap<TokenId, String>,
) -> MigrationResult<HashMap<TokenId, TokenMetadata>> {
    // Group token ids by pointer; BTreeMap keeps fetch order deterministic.
    let mut groups: BTreeMap<&str, Vec<&TokenId>> = BTreeMap::new();
    for token_id in token_ids {
        match pointers.get(token_id) {
            Some(pointer) => groups.entry(pointer).or_default().push(token_id),
            None => {
                // Already reported by the resolver; nothing to fetch.
            }
        }
    }

    let unique = groups.len();
    let fetches = groups.into_iter().map(|(pointer, group)| {
        let gateway = Arc::clone(gateway);
        async move {
            match gateway.fetch_metadata(pointer).await {
                Ok(metadata) => Some((group, metadata)),
                Err(err) => {
                    tracing::warn!(
                        pointer,
                        tokens = group.len(),
                        error = %err,
                        "skipping pointer group: metadata fetch failed"
                    );
                    None
                }
            }
        }
    });

    let mut metadata_map = HashMap::new();
    for (group, metadata) in join_all(fetches).await.into_iter().flatten() {
        for token_id in group {
            metadata_map.insert(token_id.clone(), metadata.clone());
        }
    }

    tracing::info!(
        unique_pointers = unique,
        tokens_with_metadata = metadata_map.len(),
        "metadata fetched"
    );

    Ok(metadata_map)
}
