//! Stage 7: upload rewritten metadata documents, deduplicated by content.
//!
//! The dedup key is the exact serialized byte content of the rewritten
//! document: tokens whose documents are byte-identical upload once and share
//! the resulting identifier. Unlike video uploads, any failure here is fatal
//! to the stage.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use futures::future::join_all;

use permavid_core::{MetadataUpdate, MigrationError, MigrationResult, TokenId};
use permavid_storage::PermanentStore;

use crate::deps::UploadContext;

const METADATA_CONTENT_TYPE: &str = "application/json";

#[tracing::instrument(skip_all, fields(update_count = updates.len()))]
pub async fn upload_metadata_batch(
    store: &Arc<dyn PermanentStore>,
    updates: &[MetadataUpdate],
    context: &UploadContext,
) -> MigrationResult<HashMap<TokenId, String>> {
    // Group token ids by the serialized document bytes
    let mut groups: Vec<(Bytes, Vec<TokenId>)> = Vec::new();
    let mut index: HashMap<Vec<u8>, usize> = HashMap::new();
    for update in updates {
        let key = update.updated.canonical_bytes()?;
        match index.get(&key) {
            Some(&at) => groups[at].1.push(update.token_id.clone()),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((Bytes::from(key), vec![update.token_id.clone()]));
            }
        }
    }

    let unique = groups.len();
    let uploads = groups.into_iter().map(|(bytes, token_ids)| {
        let store = Arc::clone(store);
        let tags = context.tags(METADATA_CONTENT_TYPE, None);
        async move {
            let metadata_id = store
                .store_bytes(bytes, &tags)
                .await
                .map_err(MigrationError::from)?;
            Ok::<_, MigrationError>((token_ids, metadata_id))
        }
    });

    let mut metadata_ids = HashMap::new();
    for result in join_all(uploads).await {
        let (token_ids, metadata_id) = result?;
        for token_id in token_ids {
            metadata_ids.insert(token_id, metadata_id.clone());
        }
    }

    tracing::info!(
        tokens = metadata_ids.len(),
        unique_uploads = unique,
        "metadata documents stored permanently"
    );

    Ok(metadata_ids)
}
