//! Pipeline orchestrator.
//!
//! Runs the nine stages in order, each consuming the previous stage's output
//! map. Per-token problems skip that token; empty stage results and upload or
//! commit failures abort the run. Already-uploaded content is never rolled
//! back on a later failure.

use permavid_core::{MigrationError, MigrationReport, MigrationResult, TokenMigration};

use crate::cleanup::cleanup_legacy_assets;
use crate::commit::commit_updates;
use crate::deps::{MigrationDeps, MigrationRequest};
use crate::download::download_videos;
use crate::fetch::fetch_metadata_batch;
use crate::filter::filter_migratable;
use crate::resolve::resolve_pointers;
use crate::rewrite::prepare_updates;
use crate::upload_metadata::upload_metadata_batch;
use crate::upload_videos::upload_videos;

/// Migrate every legacy-hosted video referenced by the requested tokens.
///
/// Returns the structured report on success, or the first fatal cause as a
/// single error. Cleanup failures are reported, not raised.
#[tracing::instrument(
    skip(deps, request),
    fields(
        collection = %request.collection,
        token_count = request.token_ids.len(),
        chain_id = request.chain_id,
    )
)]
pub async fn migrate_collection(
    deps: &MigrationDeps,
    request: &MigrationRequest,
) -> MigrationResult<MigrationReport> {
    tracing::info!("starting legacy video migration");

    let pointers = resolve_pointers(
        deps.pointer_reader.as_ref(),
        &request.collection,
        &request.token_ids,
    )
    .await?;

    let metadata_map =
        fetch_metadata_batch(&deps.metadata_gateway, &request.token_ids, &pointers).await?;
    if metadata_map.is_empty() {
        return Err(MigrationError::NoMetadataFound);
    }

    let migratable = filter_migratable(&metadata_map);
    if migratable.is_empty() {
        return Err(MigrationError::NothingToMigrate);
    }

    let videos = download_videos(&deps.legacy_host, &migratable, deps.download_concurrency).await?;

    let uploads = upload_videos(&deps.store, videos, &deps.upload_context).await?;

    let updates = prepare_updates(&migratable, &uploads);
    if updates.is_empty() {
        return Err(MigrationError::NoUpdatesPrepared);
    }

    let metadata_ids = upload_metadata_batch(&deps.store, &updates, &deps.upload_context).await?;

    let transaction_hash = commit_updates(
        deps.sender.as_ref(),
        &request.collection,
        &metadata_ids,
        &metadata_map,
        request.chain_id,
        &request.account,
    )
    .await?;

    let cleanup = cleanup_legacy_assets(&deps.legacy_host, &migratable).await;

    let tokens: Vec<TokenMigration> = updates
        .iter()
        .map(|update| TokenMigration {
            token_id: update.token_id.clone(),
            content_id: update.content_id.clone(),
            metadata_id: metadata_ids
                .get(&update.token_id)
                .cloned()
                .unwrap_or_default(),
        })
        .collect();

    tracing::info!(
        transaction_hash = %transaction_hash,
        tokens_migrated = tokens.len(),
        "migration completed"
    );

    Ok(MigrationReport {
        success: true,
        transaction_hash,
        tokens,
        cleanup,
    })
}
