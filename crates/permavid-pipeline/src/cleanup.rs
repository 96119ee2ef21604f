//! Stage 9: best-effort deletion of the legacy-hosted assets.
//!
//! Runs only after the transaction has landed. Every deletion is attempted
//! independently; lookup and delete failures are captured per token in the
//! result set and never escalate, since on-chain state has already moved to
//! the new pointers.

use std::sync::Arc;

use futures::future::join_all;

use permavid_core::{CleanupOutcome, MigratableToken};
use permavid_legacy::{is_legacy_playback, LegacyHost};

#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub async fn cleanup_legacy_assets(
    host: &Arc<dyn LegacyHost>,
    tokens: &[MigratableToken],
) -> Vec<CleanupOutcome> {
    let candidates: Vec<&MigratableToken> = tokens
        .iter()
        .filter(|t| {
            t.playback_url
                .as_deref()
                .is_some_and(is_legacy_playback)
        })
        .collect();

    if candidates.is_empty() {
        tracing::info!("no legacy assets to delete");
        return Vec::new();
    }

    tracing::info!(assets = candidates.len(), "deleting legacy assets");

    let deletions = candidates.into_iter().map(|token| {
        let host = Arc::clone(host);
        let token_id = token.token_id.clone();
        // Filter above guarantees the playback URL is present
        let playback_url = token.playback_url.clone().unwrap_or_default();
        async move {
            let asset_id = match host.asset_id_for_playback(&playback_url).await {
                Ok(asset_id) => asset_id,
                Err(err) => return CleanupOutcome::failed(token_id, None, err.to_string()),
            };
            match host.delete_asset(&asset_id).await {
                Ok(()) => CleanupOutcome::succeeded(token_id, asset_id),
                Err(err) => CleanupOutcome::failed(token_id, Some(asset_id), err.to_string()),
            }
        }
    });

    let outcomes = join_all(deletions).await;

    let failed = outcomes.iter().filter(|o| !o.success).count();
    tracing::info!(
        total = outcomes.len(),
        successful = outcomes.len() - failed,
        failed,
        "legacy asset deletion completed"
    );
    if failed > 0 {
        tracing::warn!(failed, "some legacy asset deletions failed");
    }

    outcomes
}
