//! Stage 6: rewrite metadata documents against the permanent uploads.
//!
//! Pure: no network or disk effects. Each migratable token looks up its
//! upload by source URL; a missing upload means the video failed upstream
//! and the token is skipped with a logged reason. The MIME type keeps its
//! original declaration when present, then falls back to the downloaded
//! file's detected type, then to the default.

use std::collections::{HashMap, HashSet};

use permavid_core::{
    MetadataUpdate, MigratableToken, PermanentUpload, DEFAULT_VIDEO_MIME,
};

pub fn prepare_updates(
    tokens: &[MigratableToken],
    uploads: &HashMap<String, PermanentUpload>,
) -> Vec<MetadataUpdate> {
    let mut updates = Vec::new();

    for token in tokens {
        let Some(upload) = uploads.get(&token.source_url) else {
            tracing::warn!(
                token_id = %token.token_id,
                source_url = %token.source_url,
                "skipping token: no upload result for its video"
            );
            continue;
        };

        let mime = token
            .metadata
            .content
            .as_ref()
            .map(|c| c.mime.as_str())
            .filter(|m| !m.is_empty())
            .or_else(|| {
                Some(upload.video.content_type.as_str()).filter(|m| !m.is_empty())
            })
            .unwrap_or(DEFAULT_VIDEO_MIME);

        updates.push(MetadataUpdate {
            token_id: token.token_id.clone(),
            original: token.metadata.clone(),
            updated: token.metadata.with_content(&upload.content_id, mime),
            content_id: upload.content_id.clone(),
        });
    }

    let unique_content_ids: HashSet<&str> =
        updates.iter().map(|u| u.content_id.as_str()).collect();
    tracing::info!(
        updates = updates.len(),
        unique_content_ids = unique_content_ids.len(),
        "metadata updates prepared"
    );

    updates
}
