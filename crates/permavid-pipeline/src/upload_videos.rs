//! Stage 5: upload each unique video to the permanent store.
//!
//! The input map is already deduplicated by source URL, so every entry is
//! one upload; all of them run in parallel. Tempfile handles move into the
//! resulting [`PermanentUpload`]s and are released when those drop.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;

use permavid_core::{DownloadedVideo, MigrationResult, PermanentUpload};
use permavid_storage::PermanentStore;

use crate::deps::UploadContext;

#[tracing::instrument(skip_all, fields(video_count = videos.len()))]
pub async fn upload_videos(
    store: &Arc<dyn PermanentStore>,
    videos: HashMap<String, DownloadedVideo>,
    context: &UploadContext,
) -> MigrationResult<HashMap<String, PermanentUpload>> {
    let uploads = videos.into_iter().map(|(source_url, video)| {
        let store = Arc::clone(store);
        let tags = context.tags(video.content_type.clone(), Some(video.filename.clone()));
        async move {
            let result = store.store_video(&video, &tags).await;
            (source_url, video, result)
        }
    });

    let mut upload_map = HashMap::new();
    let mut first_error = None;
    for (source_url, video, result) in join_all(uploads).await {
        match result {
            Ok(content_id) => {
                upload_map.insert(
                    source_url.clone(),
                    PermanentUpload {
                        source_url,
                        content_id,
                        video,
                    },
                );
            }
            Err(err) => {
                tracing::error!(source_url = %source_url, error = %err, "video upload failed");
                first_error.get_or_insert(err);
            }
        }
    }

    if let Some(err) = first_error {
        return Err(err.into());
    }

    tracing::info!(uploads = upload_map.len(), "videos stored permanently");
    Ok(upload_map)
}
