//! Stage 3: select tokens whose metadata still references the legacy host.
//!
//! A token qualifies when its `content.uri` points at the legacy host's
//! domains. The playback URL is retained only when it is on the legacy
//! streaming domain; without one, cleanup is skipped for that token. Re-run
//! on an already-migrated collection this selects nothing, which makes the
//! pipeline idempotent.

use std::collections::HashMap;

use permavid_core::{MigratableToken, TokenId, TokenMetadata};
use permavid_legacy::{is_legacy_playback, is_legacy_source};

pub fn filter_migratable(metadata_map: &HashMap<TokenId, TokenMetadata>) -> Vec<MigratableToken> {
    let mut tokens: Vec<&TokenId> = metadata_map.keys().collect();
    tokens.sort();

    let mut migratable = Vec::new();
    for token_id in tokens {
        let metadata = &metadata_map[token_id];

        let Some(source_url) = metadata.content.as_ref().map(|c| c.uri.clone()) else {
            tracing::warn!(token_id = %token_id, "skipping token: no content URI found");
            continue;
        };

        if !is_legacy_source(&source_url) {
            tracing::warn!(
                token_id = %token_id,
                "skipping token: content URI is not on the legacy host"
            );
            continue;
        }

        let playback_url = metadata
            .animation_url
            .clone()
            .filter(|url| is_legacy_playback(url));

        migratable.push(MigratableToken {
            token_id: token_id.clone(),
            metadata: metadata.clone(),
            source_url,
            playback_url,
        });
    }

    tracing::info!(
        total = metadata_map.len(),
        migratable = migratable.len(),
        "legacy-hosted tokens filtered"
    );

    migratable
}

#[cfg(test)]
mod tests {
    use super::*;
    use permavid_core::{MediaContent, TokenMetadata};

    fn doc(content_uri: Option<&str>, animation_url: Option<&str>) -> TokenMetadata {
        TokenMetadata {
            name: "clip".to_string(),
            description: None,
            image: None,
            animation_url: animation_url.map(str::to_string),
            content: content_uri.map(|uri| MediaContent {
                mime: "video/mp4".to_string(),
                uri: uri.to_string(),
            }),
            attributes: vec![],
            extra: Default::default(),
        }
    }

    fn map(entries: Vec<(&str, TokenMetadata)>) -> HashMap<TokenId, TokenMetadata> {
        entries
            .into_iter()
            .map(|(id, doc)| (TokenId::from(id), doc))
            .collect()
    }

    #[test]
    fn selects_only_legacy_hosted_tokens() {
        let metadata = map(vec![
            (
                "1",
                doc(
                    Some("https://stream.mux.com/a/high.mp4"),
                    Some("https://stream.mux.com/a.m3u8"),
                ),
            ),
            ("2", doc(Some("ar://already-migrated"), None)),
            ("3", doc(None, None)),
        ]);

        let selected = filter_migratable(&metadata);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].token_id, TokenId::from("1"));
        assert_eq!(
            selected[0].playback_url.as_deref(),
            Some("https://stream.mux.com/a.m3u8")
        );
    }

    #[test]
    fn playback_url_outside_streaming_domain_is_dropped() {
        let metadata = map(vec![(
            "1",
            doc(
                Some("https://mux.com/downloads/a.mp4"),
                Some("https://cdn.example.com/a.m3u8"),
            ),
        )]);

        let selected = filter_migratable(&metadata);
        assert_eq!(selected.len(), 1);
        assert!(selected[0].playback_url.is_none());
    }

    #[test]
    fn already_migrated_collection_selects_nothing() {
        let metadata = map(vec![
            ("1", doc(Some("ar://tx1"), Some("ar://tx1"))),
            ("2", doc(Some("ar://tx2"), Some("ar://tx2"))),
        ]);
        assert!(filter_migratable(&metadata).is_empty());
    }

    #[test]
    fn output_is_ordered_by_token_id() {
        let metadata = map(vec![
            ("9", doc(Some("https://mux.com/v9.mp4"), None)),
            ("10", doc(Some("https://mux.com/v10.mp4"), None)),
            ("2", doc(Some("https://mux.com/v2.mp4"), None)),
        ]);
        let ids: Vec<String> = filter_migratable(&metadata)
            .into_iter()
            .map(|t| t.token_id.to_string())
            .collect();
        // Lexicographic: opaque string ids have no numeric ordering
        assert_eq!(ids, vec!["10", "2", "9"]);
    }
}
