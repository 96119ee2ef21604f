//! URL classification for the legacy host's domains.

/// Domain served by the legacy host; any URL containing it is eligible for
/// migration (covers both download and streaming URLs).
const LEGACY_DOMAIN: &str = "mux.com";

/// Streaming subdomain; only assets with a playback URL here can be resolved
/// for cleanup.
const STREAMING_DOMAIN: &str = "stream.mux.com";

/// Whether a content URI points at the legacy host.
pub fn is_legacy_source(url: &str) -> bool {
    url.contains(LEGACY_DOMAIN)
}

/// Whether a playback URL points at the legacy streaming domain.
pub fn is_legacy_playback(url: &str) -> bool {
    url.contains(STREAMING_DOMAIN)
}

/// Extract the playback id from a streaming URL such as
/// `https://stream.mux.com/{playback_id}.m3u8`.
pub fn playback_id_from_url(playback_url: &str) -> Option<&str> {
    let (_, rest) = playback_url.split_once(STREAMING_DOMAIN)?;
    let rest = rest.strip_prefix('/')?;
    let id = rest
        .split(['?', '#'])
        .next()
        .unwrap_or(rest)
        .trim_end_matches(".m3u8");
    if id.is_empty() || id.contains('/') {
        None
    } else {
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_legacy_urls() {
        assert!(is_legacy_source("https://stream.mux.com/abc/high.mp4"));
        assert!(is_legacy_source("https://mux.com/downloads/abc.mp4"));
        assert!(!is_legacy_source("ar://tx123"));
        assert!(!is_legacy_source("https://example.com/video.mp4"));
    }

    #[test]
    fn playback_requires_streaming_domain() {
        assert!(is_legacy_playback("https://stream.mux.com/abc.m3u8"));
        assert!(!is_legacy_playback("https://mux.com/downloads/abc.mp4"));
    }

    #[test]
    fn extracts_playback_id() {
        assert_eq!(
            playback_id_from_url("https://stream.mux.com/pB1aYb.m3u8"),
            Some("pB1aYb")
        );
        assert_eq!(
            playback_id_from_url("https://stream.mux.com/pB1aYb.m3u8?token=t"),
            Some("pB1aYb")
        );
        assert_eq!(playback_id_from_url("https://example.com/x.m3u8"), None);
        assert_eq!(playback_id_from_url("https://stream.mux.com/"), None);
    }
}
