use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// MIME type assumed when neither the document nor the download declares one.
pub const DEFAULT_VIDEO_MIME: &str = "video/mp4";

/// Media content reference inside a metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaContent {
    pub mime: String,
    pub uri: String,
}

/// A single `trait_type`/`value` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAttribute {
    pub trait_type: String,
    pub value: String,
}

/// Token metadata document as stored behind the on-chain pointer.
///
/// Immutable once fetched: a rewrite produces a new document via
/// [`TokenMetadata::with_content`], never a mutation in place. Fields the
/// schema does not know about are preserved verbatim through `extra`, so a
/// rewrite round-trips collection-specific additions untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<MediaContent>,
    #[serde(default)]
    pub attributes: Vec<TokenAttribute>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenMetadata {
    /// Build the rewritten document: `animation_url` and `content.uri` both
    /// point at `uri`, with `mime` carried into the content block.
    pub fn with_content(&self, uri: &str, mime: &str) -> Self {
        Self {
            animation_url: Some(uri.to_string()),
            content: Some(MediaContent {
                mime: mime.to_string(),
                uri: uri.to_string(),
            }),
            ..self.clone()
        }
    }

    /// Serialized bytes used as the dedup identity for metadata uploads.
    /// Deterministic: struct fields serialize in declaration order and the
    /// `extra` map is key-sorted. A serialization failure surfaces as an
    /// error rather than collapsing distinct documents onto one identity.
    pub fn canonical_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}
