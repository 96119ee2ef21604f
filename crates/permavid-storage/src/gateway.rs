//! Metadata pointer resolution and document fetching.
//!
//! Pointers come in three shapes: `ipfs://` and `ar://` URIs are rewritten to
//! their configured public gateways, plain http(s) URLs pass through, and
//! anything else is rejected.

use async_trait::async_trait;

use permavid_core::TokenMetadata;

use crate::traits::{MetadataGateway, StoreError, StoreResult};

/// Rewrite a pointer to a fetchable URL.
pub fn resolve_pointer(
    pointer: &str,
    ipfs_gateway: &str,
    permanent_gateway: &str,
) -> StoreResult<String> {
    if let Some(cid) = pointer.strip_prefix("ipfs://") {
        let cid = cid.strip_prefix("ipfs/").unwrap_or(cid);
        return Ok(format!("{}{}", ipfs_gateway, cid));
    }
    if let Some(id) = pointer.strip_prefix("ar://") {
        return Ok(format!("{}{}", permanent_gateway, id));
    }
    if pointer.starts_with("https://") || pointer.starts_with("http://") {
        return Ok(pointer.to_string());
    }
    Err(StoreError::InvalidPointer(pointer.to_string()))
}

/// Gateway-backed metadata fetcher.
#[derive(Clone)]
pub struct HttpMetadataGateway {
    client: reqwest::Client,
    ipfs_gateway: String,
    permanent_gateway: String,
}

impl HttpMetadataGateway {
    pub fn new(
        client: reqwest::Client,
        ipfs_gateway: impl Into<String>,
        permanent_gateway: impl Into<String>,
    ) -> Self {
        Self {
            client,
            ipfs_gateway: ipfs_gateway.into(),
            permanent_gateway: permanent_gateway.into(),
        }
    }
}

#[async_trait]
impl MetadataGateway for HttpMetadataGateway {
    async fn fetch_metadata(&self, pointer: &str) -> StoreResult<TokenMetadata> {
        let url = resolve_pointer(pointer, &self.ipfs_gateway, &self.permanent_gateway)?;

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Api {
                status: status.as_u16(),
                detail: format!("metadata fetch from {}", url),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| StoreError::InvalidDocument {
            url,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPFS: &str = "https://ipfs.io/ipfs/";
    const AR: &str = "https://arweave.net/";

    #[test]
    fn ipfs_pointers_rewrite_to_gateway() {
        assert_eq!(
            resolve_pointer("ipfs://bafybeigdyr", IPFS, AR).unwrap(),
            "https://ipfs.io/ipfs/bafybeigdyr"
        );
        // Some minters emit the redundant path form
        assert_eq!(
            resolve_pointer("ipfs://ipfs/bafybeigdyr", IPFS, AR).unwrap(),
            "https://ipfs.io/ipfs/bafybeigdyr"
        );
    }

    #[test]
    fn permanent_pointers_rewrite_to_gateway() {
        assert_eq!(
            resolve_pointer("ar://tx123", IPFS, AR).unwrap(),
            "https://arweave.net/tx123"
        );
    }

    #[test]
    fn http_urls_pass_through() {
        assert_eq!(
            resolve_pointer("https://example.com/1.json", IPFS, AR).unwrap(),
            "https://example.com/1.json"
        );
    }

    #[test]
    fn unrecognized_schemes_are_rejected() {
        assert!(matches!(
            resolve_pointer("data:application/json;base64,e30=", IPFS, AR),
            Err(StoreError::InvalidPointer(_))
        ));
    }
}
