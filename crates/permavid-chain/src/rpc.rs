//! Batched JSON-RPC pointer reads.
//!
//! All `eth_call`s for a token list are posted as one JSON-RPC batch array,
//! so resolving a whole collection costs a single network round trip.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use permavid_core::TokenId;

use crate::calls::{decode_abi_string, pointer_read_calldata};
use crate::traits::{ChainError, ChainResult, PointerReader};

/// Pointer reader backed by a JSON-RPC endpoint.
#[derive(Clone)]
pub struct JsonRpcPointerReader {
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    id: usize,
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    message: String,
}

impl JsonRpcPointerReader {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl PointerReader for JsonRpcPointerReader {
    async fn read_pointers(
        &self,
        collection: &str,
        token_ids: &[TokenId],
    ) -> ChainResult<HashMap<TokenId, String>> {
        if token_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut batch = Vec::with_capacity(token_ids.len());
        for (id, token_id) in token_ids.iter().enumerate() {
            let calldata = pointer_read_calldata(token_id)?;
            batch.push(json!({
                "jsonrpc": "2.0",
                "id": id,
                "method": "eth_call",
                "params": [
                    { "to": collection, "data": format!("0x{}", hex::encode(calldata)) },
                    "latest"
                ],
            }));
        }

        let responses: Vec<RpcResponse> = self
            .client
            .post(&self.url)
            .json(&batch)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // Batch responses may arrive in any order; match by request id.
        // Failed or empty reads are skipped here and reported by the caller.
        let mut pointers = HashMap::new();
        for response in responses {
            let Some(token_id) = token_ids.get(response.id) else {
                return Err(ChainError::Rpc(format!(
                    "unknown response id {} in batch",
                    response.id
                )));
            };
            if let Some(error) = response.error {
                tracing::warn!(
                    token_id = %token_id,
                    error = %error.message,
                    "pointer read failed, skipping token"
                );
                continue;
            }
            let Some(result) = response.result else {
                continue;
            };
            let raw = result.strip_prefix("0x").unwrap_or(&result);
            let bytes = hex::decode(raw)
                .map_err(|e| ChainError::Decode(format!("invalid hex in eth_call result: {}", e)))?;
            match decode_abi_string(&bytes) {
                Ok(pointer) if !pointer.is_empty() => {
                    pointers.insert(token_id.clone(), pointer);
                }
                Ok(_) => {
                    tracing::warn!(token_id = %token_id, "empty pointer, skipping token");
                }
                Err(e) => {
                    tracing::warn!(token_id = %token_id, error = %e, "undecodable pointer, skipping token");
                }
            }
        }

        tracing::info!(
            requested = token_ids.len(),
            resolved = pointers.len(),
            "resolved metadata pointers"
        );

        Ok(pointers)
    }
}
