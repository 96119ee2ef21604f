//! Smart-account transaction submission.
//!
//! The sponsoring smart-account service is an HTTP boundary: it accepts the
//! full batch of encoded calls for a network and account, wraps them in one
//! user operation, and returns the transaction hash once included.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use permavid_core::Network;

use crate::calls::UpdateCall;
use crate::traits::{ChainError, ChainResult, TransactionSender};

#[derive(Clone)]
pub struct SmartAccountRelay {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelayResponse {
    transaction_hash: String,
}

impl SmartAccountRelay {
    pub fn new(client: reqwest::Client, url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            url: url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl TransactionSender for SmartAccountRelay {
    async fn submit(
        &self,
        network: Network,
        account: &str,
        calls: &[UpdateCall],
    ) -> ChainResult<String> {
        let mut encoded = Vec::with_capacity(calls.len());
        for call in calls {
            encoded.push(json!({
                "to": call.to(),
                "data": format!("0x{}", hex::encode(call.calldata()?)),
            }));
        }

        let body = json!({
            "network": network.label(),
            "account": account,
            "calls": encoded,
        });

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(ChainError::Relay(format!(
                "relay returned {}: {}",
                status, detail
            )));
        }

        let relayed: RelayResponse = response
            .json()
            .await
            .map_err(|e| ChainError::Relay(format!("unparseable relay response: {}", e)))?;

        tracing::info!(
            transaction_hash = %relayed.transaction_hash,
            calls = calls.len(),
            network = network.label(),
            "batched transaction submitted"
        );

        Ok(relayed.transaction_hash)
    }
}
