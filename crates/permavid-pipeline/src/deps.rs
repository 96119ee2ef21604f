//! Pipeline dependencies and request types.
//!
//! Every external effect reaches the pipeline through the `Arc<dyn …>`
//! boundaries collected here; tests substitute fakes, production wires the
//! real clients from one explicitly constructed [`MigrationConfig`]. Nothing
//! in the pipeline reads process-global state.

use std::sync::Arc;

use permavid_chain::{JsonRpcPointerReader, PointerReader, SmartAccountRelay, TransactionSender};
use permavid_core::{MigrationConfig, MigrationResult, Network, TokenId};
use permavid_legacy::{HostedVideoClient, LegacyHost};
use permavid_storage::{
    ArweaveStore, HttpMetadataGateway, MetadataGateway, PermanentStore, UploadTags,
};

/// Identity tags stamped on every permanent upload.
#[derive(Debug, Clone)]
pub struct UploadContext {
    pub app_name: String,
    pub app_version: String,
}

impl UploadContext {
    pub fn tags(&self, content_type: impl Into<String>, filename: Option<String>) -> UploadTags {
        UploadTags {
            content_type: content_type.into(),
            filename,
            app_name: self.app_name.clone(),
            app_version: self.app_version.clone(),
        }
    }
}

/// One migration invocation, as handed over by the scheduler.
#[derive(Debug, Clone)]
pub struct MigrationRequest {
    pub collection: String,
    pub token_ids: Vec<TokenId>,
    pub chain_id: u64,
    /// Address authorized to sign the batched update transaction.
    pub account: String,
}

/// External boundaries plus pipeline tunables.
#[derive(Clone)]
pub struct MigrationDeps {
    pub pointer_reader: Arc<dyn PointerReader>,
    pub metadata_gateway: Arc<dyn MetadataGateway>,
    pub legacy_host: Arc<dyn LegacyHost>,
    pub store: Arc<dyn PermanentStore>,
    pub sender: Arc<dyn TransactionSender>,
    pub upload_context: UploadContext,
    /// Concurrency ceiling for video downloads. Kept small: the files are
    /// large and batches spill to disk.
    pub download_concurrency: usize,
}

impl MigrationDeps {
    /// Wire the production clients for one chain from configuration.
    pub fn from_config(config: &MigrationConfig, chain_id: u64) -> MigrationResult<Self> {
        let client = reqwest::Client::new();

        let rpc_url = match Network::from_chain_id(chain_id) {
            Network::Mainnet => &config.rpc_url_mainnet,
            Network::Testnet => &config.rpc_url_testnet,
        };

        Ok(Self {
            pointer_reader: Arc::new(JsonRpcPointerReader::new(client.clone(), rpc_url)),
            metadata_gateway: Arc::new(HttpMetadataGateway::new(
                client.clone(),
                config.ipfs_gateway.clone(),
                config.permanent_gateway.clone(),
            )),
            legacy_host: Arc::new(HostedVideoClient::new(
                client.clone(),
                config.legacy_api_base.clone(),
                config.legacy_token_id.clone(),
                config.legacy_token_secret.clone(),
                config.download_retry.clone(),
            )),
            store: Arc::new(ArweaveStore::new(
                client.clone(),
                config.store_endpoint.clone(),
                &config.store_key_b64,
                config.chunk_max_attempts,
                config.chunk_retry_step_ms,
            )?),
            sender: Arc::new(SmartAccountRelay::new(
                client,
                config.relay_url.clone(),
                config.relay_api_key.clone(),
            )),
            upload_context: UploadContext {
                app_name: config.app_name.clone(),
                app_version: config.app_version.clone(),
            },
            download_concurrency: config.download_concurrency.max(1),
        })
    }
}
