use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved identifier for contract-level ("collection") metadata.
/// It resolves through `contractURI()` instead of `uri(uint256)` and is
/// committed with an update-collection call rather than a per-token call.
pub const COLLECTION_TOKEN_ID: &str = "0";

/// Opaque token identifier, unique within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(String);

impl TokenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Whether this is the reserved collection-metadata identifier.
    pub fn is_collection(&self) -> bool {
        self.0 == COLLECTION_TOKEN_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TokenId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TokenId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Target network, selected by chain identifier. Unknown chain ids fall back
/// to mainnet, matching the behavior collections rely on in production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
}

/// Chain id of the supported test network.
pub const TESTNET_CHAIN_ID: u64 = 84532;

impl Network {
    pub fn from_chain_id(chain_id: u64) -> Self {
        if chain_id == TESTNET_CHAIN_ID {
            Network::Testnet
        } else {
            Network::Mainnet
        }
    }

    /// Network label used by the smart-account relay.
    pub fn label(&self) -> &'static str {
        match self {
            Network::Mainnet => "base",
            Network::Testnet => "base-sepolia",
        }
    }
}
