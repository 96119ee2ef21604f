//! Permavid Storage Library
//!
//! Permanent store boundary for the migration pipeline: authenticated chunked
//! uploads to the content-addressed storage network, and metadata pointer
//! resolution plus document fetching through public gateways.

pub mod arweave;
pub mod gateway;
pub mod traits;

// Re-export commonly used types
pub use arweave::ArweaveStore;
pub use gateway::{resolve_pointer, HttpMetadataGateway};
pub use traits::{MetadataGateway, PermanentStore, StoreError, StoreResult, UploadTags};
