//! Permavid Chain Library
//!
//! On-chain boundary for the migration pipeline: batched metadata pointer
//! reads over JSON-RPC, ABI call construction for pointer updates, and the
//! smart-account transaction sender used to submit all updates as a single
//! batched transaction.

pub mod calls;
pub mod relay;
pub mod rpc;
pub mod traits;

// Re-export commonly used types
pub use calls::UpdateCall;
pub use relay::SmartAccountRelay;
pub use rpc::JsonRpcPointerReader;
pub use traits::{ChainError, ChainResult, PointerReader, TransactionSender};
