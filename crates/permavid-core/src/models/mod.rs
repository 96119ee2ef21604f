//! Data models for the migration pipeline
//!
//! Organized by domain: token identity and network selection, the metadata
//! document shape, and the records passed between pipeline stages.

mod metadata;
mod migration;
mod token;

// Re-export all models for convenient imports
pub use metadata::*;
pub use migration::*;
pub use token::*;
