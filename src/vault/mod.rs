//! Vault module — encrypted credential storage.
//!
//! This module provides:
//! - `CredentialRecord` and `RecordMetadata` types (`record`)
//! - The in-memory `CredentialStore` (`store`)
//! - The canonical payload codec (`codec`)
//! - On-disk blob format, atomic writes, and locking (`file`)
//! - The unlocked `Session` handle (`session`)

pub mod codec;
pub mod file;
pub mod record;
pub mod session;
pub mod store;

// Re-export the most commonly used items.
pub use file::{FileStorage, VaultBlob, VaultStorage, CURRENT_VERSION};
pub use record::{CredentialRecord, RecordMetadata};
pub use session::Session;
pub use store::CredentialStore;
