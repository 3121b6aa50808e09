//! Cryptographic primitives for ezpass.
//!
//! This module provides:
//! - AES-256-GCM authenticated encryption (`cipher`)
//! - Argon2id passphrase-based key derivation (`kdf`)

pub mod cipher;
pub mod kdf;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{seal, open, derive_master_key, ...};
pub use cipher::{open, seal, NONCE_LEN, TAG_LEN};
pub use kdf::{derive_master_key, generate_salt, KdfParams, MasterKey, KEY_LEN, SALT_LEN};
