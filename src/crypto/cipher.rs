//! AES-256-GCM authenticated encryption for the vault payload.
//!
//! Each call to `seal` generates a fresh random 12-byte nonce so that no
//! two encryptions under the same key ever share one.  The nonce is
//! returned to the caller, which stores it in the vault header next to
//! the ciphertext.  `open` verifies the authentication tag before any
//! plaintext is released; on mismatch it returns `Authentication` and no
//! partial data.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use crate::errors::{EzPassError, Result};
use super::kdf::{MasterKey, KEY_LEN};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt and authenticate `plaintext` under `key`.
///
/// Returns the freshly generated nonce and the ciphertext with the
/// 16-byte authentication tag appended.
pub fn seal(key: &MasterKey, plaintext: &[u8]) -> Result<([u8; NONCE_LEN], Vec<u8>)> {
    let cipher = cipher_for(key)?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| EzPassError::Encryption(format!("encryption error: {e}")))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    nonce_bytes.copy_from_slice(&nonce);
    Ok((nonce_bytes, ciphertext))
}

/// Decrypt and verify data produced by `seal`.
///
/// `ciphertext` must be the ciphertext with the tag appended, exactly as
/// `seal` returned it.  Wrong key and tampered data both surface as
/// `Authentication`.
pub fn open(key: &MasterKey, nonce: &[u8; NONCE_LEN], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.len() < TAG_LEN {
        return Err(EzPassError::Authentication);
    }

    let cipher = cipher_for(key)?;
    let nonce = Nonce::from_slice(nonce);

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| EzPassError::Authentication)
}

fn cipher_for(key: &MasterKey) -> Result<Aes256Gcm> {
    debug_assert_eq!(key.as_bytes().len(), KEY_LEN);
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| EzPassError::Encryption(format!("invalid key length: {e}")))
}
