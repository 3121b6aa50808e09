//! Passphrase-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF that protects against brute-force and
//! GPU-based attacks.  Parameters are configurable via `KdfParams`
//! (persisted in the vault header so re-opening uses the exact same
//! settings the vault was created with).

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use zeroize::Zeroize;

use crate::errors::{EzPassError, Result};

/// Length of the per-vault salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Minimum safe memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Configurable Argon2id work-factor parameters.
///
/// The defaults (64 MB, 3 iterations, 4 lanes) cost a few hundred
/// milliseconds per derivation on commodity hardware — deliberately
/// expensive, that cost is the security feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

/// A 32-byte master key that zeroes its memory when dropped.
///
/// Exists only for the duration of an unlocked session; never persisted.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Create a new `MasterKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to pass to the cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

/// Derive a 32-byte master key from a passphrase and salt using Argon2id.
///
/// Deterministic: the same passphrase + salt + params always produce the
/// same key.  Fails only on malformed parameters, never on passphrase
/// content.  Enforces minimum Argon2 parameters to prevent dangerously
/// weak KDF settings.
pub fn derive_master_key(
    passphrase: &[u8],
    salt: &[u8; SALT_LEN],
    params: &KdfParams,
) -> Result<MasterKey> {
    if params.memory_kib < MIN_MEMORY_KIB {
        return Err(EzPassError::KeyDerivation(format!(
            "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
            params.memory_kib
        )));
    }
    if params.iterations < 1 {
        return Err(EzPassError::KeyDerivation(
            "Argon2 iterations must be at least 1".into(),
        ));
    }
    if params.parallelism < 1 {
        return Err(EzPassError::KeyDerivation(
            "Argon2 parallelism must be at least 1".into(),
        ));
    }

    let argon2_params = Params::new(
        params.memory_kib,
        params.iterations,
        params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| EzPassError::KeyDerivation(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(passphrase, salt, &mut key)
        .map_err(|e| EzPassError::KeyDerivation(format!("Argon2id hashing failed: {e}")))?;

    let master = MasterKey::new(key);
    key.zeroize();
    Ok(master)
}

/// Generate a cryptographically random 16-byte salt.
///
/// Generated once per vault at creation and immutable afterwards.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
