//! An unlocked vault session.
//!
//! `Session` is the only handle through which credentials are read or
//! written — there is no ambient "current vault" state anywhere in the
//! crate.  It owns the decrypted `CredentialStore`, the derived
//! `MasterKey`, and the exclusive storage lock, and it holds all three
//! for exactly as long as the vault is unlocked:
//!
//! ```text
//! Locked -> (derive key, load + open) -> Unlocked
//!        -> (add/get/update/delete/list)*
//!        -> (encode + seal + save on commit)
//!        -> Locked (close: secrets zeroized, lock released)
//! ```

use zeroize::Zeroize;

use crate::crypto::cipher::{self, TAG_LEN};
use crate::crypto::kdf::{self, KdfParams, MasterKey, SALT_LEN};
use crate::errors::{EzPassError, Result};

use super::codec;
use super::file::{StorageLock, VaultBlob, VaultStorage, CURRENT_VERSION};
use super::record::CredentialRecord;
use super::store::CredentialStore;

/// An unlocked vault.
///
/// Dropping the session (or calling `close`) zeroizes the master key and
/// every decrypted secret, and releases the vault lock.  Uncommitted
/// changes are lost — call `commit` first.
pub struct Session {
    storage: Box<dyn VaultStorage>,
    _lock: Box<dyn StorageLock>,
    salt: [u8; SALT_LEN],
    kdf_params: KdfParams,
    master_key: MasterKey,
    store: CredentialStore,
}

impl Session {
    /// Create a brand-new vault and return it unlocked.
    ///
    /// Generates a random salt, derives the master key, and immediately
    /// persists an empty encrypted vault so the passphrase is verifiable
    /// from the very first open.
    pub fn create(
        storage: Box<dyn VaultStorage>,
        passphrase: &[u8],
        kdf_params: &KdfParams,
    ) -> Result<Self> {
        let lock = storage.lock()?;

        if storage.load()?.is_some() {
            return Err(EzPassError::VaultAlreadyExists(storage.location()));
        }

        let salt = kdf::generate_salt();
        let master_key = kdf::derive_master_key(passphrase, &salt, kdf_params)?;

        let mut session = Self {
            storage,
            _lock: lock,
            salt,
            kdf_params: *kdf_params,
            master_key,
            store: CredentialStore::new(),
        };
        session.commit()?;
        Ok(session)
    }

    /// Unlock an existing vault.
    ///
    /// The KDF parameters stored in the vault header are used for key
    /// derivation, so a vault keeps working after the defaults change.
    /// A wrong passphrase and a tampered file are indistinguishable —
    /// both fail with `Authentication`.
    pub fn open(storage: Box<dyn VaultStorage>, passphrase: &[u8]) -> Result<Self> {
        let lock = storage.lock()?;

        let blob = storage
            .load()?
            .ok_or_else(|| EzPassError::VaultNotFound(storage.location()))?;

        let master_key = kdf::derive_master_key(passphrase, &blob.salt, &blob.kdf_params)?;
        let store = decrypt_store(&master_key, &blob)?;

        Ok(Self {
            storage,
            _lock: lock,
            salt: blob.salt,
            kdf_params: blob.kdf_params,
            master_key,
            store,
        })
    }

    // ------------------------------------------------------------------
    // Credential operations
    // ------------------------------------------------------------------

    /// Add a credential.  Fails with `DuplicateCredential` if the
    /// (service, username) pair already exists.
    pub fn add(&mut self, record: CredentialRecord) -> Result<()> {
        self.store.add(record)
    }

    /// Look up a credential by (service, username).
    pub fn get(&self, service: &str, username: &str) -> Result<&CredentialRecord> {
        self.store.get(service, username)
    }

    /// Mutate an existing credential in place.
    pub fn update<F>(&mut self, service: &str, username: &str, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut CredentialRecord),
    {
        self.store.update(service, username, mutate)
    }

    /// Remove a credential.
    pub fn delete(&mut self, service: &str, username: &str) -> Result<()> {
        self.store.delete(service, username)
    }

    /// Iterate over all credentials in insertion order.
    pub fn list(&self) -> impl Iterator<Item = &CredentialRecord> {
        self.store.list()
    }

    /// Number of stored credentials.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if the vault holds no credentials.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Encrypt the current state and atomically replace the vault file.
    ///
    /// Every commit seals with a fresh random nonce; the plaintext
    /// payload buffer is wiped as soon as it has been encrypted.
    pub fn commit(&mut self) -> Result<()> {
        let mut plaintext = codec::encode(&self.store)?;
        let sealed = cipher::seal(&self.master_key, &plaintext);
        plaintext.zeroize();
        let (nonce, mut sealed) = sealed?;

        // The aead crate appends the 16-byte tag; the file layout stores
        // it as a separate trailing field.
        if sealed.len() < TAG_LEN {
            return Err(EzPassError::Encryption("missing authentication tag".into()));
        }
        let tag_start = sealed.len() - TAG_LEN;
        let tag: [u8; TAG_LEN] = sealed[tag_start..]
            .try_into()
            .map_err(|_| EzPassError::Encryption("missing authentication tag".into()))?;
        sealed.truncate(tag_start);

        let blob = VaultBlob {
            version: CURRENT_VERSION,
            salt: self.salt,
            kdf_params: self.kdf_params,
            nonce,
            ciphertext: sealed,
            tag,
        };
        self.storage.save(&blob)
    }

    /// Drop all in-memory changes and reload the last committed state.
    pub fn discard(&mut self) -> Result<()> {
        let blob = self
            .storage
            .load()?
            .ok_or_else(|| EzPassError::VaultNotFound(self.storage.location()))?;
        self.store = decrypt_store(&self.master_key, &blob)?;
        Ok(())
    }

    /// Lock the vault: zeroize secrets and release the file lock.
    ///
    /// Dropping the session has the same effect; `close` just makes the
    /// transition explicit at call sites.
    pub fn close(self) {
        drop(self);
    }
}

/// Decrypt and decode a blob into a store.  The intermediate plaintext
/// buffer is wiped on both the success and the error path.
fn decrypt_store(master_key: &MasterKey, blob: &VaultBlob) -> Result<CredentialStore> {
    // Re-join ciphertext and tag for the aead layer.
    let mut sealed = Vec::with_capacity(blob.ciphertext.len() + TAG_LEN);
    sealed.extend_from_slice(&blob.ciphertext);
    sealed.extend_from_slice(&blob.tag);

    let mut plaintext = cipher::open(master_key, &blob.nonce, &sealed)?;
    let store = codec::decode(&plaintext);
    plaintext.zeroize();
    store
}
