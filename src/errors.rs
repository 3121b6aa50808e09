use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in ezpass.
///
/// Secret material (passphrases, stored passwords, key bytes) must never
/// appear in any variant — error messages are printed to the terminal.
#[derive(Debug, Error)]
pub enum EzPassError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Wrong passphrase and tampered ciphertext are deliberately
    /// indistinguishable: distinguishing them would hand an attacker a
    /// passphrase-guessing oracle.
    #[error("Authentication failed — wrong master passphrase or tampered vault")]
    Authentication,

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    // --- Vault file errors ---
    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Vault at {0} is locked by another process")]
    VaultLocked(PathBuf),

    #[error("Invalid vault format: {0}")]
    Format(String),

    // --- Credential errors ---
    #[error("Credential for service '{service}', username '{username}' already exists")]
    DuplicateCredential { service: String, username: String },

    #[error("No credential for service '{service}', username '{username}'")]
    CredentialNotFound { service: String, username: String },

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    // --- Password generation errors ---
    #[error("Invalid password policy: {0}")]
    InvalidPolicy(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- Clipboard errors ---
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,

    #[error("Passphrase mismatch — entries do not match")]
    PassphraseMismatch,
}

/// Convenience type alias for ezpass results.
pub type Result<T> = std::result::Result<T, EzPassError>;
