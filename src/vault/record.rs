//! The credential record stored inside a vault.
//!
//! A record is keyed by its (service, username) pair; the pair is unique
//! within a vault.  The secret (and any notes, which may also contain
//! sensitive material) is wiped from memory when the record is dropped.

use chrono::{DateTime, Utc};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{EzPassError, Result};

/// One stored account credential.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CredentialRecord {
    /// Service identifier (e.g. "example.com").  Never empty.
    #[zeroize(skip)]
    pub service: String,

    /// Account username.  May be empty for single-account services.
    #[zeroize(skip)]
    pub username: String,

    /// The stored password.
    pub secret: String,

    /// Free-form notes, if any.
    pub notes: Option<String>,

    /// When this credential was first created.
    #[zeroize(skip)]
    pub created_at: DateTime<Utc>,

    /// When this credential was last updated.
    #[zeroize(skip)]
    pub updated_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// Build a new record with both timestamps set to now.
    pub fn new(service: &str, username: &str, secret: &str, notes: Option<&str>) -> Result<Self> {
        if service.is_empty() {
            return Err(EzPassError::InvalidCredential(
                "service cannot be empty".into(),
            ));
        }

        let now = now_millis();
        Ok(Self {
            service: service.to_string(),
            username: username.to_string(),
            secret: secret.to_string(),
            notes: notes.map(str::to_string),
            created_at: now,
            updated_at: now,
        })
    }

    /// The (service, username) key of this record.
    pub fn key(&self) -> (&str, &str) {
        (&self.service, &self.username)
    }

    /// Replace the secret and bump `updated_at`.
    pub fn set_secret(&mut self, secret: &str) {
        // Overwrite the old secret's bytes before the String is freed.
        self.secret.zeroize();
        self.secret = secret.to_string();
        self.updated_at = now_millis();
    }
}

/// Lightweight metadata about a record (no secret material).
///
/// Returned by listing commands so callers can render tables without
/// holding decrypted passwords.
#[derive(Debug, Clone)]
pub struct RecordMetadata {
    pub service: String,
    pub username: String,
    pub has_notes: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&CredentialRecord> for RecordMetadata {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            service: record.service.clone(),
            username: record.username.clone(),
            has_notes: record.notes.is_some(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Current time truncated to millisecond precision.
///
/// The vault codec stores timestamps as whole milliseconds; truncating
/// here keeps encode/decode an exact round-trip.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
