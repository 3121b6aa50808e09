//! In-memory credential store for an unlocked session.
//!
//! Records are kept in insertion order and keyed by (service, username).
//! The store owns its records exclusively; it exists only between vault
//! unlock and lock, and the records wipe their secrets when the store is
//! dropped.

use crate::errors::{EzPassError, Result};

use super::record::{now_millis, CredentialRecord};

/// Ordered collection of credential records.
///
/// Linear scans are deliberate: a personal vault holds tens to hundreds
/// of records, and a Vec preserves insertion order for `list` without a
/// second index to keep consistent.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CredentialStore {
    records: Vec<CredentialRecord>,
}

impl CredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in the store.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns `true` if a record with this key exists.
    pub fn contains(&self, service: &str, username: &str) -> bool {
        self.position(service, username).is_some()
    }

    /// Add a record.  Fails if its (service, username) key already exists.
    pub fn add(&mut self, record: CredentialRecord) -> Result<()> {
        if record.service.is_empty() {
            return Err(EzPassError::InvalidCredential(
                "service cannot be empty".into(),
            ));
        }
        if self.contains(&record.service, &record.username) {
            return Err(EzPassError::DuplicateCredential {
                service: record.service.clone(),
                username: record.username.clone(),
            });
        }
        self.records.push(record);
        Ok(())
    }

    /// Look up a record by key.
    pub fn get(&self, service: &str, username: &str) -> Result<&CredentialRecord> {
        self.position(service, username)
            .map(|i| &self.records[i])
            .ok_or_else(|| not_found(service, username))
    }

    /// Apply `mutate` to the record with this key and bump `updated_at`.
    ///
    /// The mutator may rewrite the (service, username) key; the result is
    /// re-validated before it replaces the stored record, so a mutation
    /// that empties the service or collides with another record's key is
    /// rejected and leaves the store untouched.
    pub fn update<F>(&mut self, service: &str, username: &str, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut CredentialRecord),
    {
        let index = self
            .position(service, username)
            .ok_or_else(|| not_found(service, username))?;

        // Mutate a copy so a rejected change never reaches the store.
        let mut updated = self.records[index].clone();
        mutate(&mut updated);

        if updated.service.is_empty() {
            return Err(EzPassError::InvalidCredential(
                "service cannot be empty".into(),
            ));
        }
        let collides = self.records.iter().enumerate().any(|(i, r)| {
            i != index && r.service == updated.service && r.username == updated.username
        });
        if collides {
            return Err(EzPassError::DuplicateCredential {
                service: updated.service.clone(),
                username: updated.username.clone(),
            });
        }

        updated.updated_at = now_millis();
        // The replaced record zeroizes its secret on drop.
        self.records[index] = updated;
        Ok(())
    }

    /// Remove the record with this key.  The removed record zeroizes its
    /// secret when dropped.
    pub fn delete(&mut self, service: &str, username: &str) -> Result<()> {
        let index = self
            .position(service, username)
            .ok_or_else(|| not_found(service, username))?;

        // Removal keeps insertion order for the surviving records.
        self.records.remove(index);
        Ok(())
    }

    /// Iterate over all records in insertion order.
    ///
    /// The iterator is lazy and restartable — call `list` again to walk
    /// the records from the start.
    pub fn list(&self) -> impl Iterator<Item = &CredentialRecord> {
        self.records.iter()
    }

    fn position(&self, service: &str, username: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.service == service && r.username == username)
    }
}

fn not_found(service: &str, username: &str) -> EzPassError {
    EzPassError::CredentialNotFound {
        service: service.to_string(),
        username: username.to_string(),
    }
}
