//! Canonical binary codec for the plaintext vault payload.
//!
//! The payload is what gets encrypted — it never touches disk in this
//! form.  Layout (all integers big-endian):
//!
//! ```text
//! [payload version: 1 byte][record count: 4 bytes]
//! per record:
//!   [service: str][username: str][secret: str]
//!   [notes flag: 1 byte][notes: str, only if flag = 1]
//!   [created_at: 8 bytes, unix ms][updated_at: 8 bytes, unix ms]
//! str: [length: 4 bytes][UTF-8 bytes]
//! ```
//!
//! `decode(encode(store)) == store` holds for every valid store.  Decode
//! errors are `Format` — structural problems in an *authenticated*
//! payload indicate a codec bug, which is deliberately distinct from the
//! `Authentication` errors the cipher layer reports for tampering.

use chrono::{DateTime, Utc};
use zeroize::Zeroize;

use crate::errors::{EzPassError, Result};

use super::record::CredentialRecord;
use super::store::CredentialStore;

/// Current payload format version.
pub const PAYLOAD_VERSION: u8 = 1;

/// Serialize the store to its canonical byte layout.
///
/// The caller owns the returned buffer and must zeroize it once sealed.
pub fn encode(store: &CredentialStore) -> Result<Vec<u8>> {
    let count = u32::try_from(store.len())
        .map_err(|_| EzPassError::Format("record count exceeds u32::MAX".into()))?;

    let mut buf = Vec::with_capacity(64 * store.len() + 8);
    buf.push(PAYLOAD_VERSION);
    buf.extend_from_slice(&count.to_be_bytes());

    for record in store.list() {
        write_str(&mut buf, &record.service)?;
        write_str(&mut buf, &record.username)?;
        write_str(&mut buf, &record.secret)?;
        match &record.notes {
            Some(notes) => {
                buf.push(1);
                write_str(&mut buf, notes)?;
            }
            None => buf.push(0),
        }
        buf.extend_from_slice(&record.created_at.timestamp_millis().to_be_bytes());
        buf.extend_from_slice(&record.updated_at.timestamp_millis().to_be_bytes());
    }

    Ok(buf)
}

/// Deserialize a payload produced by `encode`.
pub fn decode(bytes: &[u8]) -> Result<CredentialStore> {
    let mut reader = Reader::new(bytes);

    let version = reader.read_u8()?;
    if version != PAYLOAD_VERSION {
        return Err(EzPassError::Format(format!(
            "unsupported payload version {version}, expected {PAYLOAD_VERSION}"
        )));
    }

    let count = reader.read_u32()?;
    let mut store = CredentialStore::new();

    for _ in 0..count {
        let service = reader.read_string()?;
        if service.is_empty() {
            return Err(EzPassError::Format("record with empty service".into()));
        }
        let username = reader.read_string()?;
        let mut secret = reader.read_string()?;

        // Wipe the already-read secret if any later field fails to parse.
        let rest = (|| {
            let notes = match reader.read_u8()? {
                0 => None,
                1 => Some(reader.read_string()?),
                flag => {
                    return Err(EzPassError::Format(format!("invalid notes flag {flag}")));
                }
            };
            let created_at = reader.read_timestamp()?;
            let updated_at = reader.read_timestamp()?;
            Ok((notes, created_at, updated_at))
        })();
        let (notes, created_at, updated_at) = match rest {
            Ok(fields) => fields,
            Err(e) => {
                secret.zeroize();
                return Err(e);
            }
        };

        let record = CredentialRecord {
            service,
            username,
            secret,
            notes,
            created_at,
            updated_at,
        };

        // A duplicate key inside an authenticated payload is structural
        // corruption, not caller input.
        store.add(record).map_err(|e| match e {
            EzPassError::DuplicateCredential { service, username } => EzPassError::Format(
                format!("duplicate record for service '{service}', username '{username}'"),
            ),
            other => other,
        })?;
    }

    reader.finish()?;
    Ok(store)
}

/// Append a length-prefixed UTF-8 string.
fn write_str(buf: &mut Vec<u8>, s: &str) -> Result<()> {
    let len = u32::try_from(s.len())
        .map_err(|_| EzPassError::Format(format!("string of {} bytes too long", s.len())))?;
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(s.as_bytes());
    Ok(())
}

/// Strict sequential reader over the payload bytes.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| EzPassError::Format("truncated payload".into()))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> Result<u32> {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(self.take(4)?);
        Ok(u32::from_be_bytes(bytes))
    }

    fn read_i64(&mut self) -> Result<i64> {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(self.take(8)?);
        Ok(i64::from_be_bytes(bytes))
    }

    fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| EzPassError::Format("string is not valid UTF-8".into()))
    }

    fn read_timestamp(&mut self) -> Result<DateTime<Utc>> {
        let millis = self.read_i64()?;
        DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| EzPassError::Format(format!("timestamp {millis} out of range")))
    }

    /// Reject trailing garbage after the last record.
    fn finish(&self) -> Result<()> {
        if self.pos != self.bytes.len() {
            return Err(EzPassError::Format(format!(
                "{} trailing bytes after payload",
                self.bytes.len() - self.pos
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> CredentialStore {
        let mut store = CredentialStore::new();
        store
            .add(CredentialRecord::new("example.com", "alice", "xK9#mP2qLw", None).unwrap())
            .unwrap();
        store
            .add(
                CredentialRecord::new("mail.net", "", "p@ss", Some("work account")).unwrap(),
            )
            .unwrap();
        store
    }

    #[test]
    fn round_trips_populated_store() {
        let store = sample_store();
        let bytes = encode(&store).expect("encode");
        let decoded = decode(&bytes).expect("decode");
        assert_eq!(decoded, store);
    }

    #[test]
    fn round_trips_empty_store() {
        let store = CredentialStore::new();
        let bytes = encode(&store).expect("encode");
        assert_eq!(bytes.len(), 5); // version + count
        let decoded = decode(&bytes).expect("decode");
        assert!(decoded.is_empty());
    }

    #[test]
    fn rejects_unknown_payload_version() {
        let mut bytes = encode(&CredentialStore::new()).expect("encode");
        bytes[0] = 99;
        assert!(matches!(decode(&bytes), Err(EzPassError::Format(_))));
    }

    #[test]
    fn rejects_truncated_payload() {
        let bytes = encode(&sample_store()).expect("encode");
        for cut in [1, bytes.len() / 2, bytes.len() - 1] {
            assert!(
                matches!(decode(&bytes[..cut]), Err(EzPassError::Format(_))),
                "truncation at {cut} must fail"
            );
        }
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut bytes = encode(&sample_store()).expect("encode");
        bytes.push(0);
        assert!(matches!(decode(&bytes), Err(EzPassError::Format(_))));
    }

    #[test]
    fn rejects_oversized_string_length() {
        // Claim one record whose service length runs past the buffer.
        let mut bytes = vec![PAYLOAD_VERSION];
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.extend_from_slice(&u32::MAX.to_be_bytes());
        assert!(matches!(decode(&bytes), Err(EzPassError::Format(_))));
    }

    #[test]
    fn rejects_empty_service() {
        // One record whose service string is empty.
        let mut bytes = vec![PAYLOAD_VERSION];
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        assert!(matches!(decode(&bytes), Err(EzPassError::Format(_))));
    }
}
