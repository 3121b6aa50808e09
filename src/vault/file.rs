//! On-disk vault blob, atomic persistence, and advisory locking.
//!
//! A `.ezp` vault file has this layout (integers big-endian):
//!
//! ```text
//! [EZPV: 4 bytes][version: 1 byte][salt: 16 bytes]
//! [kdf memory_kib: 4][kdf iterations: 4][kdf parallelism: 4]
//! [nonce: 12 bytes][ciphertext_len: 4][ciphertext][tag: 16 bytes]
//! ```
//!
//! Writes go through a dot-tmp file beside the target, fsynced and then
//! renamed into place, so a crash at any point leaves either the old
//! vault or the new one — never a half-written file.  An exclusive
//! advisory lock on a sibling `.lock` file keeps a second process from
//! unlocking the same vault and silently overwriting changes.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::crypto::kdf::{KdfParams, SALT_LEN};
use crate::crypto::{NONCE_LEN, TAG_LEN};
use crate::errors::{EzPassError, Result};

/// Magic bytes at the start of every vault file.
const MAGIC: &[u8; 4] = b"EZPV";

/// Current vault file format version.
pub const CURRENT_VERSION: u8 = 1;

/// Fixed-size portion before the ciphertext:
/// magic + version + salt + kdf params + nonce + ciphertext_len.
const HEADER_LEN: usize = 4 + 1 + SALT_LEN + 12 + NONCE_LEN + 4;

/// The encrypted vault artifact, exactly as stored on disk.
///
/// Immutable once written; a commit replaces the whole file atomically.
pub struct VaultBlob {
    pub version: u8,
    pub salt: [u8; SALT_LEN],
    pub kdf_params: KdfParams,
    pub nonce: [u8; NONCE_LEN],
    /// Ciphertext without the authentication tag.
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LEN],
}

/// Guard for an exclusive vault lock; released on drop.
pub trait StorageLock {}

/// Capability interface over a vault's storage backend.
///
/// The file implementation below is the only backend today; a future
/// remote backend implements the same three capabilities.
pub trait VaultStorage {
    /// Read and parse the blob.  `Ok(None)` means no vault exists yet —
    /// a signal for the caller to initialize, not an error.
    fn load(&self) -> Result<Option<VaultBlob>>;

    /// Atomically replace the stored blob.
    fn save(&self, blob: &VaultBlob) -> Result<()>;

    /// Acquire the exclusive lock guarding this vault.  Fails fast with
    /// `VaultLocked` when another process holds it.
    fn lock(&self) -> Result<Box<dyn StorageLock>>;

    /// Where this backend stores the vault (for error messages).
    fn location(&self) -> PathBuf;
}

/// File-backed vault storage.
pub struct FileStorage {
    path: PathBuf,
}

struct FileLock {
    _lock_file: File,
}

impl StorageLock for FileLock {}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "vault".to_string());
        let parent = self.path.parent().unwrap_or(Path::new("."));
        parent.join(format!(".{file_name}.{suffix}"))
    }
}

impl VaultStorage for FileStorage {
    fn load(&self) -> Result<Option<VaultBlob>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read(&self.path)?;
        parse_blob(&data).map(Some)
    }

    fn save(&self, blob: &VaultBlob) -> Result<()> {
        let buf = serialize_blob(blob)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
                restrict_dir_permissions(parent);
            }
        }

        // Write the complete new content to a temp file beside the
        // target, flush it to stable storage, then rename it into place.
        // The old vault stays intact until the rename commits.
        let tmp_path = self.sibling("tmp");
        {
            let mut tmp = File::create(&tmp_path)?;
            tmp.write_all(&buf)?;
            tmp.sync_all()?;
        }
        restrict_file_permissions(&tmp_path);
        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    fn lock(&self) -> Result<Box<dyn StorageLock>> {
        let lock_path = self.sibling("lock");
        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)?;
        match lock_file.try_lock_exclusive() {
            Ok(()) => Ok(Box::new(FileLock {
                _lock_file: lock_file,
            })),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                Err(EzPassError::VaultLocked(self.path.clone()))
            }
            Err(e) => Err(EzPassError::Io(e)),
        }
    }

    fn location(&self) -> PathBuf {
        self.path.clone()
    }
}

fn serialize_blob(blob: &VaultBlob) -> Result<Vec<u8>> {
    let ciphertext_len = u32::try_from(blob.ciphertext.len())
        .map_err(|_| EzPassError::Format("ciphertext exceeds u32::MAX bytes".into()))?;

    let mut buf = Vec::with_capacity(HEADER_LEN + blob.ciphertext.len() + TAG_LEN);
    buf.extend_from_slice(MAGIC);
    buf.push(blob.version);
    buf.extend_from_slice(&blob.salt);
    buf.extend_from_slice(&blob.kdf_params.memory_kib.to_be_bytes());
    buf.extend_from_slice(&blob.kdf_params.iterations.to_be_bytes());
    buf.extend_from_slice(&blob.kdf_params.parallelism.to_be_bytes());
    buf.extend_from_slice(&blob.nonce);
    buf.extend_from_slice(&ciphertext_len.to_be_bytes());
    buf.extend_from_slice(&blob.ciphertext);
    buf.extend_from_slice(&blob.tag);
    Ok(buf)
}

fn parse_blob(data: &[u8]) -> Result<VaultBlob> {
    if data.len() < HEADER_LEN + TAG_LEN {
        return Err(EzPassError::Format(
            "file too small to be a vault".into(),
        ));
    }

    if &data[0..4] != MAGIC {
        return Err(EzPassError::Format(
            "missing EZPV magic bytes — not a vault file".into(),
        ));
    }

    let version = data[4];
    if version != CURRENT_VERSION {
        return Err(EzPassError::Format(format!(
            "unsupported version {version}, expected {CURRENT_VERSION}"
        )));
    }

    let mut pos = 5;
    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&data[pos..pos + SALT_LEN]);
    pos += SALT_LEN;

    let kdf_params = KdfParams {
        memory_kib: read_u32(data, pos),
        iterations: read_u32(data, pos + 4),
        parallelism: read_u32(data, pos + 8),
    };
    pos += 12;

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&data[pos..pos + NONCE_LEN]);
    pos += NONCE_LEN;

    let ciphertext_len = read_u32(data, pos) as usize;
    pos += 4;

    // The ciphertext and tag must account for every remaining byte.
    let remaining = data.len() - pos;
    if remaining != ciphertext_len + TAG_LEN {
        return Err(EzPassError::Format(format!(
            "ciphertext length {ciphertext_len} does not match file size"
        )));
    }

    let ciphertext = data[pos..pos + ciphertext_len].to_vec();
    pos += ciphertext_len;

    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&data[pos..pos + TAG_LEN]);

    Ok(VaultBlob {
        version,
        salt,
        kdf_params,
        nonce,
        ciphertext,
        tag,
    })
}

fn read_u32(data: &[u8], pos: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[pos..pos + 4]);
    u32::from_be_bytes(bytes)
}

/// Restrict the vault file to owner read/write (0600).  Best effort.
#[cfg(unix)]
fn restrict_file_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
}

#[cfg(not(unix))]
fn restrict_file_permissions(_path: &Path) {}

/// Restrict the vault directory to owner access (0700).  Best effort.
#[cfg(unix)]
fn restrict_dir_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o700));
}

#[cfg(not(unix))]
fn restrict_dir_permissions(_path: &Path) {}
