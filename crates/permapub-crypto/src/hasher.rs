use std::path::{Path, PathBuf};

use permapub_types::ContentDigest;
use tracing::debug;

/// Content hasher for files on disk.
///
/// The digest is a pure function of the file's bytes: the file name, its
/// location, and its modification time never contribute. Files are read
/// fully into memory and hashed as raw bytes, so binary assets hash exactly.
pub struct FileHasher;

impl FileHasher {
    /// Digest the full contents of the file at `path`.
    pub fn digest(path: impl AsRef<Path>) -> Result<ContentDigest, HasherError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| HasherError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let digest = Self::digest_bytes(&data);
        debug!(path = %path.display(), bytes = data.len(), digest = %digest.short_hex(), "hashed file");
        Ok(digest)
    }

    /// Digest in-memory bytes.
    pub fn digest_bytes(data: &[u8]) -> ContentDigest {
        ContentDigest::of(data)
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error)]
pub enum HasherError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
