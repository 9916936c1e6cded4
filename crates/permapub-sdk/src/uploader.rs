use std::path::Path;

use permapub_client::StorageNetwork;
use permapub_crypto::FileHasher;
use permapub_ledger::{LedgerEntry, UploadLedger};
use permapub_types::{ContentDigest, RemoteId};
use tracing::{debug, error, info};

use crate::error::{SdkError, SdkResult};

/// How a file was resolved to its remote id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub id: RemoteId,
    pub digest: ContentDigest,
    /// `true` when the ledger already held the content and nothing was
    /// sent to the network.
    pub cached: bool,
}

impl Resolution {
    fn from_entry(entry: LedgerEntry, path: &Path) -> Self {
        info!(
            path = %path.display(),
            digest = %entry.digest.short_hex(),
            id = %entry.remote_id,
            first_seen = %entry.source_path,
            "already uploaded"
        );
        Self {
            id: entry.remote_id,
            digest: entry.digest,
            cached: true,
        }
    }
}

/// Resolves files to remote ids, uploading only content the ledger has
/// never seen.
///
/// Content is uploaded at most once per ledger: a ledger hit returns
/// without touching the network, the ledger writer lock is held from the
/// final lookup until the upload is recorded, and the ledger is written
/// only after the network acknowledged an upload.
pub struct Uploader<'a> {
    network: &'a dyn StorageNetwork,
    ledger: &'a dyn UploadLedger,
}

impl<'a> Uploader<'a> {
    pub fn new(network: &'a dyn StorageNetwork, ledger: &'a dyn UploadLedger) -> Self {
        Self { network, ledger }
    }

    pub async fn resolve_or_upload(&self, path: &Path) -> SdkResult<Resolution> {
        let digest = FileHasher::digest(path)?;
        if let Some(entry) = self.ledger.lookup(&digest)? {
            return Ok(Resolution::from_entry(entry, path));
        }

        let lock = self.ledger.lock().await?;
        // Another writer may have uploaded the same content while we waited.
        if let Some(entry) = self.ledger.lookup(&digest)? {
            return Ok(Resolution::from_entry(entry, path));
        }

        debug!(path = %path.display(), digest = %digest.short_hex(), "not in ledger, uploading");
        let receipt = self.network.upload_file(path).await?;

        let ledger = self
            .ledger
            .record(&lock, &digest, &receipt.id, &path.display().to_string())
            .map_err(|source| {
                error!(
                    path = %path.display(),
                    id = %receipt.id,
                    error = %source,
                    "upload confirmed but not recorded"
                );
                SdkError::Unrecorded {
                    id: receipt.id.clone(),
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        drop(lock);

        let id = ledger.lookup(&digest).cloned().unwrap_or(receipt.id);
        info!(path = %path.display(), id = %id, "uploaded");
        Ok(Resolution {
            id,
            digest,
            cached: false,
        })
    }
}
