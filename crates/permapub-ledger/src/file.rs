use std::ffi::OsString;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use permapub_types::{ContentDigest, RemoteId};
use tracing::{debug, info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::lock::{LedgerLock, LockFile};
use crate::records::{Ledger, LedgerRecord, RecordOutcome};
use crate::traits::UploadLedger;

/// Ledger persisted as one JSON document on disk.
///
/// Writers hold an exclusive lock file next to the store (`<store>.lock`,
/// containing the owner pid). `record` reloads the store under that lock,
/// inserts, and replaces the store atomically through a temporary file in
/// the same directory. Concurrent invocations sharing a store therefore
/// serialize their mutations instead of clobbering each other. Reads take
/// no lock: the store is only ever replaced whole.
pub struct JsonFileLedger {
    path: PathBuf,
    lock_timeout: Duration,
}

impl JsonFileLedger {
    /// Ledger backed by the store at `path`. Performs no I/O.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout: Duration::from_secs(10),
        }
    }

    /// How long `lock` waits for another live writer before giving up.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("ledger"));
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn persist(&self, ledger: &Ledger) -> LedgerResult<()> {
        let data =
            serde_json::to_vec(ledger).map_err(|e| LedgerError::Serialization(e.to_string()))?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp =
            tempfile::NamedTempFile::new_in(dir).map_err(|e| LedgerError::io(dir, e))?;
        tmp.write_all(&data)
            .map_err(|e| LedgerError::io(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| LedgerError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| LedgerError::io(&self.path, e.error))?;
        debug!(path = %self.path.display(), entries = ledger.len(), "ledger persisted");
        Ok(())
    }
}

#[async_trait]
impl UploadLedger for JsonFileLedger {
    fn load(&self) -> LedgerResult<Ledger> {
        let data = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LedgerError::Missing(self.path.clone()),
            _ => LedgerError::io(&self.path, e),
        })?;
        let ledger: Ledger = serde_json::from_str(&data).map_err(|e| LedgerError::Malformed {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        debug!(path = %self.path.display(), entries = ledger.len(), "ledger loaded");
        Ok(ledger)
    }

    async fn lock(&self) -> LedgerResult<LedgerLock> {
        let lock = LockFile::acquire(self.lock_path(), self.lock_timeout).await?;
        Ok(LedgerLock::file(lock))
    }

    fn record(
        &self,
        lock: &LedgerLock,
        digest: &ContentDigest,
        remote_id: &RemoteId,
        source_path: &str,
    ) -> LedgerResult<Ledger> {
        if !lock.holds_file(&self.lock_path()) {
            return Err(LedgerError::LockNotHeld);
        }
        let mut ledger = self.load()?;
        let record = LedgerRecord {
            remote_id: remote_id.clone(),
            source_path: source_path.to_string(),
        };
        match ledger.insert(*digest, record) {
            RecordOutcome::Inserted => {
                self.persist(&ledger)?;
                info!(digest = %digest.short_hex(), remote_id = %remote_id, file = source_path, "recorded upload");
            }
            RecordOutcome::AlreadyPresent { existing } if existing != *remote_id => {
                warn!(
                    digest = %digest.short_hex(),
                    existing = %existing,
                    offered = %remote_id,
                    "digest already recorded; keeping existing entry"
                );
            }
            RecordOutcome::AlreadyPresent { .. } => {}
        }
        Ok(ledger)
    }
}
