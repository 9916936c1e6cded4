use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use permapub_types::{ContentDigest, RemoteId};
use tokio::sync::Mutex;

use crate::error::{LedgerError, LedgerResult};
use crate::lock::LedgerLock;
use crate::records::{Ledger, LedgerRecord};
use crate::traits::UploadLedger;

/// In-memory ledger for tests and embedding.
///
/// Holds the whole ledger behind a `RwLock`; the writer lock is an async
/// mutex. `record` follows the same first-writer-wins rule as the
/// file-backed store.
pub struct InMemoryLedger {
    inner: RwLock<Ledger>,
    writer: Arc<Mutex<()>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::with_ledger(Ledger::new())
    }

    /// Start from an existing ledger.
    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            inner: RwLock::new(ledger),
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.inner.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UploadLedger for InMemoryLedger {
    fn load(&self) -> LedgerResult<Ledger> {
        Ok(self.inner.read().expect("lock poisoned").clone())
    }

    async fn lock(&self) -> LedgerResult<LedgerLock> {
        Ok(LedgerLock::memory(self.writer.clone().lock_owned().await))
    }

    fn record(
        &self,
        lock: &LedgerLock,
        digest: &ContentDigest,
        remote_id: &RemoteId,
        source_path: &str,
    ) -> LedgerResult<Ledger> {
        if !lock.holds_mutex(&self.writer) {
            return Err(LedgerError::LockNotHeld);
        }
        let mut ledger = self.inner.write().expect("lock poisoned");
        ledger.insert(
            *digest,
            LedgerRecord {
                remote_id: remote_id.clone(),
                source_path: source_path.to_string(),
            },
        );
        Ok(ledger.clone())
    }
}
