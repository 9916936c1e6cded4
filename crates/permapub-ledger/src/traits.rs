use async_trait::async_trait;
use permapub_types::{ContentDigest, RemoteId};

use crate::error::LedgerResult;
use crate::lock::LedgerLock;
use crate::records::{Ledger, LedgerEntry};

/// Persistent digest → remote id index.
///
/// All implementations must satisfy these invariants:
/// - `load` fails when the backing store is missing or malformed; it never
///   substitutes an empty ledger.
/// - `record` requires the writer lock, reloads current state before
///   mutating it and persists the whole resulting ledger.
/// - An existing entry is canonical: `record` on a known digest leaves it
///   unchanged.
///
/// Callers that pay for an upload take [`lock`](UploadLedger::lock) before
/// paying and hold it until the result is recorded, so two writers never
/// pay for the same content.
#[async_trait]
pub trait UploadLedger: Send + Sync {
    /// Load the full ledger from the backing store.
    fn load(&self) -> LedgerResult<Ledger>;

    /// Wait for the exclusive writer lock. Released when the returned
    /// guard is dropped.
    async fn lock(&self) -> LedgerResult<LedgerLock>;

    /// Record a confirmed upload and return the ledger as persisted.
    fn record(
        &self,
        lock: &LedgerLock,
        digest: &ContentDigest,
        remote_id: &RemoteId,
        source_path: &str,
    ) -> LedgerResult<Ledger>;

    /// Load and look up a single digest.
    fn lookup(&self, digest: &ContentDigest) -> LedgerResult<Option<LedgerEntry>> {
        Ok(self.load()?.entry(digest))
    }
}
