//! Writer locks for ledger stores.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

use crate::error::{LedgerError, LedgerResult};

const LOCK_POLL: Duration = Duration::from_millis(50);

/// A lock file without a readable owner pid is treated as abandoned once
/// it is older than this.
const UNOWNED_GRACE: Duration = Duration::from_secs(5);

/// Exclusive writer lock on one ledger, obtained from
/// [`UploadLedger::lock`](crate::UploadLedger::lock). Dropping it releases
/// the lock.
pub struct LedgerLock {
    kind: LockKind,
}

enum LockKind {
    File(LockFile),
    Memory(OwnedMutexGuard<()>),
}

impl LedgerLock {
    pub(crate) fn file(lock: LockFile) -> Self {
        Self {
            kind: LockKind::File(lock),
        }
    }

    pub(crate) fn memory(guard: OwnedMutexGuard<()>) -> Self {
        Self {
            kind: LockKind::Memory(guard),
        }
    }

    pub(crate) fn holds_file(&self, path: &Path) -> bool {
        matches!(&self.kind, LockKind::File(lock) if lock.path == path)
    }

    pub(crate) fn holds_mutex(&self, mutex: &Arc<Mutex<()>>) -> bool {
        matches!(&self.kind, LockKind::Memory(guard) if Arc::ptr_eq(OwnedMutexGuard::mutex(guard), mutex))
    }
}

impl fmt::Debug for LedgerLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LockKind::File(lock) => f.debug_tuple("LedgerLock").field(&lock.path).finish(),
            LockKind::Memory(_) => f.debug_tuple("LedgerLock").field(&"memory").finish(),
        }
    }
}

/// Exclusive lock held by creating a file containing the owner pid;
/// released on drop.
pub(crate) struct LockFile {
    path: PathBuf,
}

impl LockFile {
    /// Create `path` exclusively, waiting up to `timeout` for a live holder.
    /// A lock left behind by a process that no longer exists is broken.
    pub(crate) async fn acquire(path: PathBuf, timeout: Duration) -> LedgerResult<Self> {
        let deadline = Instant::now() + timeout;
        loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    let written = writeln!(file, "{}", std::process::id()).and_then(|_| file.sync_all());
                    if let Err(e) = written {
                        // Without a pid the lock could never be recognized as stale.
                        let _ = fs::remove_file(&path);
                        return Err(LedgerError::io(&path, e));
                    }
                    debug!(path = %path.display(), "ledger lock acquired");
                    return Ok(Self { path });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if break_if_stale(&path)? {
                        continue;
                    }
                    if Instant::now() >= deadline {
                        return Err(LedgerError::LockTimeout(path));
                    }
                    tokio::time::sleep(LOCK_POLL).await;
                }
                Err(e) => return Err(LedgerError::io(&path, e)),
            }
        }
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to release ledger lock");
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Owner {
    Alive,
    Gone,
}

/// Remove the lock at `path` if its owner is gone. Returns `true` when the
/// caller should retry immediately.
fn break_if_stale(path: &Path) -> LedgerResult<bool> {
    let Some(pid) = stale_owner(path)? else {
        return Ok(false);
    };

    // Move the lock aside before deleting it so a lock freshly created by
    // another writer in the meantime is never removed.
    let aside = path.with_extension(format!("stale-{}", std::process::id()));
    match fs::rename(path, &aside) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(LedgerError::io(path, e)),
    }
    if read_pid(&aside) == pid {
        fs::remove_file(&aside).map_err(|e| LedgerError::io(&aside, e))?;
        warn!(path = %path.display(), ?pid, "broke stale ledger lock");
    } else {
        match fs::hard_link(&aside, path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                warn!(path = %path.display(), "ledger lock changed hands while breaking it");
            }
            Err(e) => return Err(LedgerError::io(path, e)),
        }
        let _ = fs::remove_file(&aside);
    }
    Ok(true)
}

/// `Some(pid)` when the lock belongs to a dead process, `Some(None)` when it
/// has no readable owner and is older than [`UNOWNED_GRACE`], `None` while
/// the lock should be waited on.
fn stale_owner(path: &Path) -> LedgerResult<Option<Option<u32>>> {
    match read_pid(path) {
        Some(pid) => Ok((process_state(pid) == Owner::Gone).then_some(Some(pid))),
        None => {
            let modified = match fs::metadata(path).and_then(|m| m.modified()) {
                Ok(t) => t,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(LedgerError::io(path, e)),
            };
            let age = SystemTime::now()
                .duration_since(modified)
                .unwrap_or_default();
            Ok((age >= UNOWNED_GRACE).then_some(None))
        }
    }
}

fn read_pid(path: &Path) -> Option<u32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

#[cfg(target_os = "linux")]
fn process_state(pid: u32) -> Owner {
    if Path::new("/proc").join(pid.to_string()).exists() {
        Owner::Alive
    } else {
        Owner::Gone
    }
}

/// Without a portable liveness check every owner is assumed alive; the
/// lock then times out and the error names the file to remove.
#[cfg(not(target_os = "linux"))]
fn process_state(_pid: u32) -> Owner {
    Owner::Alive
}
