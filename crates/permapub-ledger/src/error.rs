use std::path::PathBuf;

/// Errors produced by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The backing store does not exist.
    #[error("ledger store not found: {0}")]
    Missing(PathBuf),

    /// The backing store exists but cannot be parsed.
    #[error("malformed ledger store {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    /// Another live process held the writer lock for longer than the timeout.
    #[error("timed out waiting for ledger lock {0}; remove it if no other permapub process is running")]
    LockTimeout(PathBuf),

    /// `record` was handed a lock taken on a different ledger.
    #[error("ledger lock is not held for this store")]
    LockNotHeld,

    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying store.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LedgerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
