use std::path::PathBuf;

use permapub_types::RemoteId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("no image provided")]
    MissingImage,

    #[error("no id provided")]
    MissingId,

    /// Ids name the output artifact, so they must be a plain file stem.
    #[error("invalid id {0:?}: must not contain path separators")]
    InvalidId(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("hash error: {0}")]
    Hash(#[from] permapub_crypto::HasherError),

    #[error("wallet error: {0}")]
    Wallet(#[from] permapub_crypto::WalletError),

    #[error("ledger error: {0}")]
    Ledger(#[from] permapub_ledger::LedgerError),

    /// The network accepted and charged for the upload but the ledger
    /// write failed. `id` is the confirmed remote id; record it by hand or
    /// the next run pays again.
    #[error("uploaded {path} as {id} but could not record it in the ledger: {source}")]
    Unrecorded {
        id: RemoteId,
        path: PathBuf,
        #[source]
        source: permapub_ledger::LedgerError,
    },

    #[error("network error: {0}")]
    Network(#[from] permapub_client::ClientError),

    #[error("configuration error: {0}")]
    Config(#[from] permapub_client::ConfigError),

    #[error("metadata error: {0}")]
    Metadata(#[from] permapub_metadata::MetadataError),
}

impl SdkError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
