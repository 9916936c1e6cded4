use std::path::PathBuf;

use permapub_crypto::WalletError;

/// Errors from the storage node and funding chain transport.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Request could not be sent or the response could not be read.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    /// JSON-RPC error object returned by the chain provider.
    #[error("RPC {method} failed ({code}): {message}")]
    Rpc {
        method: String,
        code: i64,
        message: String,
    },

    /// The chain provider could not be reached or answered garbage.
    #[error("RPC {method} transport error: {source}")]
    Transport {
        method: String,
        #[source]
        source: alloy_transport::TransportError,
    },

    #[error("funding requires PROVIDER_URL to be configured")]
    MissingProvider,

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("wallet error: {0}")]
    Wallet(#[from] WalletError),
}

impl ClientError {
    pub(crate) fn http(endpoint: &str, source: reqwest::Error) -> Self {
        Self::Http {
            endpoint: endpoint.to_string(),
            source,
        }
    }

    pub(crate) fn decode(endpoint: &str, reason: impl Into<String>) -> Self {
        Self::Decode {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
