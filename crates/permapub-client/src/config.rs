//! Client configuration.
//!
//! Loaded once at startup. Defaults point at the public bundler node and the
//! arweave.net gateway; override via environment variables (a `.env` file is
//! honored by the CLI) or explicit construction for testing.

use url::Url;

use crate::currency::Currency;

/// Settings for the storage node, the funding chain, and the wallet.
///
/// Custom `Debug` implementation redacts the `private_key` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct ClientConfig {
    /// Bundler node. Default: <https://node1.bundlr.network>
    pub node_url: Url,
    /// Payment currency.
    pub currency: Currency,
    /// Hex secp256k1 private key.
    pub private_key: String,
    /// JSON-RPC endpoint of the funding chain; only `fund` needs it.
    pub provider_url: Option<Url>,
    /// Gateway used to build canonical content URLs.
    /// Default: <https://arweave.net>
    pub gateway_url: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("node_url", &self.node_url)
            .field("currency", &self.currency)
            .field("private_key", &"[REDACTED]")
            .field("provider_url", &self.provider_url)
            .field("gateway_url", &self.gateway_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `BUNDLR_URL` (default: `https://node1.bundlr.network`)
    /// - `CURRENCY` (default: `ethereum`)
    /// - `PRIVATE_KEY` (required)
    /// - `PROVIDER_URL` (optional)
    /// - `ARWEAVE_GATEWAY` (default: `https://arweave.net`)
    /// - `PERMAPUB_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let private_key = lookup("PRIVATE_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingPrivateKey)?;

        let currency = match lookup("CURRENCY") {
            Some(raw) => raw.parse().map_err(ConfigError::UnsupportedCurrency)?,
            None => Currency::Ethereum,
        };

        let provider_url = lookup("PROVIDER_URL")
            .map(|raw| parse_url("PROVIDER_URL", &raw))
            .transpose()?;

        Ok(Self {
            node_url: lookup_url(&lookup, "BUNDLR_URL", "https://node1.bundlr.network")?,
            currency,
            private_key,
            provider_url,
            gateway_url: lookup_url(&lookup, "ARWEAVE_GATEWAY", "https://arweave.net")?,
            timeout_secs: lookup("PERMAPUB_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        })
    }
}

fn lookup_url<F>(lookup: &F, var: &str, default: &str) -> Result<Url, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(var).unwrap_or_else(|| default.to_string());
    parse_url(var, &raw)
}

fn parse_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PRIVATE_KEY environment variable is required")]
    MissingPrivateKey,
    #[error("unsupported currency {0:?} (expected one of ethereum, matic, arbitrum, bnb, avalanche, fantom)")]
    UnsupportedCurrency(String),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
