//! Process-wide publishing context.
//!
//! Built once at startup and passed by reference to every operation; no
//! component reaches for global state.

use std::path::PathBuf;
use std::sync::Arc;

use permapub_client::{BundlrClient, ClientConfig, StorageNetwork};
use permapub_crypto::Wallet;
use permapub_ledger::{JsonFileLedger, UploadLedger};
use permapub_metadata::MetadataComposer;
use tracing::debug;

use crate::error::SdkResult;

/// Local files the pipeline reads and writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishPaths {
    /// Base metadata template. Default: `base.json`
    pub base_template: PathBuf,
    /// Ledger store. Default: `uploaded.json`
    pub ledger: PathBuf,
    /// Directory for `<id>.json` artifacts. Default: `output`
    pub output_dir: PathBuf,
}

impl Default for PublishPaths {
    fn default() -> Self {
        Self {
            base_template: PathBuf::from("base.json"),
            ledger: PathBuf::from("uploaded.json"),
            output_dir: PathBuf::from("output"),
        }
    }
}

impl PublishPaths {
    /// Defaults overridden by `BASE_METADATA`, `UPLOADED_LIST` and `OUTPUT_DIR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let path = |var: &str, default: PathBuf| {
            lookup(var)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(default)
        };
        Self {
            base_template: path("BASE_METADATA", defaults.base_template),
            ledger: path("UPLOADED_LIST", defaults.ledger),
            output_dir: path("OUTPUT_DIR", defaults.output_dir),
        }
    }
}

/// Wallet, network client, ledger, composer and paths for one invocation.
pub struct PublishContext {
    pub(crate) wallet: Arc<Wallet>,
    pub(crate) network: Arc<dyn StorageNetwork>,
    pub(crate) ledger: Arc<dyn UploadLedger>,
    pub(crate) composer: MetadataComposer,
    pub(crate) paths: PublishPaths,
}

impl PublishContext {
    /// Assemble a context from explicit parts.
    pub fn new(
        wallet: Arc<Wallet>,
        network: Arc<dyn StorageNetwork>,
        ledger: Arc<dyn UploadLedger>,
        composer: MetadataComposer,
        paths: PublishPaths,
    ) -> Self {
        Self {
            wallet,
            network,
            ledger,
            composer,
            paths,
        }
    }

    /// Production context: a bundler node client and the JSON ledger store.
    pub fn from_config(config: &ClientConfig, paths: PublishPaths) -> SdkResult<Self> {
        let wallet = Arc::new(Wallet::from_private_key(&config.private_key)?);
        let network = Arc::new(BundlrClient::new(config, wallet.clone())?);
        let ledger = Arc::new(JsonFileLedger::new(paths.ledger.clone()));
        let composer = MetadataComposer::new(config.gateway_url.clone());
        debug!(address = %wallet.address(), node = %config.node_url, ?paths, "publish context ready");
        Ok(Self::new(wallet, network, ledger, composer, paths))
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn network(&self) -> &dyn StorageNetwork {
        self.network.as_ref()
    }

    pub fn ledger(&self) -> &dyn UploadLedger {
        self.ledger.as_ref()
    }

    pub fn composer(&self) -> &MetadataComposer {
        &self.composer
    }

    pub fn paths(&self) -> &PublishPaths {
        &self.paths
    }
}
