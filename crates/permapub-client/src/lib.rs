//! Transport to the storage node and the funding chain.
//!
//! - [`StorageNetwork`] -- the boundary the publishing pipeline consumes:
//!   upload a file, quote a price, read a balance, fund the account
//! - [`BundlrClient`] -- `reqwest` implementation against a bundler node
//! - [`ChainRpc`] -- EVM chain access (an `alloy` provider) used to send funding transfers
//! - [`ClientConfig`] -- process-wide settings loaded once from the environment
//! - [`Currency`] -- supported payment currencies and their unit conversion

pub mod bundlr;
pub mod config;
pub mod currency;
pub mod error;
pub mod network;
pub mod rpc;

pub use bundlr::BundlrClient;
pub use config::{ClientConfig, ConfigError};
pub use currency::Currency;
pub use error::{ClientError, ClientResult};
pub use network::{FundReceipt, StorageNetwork, UploadReceipt};
pub use rpc::ChainRpc;
