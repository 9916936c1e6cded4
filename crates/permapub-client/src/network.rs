use std::path::Path;

use async_trait::async_trait;
use permapub_crypto::{Address, U256};
use permapub_types::RemoteId;

use crate::currency::Currency;
use crate::error::{ClientError, ClientResult};

/// Acknowledgment of a confirmed upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadReceipt {
    pub id: RemoteId,
}

/// Result of a funding transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FundReceipt {
    /// Transaction hash on the funding chain.
    pub id: String,
    /// Amount funded, in base units.
    pub quantity: U256,
}

/// Pay-per-byte permanent storage network.
///
/// The publishing pipeline only ever talks to the network through this
/// trait, so tests can substitute a recording double.
#[async_trait]
pub trait StorageNetwork: Send + Sync {
    /// Currency the account pays in.
    fn currency(&self) -> Currency;

    /// Upload the file at `path`. Returns only once the node acknowledged it.
    async fn upload_file(&self, path: &Path) -> ClientResult<UploadReceipt>;

    /// Cost of storing `bytes` bytes, in base units.
    async fn get_price(&self, bytes: u64) -> ClientResult<U256>;

    /// Account balance of `address` on the node, in base units.
    async fn get_balance(&self, address: Address) -> ClientResult<U256>;

    /// Transfer `amount` base units to the node and credit the account.
    async fn fund(&self, amount: U256) -> ClientResult<FundReceipt>;

    /// Base units → display string in the account currency.
    fn convert(&self, amount: U256) -> ClientResult<String> {
        self.currency().format(amount).map_err(ClientError::from)
    }
}
