use std::fmt;

use permapub_client::{Currency, StorageNetwork};
use permapub_crypto::U256;
use tracing::debug;

use crate::error::SdkResult;

/// Storage cost of a given payload size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Price {
    pub bytes: u64,
    /// Cost in the currency's smallest unit.
    pub base_units: U256,
    /// Cost in display units, e.g. `0.0001`.
    pub display: String,
    pub currency: Currency,
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.display, self.currency.ticker())
    }
}

/// Read-only price queries against the network's oracle.
pub struct CostEstimator<'a> {
    network: &'a dyn StorageNetwork,
}

impl<'a> CostEstimator<'a> {
    pub fn new(network: &'a dyn StorageNetwork) -> Self {
        Self { network }
    }

    /// Quote the cost of storing `bytes` bytes. Oracle failures propagate;
    /// there is no fallback price.
    pub async fn estimate(&self, bytes: u64) -> SdkResult<Price> {
        let base_units = self.network.get_price(bytes).await?;
        let shown = self.network.convert(base_units)?;
        debug!(bytes, base_units = %base_units, display = %shown, "estimated storage cost");
        Ok(Price {
            bytes,
            base_units,
            display: shown,
            currency: self.network.currency(),
        })
    }
}
