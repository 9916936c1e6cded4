//! EVM chain access for funding transfers, backed by an `alloy` provider.

use alloy_provider::{Provider, RootProvider};
use alloy_transport::TransportError;
use permapub_crypto::Address;
use tracing::debug;
use url::Url;

use crate::error::{ClientError, ClientResult};

/// JSON-RPC client for the chain the node account is funded from.
#[derive(Clone, Debug)]
pub struct ChainRpc {
    provider: RootProvider,
}

impl ChainRpc {
    pub fn new(url: Url) -> Self {
        Self {
            provider: RootProvider::new_http(url),
        }
    }

    pub async fn chain_id(&self) -> ClientResult<u64> {
        let id = self
            .provider
            .get_chain_id()
            .await
            .map_err(|e| rpc_error("eth_chainId", e))?;
        debug!(chain_id = id, "chain id");
        Ok(id)
    }

    /// Pending nonce of `address`.
    pub async fn transaction_count(&self, address: Address) -> ClientResult<u64> {
        self.provider
            .get_transaction_count(address)
            .pending()
            .await
            .map_err(|e| rpc_error("eth_getTransactionCount", e))
    }

    /// Gas price in wei.
    pub async fn gas_price(&self) -> ClientResult<u128> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| rpc_error("eth_gasPrice", e))
    }

    /// Broadcast a signed transaction and return its hash.
    pub async fn send_raw_transaction(&self, raw: &[u8]) -> ClientResult<String> {
        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(|e| rpc_error("eth_sendRawTransaction", e))?;
        Ok(pending.tx_hash().to_string())
    }
}

/// Keep the provider's JSON-RPC error object; everything else is a
/// transport failure.
fn rpc_error(method: &str, err: TransportError) -> ClientError {
    match err.as_error_resp() {
        Some(payload) => ClientError::Rpc {
            method: method.to_string(),
            code: payload.code,
            message: payload.message.to_string(),
        },
        None => ClientError::Transport {
            method: method.to_string(),
            source: err,
        },
    }
}
