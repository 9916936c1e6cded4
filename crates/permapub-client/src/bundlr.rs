//! Typed client for a bundler node.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/price/{currency}/{bytes}` | Price quote, base units as plain text |
//! | GET    | `/account/balance/{currency}?address=` | Account balance |
//! | GET    | `/info` | Node deposit addresses |
//! | POST   | `/tx/{currency}` | Upload a signed data item |
//! | POST   | `/account/balance/{currency}` | Register a funding transaction |

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use permapub_crypto::transfer::TRANSFER_GAS;
use permapub_crypto::{content_type_for, Address, DataItem, LegacyTransfer, Tag, Wallet, U256};
use permapub_types::RemoteId;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};
use url::Url;

use crate::config::ClientConfig;
use crate::currency::Currency;
use crate::error::{ClientError, ClientResult};
use crate::network::{FundReceipt, StorageNetwork, UploadReceipt};
use crate::rpc::ChainRpc;

/// Client for a bundler node, paying in one EVM currency.
pub struct BundlrClient {
    http: reqwest::Client,
    node_url: Url,
    currency: Currency,
    wallet: Arc<Wallet>,
    rpc: Option<ChainRpc>,
}

#[derive(Deserialize)]
struct BalanceResponse {
    balance: Value,
}

#[derive(Deserialize)]
struct UploadResponse {
    id: String,
}

#[derive(Deserialize)]
struct InfoResponse {
    addresses: std::collections::HashMap<String, String>,
}

impl BundlrClient {
    /// Create a client from configuration, signing with `wallet`.
    pub fn new(config: &ClientConfig, wallet: Arc<Wallet>) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::http("client_init", e))?;

        let mut node_url = config.node_url.clone();
        if !node_url.path().ends_with('/') {
            let path = format!("{}/", node_url.path());
            node_url.set_path(&path);
        }

        let rpc = config
            .provider_url
            .clone()
            .map(ChainRpc::new);

        Ok(Self {
            http,
            node_url,
            currency: config.currency,
            wallet,
            rpc,
        })
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(self.node_url.join(path)?)
    }

    /// Deposit address of the node for this client's currency.
    pub async fn deposit_address(&self) -> ClientResult<Address> {
        let endpoint = "GET /info";
        let resp = self
            .http
            .get(self.url("info")?)
            .send()
            .await
            .map_err(|e| ClientError::http(endpoint, e))?;
        let info: InfoResponse = ensure_success(endpoint, resp)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::http(endpoint, e))?;

        let raw = info.addresses.get(self.currency.as_str()).ok_or_else(|| {
            ClientError::decode(endpoint, format!("no address for {}", self.currency))
        })?;
        Address::from_str(raw).map_err(|e| ClientError::decode(endpoint, format!("{raw}: {e}")))
    }
}

#[async_trait]
impl StorageNetwork for BundlrClient {
    fn currency(&self) -> Currency {
        self.currency
    }

    async fn upload_file(&self, path: &Path) -> ClientResult<UploadReceipt> {
        let endpoint = "POST /tx";
        let data = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tags = [Tag::new("Content-Type", content_type_for(path))];
        let item = DataItem::sign(&self.wallet, &data, &tags)?;
        debug!(
            path = %path.display(),
            payload = item.data().len(),
            tags = item.tag_count(),
            signed = item.as_bytes().len(),
            "uploading data item"
        );

        let resp = self
            .http
            .post(self.url(&format!("tx/{}", self.currency))?)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(item.into_bytes())
            .send()
            .await
            .map_err(|e| ClientError::http(endpoint, e))?;
        let body: UploadResponse = ensure_success(endpoint, resp)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::http(endpoint, e))?;

        let id = RemoteId::new(body.id).map_err(|e| ClientError::decode(endpoint, e.to_string()))?;
        info!(path = %path.display(), id = %id, "upload confirmed");
        Ok(UploadReceipt { id })
    }

    async fn get_price(&self, bytes: u64) -> ClientResult<U256> {
        let endpoint = "GET /price";
        let resp = self
            .http
            .get(self.url(&format!("price/{}/{bytes}", self.currency))?)
            .send()
            .await
            .map_err(|e| ClientError::http(endpoint, e))?;
        let text = ensure_success(endpoint, resp)
            .await?
            .text()
            .await
            .map_err(|e| ClientError::http(endpoint, e))?;
        let price = parse_base_units(endpoint, &Value::String(text.trim().to_string()))?;
        debug!(bytes, %price, "price quote");
        Ok(price)
    }

    async fn get_balance(&self, address: Address) -> ClientResult<U256> {
        let endpoint = "GET /account/balance";
        let mut url = self.url(&format!("account/balance/{}", self.currency))?;
        url.query_pairs_mut()
            .append_pair("address", &address.to_string());
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::http(endpoint, e))?;
        let body: BalanceResponse = ensure_success(endpoint, resp)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::http(endpoint, e))?;
        parse_base_units(endpoint, &body.balance)
    }

    async fn fund(&self, amount: U256) -> ClientResult<FundReceipt> {
        let rpc = self.rpc.as_ref().ok_or(ClientError::MissingProvider)?;
        let to = self.deposit_address().await?;

        let transfer = LegacyTransfer {
            chain_id: rpc.chain_id().await?,
            nonce: rpc.transaction_count(self.wallet.address()).await?,
            gas_price: rpc.gas_price().await?,
            gas_limit: TRANSFER_GAS,
            to,
            value: amount,
        };
        let raw = transfer.sign(&self.wallet)?;
        let tx_id = rpc.send_raw_transaction(&raw).await?;
        info!(tx_id = %tx_id, %amount, "funding transfer sent");

        let endpoint = "POST /account/balance";
        let resp = self
            .http
            .post(self.url(&format!("account/balance/{}", self.currency))?)
            .json(&json!({ "tx_id": tx_id }))
            .send()
            .await
            .map_err(|e| ClientError::http(endpoint, e))?;
        ensure_success(endpoint, resp).await?;

        Ok(FundReceipt {
            id: tx_id,
            quantity: amount,
        })
    }
}

async fn ensure_success(endpoint: &str, resp: reqwest::Response) -> ClientResult<reqwest::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp
        .text()
        .await
        .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
    Err(ClientError::Status {
        endpoint: endpoint.to_string(),
        status,
        body,
    })
}

/// Base-unit amounts arrive as decimal strings or JSON integers.
fn parse_base_units(endpoint: &str, value: &Value) -> ClientResult<U256> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_u64() => n.to_string(),
        other => return Err(ClientError::decode(endpoint, format!("not an amount: {other}"))),
    };
    if raw.is_empty() {
        return Err(ClientError::decode(endpoint, "empty amount"));
    }
    U256::from_str_radix(&raw, 10).map_err(|e| ClientError::decode(endpoint, format!("{raw}: {e}")))
}
