//! Tests for BundlrClient against a mock node and a mock chain provider.

use std::sync::Arc;

use permapub_client::{BundlrClient, ClientConfig, ClientError, Currency, StorageNetwork};
use permapub_crypto::{Address, Wallet, U256};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn config(node: &str, provider: Option<&str>) -> ClientConfig {
    ClientConfig {
        node_url: node.parse().unwrap(),
        currency: Currency::Ethereum,
        private_key: DEV_KEY.into(),
        provider_url: provider.map(|p| p.parse().unwrap()),
        gateway_url: "https://arweave.net".parse().unwrap(),
        timeout_secs: 5,
    }
}

/// JSON-RPC reply echoing the request id, with `body` merged in.
fn rpc_reply(body: serde_json::Value) -> impl Respond {
    move |req: &Request| {
        let id = req.body_json::<serde_json::Value>().unwrap()["id"].clone();
        let mut reply = json!({ "jsonrpc": "2.0", "id": id });
        for (key, value) in body.as_object().unwrap() {
            reply[key] = value.clone();
        }
        ResponseTemplate::new(200).set_body_json(reply)
    }
}

fn client(node: &str, provider: Option<&str>) -> BundlrClient {
    let wallet = Arc::new(Wallet::from_private_key(DEV_KEY).unwrap());
    BundlrClient::new(&config(node, provider), wallet).unwrap()
}

#[tokio::test]
async fn price_is_parsed_from_plain_text() {
    let node = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/price/ethereum/2048"))
        .respond_with(ResponseTemplate::new(200).set_body_string("123456789\n"))
        .expect(1)
        .mount(&node)
        .await;

    let price = client(&node.uri(), None).get_price(2048).await.unwrap();
    assert_eq!(price, U256::from(123_456_789u64));
}

#[tokio::test]
async fn balance_queries_by_address() {
    let node = MockServer::start().await;
    let wallet = Wallet::from_private_key(DEV_KEY).unwrap();
    Mock::given(method("GET"))
        .and(path("/account/balance/ethereum"))
        .and(query_param("address", wallet.address().to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "balance": "5000000000000000000" })))
        .mount(&node)
        .await;

    let client = client(&node.uri(), None);
    let balance = client.get_balance(wallet.address()).await.unwrap();
    assert_eq!(balance, U256::from(5_000_000_000_000_000_000u128));
    assert_eq!(client.convert(balance).unwrap(), "5");
}

#[tokio::test]
async fn upload_posts_signed_data_item() {
    let node = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tx/ethereum"))
        .and(header("content-type", "application/octet-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "tx_abc-123" })))
        .expect(1)
        .mount(&node)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("image.png");
    std::fs::write(&file, b"png bytes").unwrap();

    let receipt = client(&node.uri(), None).upload_file(&file).await.unwrap();
    assert_eq!(receipt.id.as_str(), "tx_abc-123");

    let requests = node.received_requests().await.unwrap();
    let body = &requests[0].body;
    // Ethereum signature type, then the payload at the tail of the envelope.
    assert_eq!(&body[..2], &3u16.to_le_bytes());
    assert!(body.ends_with(b"png bytes"));
    assert!(body.windows(b"image/png".len()).any(|w| w == b"image/png"));
}

#[tokio::test]
async fn upload_failure_status_is_surfaced() {
    let node = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tx/ethereum"))
        .respond_with(ResponseTemplate::new(402).set_body_string("Not enough funds"))
        .mount(&node)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("image.png");
    std::fs::write(&file, b"png bytes").unwrap();

    let err = client(&node.uri(), None).upload_file(&file).await.unwrap_err();
    match err {
        ClientError::Status { status, body, .. } => {
            assert_eq!(status, 402);
            assert_eq!(body, "Not enough funds");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn upload_of_missing_file_sends_nothing() {
    let node = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "x" })))
        .expect(0)
        .mount(&node)
        .await;

    let err = client(&node.uri(), None)
        .upload_file(std::path::Path::new("/nonexistent/image.png"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Io { .. }));
}

#[tokio::test]
async fn malformed_price_is_a_decode_error() {
    let node = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/price/ethereum/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("cheap"))
        .mount(&node)
        .await;

    let err = client(&node.uri(), None).get_price(1).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode { .. }));
}

#[tokio::test]
async fn fund_without_provider_is_rejected() {
    let node = MockServer::start().await;
    let err = client(&node.uri(), None).fund(U256::from(1u8)).await.unwrap_err();
    assert!(matches!(err, ClientError::MissingProvider));
}

#[tokio::test]
async fn fund_sends_transfer_and_registers_it() {
    let node = MockServer::start().await;
    let chain = MockServer::start().await;
    let deposit = "0x3535353535353535353535353535353535353535";
    let tx_hash = "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060";

    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "0.2.0",
            "addresses": { "ethereum": deposit, "matic": deposit }
        })))
        .mount(&node)
        .await;
    Mock::given(method("POST"))
        .and(path("/account/balance/ethereum"))
        .and(body_partial_json(json!({ "tx_id": tx_hash })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "confirmed": true })))
        .expect(1)
        .mount(&node)
        .await;

    for (rpc_method, result) in [
        ("eth_chainId", json!("0x1")),
        ("eth_getTransactionCount", json!("0x7")),
        ("eth_gasPrice", json!("0x4a817c800")),
        ("eth_sendRawTransaction", json!(tx_hash)),
    ] {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": rpc_method })))
            .respond_with(rpc_reply(json!({ "result": result })))
            .expect(1)
            .mount(&chain)
            .await;
    }

    let client = client(&node.uri(), Some(&chain.uri()));
    assert_eq!(
        client.deposit_address().await.unwrap(),
        deposit.parse::<Address>().unwrap()
    );

    let amount = Currency::Ethereum.parse("0.01").unwrap();
    let receipt = client.fund(amount).await.unwrap();
    assert_eq!(receipt.id, tx_hash);
    assert_eq!(receipt.quantity, amount);
}

#[tokio::test]
async fn rpc_error_aborts_funding() {
    let node = MockServer::start().await;
    let chain = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "addresses": { "ethereum": "0x3535353535353535353535353535353535353535" }
        })))
        .mount(&node)
        .await;
    Mock::given(method("POST"))
        .and(path("/account/balance/ethereum"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&node)
        .await;
    Mock::given(method("POST"))
        .respond_with(rpc_reply(json!({
            "error": { "code": -32000, "message": "insufficient funds" }
        })))
        .mount(&chain)
        .await;

    let err = client(&node.uri(), Some(&chain.uri()))
        .fund(U256::from(1u8))
        .await
        .unwrap_err();
    match err {
        ClientError::Rpc { code, message, .. } => {
            assert_eq!(code, -32000);
            assert_eq!(message, "insufficient funds");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_provider_is_a_transport_error() {
    let node = MockServer::start().await;
    let chain = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "addresses": { "ethereum": "0x3535353535353535353535353535353535353535" }
        })))
        .mount(&node)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&chain)
        .await;

    let err = client(&node.uri(), Some(&chain.uri()))
        .fund(U256::from(1u8))
        .await
        .unwrap_err();
    assert!(
        matches!(&err, ClientError::Transport { method, .. } if method == "eth_chainId"),
        "unexpected error: {err:?}"
    );
}
