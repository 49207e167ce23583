//! Server Tests: HTTP read client and JSON-RPC endpoint end to end
//!
//! A stub node answers JSON-RPC on 127.0.0.1; the bridge server reads through
//! `HttpReadClient` and is driven with reqwest.
#![cfg(feature = "native")]

mod common;

use axum::{routing::post, Json, Router};
use common::{GatedService, ACCOUNT};
use provider_bridge::client::{HttpReadClient, ReadClient, WatchOnlyService};
use provider_bridge::{create_router, Chain, LifecycleController, ProviderSlot, RpcError, Session};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

async fn stub_node(Json(req): Json<Value>) -> Json<Value> {
    let id = req["id"].clone();
    let result = match req["method"].as_str().unwrap_or_default() {
        "eth_chainId" => json!("0xaa36a7"),
        "eth_getBalance" => json!("0x14d1120d7b160000"),
        "eth_blockNumber" => json!("0x10"),
        "eth_call" => json!("0xdead"),
        "eth_estimateGas" => json!("0x5208"),
        "eth_getTransactionReceipt" | "eth_getTransactionByHash" => Value::Null,
        _ => return Json(json!({"jsonrpc": "2.0", "id": id, "error": {"code": -32601, "message": "method not found"}})),
    };
    Json(json!({"jsonrpc": "2.0", "id": id, "result": result}))
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

async fn node_url() -> String { serve(Router::new().route("/", post(stub_node))).await }

async fn rpc(client: &reqwest::Client, url: &str, method: &str, params: Value) -> Value {
    client
        .post(url)
        .json(&json!({"jsonrpc": "2.0", "id": 1, "method": method, "params": params}))
        .send()
        .await
        .expect("send")
        .json()
        .await
        .expect("json")
}

fn run<F: std::future::Future>(f: F) -> F::Output {
    tokio::runtime::Runtime::new().expect("runtime").block_on(f)
}

/// Test: HttpReadClient decodes quantities and maps null receipts to NotFound
#[test]
fn http_read_client_decodes() {
    run(async {
        let client = HttpReadClient::new(node_url().await, Duration::from_secs(5)).unwrap();
        assert_eq!(client.chain_id().await.unwrap(), 11_155_111);
        assert_eq!(client.block_number().await.unwrap(), 16);
        assert_eq!(
            client.balance(ACCOUNT, None).await.unwrap(),
            alloy_primitives::U256::from(1_500_000_000_000_000_000u128)
        );
        assert_eq!(client.transaction(common::hash(0x11)).await.unwrap(), None);

        let err = client.transaction_receipt(common::hash(0x11)).await.unwrap_err();
        assert!(err.is_not_found(), "{err}");
    });
}

/// Test: JSON-RPC error objects surface as RpcError::Rpc
#[test]
fn http_read_client_rpc_error() {
    run(async {
        let router = Router::new().route(
            "/",
            post(|| async { Json(json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32000, "message": "header not found"}})) }),
        );
        let client = HttpReadClient::new(serve(router).await, Duration::from_secs(5)).unwrap();
        let err = client.block_number().await.unwrap_err();
        assert_eq!(err, RpcError::Rpc { code: -32000, message: "header not found".into() });
    });
}

/// Test: unreachable endpoints are transport errors
#[test]
fn http_read_client_transport_error() {
    run(async {
        let client = HttpReadClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        assert!(matches!(client.chain_id().await, Err(RpcError::Transport(_))));
    });
}

/// Test: server answers 4900 while no provider is installed
#[test]
fn server_reports_disconnected() {
    run(async {
        let reader = Arc::new(HttpReadClient::new(node_url().await, Duration::from_secs(5)).unwrap());
        let controller = LifecycleController::new(GatedService::new(), reader, Arc::new(ProviderSlot::new()));
        let url = serve(create_router(controller)).await;
        let http = reqwest::Client::new();

        let response = rpc(&http, &url, "eth_chainId", json!([])).await;
        assert_eq!(response["error"]["code"], 4900);
        assert_eq!(response["error"]["message"], "provider disconnected");
        assert_eq!(response["id"], 1);

        let status: Value = http.get(format!("{url}/status")).send().await.unwrap().json().await.unwrap();
        assert_eq!(status["state"], "absent");
        assert_eq!(status["connected"], false);

        let health: Value = http.get(format!("{url}/health")).send().await.unwrap().json().await.unwrap();
        assert_eq!(health["status"], "ok");
    });
}

/// Test: full path from lifecycle to stub node through the server
#[test]
fn server_serves_ready_provider() {
    run(async {
        let reader = Arc::new(HttpReadClient::new(node_url().await, Duration::from_secs(5)).unwrap());
        let service = Arc::new(WatchOnlyService::new(Chain::sepolia()));
        let controller = LifecycleController::new(service, reader, Arc::new(ProviderSlot::new()));
        assert!(controller.update(Some(ACCOUNT), Some(Session::new("org-1"))).await.is_ready());

        let url = serve(create_router(controller.clone())).await;
        let http = reqwest::Client::new();

        let response = rpc(&http, &url, "eth_chainId", json!([])).await;
        assert_eq!(response["result"], "0xaa36a7");
        assert!(response.get("error").is_none());

        let response = rpc(&http, &url, "eth_getBalance", json!([ACCOUNT.to_string(), "latest"])).await;
        assert_eq!(response["result"], "0x14d1120d7b160000");

        let response = rpc(&http, &url, "eth_accounts", Value::Null).await;
        assert_eq!(response["result"], json!([ACCOUNT.to_checksum(None)]));

        let response = rpc(&http, &url, "eth_getTransactionReceipt", json!([common::hash(0x11)])).await;
        assert_eq!(response["result"], Value::Null);

        let response = rpc(&http, &url, "personal_sign", json!(["0x68656c6c6f", ACCOUNT.to_string()])).await;
        assert_eq!(response["error"]["code"], -32603);

        let response = rpc(&http, &url, "eth_sign", json!([])).await;
        assert_eq!(response["error"]["code"], 4200);

        let response = rpc(&http, &url, "eth_getBalance", json!({"address": ACCOUNT.to_string()})).await;
        assert_eq!(response["error"]["code"], -32602);

        let status: Value = http.get(format!("{url}/status")).send().await.unwrap().json().await.unwrap();
        assert_eq!(status["state"], "ready");
        assert_eq!(status["generation"], 1);
        assert_eq!(status["connected"], true);

        controller.teardown();
        let response = rpc(&http, &url, "eth_chainId", json!([])).await;
        assert_eq!(response["error"]["code"], 4900);
    });
}
