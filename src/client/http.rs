//! HttpReadClient - `ReadClient` over JSON-RPC 2.0 / HTTP
//!
//! Decodes hex wire values into the typed dialect. A `null` receipt becomes
//! `RpcError::NotFound` so pending lookups stay distinguishable from failures.

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

use super::{
    AccessListItem, BlockTag, CallRequest, GasRequest, Log, ReadClient, ReceiptStatus, Transaction, TransactionReceipt,
    TransactionType,
};
use crate::core::quantity::{self, de};
use crate::error::{RpcError, RpcResult};

pub struct HttpReadClient {
    url: String,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpReadClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> RpcResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("provider-bridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RpcError::Transport(e.to_string()))?;
        Ok(Self { url: url.into(), http, next_id: AtomicU64::new(1) })
    }

    pub fn url(&self) -> &str { &self.url }

    async fn rpc<T: DeserializeOwned>(&self, method: &str, params: Value) -> RpcResult<Option<T>> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(%method, id, "json-rpc call");
        let response = self
            .http
            .post(&self.url)
            .json(&json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}))
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RpcError::Transport(format!("HTTP {} from {}", response.status(), self.url)));
        }

        let envelope: Envelope = response.json().await.map_err(|e| RpcError::Decode(e.to_string()))?;
        if let Some(err) = envelope.error {
            return Err(RpcError::Rpc { code: err.code, message: err.message });
        }
        match envelope.result {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value).map(Some).map_err(|e| RpcError::Decode(format!("{method}: {e}"))),
        }
    }

    async fn rpc_required<T: DeserializeOwned>(&self, method: &str, params: Value) -> RpcResult<T> {
        self.rpc(method, params)
            .await?
            .ok_or_else(|| RpcError::Decode(format!("{method}: empty result")))
    }
}

#[async_trait]
impl ReadClient for HttpReadClient {
    async fn chain_id(&self) -> RpcResult<u64> {
        let raw: String = self.rpc_required("eth_chainId", json!([])).await?;
        quantity::parse_u64(&raw).map_err(|e| RpcError::Decode(e.to_string()))
    }

    async fn balance(&self, address: Address, block: Option<BlockTag>) -> RpcResult<U256> {
        let block = block.unwrap_or_default().to_param();
        let raw: String = self.rpc_required("eth_getBalance", json!([address, block])).await?;
        quantity::parse_u256(&raw).map_err(|e| RpcError::Decode(e.to_string()))
    }

    async fn block_number(&self) -> RpcResult<u64> {
        let raw: String = self.rpc_required("eth_blockNumber", json!([])).await?;
        quantity::parse_u64(&raw).map_err(|e| RpcError::Decode(e.to_string()))
    }

    async fn call(&self, request: CallRequest, block: Option<BlockTag>) -> RpcResult<Bytes> {
        let mut tx = serde_json::Map::new();
        if let Some(to) = request.to { tx.insert("to".into(), json!(to)); }
        if let Some(data) = request.data { tx.insert("data".into(), json!(data)); }
        if let Some(from) = request.from { tx.insert("from".into(), json!(from)); }
        let block = block.unwrap_or_default().to_param();
        Ok(self.rpc("eth_call", json!([tx, block])).await?.unwrap_or_default())
    }

    async fn estimate_gas(&self, request: GasRequest) -> RpcResult<U256> {
        let mut tx = serde_json::Map::new();
        if let Some(to) = request.to { tx.insert("to".into(), json!(to)); }
        if let Some(data) = request.data { tx.insert("data".into(), json!(data)); }
        if let Some(account) = request.account { tx.insert("from".into(), json!(account)); }
        if let Some(value) = request.value { tx.insert("value".into(), json!(quantity::encode(value))); }
        let raw: String = self.rpc_required("eth_estimateGas", json!([tx])).await?;
        quantity::parse_u256(&raw).map_err(|e| RpcError::Decode(e.to_string()))
    }

    async fn transaction(&self, hash: B256) -> RpcResult<Option<Transaction>> {
        let raw: Option<WireTransaction> = self.rpc("eth_getTransactionByHash", json!([hash])).await?;
        Ok(raw.map(Into::into))
    }

    async fn transaction_receipt(&self, hash: B256) -> RpcResult<TransactionReceipt> {
        let raw: Option<WireReceipt> = self.rpc("eth_getTransactionReceipt", json!([hash])).await?;
        raw.map(Into::into)
            .ok_or_else(|| RpcError::NotFound(format!("Transaction receipt with hash \"{hash}\"")))
    }
}

#[derive(Deserialize)]
struct Envelope {
    result: Option<Value>,
    error: Option<WireError>,
}

#[derive(Deserialize)]
struct WireError {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireLog {
    address: Address,
    topics: Vec<B256>,
    data: Bytes,
    block_hash: Option<B256>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    block_number: Option<u64>,
    transaction_hash: Option<B256>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    transaction_index: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    log_index: Option<u64>,
    #[serde(default)]
    removed: bool,
}

impl From<WireLog> for Log {
    fn from(w: WireLog) -> Self {
        Log {
            address: w.address,
            topics: w.topics,
            data: w.data,
            block_hash: w.block_hash,
            block_number: w.block_number,
            transaction_hash: w.transaction_hash,
            transaction_index: w.transaction_index,
            log_index: w.log_index,
            removed: w.removed,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireReceipt {
    transaction_hash: B256,
    block_hash: B256,
    #[serde(deserialize_with = "de::u64")]
    block_number: u64,
    from: Address,
    to: Option<Address>,
    contract_address: Option<Address>,
    #[serde(deserialize_with = "de::u64")]
    cumulative_gas_used: u64,
    #[serde(default, deserialize_with = "de::opt_u128")]
    effective_gas_price: Option<u128>,
    #[serde(deserialize_with = "de::u64")]
    gas_used: u64,
    #[serde(default)]
    logs: Vec<WireLog>,
    #[serde(default)]
    logs_bloom: Bytes,
    #[serde(default, deserialize_with = "de::opt_u64")]
    status: Option<u64>,
    #[serde(deserialize_with = "de::u64")]
    transaction_index: u64,
    #[serde(rename = "type", default, deserialize_with = "de::opt_u64")]
    transaction_type: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    blob_gas_used: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u128")]
    blob_gas_price: Option<u128>,
}

impl From<WireReceipt> for TransactionReceipt {
    fn from(w: WireReceipt) -> Self {
        TransactionReceipt {
            transaction_hash: w.transaction_hash,
            block_hash: w.block_hash,
            block_number: w.block_number,
            from: w.from,
            to: w.to,
            contract_address: w.contract_address,
            cumulative_gas_used: w.cumulative_gas_used,
            effective_gas_price: w.effective_gas_price.unwrap_or_default(),
            gas_used: w.gas_used,
            logs: w.logs.into_iter().map(Into::into).collect(),
            logs_bloom: w.logs_bloom,
            status: if w.status == Some(1) { ReceiptStatus::Success } else { ReceiptStatus::Reverted },
            transaction_index: w.transaction_index,
            transaction_type: TransactionType::from_code(w.transaction_type.unwrap_or_default()),
            blob_gas_used: w.blob_gas_used,
            blob_gas_price: w.blob_gas_price,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTransaction {
    hash: B256,
    block_hash: Option<B256>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    block_number: Option<u64>,
    from: Address,
    to: Option<Address>,
    #[serde(deserialize_with = "de::u64")]
    gas: u64,
    #[serde(default, deserialize_with = "de::opt_u128")]
    gas_price: Option<u128>,
    #[serde(default, deserialize_with = "de::opt_u128")]
    max_fee_per_gas: Option<u128>,
    #[serde(default, deserialize_with = "de::opt_u128")]
    max_priority_fee_per_gas: Option<u128>,
    #[serde(deserialize_with = "de::u64")]
    nonce: u64,
    #[serde(deserialize_with = "de::u256")]
    value: U256,
    #[serde(default)]
    input: Bytes,
    #[serde(default, deserialize_with = "de::opt_u64")]
    transaction_index: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    chain_id: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    v: Option<u64>,
    #[serde(default)]
    access_list: Option<Vec<AccessListItem>>,
    #[serde(default, deserialize_with = "de::opt_u128")]
    max_fee_per_blob_gas: Option<u128>,
    #[serde(default)]
    blob_versioned_hashes: Option<Vec<B256>>,
    #[serde(deserialize_with = "de::u256")]
    r: U256,
    #[serde(deserialize_with = "de::u256")]
    s: U256,
    #[serde(default, deserialize_with = "de::opt_u64")]
    y_parity: Option<u64>,
    #[serde(rename = "type", default)]
    type_hex: Option<String>,
}

impl From<WireTransaction> for Transaction {
    fn from(w: WireTransaction) -> Self {
        let transaction_type = w
            .type_hex
            .as_deref()
            .and_then(|raw| quantity::parse_u64(raw).ok())
            .map(TransactionType::from_code)
            .unwrap_or_default();
        Transaction {
            hash: w.hash,
            block_hash: w.block_hash,
            block_number: w.block_number,
            from: w.from,
            to: w.to,
            gas: w.gas,
            gas_price: w.gas_price,
            max_fee_per_gas: w.max_fee_per_gas,
            max_priority_fee_per_gas: w.max_priority_fee_per_gas,
            nonce: w.nonce,
            value: w.value,
            input: w.input,
            transaction_index: w.transaction_index,
            chain_id: w.chain_id,
            v: w.v,
            access_list: w.access_list,
            max_fee_per_blob_gas: w.max_fee_per_blob_gas,
            blob_versioned_hashes: w.blob_versioned_hashes,
            r: w.r,
            s: w.s,
            y_parity: w.y_parity,
            type_hex: w.type_hex,
            transaction_type,
        }
    }
}
