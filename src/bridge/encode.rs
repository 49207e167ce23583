//! Typed results → JSON-RPC wire shape
//!
//! Each field is resolved on three axes: integers become hex quantities,
//! named enums become numeric codes, and absence becomes either `null` or a
//! missing key depending on what polling callers expect for that field.

use serde_json::{json, Map, Value};

use crate::client::{Log, ReceiptStatus, Transaction, TransactionReceipt, TransactionType};
use crate::core::quantity::encode;

pub fn type_code(kind: &TransactionType) -> String {
    encode(kind.code())
}

pub fn status_code(status: ReceiptStatus) -> &'static str {
    match status {
        ReceiptStatus::Success => "0x1",
        ReceiptStatus::Reverted => "0x0",
    }
}

fn nullable(value: Option<u64>) -> Value {
    value.map(|v| Value::from(encode(v))).unwrap_or(Value::Null)
}

pub fn log(log: &Log) -> Value {
    json!({
        "address": log.address.to_checksum(None),
        "topics": log.topics,
        "data": log.data,
        "blockHash": log.block_hash,
        "blockNumber": nullable(log.block_number),
        "transactionHash": log.transaction_hash,
        "transactionIndex": nullable(log.transaction_index),
        "logIndex": nullable(log.log_index),
        "removed": log.removed,
    })
}

pub fn receipt(receipt: &TransactionReceipt) -> Value {
    let mut out = json!({
        "transactionHash": receipt.transaction_hash,
        "blockHash": receipt.block_hash,
        "blockNumber": encode(receipt.block_number),
        "from": receipt.from.to_checksum(None),
        "to": receipt.to.map(|a| a.to_checksum(None)),
        "contractAddress": receipt.contract_address.map(|a| a.to_checksum(None)),
        "cumulativeGasUsed": encode(receipt.cumulative_gas_used),
        "effectiveGasPrice": encode(receipt.effective_gas_price),
        "gasUsed": encode(receipt.gas_used),
        "logs": receipt.logs.iter().map(log).collect::<Vec<_>>(),
        "logsBloom": receipt.logs_bloom,
        "status": status_code(receipt.status),
        "transactionIndex": encode(receipt.transaction_index),
        "type": type_code(&receipt.transaction_type),
    });
    if let Some(used) = receipt.blob_gas_used {
        out["blobGasUsed"] = json!(encode(used));
    }
    if let Some(price) = receipt.blob_gas_price {
        out["blobGasPrice"] = json!(encode(price));
    }
    out
}

/// `typeHex` and `yParity` have no counterpart on the wire side and are dropped.
pub fn transaction(tx: &Transaction) -> Value {
    let mut out = Map::new();
    out.insert("hash".into(), json!(tx.hash));
    out.insert("blockHash".into(), json!(tx.block_hash));
    out.insert("blockNumber".into(), nullable(tx.block_number));
    out.insert("from".into(), json!(tx.from.to_checksum(None)));
    out.insert("to".into(), json!(tx.to.map(|a| a.to_checksum(None))));
    out.insert("gas".into(), json!(encode(tx.gas)));

    let optional = [
        ("gasPrice", tx.gas_price),
        ("maxFeePerGas", tx.max_fee_per_gas),
        ("maxPriorityFeePerGas", tx.max_priority_fee_per_gas),
        ("maxFeePerBlobGas", tx.max_fee_per_blob_gas),
    ];
    for (key, value) in optional {
        if let Some(v) = value {
            out.insert(key.into(), json!(encode(v)));
        }
    }

    out.insert("nonce".into(), json!(encode(tx.nonce)));
    out.insert("value".into(), json!(encode(tx.value)));
    out.insert("input".into(), json!(tx.input));
    out.insert("transactionIndex".into(), nullable(tx.transaction_index));
    if let Some(chain_id) = tx.chain_id {
        out.insert("chainId".into(), json!(encode(chain_id)));
    }
    if let Some(v) = tx.v {
        out.insert("v".into(), json!(encode(v)));
    }
    if let Some(list) = &tx.access_list {
        out.insert("accessList".into(), json!(list));
    }
    if let Some(hashes) = &tx.blob_versioned_hashes {
        out.insert("blobVersionedHashes".into(), json!(hashes));
    }
    out.insert("r".into(), json!(encode(tx.r)));
    out.insert("s".into(), json!(encode(tx.s)));
    out.insert("type".into(), json!(type_code(&tx.transaction_type)));
    Value::Object(out)
}
