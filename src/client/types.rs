//! Typed client dialect: native integers, named enums, `Option` for absent fields.

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::core::quantity;

/// Block selector for read calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockTag {
    #[default]
    Latest,
    Pending,
    Earliest,
    Safe,
    Finalized,
    Number(u64),
}

impl BlockTag {
    /// JSON-RPC parameter form.
    pub fn to_param(&self) -> Value {
        match self {
            BlockTag::Latest => Value::from("latest"),
            BlockTag::Pending => Value::from("pending"),
            BlockTag::Earliest => Value::from("earliest"),
            BlockTag::Safe => Value::from("safe"),
            BlockTag::Finalized => Value::from("finalized"),
            BlockTag::Number(n) => Value::from(quantity::encode(*n)),
        }
    }
}

impl FromStr for BlockTag {
    type Err = quantity::QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(BlockTag::Latest),
            "pending" => Ok(BlockTag::Pending),
            "earliest" => Ok(BlockTag::Earliest),
            "safe" => Ok(BlockTag::Safe),
            "finalized" => Ok(BlockTag::Finalized),
            other => quantity::parse_u64(other).map(BlockTag::Number),
        }
    }
}

/// Chain descriptor carried by a signing client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    pub id: u64,
    pub name: String,
    pub rpc_url: Option<String>,
}

impl Chain {
    pub const SEPOLIA_ID: u64 = 11_155_111;

    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), rpc_url: None }
    }

    pub fn sepolia() -> Self {
        Self {
            id: Self::SEPOLIA_ID,
            name: "sepolia".into(),
            rpc_url: Some("https://ethereum-sepolia-rpc.publicnode.com".into()),
        }
    }

    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = Some(url.into());
        self
    }
}

impl Default for Chain {
    fn default() -> Self { Self::sepolia() }
}

/// Remote signing session scope (the user's sub-organization).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Session {
    pub organization_id: String,
}

impl Session {
    pub fn new(organization_id: impl Into<String>) -> Self {
        Self { organization_id: organization_id.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallRequest {
    pub to: Option<Address>,
    pub data: Option<Bytes>,
    pub from: Option<Address>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GasRequest {
    pub to: Option<Address>,
    pub data: Option<Bytes>,
    pub account: Option<Address>,
    pub value: Option<U256>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub to: Option<Address>,
    pub data: Option<Bytes>,
    pub value: Option<U256>,
    pub account: Address,
    pub chain: Option<Chain>,
}

/// EIP-712 payload as handed to a signer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedData {
    pub domain: Value,
    pub types: Map<String, Value>,
    pub primary_type: String,
    pub message: Value,
}

/// Transaction envelope type as the typed dialect names it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TransactionType {
    #[default]
    Legacy,
    Eip2930,
    Eip1559,
    Eip4844,
    Unknown(String),
}

impl TransactionType {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionType::Legacy => "legacy",
            TransactionType::Eip2930 => "eip2930",
            TransactionType::Eip1559 => "eip1559",
            TransactionType::Eip4844 => "eip4844",
            TransactionType::Unknown(name) => name,
        }
    }

    /// Numeric envelope code. Unknown names fall back to legacy.
    pub fn code(&self) -> u8 {
        match self {
            TransactionType::Legacy | TransactionType::Unknown(_) => 0,
            TransactionType::Eip2930 => 1,
            TransactionType::Eip1559 => 2,
            TransactionType::Eip4844 => 3,
        }
    }

    pub fn from_code(code: u64) -> Self {
        match code {
            0 => TransactionType::Legacy,
            1 => TransactionType::Eip2930,
            2 => TransactionType::Eip1559,
            3 => TransactionType::Eip4844,
            other => TransactionType::Unknown(quantity::encode(other)),
        }
    }
}

impl From<&str> for TransactionType {
    fn from(name: &str) -> Self {
        match name {
            "legacy" => TransactionType::Legacy,
            "eip2930" => TransactionType::Eip2930,
            "eip1559" => TransactionType::Eip1559,
            "eip4844" => TransactionType::Eip4844,
            other => TransactionType::Unknown(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    pub block_hash: Option<B256>,
    pub block_number: Option<u64>,
    pub transaction_hash: Option<B256>,
    pub transaction_index: Option<u64>,
    pub log_index: Option<u64>,
    pub removed: bool,
}

/// EIP-2930 access list entry. Same shape on both sides of the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListItem {
    pub address: Address,
    pub storage_keys: Vec<B256>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    pub block_hash: B256,
    pub block_number: u64,
    pub from: Address,
    pub to: Option<Address>,
    pub contract_address: Option<Address>,
    pub cumulative_gas_used: u64,
    pub effective_gas_price: u128,
    pub gas_used: u64,
    pub logs: Vec<Log>,
    pub logs_bloom: Bytes,
    pub status: ReceiptStatus,
    pub transaction_index: u64,
    pub transaction_type: TransactionType,
    pub blob_gas_used: Option<u64>,
    pub blob_gas_price: Option<u128>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub hash: B256,
    pub block_hash: Option<B256>,
    pub block_number: Option<u64>,
    pub from: Address,
    pub to: Option<Address>,
    pub gas: u64,
    pub gas_price: Option<u128>,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
    pub nonce: u64,
    pub value: U256,
    pub input: Bytes,
    pub transaction_index: Option<u64>,
    pub chain_id: Option<u64>,
    pub v: Option<u64>,
    pub access_list: Option<Vec<AccessListItem>>,
    pub max_fee_per_blob_gas: Option<u128>,
    pub blob_versioned_hashes: Option<Vec<B256>>,
    /// Signature scalars as quantities; nodes strip leading zeros.
    pub r: U256,
    pub s: U256,
    pub y_parity: Option<u64>,
    pub type_hex: Option<String>,
    pub transaction_type: TransactionType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_tags_parse() {
        assert_eq!("latest".parse::<BlockTag>().unwrap(), BlockTag::Latest);
        assert_eq!("pending".parse::<BlockTag>().unwrap(), BlockTag::Pending);
        assert_eq!("0x10".parse::<BlockTag>().unwrap(), BlockTag::Number(16));
        assert!("tomorrow".parse::<BlockTag>().is_err());
        assert_eq!(BlockTag::Number(16).to_param(), Value::from("0x10"));
    }

    #[test]
    fn transaction_type_codes() {
        assert_eq!(TransactionType::from("legacy").code(), 0);
        assert_eq!(TransactionType::from("eip2930").code(), 1);
        assert_eq!(TransactionType::from("eip1559").code(), 2);
        assert_eq!(TransactionType::from("eip4844").code(), 3);
        assert_eq!(TransactionType::from("eip7702").code(), 0);
        assert_eq!(TransactionType::from_code(2), TransactionType::Eip1559);
        assert_eq!(TransactionType::from_code(4).as_str(), "0x4");
    }

    #[test]
    fn typed_data_reads_eip712_json() {
        let raw = r#"{
            "domain": {"name": "Token", "chainId": 11155111},
            "types": {"Transfer": [{"name": "to", "type": "address"}]},
            "primaryType": "Transfer",
            "message": {"to": "0x0000000000000000000000000000000000000001"}
        }"#;
        let data: TypedData = serde_json::from_str(raw).unwrap();
        assert_eq!(data.primary_type, "Transfer");
        assert!(data.types.contains_key("Transfer"));
        assert_eq!(data.domain["chainId"], 11155111);
    }
}
