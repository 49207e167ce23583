//! Positional parameter access for provider requests.

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

use crate::client::{BlockTag, TypedData};
use crate::core::quantity;
use crate::error::{BridgeError, BridgeResult};

/// Transaction-shaped object passed to `eth_call`, `eth_estimateGas`, `eth_sendTransaction`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TxParams {
    #[serde(default)]
    pub to: Option<Address>,
    #[serde(default, alias = "input")]
    pub data: Option<Bytes>,
    #[serde(default)]
    pub from: Option<Address>,
    #[serde(default)]
    value: Option<Value>,
}

impl TxParams {
    pub fn value(&self) -> BridgeResult<Option<U256>> {
        match &self.value {
            None | Some(Value::Null) => Ok(None),
            Some(raw) => quantity::from_json(raw).map(Some).map_err(|e| BridgeError::invalid(e.to_string())),
        }
    }
}

pub struct Params(Vec<Value>);

impl Params {
    pub fn new(values: Vec<Value>) -> Self { Self(values) }

    fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index).filter(|v| !v.is_null())
    }

    fn required(&self, index: usize, name: &str) -> BridgeResult<&Value> {
        self.get(index)
            .ok_or_else(|| BridgeError::invalid(format!("missing {name} at position {index}")))
    }

    pub fn str(&self, index: usize, name: &str) -> BridgeResult<&str> {
        self.required(index, name)?
            .as_str()
            .ok_or_else(|| BridgeError::invalid(format!("{name} must be a string")))
    }

    pub fn address(&self, index: usize) -> BridgeResult<Address> {
        let raw = self.str(index, "address")?;
        Address::from_str(raw).map_err(|e| BridgeError::invalid(format!("address {raw}: {e}")))
    }

    pub fn hash(&self, index: usize) -> BridgeResult<B256> {
        let raw = self.str(index, "hash")?;
        B256::from_str(raw).map_err(|e| BridgeError::invalid(format!("hash {raw}: {e}")))
    }

    /// Optional block selector; absent means latest.
    pub fn block_tag(&self, index: usize) -> BridgeResult<Option<BlockTag>> {
        match self.get(index) {
            None => Ok(None),
            Some(Value::String(raw)) => BlockTag::from_str(raw)
                .map(Some)
                .map_err(|_| BridgeError::invalid(format!("block tag {raw}"))),
            Some(other) => Err(BridgeError::invalid(format!("block tag {other}"))),
        }
    }

    pub fn tx(&self, index: usize) -> BridgeResult<TxParams> {
        let raw = self.required(index, "transaction")?;
        TxParams::deserialize(raw).map_err(|e| BridgeError::invalid(format!("transaction: {e}")))
    }

    /// `0x`-prefixed hex payload, decoded to raw bytes.
    pub fn hex_bytes(&self, index: usize, name: &str) -> BridgeResult<Vec<u8>> {
        let raw = self.str(index, name)?;
        let digits = raw
            .strip_prefix("0x")
            .ok_or_else(|| BridgeError::invalid(format!("{name} must be 0x-prefixed hex")))?;
        hex::decode(digits).map_err(|e| BridgeError::invalid(format!("{name}: {e}")))
    }

    /// EIP-712 payload given either as JSON text or as an object.
    pub fn typed_data(&self, index: usize) -> BridgeResult<TypedData> {
        let parsed = match self.required(index, "typed data")? {
            Value::String(text) => serde_json::from_str(text),
            other => TypedData::deserialize(other),
        };
        parsed.map_err(|e| BridgeError::invalid(format!("typed data: {e}")))
    }
}
