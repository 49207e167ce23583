//! Hex quantity codec
//!
//! JSON-RPC quantities are lowercase `0x`-prefixed hex with no leading zeros;
//! zero is `0x0`. Decoding also accepts decimal strings and JSON numbers since
//! callers hand the provider values in either form.

use alloy_primitives::U256;
use serde_json::Value;
use std::fmt::LowerHex;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid quantity: {0}")]
pub struct QuantityError(pub String);

/// Encode an integer as a JSON-RPC quantity.
pub fn encode<T: LowerHex>(value: T) -> String {
    format!("0x{value:x}")
}

fn split_radix(raw: &str) -> Result<(&str, u32), QuantityError> {
    let trimmed = raw.trim();
    let (digits, radix) = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (trimmed, 10),
    };
    if digits.is_empty() {
        return Err(QuantityError(raw.to_string()));
    }
    Ok((digits, radix))
}

pub fn parse_u64(raw: &str) -> Result<u64, QuantityError> {
    let (digits, radix) = split_radix(raw)?;
    u64::from_str_radix(digits, radix).map_err(|_| QuantityError(raw.to_string()))
}

pub fn parse_u128(raw: &str) -> Result<u128, QuantityError> {
    let (digits, radix) = split_radix(raw)?;
    u128::from_str_radix(digits, radix).map_err(|_| QuantityError(raw.to_string()))
}

pub fn parse_u256(raw: &str) -> Result<U256, QuantityError> {
    let (digits, radix) = split_radix(raw)?;
    U256::from_str_radix(digits, radix as u64).map_err(|_| QuantityError(raw.to_string()))
}

/// Quantity given as a hex string, a decimal string or a non-negative JSON integer.
pub fn from_json(value: &Value) -> Result<U256, QuantityError> {
    match value {
        Value::String(s) => parse_u256(s),
        Value::Number(n) => n
            .as_u64()
            .map(U256::from)
            .or_else(|| U256::from_str(&n.to_string()).ok())
            .ok_or_else(|| QuantityError(n.to_string())),
        other => Err(QuantityError(other.to_string())),
    }
}

/// `deserialize_with` helpers for wire quantities.
pub(crate) mod de {
    use super::*;
    use serde::{Deserialize, Deserializer};

    pub fn u64<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        let raw = String::deserialize(d)?;
        parse_u64(&raw).map_err(serde::de::Error::custom)
    }

    pub fn opt_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|raw| parse_u64(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }

    pub fn u128<'de, D: Deserializer<'de>>(d: D) -> Result<u128, D::Error> {
        let raw = String::deserialize(d)?;
        parse_u128(&raw).map_err(serde::de::Error::custom)
    }

    pub fn opt_u128<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u128>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|raw| parse_u128(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }

    pub fn u256<'de, D: Deserializer<'de>>(d: D) -> Result<U256, D::Error> {
        let raw = String::deserialize(d)?;
        parse_u256(&raw).map_err(serde::de::Error::custom)
    }
}
