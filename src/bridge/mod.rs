//! ProviderBridge - EIP-1193 `request(method, params)` over typed clients
//!
//! # Method Table
//!
//! | Method | Backed by | Result |
//! |--------|-----------|--------|
//! | `eth_chainId` | ReadClient | hex quantity |
//! | `eth_accounts`, `eth_requestAccounts` | SigningClient | `[]` or `[address]` |
//! | `eth_getBalance` | ReadClient | hex quantity |
//! | `eth_blockNumber` | ReadClient | hex quantity |
//! | `eth_call` | ReadClient | hex data |
//! | `eth_estimateGas` | ReadClient (bound account) | hex quantity |
//! | `eth_sendTransaction` | SigningClient | transaction hash |
//! | `personal_sign` | SigningClient | signature over the raw bytes |
//! | `eth_signTypedData`, `eth_signTypedData_v4` | SigningClient | EIP-712 signature |
//! | `eth_getTransactionReceipt` | ReadClient | receipt or `null` while pending |
//! | `eth_getTransactionByHash` | ReadClient | transaction or `null` |
//!
//! Anything else fails with `BridgeError::UnsupportedMethod`.

pub mod encode;
pub mod params;

use alloy_primitives::Address;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::client::{CallRequest, Chain, GasRequest, ReadClient, SendRequest, SigningClient};
use crate::core::methods::Method;
use crate::core::quantity::encode as hex_quantity;
use crate::error::{BridgeError, BridgeResult, RpcError};
use params::Params;

/// The universal provider calling convention.
#[async_trait]
pub trait Eip1193Provider: Send + Sync {
    async fn request(&self, method: &str, params: Vec<Value>) -> BridgeResult<Value>;
}

/// One signing client and one read client, fixed for the bridge's lifetime.
///
/// A different account or session means a different bridge; nothing here is
/// swapped in place, so an in-flight request always completes against the
/// clients it started with.
pub struct ProviderBridge {
    signer: Arc<dyn SigningClient>,
    reader: Arc<dyn ReadClient>,
}

impl ProviderBridge {
    pub fn new(signer: Arc<dyn SigningClient>, reader: Arc<dyn ReadClient>) -> Self {
        Self { signer, reader }
    }

    pub fn account(&self) -> Option<Address> { self.signer.account() }
    pub fn chain(&self) -> Option<Chain> { self.signer.chain() }

    fn bound_account(&self) -> BridgeResult<Address> {
        self.signer.account().ok_or(BridgeError::NoBoundAccount)
    }

    async fn dispatch(&self, method: Method, params: Params) -> BridgeResult<Value> {
        match method {
            Method::ChainId => Ok(json!(hex_quantity(self.reader.chain_id().await?))),

            Method::Accounts | Method::RequestAccounts => Ok(match self.signer.account() {
                Some(account) => json!([account.to_checksum(None)]),
                None => json!([]),
            }),

            Method::GetBalance => {
                let address = params.address(0)?;
                let block = params.block_tag(1)?;
                Ok(json!(hex_quantity(self.reader.balance(address, block).await?)))
            }

            Method::BlockNumber => Ok(json!(hex_quantity(self.reader.block_number().await?))),

            Method::Call => {
                let tx = params.tx(0)?;
                let block = params.block_tag(1)?;
                let request = CallRequest { to: tx.to, data: tx.data, from: tx.from };
                Ok(json!(self.reader.call(request, block).await?))
            }

            Method::EstimateGas => {
                let tx = params.tx(0)?;
                let request = GasRequest {
                    value: tx.value()?,
                    to: tx.to,
                    data: tx.data,
                    account: self.signer.account(),
                };
                Ok(json!(hex_quantity(self.reader.estimate_gas(request).await?)))
            }

            Method::SendTransaction => {
                let account = self.bound_account()?;
                let tx = params.tx(0)?;
                let request = SendRequest {
                    value: tx.value()?,
                    to: tx.to,
                    data: tx.data,
                    account,
                    chain: self.signer.chain(),
                };
                Ok(json!(self.signer.send_transaction(request).await?))
            }

            Method::PersonalSign => {
                let account = self.bound_account()?;
                let message = params.hex_bytes(0, "message")?;
                Ok(json!(self.signer.sign_message(account, &message).await?))
            }

            Method::SignTypedData | Method::SignTypedDataV4 => {
                let account = self.bound_account()?;
                let typed = params.typed_data(1)?;
                Ok(json!(self.signer.sign_typed_data(account, &typed).await?))
            }

            Method::GetTransactionReceipt => {
                let hash = params.hash(0)?;
                match self.reader.transaction_receipt(hash).await {
                    Ok(receipt) => Ok(encode::receipt(&receipt)),
                    // Pollers treat null as "keep waiting" and an error as fatal.
                    Err(RpcError::NotFound(_)) => Ok(Value::Null),
                    Err(e) => Err(e.into()),
                }
            }

            Method::GetTransactionByHash => {
                let hash = params.hash(0)?;
                match self.reader.transaction(hash).await {
                    Ok(Some(tx)) => Ok(encode::transaction(&tx)),
                    Ok(None) | Err(RpcError::NotFound(_)) => Ok(Value::Null),
                    Err(e) => Err(e.into()),
                }
            }
        }
    }
}

#[async_trait]
impl Eip1193Provider for ProviderBridge {
    async fn request(&self, method: &str, params: Vec<Value>) -> BridgeResult<Value> {
        let Some(parsed) = Method::from_name(method) else {
            warn!(%method, "unhandled provider method");
            return Err(BridgeError::UnsupportedMethod(method.to_string()));
        };
        if parsed.is_transaction() {
            debug!(method = %parsed, ?params, "transaction request");
        }
        self.dispatch(parsed, Params::new(params)).await
    }
}

impl std::fmt::Debug for ProviderBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderBridge")
            .field("account", &self.signer.account())
            .field("chain", &self.signer.chain().map(|c| c.id))
            .finish()
    }
}
