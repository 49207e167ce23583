//! Client seams consumed by the bridge
//!
//! ```text
//! SigningService ──connect(account, session)──▶ SigningClient   (one unlocked account)
//!                                                     │
//! ReadClient (chain reads, account independent)       │
//!        │                                            │
//!        └──────────────▶ ProviderBridge ◀────────────┘
//! ```
//!
//! Implementations live outside this crate (remote signing service bindings,
//! node clients). `HttpReadClient` and the watch-only signer cover the
//! native CLI and server.

#[cfg(feature = "native")]
pub mod http;
pub mod types;
pub mod watch_only;

pub use types::{
    AccessListItem, BlockTag, CallRequest, Chain, GasRequest, Log, ReceiptStatus, SendRequest, Session, Transaction,
    TransactionReceipt, TransactionType, TypedData,
};
pub use watch_only::{WatchOnlyService, WatchOnlySigner};
#[cfg(feature = "native")]
pub use http::HttpReadClient;

use crate::error::RpcResult;
use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use std::sync::Arc;

/// Read-only chain access.
#[async_trait]
pub trait ReadClient: Send + Sync {
    async fn chain_id(&self) -> RpcResult<u64>;
    async fn balance(&self, address: Address, block: Option<BlockTag>) -> RpcResult<U256>;
    async fn block_number(&self) -> RpcResult<u64>;
    async fn call(&self, request: CallRequest, block: Option<BlockTag>) -> RpcResult<Bytes>;
    async fn estimate_gas(&self, request: GasRequest) -> RpcResult<U256>;
    async fn transaction(&self, hash: B256) -> RpcResult<Option<Transaction>>;
    /// Fails with `RpcError::NotFound` while the transaction is pending.
    async fn transaction_receipt(&self, hash: B256) -> RpcResult<TransactionReceipt>;
}

/// One account held by the remote signing service.
#[async_trait]
pub trait SigningClient: Send + Sync {
    fn account(&self) -> Option<Address>;
    fn chain(&self) -> Option<Chain>;
    async fn send_transaction(&self, request: SendRequest) -> RpcResult<B256>;
    /// Signs `message` as given; no prefix hashing happens on this side.
    async fn sign_message(&self, account: Address, message: &[u8]) -> RpcResult<Bytes>;
    async fn sign_typed_data(&self, account: Address, data: &TypedData) -> RpcResult<Bytes>;
}

/// Handshake that binds a signing client to an account within a session.
#[async_trait]
pub trait SigningService: Send + Sync {
    async fn connect(&self, account: Address, session: &Session) -> RpcResult<Arc<dyn SigningClient>>;
}
