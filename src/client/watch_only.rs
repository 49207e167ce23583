//! Watch-only signer: reports an account, refuses to sign.

use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use std::sync::Arc;

use super::{Chain, SendRequest, Session, SigningClient, SigningService, TypedData};
use crate::error::{RpcError, RpcResult};

const REFUSED: &str = "watch-only account cannot sign";

#[derive(Debug, Clone)]
pub struct WatchOnlySigner {
    account: Option<Address>,
    chain: Chain,
}

impl WatchOnlySigner {
    pub fn new(account: Option<Address>, chain: Chain) -> Self { Self { account, chain } }
}

#[async_trait]
impl SigningClient for WatchOnlySigner {
    fn account(&self) -> Option<Address> { self.account }
    fn chain(&self) -> Option<Chain> { Some(self.chain.clone()) }

    async fn send_transaction(&self, _: SendRequest) -> RpcResult<B256> {
        Err(RpcError::Rejected(REFUSED.into()))
    }
    async fn sign_message(&self, _: Address, _: &[u8]) -> RpcResult<Bytes> {
        Err(RpcError::Rejected(REFUSED.into()))
    }
    async fn sign_typed_data(&self, _: Address, _: &TypedData) -> RpcResult<Bytes> {
        Err(RpcError::Rejected(REFUSED.into()))
    }
}

/// Handshake that always succeeds with a `WatchOnlySigner` for the requested account.
#[derive(Debug, Clone, Default)]
pub struct WatchOnlyService {
    chain: Chain,
}

impl WatchOnlyService {
    pub fn new(chain: Chain) -> Self { Self { chain } }
}

#[async_trait]
impl SigningService for WatchOnlyService {
    async fn connect(&self, account: Address, session: &Session) -> RpcResult<Arc<dyn SigningClient>> {
        tracing::debug!(%account, organization = %session.organization_id, "watch-only session bound");
        Ok(Arc::new(WatchOnlySigner::new(Some(account), self.chain.clone())))
    }
}
