//! Test doubles for the client seams.
#![allow(dead_code)]

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use provider_bridge::client::{
    BlockTag, CallRequest, Chain, GasRequest, Log, ReadClient, ReceiptStatus, SendRequest, Session, SigningClient,
    SigningService, Transaction, TransactionReceipt, TransactionType, TypedData,
};
use provider_bridge::{RpcError, RpcResult};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const ACCOUNT: Address = Address::repeat_byte(0x42);
pub const OTHER: Address = Address::repeat_byte(0x24);

pub fn hash(byte: u8) -> B256 { B256::repeat_byte(byte) }

// =============================================================================
// ReadClient
// =============================================================================

pub struct MockReader {
    pub chain_id: u64,
    pub balance: U256,
    pub block_number: u64,
    pub call_result: Bytes,
    pub gas: U256,
    pub receipt: Mutex<RpcResult<TransactionReceipt>>,
    pub transaction: Mutex<RpcResult<Option<Transaction>>>,
    pub calls: Mutex<Vec<String>>,
    pub last_gas: Mutex<Option<GasRequest>>,
    pub last_block: Mutex<Option<Option<BlockTag>>>,
}

impl Default for MockReader {
    fn default() -> Self {
        Self {
            chain_id: 11_155_111,
            balance: U256::from(1_500_000_000_000_000_000u128),
            block_number: 0x10,
            call_result: Bytes::from_static(&[0xde, 0xad]),
            gas: U256::from(21_000u64),
            receipt: Mutex::new(Err(RpcError::NotFound("Transaction receipt".into()))),
            transaction: Mutex::new(Ok(None)),
            calls: Mutex::new(Vec::new()),
            last_gas: Mutex::new(None),
            last_block: Mutex::new(None),
        }
    }
}

impl MockReader {
    pub fn with_receipt(self, receipt: RpcResult<TransactionReceipt>) -> Self {
        *self.receipt.lock().unwrap() = receipt;
        self
    }

    pub fn with_transaction(self, tx: RpcResult<Option<Transaction>>) -> Self {
        *self.transaction.lock().unwrap() = tx;
        self
    }

    pub fn calls(&self) -> Vec<String> { self.calls.lock().unwrap().clone() }

    fn record(&self, call: &str) { self.calls.lock().unwrap().push(call.to_string()); }
}

#[async_trait]
impl ReadClient for MockReader {
    async fn chain_id(&self) -> RpcResult<u64> {
        self.record("chain_id");
        Ok(self.chain_id)
    }

    async fn balance(&self, _address: Address, block: Option<BlockTag>) -> RpcResult<U256> {
        self.record("balance");
        *self.last_block.lock().unwrap() = Some(block);
        Ok(self.balance)
    }

    async fn block_number(&self) -> RpcResult<u64> {
        self.record("block_number");
        Ok(self.block_number)
    }

    async fn call(&self, _request: CallRequest, block: Option<BlockTag>) -> RpcResult<Bytes> {
        self.record("call");
        *self.last_block.lock().unwrap() = Some(block);
        Ok(self.call_result.clone())
    }

    async fn estimate_gas(&self, request: GasRequest) -> RpcResult<U256> {
        self.record("estimate_gas");
        *self.last_gas.lock().unwrap() = Some(request);
        Ok(self.gas)
    }

    async fn transaction(&self, _hash: B256) -> RpcResult<Option<Transaction>> {
        self.record("transaction");
        self.transaction.lock().unwrap().clone()
    }

    async fn transaction_receipt(&self, _hash: B256) -> RpcResult<TransactionReceipt> {
        self.record("transaction_receipt");
        self.receipt.lock().unwrap().clone()
    }
}

pub fn sample_receipt(kind: TransactionType, status: ReceiptStatus) -> TransactionReceipt {
    TransactionReceipt {
        transaction_hash: hash(0x11),
        block_hash: hash(0x22),
        block_number: 100,
        from: ACCOUNT,
        to: Some(OTHER),
        contract_address: None,
        cumulative_gas_used: 42_000,
        effective_gas_price: 1_000_000_000,
        gas_used: 21_000,
        logs: vec![sample_log()],
        logs_bloom: Bytes::from(vec![0u8; 256]),
        status,
        transaction_index: 0,
        transaction_type: kind,
        blob_gas_used: None,
        blob_gas_price: None,
    }
}

/// Mined log with no transaction index reported.
pub fn sample_log() -> Log {
    Log {
        address: OTHER,
        topics: vec![hash(0xee)],
        data: Bytes::from(vec![0x01, 0x02]),
        block_hash: Some(hash(0x22)),
        block_number: Some(100),
        transaction_hash: Some(hash(0x11)),
        transaction_index: None,
        log_index: Some(0x10),
        removed: false,
    }
}

// =============================================================================
// SigningClient
// =============================================================================

pub struct MockSigner {
    pub account: Option<Address>,
    pub chain: Option<Chain>,
    pub invocations: AtomicUsize,
    pub last_message: Mutex<Option<Vec<u8>>>,
    pub last_send: Mutex<Option<SendRequest>>,
    pub last_typed: Mutex<Option<TypedData>>,
}

impl MockSigner {
    pub fn new(account: Option<Address>) -> Self {
        Self {
            account,
            chain: Some(Chain::sepolia()),
            invocations: AtomicUsize::new(0),
            last_message: Mutex::new(None),
            last_send: Mutex::new(None),
            last_typed: Mutex::new(None),
        }
    }

    pub fn invocations(&self) -> usize { self.invocations.load(Ordering::SeqCst) }
}

#[async_trait]
impl SigningClient for MockSigner {
    fn account(&self) -> Option<Address> { self.account }
    fn chain(&self) -> Option<Chain> { self.chain.clone() }

    async fn send_transaction(&self, request: SendRequest) -> RpcResult<B256> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        *self.last_send.lock().unwrap() = Some(request);
        Ok(hash(0x77))
    }

    async fn sign_message(&self, _account: Address, message: &[u8]) -> RpcResult<Bytes> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        *self.last_message.lock().unwrap() = Some(message.to_vec());
        Ok(Bytes::from(vec![0xab; 65]))
    }

    async fn sign_typed_data(&self, _account: Address, data: &TypedData) -> RpcResult<Bytes> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        *self.last_typed.lock().unwrap() = Some(data.clone());
        Ok(Bytes::from(vec![0xcd; 65]))
    }
}

// =============================================================================
// SigningService
// =============================================================================

/// Handshakes complete immediately unless the account is gated; a gated
/// handshake waits until `open` is called for that account.
#[derive(Default)]
pub struct GatedService {
    gates: Mutex<HashMap<Address, Arc<Notify>>>,
    failing: Mutex<HashSet<Address>>,
    pub connects: AtomicUsize,
}

impl GatedService {
    pub fn new() -> Arc<Self> { Arc::new(Self::default()) }

    pub fn gate(&self, account: Address) {
        self.gates.lock().unwrap().insert(account, Arc::new(Notify::new()));
    }

    pub fn open(&self, account: Address) {
        if let Some(gate) = self.gates.lock().unwrap().get(&account) {
            gate.notify_one();
        }
    }

    pub fn fail(&self, account: Address) {
        self.failing.lock().unwrap().insert(account);
    }

    pub fn connects(&self) -> usize { self.connects.load(Ordering::SeqCst) }
}

#[async_trait]
impl SigningService for GatedService {
    async fn connect(&self, account: Address, _session: &Session) -> RpcResult<Arc<dyn SigningClient>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().get(&account).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.failing.lock().unwrap().contains(&account) {
            return Err(RpcError::Rejected("session expired".into()));
        }
        Ok(Arc::new(MockSigner::new(Some(account))))
    }
}
