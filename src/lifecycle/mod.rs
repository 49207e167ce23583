//! Lifecycle - decides when a ProviderBridge exists
//!
//! ```text
//! (account, session) change
//!         │
//!         ├── either missing ──────────────▶ Absent        (release our slot entry)
//!         │
//!         └── both present ──▶ Initializing ──handshake──┬─▶ Ready   (install bridge)
//!                                                        └─▶ Error   (slot left without ours)
//! ```
//!
//! Every trigger bumps a generation counter. A handshake that completes after
//! a newer trigger is discarded: its I/O finished, its result is never applied.

mod slot;
mod state;

pub use slot::ProviderSlot;
pub use state::LifecycleState;

use alloy_primitives::Address;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::bridge::ProviderBridge;
use crate::client::{ReadClient, Session, SigningService};
use crate::error::BridgeError;

type Key = (Address, Session);

#[derive(Default)]
struct Control {
    generation: u64,
    key: Option<Key>,
    bridge: Option<Arc<ProviderBridge>>,
}

struct Inner {
    service: Arc<dyn SigningService>,
    reader: Arc<dyn ReadClient>,
    slot: Arc<ProviderSlot>,
    control: Mutex<Control>,
    state: watch::Sender<LifecycleState>,
}

/// Cloneable handle; clones share one state machine.
#[derive(Clone)]
pub struct LifecycleController {
    inner: Arc<Inner>,
}

impl LifecycleController {
    pub fn new(service: Arc<dyn SigningService>, reader: Arc<dyn ReadClient>, slot: Arc<ProviderSlot>) -> Self {
        let (state, _) = watch::channel(LifecycleState::Absent);
        Self {
            inner: Arc::new(Inner { service, reader, slot, control: Mutex::new(Control::default()), state }),
        }
    }

    /// Controller publishing into `ProviderSlot::global()`.
    pub fn with_global_slot(service: Arc<dyn SigningService>, reader: Arc<dyn ReadClient>) -> Self {
        Self::new(service, reader, ProviderSlot::global())
    }

    pub fn state(&self) -> LifecycleState { self.inner.state.borrow().clone() }

    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> { self.inner.state.subscribe() }

    pub fn generation(&self) -> u64 { self.lock().generation }

    pub fn provider(&self) -> Option<Arc<ProviderBridge>> { self.lock().bridge.clone() }

    pub fn is_connected(&self) -> bool { self.state().is_ready() && self.provider().is_some() }

    pub fn slot(&self) -> &Arc<ProviderSlot> { &self.inner.slot }

    fn lock(&self) -> MutexGuard<'_, Control> {
        self.inner.control.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn publish(&self, state: LifecycleState) -> LifecycleState {
        info!(state = %state, "provider lifecycle");
        self.inner.state.send_replace(state.clone());
        state
    }

    /// React to a change of selected account or session.
    ///
    /// Resolves once this trigger's handshake (if any) has finished, returning
    /// the controller state at that point, which may already belong to a newer
    /// trigger.
    pub async fn update(&self, account: Option<Address>, session: Option<Session>) -> LifecycleState {
        let key = match (account, session) {
            (Some(account), Some(session)) => Some((account, session)),
            _ => None,
        };

        let (generation, account, session) = {
            let mut control = self.lock();
            let current = self.state();
            let settled = matches!(current, LifecycleState::Initializing | LifecycleState::Ready);
            if control.key == key && (key.is_none() || settled) {
                return current;
            }

            control.generation += 1;
            control.key = key.clone();
            control.bridge = None;
            self.inner.slot.release_owned();

            match key {
                None => return self.publish(LifecycleState::Absent),
                Some((account, session)) => {
                    self.publish(LifecycleState::Initializing);
                    (control.generation, account, session)
                }
            }
        };

        debug!(%account, organization = %session.organization_id, generation, "signing handshake");
        let result = self.inner.service.connect(account, &session).await;

        let mut control = self.lock();
        if control.generation != generation {
            warn!(generation, current = control.generation, "discarding stale handshake result");
            return self.state();
        }

        match result {
            Ok(signer) => {
                let bridge = Arc::new(ProviderBridge::new(signer, self.inner.reader.clone()));
                match self.inner.slot.install_owned(bridge.clone()) {
                    Ok(()) => {
                        control.bridge = Some(bridge);
                        self.publish(LifecycleState::Ready)
                    }
                    Err(e) => {
                        warn!("provider slot held by another owner; leaving it in place");
                        self.publish(LifecycleState::Error(Arc::new(e)))
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "signing handshake failed");
                self.inner.slot.release_owned();
                self.publish(LifecycleState::Error(Arc::new(BridgeError::Handshake(e))))
            }
        }
    }

    /// Fire-and-forget variant of [`update`](Self::update) for event handlers.
    pub fn spawn_update(&self, account: Option<Address>, session: Option<Session>) -> JoinHandle<LifecycleState> {
        let controller = self.clone();
        tokio::spawn(async move { controller.update(account, session).await })
    }

    /// Drop the bridge and anything we installed; later completions are discarded.
    pub fn teardown(&self) {
        let mut control = self.lock();
        control.generation += 1;
        control.key = None;
        control.bridge = None;
        if self.inner.slot.release_owned() {
            debug!("released provider slot");
        }
        self.publish(LifecycleState::Absent);
    }
}

impl std::fmt::Debug for LifecycleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleController")
            .field("state", &self.state().as_str())
            .field("generation", &self.generation())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{BlockTag, CallRequest, Chain, GasRequest, Transaction, TransactionReceipt, WatchOnlyService};
    use crate::error::{RpcError, RpcResult};
    use alloy_primitives::{Bytes, B256, U256};
    use async_trait::async_trait;

    struct Offline;

    #[async_trait]
    impl ReadClient for Offline {
        async fn chain_id(&self) -> RpcResult<u64> { Ok(1) }
        async fn balance(&self, _: Address, _: Option<BlockTag>) -> RpcResult<U256> { Ok(U256::ZERO) }
        async fn block_number(&self) -> RpcResult<u64> { Ok(0) }
        async fn call(&self, _: CallRequest, _: Option<BlockTag>) -> RpcResult<Bytes> { Ok(Bytes::new()) }
        async fn estimate_gas(&self, _: GasRequest) -> RpcResult<U256> { Ok(U256::ZERO) }
        async fn transaction(&self, _: B256) -> RpcResult<Option<Transaction>> { Ok(None) }
        async fn transaction_receipt(&self, hash: B256) -> RpcResult<TransactionReceipt> {
            Err(RpcError::NotFound(hash.to_string()))
        }
    }

    fn controller() -> LifecycleController {
        LifecycleController::new(
            Arc::new(WatchOnlyService::new(Chain::sepolia())),
            Arc::new(Offline),
            Arc::new(ProviderSlot::new()),
        )
    }

    #[tokio::test]
    async fn starts_absent_and_counts_generations() {
        let controller = controller();
        assert_eq!(controller.state().as_str(), "absent");
        assert_eq!(controller.generation(), 0);

        let account = Address::repeat_byte(0x01);
        controller.update(Some(account), Some(Session::new("org"))).await;
        assert_eq!(controller.generation(), 1);
        assert!(controller.is_connected());

        controller.teardown();
        assert_eq!(controller.generation(), 2);
        assert!(!controller.slot().is_occupied());
        assert_eq!(controller.state().as_str(), "absent");
    }

    #[tokio::test]
    async fn repeated_absent_trigger_does_not_bump_generation() {
        let controller = controller();
        controller.update(None, None).await;
        controller.update(None, Some(Session::new("org"))).await;
        assert_eq!(controller.generation(), 0);
    }
}
