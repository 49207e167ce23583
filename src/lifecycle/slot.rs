//! ProviderSlot - the process-wide provider discovery point
//!
//! Downstream libraries that cannot be handed a provider look here. The slot
//! holds at most one provider and remembers whether the lifecycle controller
//! put it there; the controller only ever clears what it installed, and
//! never overwrites what someone else installed.

use once_cell::sync::Lazy;
use std::sync::{Arc, RwLock};

use crate::bridge::Eip1193Provider;
use crate::error::BridgeError;

static GLOBAL: Lazy<Arc<ProviderSlot>> = Lazy::new(|| Arc::new(ProviderSlot::new()));

#[derive(Default)]
struct Entry {
    provider: Option<Arc<dyn Eip1193Provider>>,
    bridge_owned: bool,
}

#[derive(Default)]
pub struct ProviderSlot {
    entry: RwLock<Entry>,
}

impl ProviderSlot {
    /// A private, empty slot. Most code wants `ProviderSlot::global()`.
    pub fn new() -> Self { Self::default() }

    pub fn global() -> Arc<ProviderSlot> { GLOBAL.clone() }

    pub fn provider(&self) -> Option<Arc<dyn Eip1193Provider>> {
        self.entry.read().ok()?.provider.clone()
    }

    pub fn is_occupied(&self) -> bool {
        self.entry.read().map(|e| e.provider.is_some()).unwrap_or(false)
    }

    /// True when the current occupant was installed by the lifecycle controller.
    pub fn is_bridge_owned(&self) -> bool {
        self.entry.read().map(|e| e.bridge_owned).unwrap_or(false)
    }

    /// Install a provider on behalf of another owner. Only succeeds on an empty slot.
    pub fn install_external(&self, provider: Arc<dyn Eip1193Provider>) -> Result<(), BridgeError> {
        let mut entry = self.entry.write().unwrap_or_else(|p| p.into_inner());
        if entry.provider.is_some() {
            return Err(BridgeError::SlotOccupied);
        }
        entry.provider = Some(provider);
        entry.bridge_owned = false;
        Ok(())
    }

    /// Clear an externally installed provider. Leaves a controller-owned entry alone.
    pub fn release_external(&self) -> bool {
        let mut entry = self.entry.write().unwrap_or_else(|p| p.into_inner());
        if entry.bridge_owned || entry.provider.is_none() {
            return false;
        }
        entry.provider = None;
        true
    }

    pub(crate) fn install_owned(&self, provider: Arc<dyn Eip1193Provider>) -> Result<(), BridgeError> {
        let mut entry = self.entry.write().unwrap_or_else(|p| p.into_inner());
        if entry.provider.is_some() && !entry.bridge_owned {
            return Err(BridgeError::SlotOccupied);
        }
        entry.provider = Some(provider);
        entry.bridge_owned = true;
        Ok(())
    }

    /// Returns whether an owned entry was removed.
    pub(crate) fn release_owned(&self) -> bool {
        let mut entry = self.entry.write().unwrap_or_else(|p| p.into_inner());
        if !entry.bridge_owned {
            return false;
        }
        entry.provider = None;
        entry.bridge_owned = false;
        true
    }
}
