//! Lifecycle states published to consumers.

use std::sync::Arc;

use crate::error::BridgeError;

#[derive(Debug, Clone, Default)]
pub enum LifecycleState {
    /// No account or no session; no bridge; slot empty.
    #[default]
    Absent,
    /// Handshake with the signing service in flight.
    Initializing,
    /// Bridge built and installed into the slot.
    Ready,
    /// Construction failed; slot left without our bridge.
    Error(Arc<BridgeError>),
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Absent => "absent",
            LifecycleState::Initializing => "initializing",
            LifecycleState::Ready => "ready",
            LifecycleState::Error(_) => "error",
        }
    }

    pub fn is_ready(&self) -> bool { matches!(self, LifecycleState::Ready) }

    pub fn error(&self) -> Option<&BridgeError> {
        match self {
            LifecycleState::Error(cause) => Some(cause.as_ref()),
            _ => None,
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleState::Error(cause) => write!(f, "error: {cause}"),
            other => f.write_str(other.as_str()),
        }
    }
}
