//! Error taxonomy for the read/signing clients and the provider bridge.

use thiserror::Error;

/// EIP-1193 provider error codes.
pub mod codes {
    pub const UNAUTHORIZED: i64 = 4100;
    pub const UNSUPPORTED_METHOD: i64 = 4200;
    pub const DISCONNECTED: i64 = 4900;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// Failure reported by a `ReadClient`, `SigningClient` or `SigningService`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    /// The looked-up object does not exist (yet). Pending transactions have no receipt.
    #[error("{0} could not be found")]
    NotFound(String),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("transport: {0}")]
    Transport(String),
    #[error("decode: {0}")]
    Decode(String),
    /// The signer refused the operation.
    #[error("rejected: {0}")]
    Rejected(String),
}

impl RpcError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RpcError::NotFound(_))
    }
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("no account connected")]
    NoBoundAccount,
    #[error("method {0} not supported")]
    UnsupportedMethod(String),
    #[error("invalid params: {0}")]
    InvalidParams(String),
    #[error(transparent)]
    Upstream(#[from] RpcError),
    #[error("signing handshake failed: {0}")]
    Handshake(#[source] RpcError),
    #[error("provider slot is held by another owner")]
    SlotOccupied,
}

impl BridgeError {
    /// Numeric code for the EIP-1193 `ProviderRpcError` shape.
    pub fn code(&self) -> i64 {
        match self {
            BridgeError::NoBoundAccount => codes::UNAUTHORIZED,
            BridgeError::UnsupportedMethod(_) => codes::UNSUPPORTED_METHOD,
            BridgeError::InvalidParams(_) => codes::INVALID_PARAMS,
            BridgeError::Upstream(RpcError::Rpc { code, .. }) => *code,
            BridgeError::Upstream(_) => codes::INTERNAL_ERROR,
            BridgeError::Handshake(_) | BridgeError::SlotOccupied => codes::DISCONNECTED,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        BridgeError::InvalidParams(msg.into())
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;
pub type RpcResult<T> = Result<T, RpcError>;
