//! Provider Bridge: EIP-1193 `request(method, params)` over typed chain clients.
//!
//! # Architecture
//!
//! ```text
//! LifecycleController (account, session) ──▶ SigningService::connect
//!   │
//!   ├── ProviderBridge
//!   │     ├── SigningClient (one unlocked account)
//!   │     └── ReadClient (chain reads)
//!   │
//!   └── ProviderSlot (process-wide discovery point)
//!         └── consumers: server, CLI, downstream libraries
//! ```
//!
//! # Lifecycle
//!
//! | State | Bridge | Slot |
//! |-------|--------|------|
//! | Absent | none | empty (of ours) |
//! | Initializing | handshake in flight | empty (of ours) |
//! | Ready | built | holds the bridge |
//! | Error | none | empty (of ours) |
//!
//! # Features
//!
//! - `native` (default) - HTTP read client, JSON-RPC server, logging, signal handling, CLI
//!
//! # Usage
//!
//! ```ignore
//! use provider_bridge::{Eip1193Provider, LifecycleController, ProviderSlot, Session};
//!
//! let controller = LifecycleController::with_global_slot(service, reader);
//! controller.update(Some(account), Some(Session::new("org-1"))).await;
//!
//! let provider = ProviderSlot::global().provider().expect("ready");
//! let chain_id = provider.request("eth_chainId", vec![]).await?;
//! ```

// =============================================================================
// Shared modules
// =============================================================================
pub mod bridge;
pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod lifecycle;

// =============================================================================
// Native-only modules (server, CLI, tokio signals)
// =============================================================================
#[cfg(feature = "native")]
pub mod logging;
#[cfg(feature = "native")]
pub mod runtime;
#[cfg(feature = "native")]
pub mod server;

// =============================================================================
// Re-exports: Shared
// =============================================================================
pub use bridge::{Eip1193Provider, ProviderBridge};
pub use client::{BlockTag, Chain, ReadClient, Session, SigningClient, SigningService};
pub use config::BridgeConfig;
pub use error::{BridgeError, BridgeResult, RpcError, RpcResult};
pub use lifecycle::{LifecycleController, LifecycleState, ProviderSlot};

// =============================================================================
// Re-exports: Native
// =============================================================================
#[cfg(feature = "native")]
pub use client::http::HttpReadClient;
#[cfg(feature = "native")]
pub use runtime::{install_signal_handlers, Shutdown};
#[cfg(feature = "native")]
pub use server::{create_router, create_router_with_name};
