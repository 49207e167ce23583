//! Server - JSON-RPC over HTTP in front of the provider slot
//!
//! | Route | Method | Description |
//! |-------|--------|-------------|
//! | `/` | POST | JSON-RPC 2.0 request, answered by the slot's provider |
//! | `/health` | GET | liveness |
//! | `/status` | GET | lifecycle state, generation, connected flag |

pub mod routes;

pub use routes::{create_router, create_router_with_name, RpcRequest, RpcResponse, ServerState};
