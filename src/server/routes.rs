//! HTTP routes for provider requests

use axum::{extract::State, response::IntoResponse, routing::{get, post}, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::{codes, BridgeError};
use crate::lifecycle::LifecycleController;

#[derive(Clone)]
pub struct ServerState { pub controller: LifecycleController, pub app_name: String }

impl ServerState {
    pub fn new(controller: LifecycleController, app_name: impl Into<String>) -> Self {
        Self { controller, app_name: app_name.into() }
    }
}

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcErrorBody { pub code: i64, pub message: String }

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorBody>,
}

impl RpcResponse {
    fn ok(id: Value, result: Value) -> Self {
        Self { jsonrpc: "2.0".into(), id, result: Some(result), error: None }
    }

    fn err(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self { jsonrpc: "2.0".into(), id, result: None, error: Some(RpcErrorBody { code, message: message.into() }) }
    }
}

pub fn create_router(controller: LifecycleController) -> Router { create_router_with_name(controller, "provider-bridge") }

pub fn create_router_with_name(controller: LifecycleController, app_name: &str) -> Router {
    Router::new()
        .route("/", post(rpc))
        .route("/health", get(health))
        .route("/status", get(status))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(ServerState::new(controller, app_name))
}

async fn health(State(s): State<ServerState>) -> impl IntoResponse {
    Json(json!({"status": "ok", "service": s.app_name}))
}

async fn status(State(s): State<ServerState>) -> impl IntoResponse {
    let state = s.controller.state();
    let mut body = json!({
        "state": state.as_str(),
        "generation": s.controller.generation(),
        "connected": s.controller.is_connected(),
    });
    if let Some(cause) = state.error() {
        body["error"] = json!(cause.to_string());
    }
    Json(body)
}

async fn rpc(State(s): State<ServerState>, Json(req): Json<RpcRequest>) -> Json<RpcResponse> {
    let params = match req.params {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        _ => {
            let err = BridgeError::InvalidParams("params must be an array".into());
            return Json(RpcResponse::err(req.id, err.code(), err.to_string()));
        }
    };

    let Some(provider) = s.controller.slot().provider() else {
        return Json(RpcResponse::err(req.id, codes::DISCONNECTED, "provider disconnected"));
    };

    debug!(method = %req.method, "rpc request");
    match provider.request(&req.method, params).await {
        Ok(result) => Json(RpcResponse::ok(req.id, result)),
        Err(e) => Json(RpcResponse::err(req.id, e.code(), e.to_string())),
    }
}
