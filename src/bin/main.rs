//! provider-bridge CLI - EIP-1193 requests from the shell
//!
//!   provider-bridge request <method> [params-json]   → one provider request, output JSON
//!   provider-bridge serve [--port <port>]            → JSON-RPC server over the provider slot
//!   provider-bridge methods                          → supported method table
//!
//! Reads go to `--rpc-url`; signing goes through a watch-only signer bound to
//! `--account`, so signing methods answer with a rejection instead of a signature.

use anyhow::{anyhow, bail, Context, Result};
use provider_bridge::client::{HttpReadClient, ReadClient, SigningService, WatchOnlyService, WatchOnlySigner};
use provider_bridge::core::methods::Method;
use provider_bridge::logging::init_logging;
use provider_bridge::{install_signal_handlers, BridgeConfig, Chain, Eip1193Provider, LifecycleController, ProviderBridge, Session};
use serde_json::{json, Value};
use std::env;
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::{debug, info};

fn main() {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let opts = ParsedArgs::parse(&args[1..]);

    if opts.help {
        print_usage();
        return;
    }

    if opts.version {
        println!("provider-bridge {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let result = match opts.command.as_deref() {
        Some("request") | Some("req") => cmd_request(&opts),
        Some("serve") => cmd_serve(&opts),
        Some("methods") => Ok(cmd_methods()),
        Some(cmd) => Err(anyhow!("Unknown command: {}", cmd)),
        None => {
            print_usage();
            return;
        }
    };

    let pretty = opts.pretty || std::io::stdout().is_terminal();
    match result {
        Ok(output) => println!("{}", render(&output, pretty)),
        Err(e) => {
            let err = match e.downcast_ref::<provider_bridge::BridgeError>() {
                Some(bridge) => json!({"error": {"code": bridge.code(), "message": bridge.to_string()}}),
                None => json!({"error": format!("{:#}", e)}),
            };
            eprintln!("{}", render(&err, pretty));
            std::process::exit(1);
        }
    }
}

fn render(value: &Value, pretty: bool) -> String {
    let out = if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    out.unwrap_or_else(|_| value.to_string())
}

#[derive(Default)]
struct ParsedArgs {
    command: Option<String>,
    method: Option<String>,
    params: Option<String>,
    rpc_url: Option<String>,
    chain_id: Option<String>,
    account: Option<String>,
    session: Option<String>,
    port: Option<u16>,
    pretty: bool,
    help: bool,
    version: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Self {
        // Load .env file if present
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let value = value.trim().trim_matches('"');
                    if !value.is_empty() && env::var(key.trim()).is_err() {
                        env::set_var(key.trim(), value);
                    }
                }
            }
        }

        let mut opts = ParsedArgs::default();
        let mut positional = Vec::new();
        let mut i = 0;

        let value_at = |i: usize| args.get(i + 1).cloned();

        while i < args.len() {
            let arg = &args[i];
            match arg.as_str() {
                "--help" | "-h" => opts.help = true,
                "--version" | "-V" => opts.version = true,
                "--pretty" => opts.pretty = true,
                "--rpc-url" | "-r" => {
                    opts.rpc_url = value_at(i);
                    i += 1;
                }
                "--chain-id" | "-c" => {
                    opts.chain_id = value_at(i);
                    i += 1;
                }
                "--account" | "-a" => {
                    opts.account = value_at(i);
                    i += 1;
                }
                "--session" | "-s" => {
                    opts.session = value_at(i);
                    i += 1;
                }
                "--port" | "-p" => {
                    opts.port = value_at(i).and_then(|p| p.parse().ok());
                    i += 1;
                }
                _ if !arg.starts_with('-') => positional.push(arg.clone()),
                _ => {} // Ignore unknown flags
            }
            i += 1;
        }

        // First positional is command
        if !positional.is_empty() {
            opts.command = Some(positional.remove(0));
        }
        // Second positional is method
        if !positional.is_empty() {
            opts.method = Some(positional.remove(0));
        }
        // Rest is params JSON (joined)
        if !positional.is_empty() {
            opts.params = Some(positional.join(" "));
        }

        // Server port from env (BRIDGE_RPC_URL and friends are read by BridgeConfig)
        if opts.port.is_none() {
            opts.port = env::var("BRIDGE_PORT").ok().and_then(|s| s.parse().ok());
        }

        opts
    }

    /// Environment first, flags on top.
    fn config(&self) -> Result<BridgeConfig> {
        let mut config = BridgeConfig::from_env()?;
        if let Some(raw) = self.chain_id.as_deref() {
            let id = provider_bridge::core::quantity::parse_u64(raw).with_context(|| format!("--chain-id {raw}"))?;
            if id != config.chain.id {
                config.chain = Chain::new(id, format!("chain-{id}"));
            }
        }
        if let Some(url) = &self.rpc_url {
            config = config.with_rpc_url(url.clone());
        }
        if let Some(raw) = &self.account {
            let account = raw.parse().with_context(|| format!("--account {raw}"))?;
            config = config.with_account(account);
        }
        if let Some(org) = &self.session {
            config = config.with_session(Session::new(org.clone()));
        }
        Ok(config)
    }
}

fn print_usage() {
    println!(
        r#"provider-bridge - EIP-1193 provider over a JSON-RPC node

USAGE:
    provider-bridge <command> [method] [params] [options]

COMMANDS:
    request <method> [json]   Send one provider request (params: JSON array)
    serve                     Start JSON-RPC server over the provider slot
    methods                   List supported methods

OPTIONS:
    --rpc-url, -r <url>       JSON-RPC endpoint (env: BRIDGE_RPC_URL)
    --chain-id, -c <id>       Chain id, decimal or 0x (env: BRIDGE_CHAIN_ID)
    --account, -a <address>   Bound account (env: BRIDGE_ACCOUNT)
    --session, -s <org>       Signing session organization (env: BRIDGE_SESSION)
    --port, -p <port>         Server port (default: 8545, env: BRIDGE_PORT)
    --pretty                  Pretty-print JSON
    --version, -V             Print version

ENVIRONMENT:
    BRIDGE_TIMEOUT_SECS       Upstream request timeout (default: 15)
    BRIDGE_LOG_JSON=1         JSON log lines on stderr
    RUST_LOG                  Log filter (default: info)

EXAMPLES:
    provider-bridge request eth_chainId
    provider-bridge request eth_getBalance '["0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"]'
    provider-bridge --account 0x... --session org-1 serve --port 8545
"#
    );
}

fn parse_params(raw: Option<&str>) -> Result<Vec<Value>> {
    let Some(raw) = raw else { return Ok(Vec::new()) };
    match serde_json::from_str::<Value>(raw).context("params must be JSON")? {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        single => Ok(vec![single]),
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("Failed to create runtime")
}

fn controller(config: &BridgeConfig) -> Result<(LifecycleController, Arc<dyn ReadClient>)> {
    let reader: Arc<dyn ReadClient> = Arc::new(HttpReadClient::new(config.rpc_url.clone(), config.timeout)?);
    let service: Arc<dyn SigningService> = Arc::new(WatchOnlyService::new(config.chain.clone()));
    Ok((LifecycleController::with_global_slot(service, reader.clone()), reader))
}

fn cmd_request(opts: &ParsedArgs) -> Result<Value> {
    let method = opts.method.clone().ok_or_else(|| anyhow!("Usage: provider-bridge request <method> [params-json]"))?;
    let params = parse_params(opts.params.as_deref())?;
    let config = opts.config()?;
    let (controller, reader) = controller(&config)?;

    let lifecycle = controller.clone();
    let result = runtime()?.block_on(async move {
        let provider: Arc<dyn Eip1193Provider> = match (config.account, config.session.clone()) {
            (Some(account), Some(session)) => {
                let state = lifecycle.update(Some(account), Some(session)).await;
                if let Some(cause) = state.error() {
                    bail!("provider not ready: {cause}");
                }
                lifecycle.slot().provider().ok_or_else(|| anyhow!("provider disconnected"))?
            }
            // Without a session there is no lifecycle; answer reads directly.
            (account, _) => {
                debug!("no signing session, using a detached watch-only bridge");
                let signer = Arc::new(WatchOnlySigner::new(account, config.chain.clone()));
                Arc::new(ProviderBridge::new(signer, reader))
            }
        };
        Ok::<_, anyhow::Error>(provider.request(&method, params).await?)
    });
    // Release the global slot on every path, failed requests included.
    controller.teardown();
    result
}

fn cmd_serve(opts: &ParsedArgs) -> Result<Value> {
    use provider_bridge::server::create_router;

    let port = opts.port.unwrap_or(8545);
    let config = opts.config()?;
    let (controller, _) = controller(&config)?;

    runtime()?.block_on(async move {
        let shutdown = install_signal_handlers();

        let state = controller.update(config.account, config.session.clone()).await;
        info!(state = %state, rpc = %config.rpc_url, chain = config.chain.id, "provider lifecycle settled");

        let router = create_router(controller.clone());
        let addr = format!("0.0.0.0:{}", port);

        info!("provider-bridge listening on http://{}", addr);
        info!("Endpoints:");
        info!("  POST /         - JSON-RPC provider request");
        info!("  GET  /health   - Health check");
        info!("  GET  /status   - Lifecycle status");

        let listener = tokio::net::TcpListener::bind(&addr).await.context("Failed to bind")?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown.clone().wait())
            .await
            .context("Server error")?;

        info!("Shutdown signal received, releasing provider");
        controller.teardown();
        Ok::<_, anyhow::Error>(json!({"status": "stopped"}))
    })
}

fn cmd_methods() -> Value {
    let methods: Vec<Value> = Method::ALL
        .iter()
        .map(|m| json!({"method": m.as_str(), "requires_account": m.requires_account()}))
        .collect();
    json!({"methods": methods, "count": methods.len()})
}
