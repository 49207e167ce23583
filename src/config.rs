//! Bridge Configuration - passed from higher layers or read from the environment

use alloy_primitives::Address;
use std::time::Duration;

use crate::client::{Chain, Session};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: invalid value {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Bridge configuration. Higher layers construct this.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub chain: Chain,
    pub rpc_url: String,
    pub account: Option<Address>,
    pub session: Option<Session>,
    pub timeout: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        let chain = Chain::sepolia();
        let rpc_url = chain.rpc_url.clone().unwrap_or_default();
        Self { chain, rpc_url, account: None, session: None, timeout: DEFAULT_TIMEOUT }
    }
}

impl BridgeConfig {
    pub fn new() -> Self { Self::default() }
    /// Also adopts the chain's RPC endpoint when it carries one.
    pub fn with_chain(mut self, chain: Chain) -> Self {
        if let Some(url) = &chain.rpc_url {
            self.rpc_url = url.clone();
        }
        self.chain = chain;
        self
    }
    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self { self.rpc_url = url.into(); self }
    pub fn with_account(mut self, account: Address) -> Self { self.account = Some(account); self }
    pub fn with_session(mut self, session: Session) -> Self { self.session = Some(session); self }
    pub fn with_timeout(mut self, timeout: Duration) -> Self { self.timeout = timeout; self }

    /// Read `BRIDGE_*` variables over the defaults. Unset variables keep defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(value) = get("BRIDGE_CHAIN_ID") {
            let id = crate::core::quantity::parse_u64(&value)
                .map_err(|_| ConfigError::Invalid { var: "BRIDGE_CHAIN_ID", value: value.clone() })?;
            if id != config.chain.id {
                config.chain = Chain::new(id, format!("chain-{id}"));
            }
        }
        if let Some(url) = get("BRIDGE_RPC_URL") {
            config.rpc_url = url;
        }
        if let Some(value) = get("BRIDGE_ACCOUNT") {
            let account = value
                .parse::<Address>()
                .map_err(|_| ConfigError::Invalid { var: "BRIDGE_ACCOUNT", value: value.clone() })?;
            config.account = Some(account);
        }
        if let Some(org) = get("BRIDGE_SESSION") {
            config.session = Some(Session::new(org));
        }
        if let Some(value) = get("BRIDGE_TIMEOUT_SECS") {
            let secs = value
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid { var: "BRIDGE_TIMEOUT_SECS", value: value.clone() })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_to_sepolia() {
        let config = BridgeConfig::new();
        assert_eq!(config.chain.id, 11_155_111);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.account.is_none());
    }

    #[test]
    fn builder_overrides() {
        let account = Address::repeat_byte(0x42);
        let config = BridgeConfig::new()
            .with_rpc_url("http://127.0.0.1:8545")
            .with_account(account)
            .with_session(Session::new("org-1"))
            .with_timeout(Duration::from_secs(3));
        assert_eq!(config.rpc_url, "http://127.0.0.1:8545");
        assert_eq!(config.account, Some(account));
        assert_eq!(config.session, Some(Session::new("org-1")));
        assert_eq!(config.timeout.as_secs(), 3);
    }

    #[test]
    fn env_values_are_applied() {
        let config = BridgeConfig::from_lookup(lookup(&[
            ("BRIDGE_CHAIN_ID", "0x1"),
            ("BRIDGE_RPC_URL", "http://localhost:8545"),
            ("BRIDGE_ACCOUNT", "0x4242424242424242424242424242424242424242"),
            ("BRIDGE_SESSION", "org-7"),
            ("BRIDGE_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.chain.id, 1);
        assert_eq!(config.rpc_url, "http://localhost:8545");
        assert_eq!(config.account, Some(Address::repeat_byte(0x42)));
        assert_eq!(config.session.unwrap().organization_id, "org-7");
        assert_eq!(config.timeout.as_secs(), 30);
    }

    #[test]
    fn blank_values_keep_defaults() {
        let config = BridgeConfig::from_lookup(lookup(&[("BRIDGE_SESSION", "  ")])).unwrap();
        assert!(config.session.is_none());
    }

    #[test]
    fn bad_account_is_reported() {
        let err = BridgeConfig::from_lookup(lookup(&[("BRIDGE_ACCOUNT", "0xnope")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "BRIDGE_ACCOUNT", .. }));
    }
}
