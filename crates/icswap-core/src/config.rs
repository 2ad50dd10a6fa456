//! Configuration types for icswap

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{self, BPS_DENOMINATOR};
use crate::{Error, Result, TokenPair};

/// Agent connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Replica or boundary node URL (e.g., "https://icp0.io")
    pub url: String,

    /// Fetch the root key on connect. Only for local replicas.
    #[serde(default)]
    pub fetch_root_key: bool,

    /// PEM identity file (anonymous identity when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_pem: Option<PathBuf>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            url: constants::DEFAULT_AGENT_URL.to_string(),
            fetch_root_key: false,
            identity_pem: None,
        }
    }
}

/// Canister ids the client talks to.
///
/// Ledger canisters are taken from the token specs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanisterConfig {
    pub swap_pool: String,
}

impl Default for CanisterConfig {
    fn default() -> Self {
        Self {
            swap_pool: constants::SWAP_POOL_CANISTER_ID.to_string(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Agent connection settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// Canister ids
    #[serde(default)]
    pub canisters: CanisterConfig,

    /// Tokens of the pool, in pool order
    #[serde(default)]
    pub tokens: TokenPair,

    /// Slippage tolerance used when a request does not carry one
    #[serde(default = "default_slippage_bps")]
    pub default_slippage_bps: u16,

    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

fn default_slippage_bps() -> u16 {
    constants::DEFAULT_SLIPPAGE_BPS
}

fn default_api_port() -> u16 {
    19080
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            canisters: CanisterConfig::default(),
            tokens: TokenPair::default(),
            default_slippage_bps: default_slippage_bps(),
            api_port: default_api_port(),
        }
    }
}

impl AppConfig {
    /// Load a JSON config file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| Error::Serialization(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.default_slippage_bps > BPS_DENOMINATOR {
            return Err(Error::Config(format!(
                "default_slippage_bps {} exceeds {}",
                self.default_slippage_bps, BPS_DENOMINATOR
            )));
        }

        let ids = [
            ("canisters.swap_pool", &self.canisters.swap_pool),
            ("tokens.token0.ledger_canister_id", &self.tokens.token0.ledger_canister_id),
            ("tokens.token1.ledger_canister_id", &self.tokens.token1.ledger_canister_id),
        ];
        for (name, id) in ids {
            if id.trim().is_empty() {
                return Err(Error::Config(format!("{} must not be empty", name)));
            }
        }

        if self.tokens.token0.matches(&self.tokens.token1.symbol)
            || self.tokens.token0.ledger_canister_id == self.tokens.token1.ledger_canister_id
        {
            return Err(Error::Config(
                "pool tokens must be two distinct tokens".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.agent.url, "https://icp0.io");
        assert_eq!(config.canisters.swap_pool, "xmiu5-jqaaa-aaaag-qbz7q-cai");
        assert_eq!(config.tokens.token0.symbol, "ckBTC");
        assert_eq!(config.tokens.token1.symbol, "ICP");
        assert_eq!(config.default_slippage_bps, 50);
        assert_eq!(config.api_port, 19080);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.agent.url, config.agent.url);
        assert_eq!(parsed.tokens, config.tokens);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{"agent": {"url": "http://127.0.0.1:4943", "fetch_root_key": true}}"#)
                .unwrap();
        assert!(parsed.agent.fetch_root_key);
        assert_eq!(parsed.tokens.token1.ledger_canister_id, "ryjl3-tyaaa-aaaaa-aaaba-cai");
        assert_eq!(parsed.default_slippage_bps, 50);
    }

    #[test]
    fn test_validate_rejects_bad_slippage() {
        let config = AppConfig {
            default_slippage_bps: 10_001,
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_same_tokens() {
        let mut config = AppConfig::default();
        config.tokens.token1 = config.tokens.token0.clone();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let err = AppConfig::load(Path::new("/nonexistent/icswap.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
