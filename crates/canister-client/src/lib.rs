//! canister-client: Wrapper around ic-agent for the ledger and swap pool canisters
//!
//! This crate provides a high-level client for the two ledgers (ICP, ckBTC)
//! and the swap pool canister, plus the [`SwapBackend`] trait the swap
//! orchestrator is written against.

pub mod backend;
pub mod identity;
pub mod ledger;
pub mod pool;

use candid::utils::ArgumentEncoder;
use candid::{CandidType, Principal};
use ic_agent::{Agent, Identity};
use icswap_core::{AgentConfig, RemoteError};
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use backend::SwapBackend;
pub use identity::load_identity;

/// Client errors below the canister level (transport, encoding, identity)
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Agent unreachable at {url}: {message}")]
    Unreachable { url: String, message: String },

    #[error("Invalid canister id {id:?}: {reason}")]
    InvalidCanisterId { id: String, reason: String },

    #[error("Identity error: {0}")]
    Identity(String),

    #[error("Candid error in {method}: {message}")]
    Candid { method: String, message: String },

    #[error("Call to {method} failed: {message}")]
    Call { method: String, message: String },
}

impl From<ClientError> for RemoteError {
    fn from(err: ClientError) -> Self {
        RemoteError::Transport(err.to_string())
    }
}

/// Result type for canister client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// High-level Internet Computer client bound to one identity and one pool
#[derive(Clone)]
pub struct CanisterClient {
    agent: Agent,
    swap_pool: Principal,
}

impl CanisterClient {
    /// Build an agent for `config` and, for local replicas, fetch the root key
    pub async fn connect(
        config: &AgentConfig,
        identity: Box<dyn Identity>,
        swap_pool: &str,
    ) -> Result<Self> {
        let agent = Agent::builder()
            .with_url(config.url.as_str())
            .with_boxed_identity(identity)
            .build()
            .map_err(|e| ClientError::Unreachable {
                url: config.url.clone(),
                message: e.to_string(),
            })?;

        if config.fetch_root_key {
            tracing::warn!("Fetching root key from {}; use only against a local replica", config.url);
            agent
                .fetch_root_key()
                .await
                .map_err(|e| ClientError::Unreachable {
                    url: config.url.clone(),
                    message: e.to_string(),
                })?;
        }

        let swap_pool = canister_id(swap_pool)?;
        tracing::info!(url = %config.url, pool = %swap_pool, "Canister client ready");

        Ok(Self { agent, swap_pool })
    }

    /// Principal of the identity this client signs with
    pub fn principal(&self) -> Result<Principal> {
        self.agent.get_principal().map_err(ClientError::Identity)
    }

    /// Swap pool canister (the ICRC-2 spender)
    pub fn swap_pool(&self) -> Principal {
        self.swap_pool
    }

    /// Read-only query call
    async fn query<A, R>(&self, canister: &Principal, method: &str, args: A) -> Result<R>
    where
        A: ArgumentEncoder,
        R: CandidType + DeserializeOwned,
    {
        let arg = encode(method, args)?;
        tracing::debug!(canister = %canister, method, "query");
        let bytes = self
            .agent
            .query(canister, method)
            .with_arg(arg)
            .call()
            .await
            .map_err(|e| ClientError::Call {
                method: method.to_string(),
                message: e.to_string(),
            })?;
        decode(method, &bytes)
    }

    /// State-changing update call, waits for the certified reply
    async fn update<A, R>(&self, canister: &Principal, method: &str, args: A) -> Result<R>
    where
        A: ArgumentEncoder,
        R: CandidType + DeserializeOwned,
    {
        let arg = encode(method, args)?;
        tracing::debug!(canister = %canister, method, "update");
        let bytes = self
            .agent
            .update(canister, method)
            .with_arg(arg)
            .call_and_wait()
            .await
            .map_err(|e| ClientError::Call {
                method: method.to_string(),
                message: e.to_string(),
            })?;
        decode(method, &bytes)
    }
}

/// Parse a textual canister id
pub fn canister_id(text: &str) -> Result<Principal> {
    Principal::from_text(text.trim()).map_err(|e| ClientError::InvalidCanisterId {
        id: text.to_string(),
        reason: e.to_string(),
    })
}

fn encode<A: ArgumentEncoder>(method: &str, args: A) -> Result<Vec<u8>> {
    candid::encode_args(args).map_err(|e| ClientError::Candid {
        method: method.to_string(),
        message: e.to_string(),
    })
}

fn decode<R: CandidType + DeserializeOwned>(method: &str, bytes: &[u8]) -> Result<R> {
    candid::decode_one(bytes).map_err(|e| ClientError::Candid {
        method: method.to_string(),
        message: e.to_string(),
    })
}
