//! Subcommand implementations

pub mod swap;
pub mod utility;

use std::sync::Arc;

use canister_client::{load_identity, CanisterClient};
use icswap_core::AppConfig;
use serde::Serialize;
use swap_pool::{SwapOrchestrator, SwapSession};

/// Connect to the network and open a swap session for the configured identity
pub async fn connect(config: &AppConfig) -> anyhow::Result<SwapOrchestrator> {
    let identity = load_identity(config.agent.identity_pem.as_deref())?;
    let client =
        CanisterClient::connect(&config.agent, identity, &config.canisters.swap_pool).await?;

    let principal = client.principal()?;
    let session = SwapSession::open(
        principal,
        config.tokens.clone(),
        client.swap_pool(),
        config.default_slippage_bps,
    )?;

    Ok(SwapOrchestrator::new(Arc::new(client), session))
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
