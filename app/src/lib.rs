//! icswap application library

pub mod cli;
pub mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

/// `RUST_LOG` plus debug output for the workspace crates
fn log_filter() -> anyhow::Result<EnvFilter> {
    Ok(EnvFilter::from_default_env()
        .add_directive("icswap=debug".parse()?)
        .add_directive("swap_pool=debug".parse()?)
        .add_directive("canister_client=debug".parse()?)
        .add_directive("info".parse()?))
}

/// Parse arguments and run the selected command
pub fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter()?)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Pure conversions need neither config nor network
    match &cli.command {
        Command::Format { amount, decimals } => return commands::utility::format(amount, *decimals),
        Command::Parse { text, decimals } => return commands::utility::parse(text, *decimals),
        _ => {}
    }

    let config = cli.overrides.resolve()?;
    tracing::debug!(?config, "Configuration resolved");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        match cli.command {
            Command::Serve { port } => commands::swap::serve(config, port).await,
            Command::Quote(args) => commands::swap::quote(config, args).await,
            Command::Swap(args) => commands::swap::swap(config, args).await,
            Command::Withdraw(args) => commands::swap::withdraw(config, args).await,
            Command::Balance { token } => commands::swap::balance(config, token).await,
            Command::AccountId {
                principal,
                subaccount,
            } => commands::utility::account_id(config, principal, subaccount).await,
            Command::Format { .. } | Command::Parse { .. } => Ok(()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_covers_workspace_crates() {
        let filter = log_filter().unwrap().to_string();
        for target in ["icswap=debug", "swap_pool=debug", "canister_client=debug"] {
            assert!(filter.contains(target), "{filter}");
        }
    }
}
