//! Command line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use icswap_core::{parse_tolerance_percent, AppConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: ConfigArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags that override the config file
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// JSON config file
    #[arg(long, short = 'c', env = "ICSWAP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Replica or boundary node URL
    #[arg(long, env = "ICSWAP_URL", global = true)]
    pub url: Option<String>,

    /// PEM identity file
    #[arg(long, short = 'i', env = "ICSWAP_IDENTITY", global = true)]
    pub identity: Option<PathBuf>,

    /// Fetch the root key (local replicas only)
    #[arg(long, global = true)]
    pub fetch_root_key: bool,

    /// Swap pool canister id
    #[arg(long, global = true)]
    pub pool: Option<String>,

    /// Slippage tolerance in percent, e.g. 0.5
    #[arg(long, short = 's', global = true)]
    pub slippage: Option<String>,
}

impl ConfigArgs {
    /// Load the config file (or defaults) and apply the flags on top
    pub fn resolve(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        self.apply(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut AppConfig) -> anyhow::Result<()> {
        if let Some(url) = &self.url {
            config.agent.url = url.clone();
        }
        if let Some(identity) = &self.identity {
            config.agent.identity_pem = Some(identity.clone());
        }
        if self.fetch_root_key {
            config.agent.fetch_root_key = true;
        }
        if let Some(pool) = &self.pool {
            config.canisters.swap_pool = pool.clone();
        }
        if let Some(slippage) = &self.slippage {
            config.default_slippage_bps = parse_tolerance_percent(slippage)?;
        }
        Ok(())
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(long, short = 'p')]
        port: Option<u16>,
    },
    /// Quote selling an amount of a token
    Quote(TradeArgs),
    /// Quote, then approve, deposit, swap and withdraw
    Swap(TradeArgs),
    /// Withdraw funds the pool holds for this identity
    Withdraw(TradeArgs),
    /// Ledger balances of this identity
    Balance {
        /// Token symbol; both tokens when omitted
        token: Option<String>,
    },
    /// Legacy account identifier of a principal (this identity by default)
    AccountId {
        principal: Option<String>,
        /// 64-char hex subaccount
        #[arg(long)]
        subaccount: Option<String>,
    },
    /// Render base units as decimal text
    Format {
        amount: String,
        #[arg(long, short = 'd', default_value_t = 8)]
        decimals: u8,
    },
    /// Parse decimal text into base units
    Parse {
        text: String,
        #[arg(long, short = 'd', default_value_t = 8)]
        decimals: u8,
    },
}

#[derive(Args, Debug, Clone)]
pub struct TradeArgs {
    /// Token symbol (ICP or ckBTC)
    pub token: String,
    /// Decimal amount, e.g. 1.5
    pub amount: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_swap_command() {
        let cli = Cli::try_parse_from(["icswap", "--slippage", "1", "swap", "ICP", "1.5"]).unwrap();
        match cli.command {
            Command::Swap(args) => {
                assert_eq!(args.token, "ICP");
                assert_eq!(args.amount, "1.5");
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.overrides.slippage.as_deref(), Some("1"));
    }

    #[test]
    fn test_parse_utility_commands() {
        let cli = Cli::try_parse_from(["icswap", "format", "100000000"]).unwrap();
        assert!(matches!(cli.command, Command::Format { decimals: 8, .. }));

        let cli = Cli::try_parse_from(["icswap", "account-id", "2vxsx-fae"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::AccountId { principal: Some(_), subaccount: None }
        ));
    }

    #[test]
    fn test_overrides_apply() {
        let args = ConfigArgs {
            url: Some("http://127.0.0.1:4943".into()),
            fetch_root_key: true,
            slippage: Some("2".into()),
            ..Default::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.agent.url, "http://127.0.0.1:4943");
        assert!(config.agent.fetch_root_key);
        assert_eq!(config.default_slippage_bps, 200);
    }

    #[test]
    fn test_bad_slippage_rejected() {
        let args = ConfigArgs {
            slippage: Some("150".into()),
            ..Default::default()
        };
        assert!(args.resolve().is_err());
    }
}
