//! Core type definitions for icswap

use serde::{Deserialize, Serialize};
use std::fmt;

use num_bigint::BigUint;

/// Token amount in base units (arbitrary precision, never floating point)
pub type Amount = BigUint;

/// How a ledger exposes balances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerStandard {
    /// ICP ledger: balances keyed by legacy 32-byte account identifier
    IcpLegacy,
    /// ICRC-1/ICRC-2 ledger: balances keyed by (owner, subaccount)
    Icrc1,
}

impl LedgerStandard {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IcpLegacy => "icp_legacy",
            Self::Icrc1 => "icrc1",
        }
    }
}

/// Static description of a supported token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpec {
    /// Display symbol (e.g., "ICP")
    pub symbol: String,
    /// Number of fractional digits
    pub decimals: u8,
    /// Ledger transfer fee in base units
    pub transfer_fee: u64,
    /// Ledger canister id (textual principal)
    pub ledger_canister_id: String,
    /// Balance interface exposed by the ledger
    pub standard: LedgerStandard,
}

impl TokenSpec {
    pub fn fee(&self) -> Amount {
        Amount::from(self.transfer_fee)
    }

    /// Check a symbol against this token, ignoring case
    pub fn matches(&self, symbol: &str) -> bool {
        self.symbol.eq_ignore_ascii_case(symbol)
    }
}

impl fmt::Display for TokenSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// Swap direction relative to the pool's token ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapDirection {
    /// Sell token0, receive token1
    ZeroForOne,
    /// Sell token1, receive token0
    OneForZero,
}

impl SwapDirection {
    /// Flag value expected by the pool canister
    pub fn zero_for_one(&self) -> bool {
        matches!(self, Self::ZeroForOne)
    }

    pub fn reversed(&self) -> Self {
        match self {
            Self::ZeroForOne => Self::OneForZero,
            Self::OneForZero => Self::ZeroForOne,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ZeroForOne => "zero_for_one",
            Self::OneForZero => "one_for_zero",
        }
    }
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The two tokens of a pool, in pool order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub token0: TokenSpec,
    pub token1: TokenSpec,
}

impl TokenPair {
    /// Token sold in the given direction
    pub fn input(&self, direction: SwapDirection) -> &TokenSpec {
        match direction {
            SwapDirection::ZeroForOne => &self.token0,
            SwapDirection::OneForZero => &self.token1,
        }
    }

    /// Token received in the given direction
    pub fn output(&self, direction: SwapDirection) -> &TokenSpec {
        self.input(direction.reversed())
    }

    /// Look up a token by symbol
    pub fn token(&self, symbol: &str) -> Option<&TokenSpec> {
        [&self.token0, &self.token1]
            .into_iter()
            .find(|t| t.matches(symbol))
    }

    /// Direction that sells the token with the given symbol
    pub fn direction_selling(&self, symbol: &str) -> Option<SwapDirection> {
        if self.token0.matches(symbol) {
            Some(SwapDirection::ZeroForOne)
        } else if self.token1.matches(symbol) {
            Some(SwapDirection::OneForZero)
        } else {
            None
        }
    }
}

impl Default for TokenPair {
    fn default() -> Self {
        Self {
            token0: constants::ckbtc(),
            token1: constants::icp(),
        }
    }
}

/// Constants
pub mod constants {
    use super::{LedgerStandard, TokenSpec};

    /// Mainnet boundary node
    pub const DEFAULT_AGENT_URL: &str = "https://icp0.io";

    /// ICP/ckBTC swap pool canister
    pub const SWAP_POOL_CANISTER_ID: &str = "xmiu5-jqaaa-aaaag-qbz7q-cai";

    /// ICP ledger canister
    pub const ICP_LEDGER_CANISTER_ID: &str = "ryjl3-tyaaa-aaaaa-aaaba-cai";

    /// ckBTC ledger canister
    pub const CKBTC_LEDGER_CANISTER_ID: &str = "mxzaz-hqaaa-aaaar-qaada-cai";

    /// ICP transfer fee (0.0001 ICP)
    pub const ICP_FEE_E8S: u64 = 10_000;

    /// ckBTC transfer fee (0.0000001 ckBTC)
    pub const CKBTC_FEE: u64 = 10;

    /// Basis points in 100%
    pub const BPS_DENOMINATOR: u16 = 10_000;

    /// Default slippage tolerance (0.5%)
    pub const DEFAULT_SLIPPAGE_BPS: u16 = 50;

    pub fn icp() -> TokenSpec {
        TokenSpec {
            symbol: "ICP".to_string(),
            decimals: 8,
            transfer_fee: ICP_FEE_E8S,
            ledger_canister_id: ICP_LEDGER_CANISTER_ID.to_string(),
            standard: LedgerStandard::IcpLegacy,
        }
    }

    pub fn ckbtc() -> TokenSpec {
        TokenSpec {
            symbol: "ckBTC".to_string(),
            decimals: 8,
            transfer_fee: CKBTC_FEE,
            ledger_canister_id: CKBTC_LEDGER_CANISTER_ID.to_string(),
            standard: LedgerStandard::Icrc1,
        }
    }
}
