//! Error types for icswap

use thiserror::Error;

use crate::types::Amount;

/// Core errors that can occur in icswap
#[derive(Debug, Error)]
pub enum Error {
    #[error("Amount error: {0}")]
    Amount(#[from] AmountError),

    #[error("Remote call rejected: {0}")]
    Remote(#[from] RemoteError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Amount parsing and slippage errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("Invalid amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: String },

    #[error("Invalid slippage tolerance: {bps} bps exceeds 10000")]
    InvalidTolerance { bps: u64 },
}

impl AmountError {
    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::InvalidTolerance { .. } => "invalid_tolerance",
        }
    }
}

/// Rejections reported by a ledger or pool canister, plus transport failures.
///
/// One variant per documented remote error kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("Bad fee, ledger expects {expected_fee}")]
    BadFee { expected_fee: Amount },

    #[error("Insufficient funds")]
    InsufficientFunds { balance: Option<Amount> },

    #[error("Duplicate of transaction {duplicate_of}")]
    Duplicate { duplicate_of: Amount },

    #[error("Allowance changed, current allowance is {current_allowance}")]
    AllowanceChanged { current_allowance: Amount },

    #[error("Approval expired at ledger time {ledger_time}")]
    Expired { ledger_time: u64 },

    #[error("Request is too old")]
    TooOld,

    #[error("Request created in the future (ledger time {ledger_time})")]
    CreatedInFuture { ledger_time: u64 },

    #[error("Service temporarily unavailable")]
    TemporarilyUnavailable,

    #[error("Unsupported token: {0}")]
    UnsupportedToken(String),

    #[error("{message}")]
    Generic {
        message: String,
        error_code: Option<Amount>,
    },

    #[error("Transport failure: {0}")]
    Transport(String),
}

impl RemoteError {
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
            error_code: None,
        }
    }

    /// Get a stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadFee { .. } => "bad_fee",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::Duplicate { .. } => "duplicate",
            Self::AllowanceChanged { .. } => "allowance_changed",
            Self::Expired { .. } => "expired",
            Self::TooOld => "too_old",
            Self::CreatedInFuture { .. } => "created_in_future",
            Self::TemporarilyUnavailable => "temporarily_unavailable",
            Self::UnsupportedToken(_) => "unsupported_token",
            Self::Generic { .. } => "generic",
            Self::Transport(_) => "transport",
        }
    }
}

/// Result type alias for icswap operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_error_codes() {
        let err = AmountError::InvalidAmount {
            input: "x".into(),
            reason: "not a number".into(),
        };
        assert_eq!(err.error_code(), "invalid_amount");
        assert_eq!(
            AmountError::InvalidTolerance { bps: 20_000 }.error_code(),
            "invalid_tolerance"
        );
    }

    #[test]
    fn test_remote_error_display() {
        let err = RemoteError::InsufficientFunds {
            balance: Some(Amount::from(5u32)),
        };
        assert_eq!(err.to_string(), "Insufficient funds");
        assert_eq!(err.kind(), "insufficient_funds");
        assert_eq!(RemoteError::generic("boom").to_string(), "boom");
    }
}
