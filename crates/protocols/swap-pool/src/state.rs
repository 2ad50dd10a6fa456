//! Swap State Types
//!
//! Steps, states, outcomes and errors of the swap sequence.

use std::fmt;

use icp_account::AccountError;
use icswap_core::amount::as_string;
use icswap_core::{Amount, AmountError, RemoteError, SwapDirection, TokenSpec};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A remote step of the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapStep {
    Quoting,
    Approving,
    Depositing,
    Swapping,
    Withdrawing,
}

impl SwapStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quoting => "quoting",
            Self::Approving => "approving",
            Self::Depositing => "depositing",
            Self::Swapping => "swapping",
            Self::Withdrawing => "withdrawing",
        }
    }
}

impl fmt::Display for SwapStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Orchestrator state.
///
/// `Idle -> Approving -> Depositing -> Swapping -> Withdrawing -> Completed`,
/// with `Quoting` as a detour from `Idle` and `Failed(step)` reachable from
/// every non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "step", rename_all = "snake_case")]
pub enum SwapState {
    Idle,
    Quoting,
    Approving,
    Depositing,
    Swapping,
    Withdrawing,
    Completed,
    Failed(SwapStep),
}

impl SwapState {
    /// State while `step` is in flight
    pub fn running(step: SwapStep) -> Self {
        match step {
            SwapStep::Quoting => Self::Quoting,
            SwapStep::Approving => Self::Approving,
            SwapStep::Depositing => Self::Depositing,
            SwapStep::Swapping => Self::Swapping,
            SwapStep::Withdrawing => Self::Withdrawing,
        }
    }
}

impl fmt::Display for SwapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Quoting => write!(f, "quoting"),
            Self::Approving => write!(f, "approving"),
            Self::Depositing => write!(f, "depositing"),
            Self::Swapping => write!(f, "swapping"),
            Self::Withdrawing => write!(f, "withdrawing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed(step) => write!(f, "failed({step})"),
        }
    }
}

/// Result of one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    Approved { allowance_granted: Amount },
    Deposited,
    Swapped { amount_out: Amount },
    Withdrawn,
    Failed { step: SwapStep, error: RemoteError },
}

impl SwapOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Approved { .. } => "approved",
            Self::Deposited => "deposited",
            Self::Swapped { .. } => "swapped",
            Self::Withdrawn => "withdrawn",
            Self::Failed { .. } => "failed",
        }
    }
}

/// A swap about to be executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub input_token: TokenSpec,
    pub output_token: TokenSpec,
    pub direction: SwapDirection,
    pub amount_in: Amount,
    pub quoted_amount_out: Amount,
    pub slippage_tolerance_bps: u16,
}

/// Quote returned by the pool, with the session's slippage applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub direction: SwapDirection,
    pub input_symbol: String,
    pub output_symbol: String,
    #[serde(with = "as_string")]
    pub amount_in: Amount,
    #[serde(with = "as_string")]
    pub amount_out: Amount,
    /// `amount_out` less slippage tolerance
    #[serde(with = "as_string")]
    pub minimum_received: Amount,
    pub slippage_bps: u16,
}

/// One execution of the sequence, tagged for log correlation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRun {
    pub run_id: Uuid,
    pub request: SwapRequest,
    pub min_amount_out: Amount,
    /// Step that runs next (or failed last)
    pub next_step: SwapStep,
    /// Set once the pool has executed the swap
    pub amount_out: Option<Amount>,
    pub outcomes: Vec<SwapOutcome>,
}

impl SwapRun {
    /// Token the pool holds for the caller while the run is unfinished:
    /// the output once the swap has executed, the input before that
    pub fn stranded_token(&self) -> &TokenSpec {
        match self.amount_out {
            Some(_) => &self.request.output_token,
            None => &self.request.input_token,
        }
    }

    /// Step to re-invoke, if the run stopped on a failure
    pub fn failed_step(&self) -> Option<SwapStep> {
        match self.outcomes.last() {
            Some(SwapOutcome::Failed { .. }) => Some(self.next_step),
            _ => None,
        }
    }
}

/// Summary of a finished sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapReceipt {
    pub run_id: Uuid,
    pub direction: SwapDirection,
    pub amount_in: Amount,
    pub min_amount_out: Amount,
    pub amount_out: Amount,
    /// `amount_out` minus the output ledger fee paid on withdrawal
    pub amount_received: Amount,
    pub outcomes: Vec<SwapOutcome>,
}

/// Swap protocol errors
#[derive(Debug, Error)]
pub enum SwapError {
    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error("Insufficient {token} balance: need {required}, have {available}")]
    InsufficientFunds {
        token: String,
        required: Amount,
        available: Amount,
    },

    #[error("{step} rejected: {error}")]
    RemoteRejected { step: SwapStep, error: RemoteError },

    #[error("Remote call failed: {0}")]
    Remote(RemoteError),

    #[error("Unknown token: {0}")]
    UnknownToken(String),

    #[error("No failed swap to resume")]
    NoPendingSwap,
}

impl SwapError {
    /// Step the failure belongs to, if any
    pub fn step(&self) -> Option<SwapStep> {
        match self {
            Self::RemoteRejected { step, .. } => Some(*step),
            Self::InsufficientFunds { .. } => Some(SwapStep::Approving),
            _ => None,
        }
    }

    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Amount(e) => e.error_code(),
            Self::Account(e) => e.error_code(),
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::RemoteRejected { .. } => "remote_rejected",
            Self::Remote(_) => "remote_error",
            Self::UnknownToken(_) => "unknown_token",
            Self::NoPendingSwap => "no_pending_swap",
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Amount(_) | Self::Account(_) | Self::UnknownToken(_) => 400,
            Self::NoPendingSwap => 404,
            Self::InsufficientFunds { .. } => 422,
            Self::RemoteRejected { error, .. } | Self::Remote(error) => match error {
                RemoteError::Transport(_) | RemoteError::TemporarilyUnavailable => 503,
                _ => 502,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, SwapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_string(&SwapState::Failed(SwapStep::Swapping)).unwrap();
        assert_eq!(json, r#"{"state":"failed","step":"swapping"}"#);
        let json = serde_json::to_string(&SwapState::Idle).unwrap();
        assert_eq!(json, r#"{"state":"idle"}"#);
    }

    #[test]
    fn test_running_states() {
        assert_eq!(SwapState::running(SwapStep::Swapping), SwapState::Swapping);
        assert_eq!(SwapState::running(SwapStep::Quoting), SwapState::Quoting);
    }

    #[test]
    fn test_error_codes() {
        let err = SwapError::RemoteRejected {
            step: SwapStep::Approving,
            error: RemoteError::BadFee {
                expected_fee: Amount::from(10_000u32),
            },
        };
        assert_eq!(err.error_code(), "remote_rejected");
        assert_eq!(err.status_code(), 502);
        assert_eq!(err.step(), Some(SwapStep::Approving));
        assert_eq!(
            err.to_string(),
            "approving rejected: Bad fee, ledger expects 10000"
        );

        let err = SwapError::RemoteRejected {
            step: SwapStep::Quoting,
            error: RemoteError::Transport("timeout".into()),
        };
        assert_eq!(err.status_code(), 503);

        let err: SwapError = AmountError::InvalidTolerance { bps: 20_000 }.into();
        assert_eq!(err.error_code(), "invalid_tolerance");
        assert_eq!(err.status_code(), 400);
        assert_eq!(SwapError::NoPendingSwap.status_code(), 404);
    }

    #[test]
    fn test_quote_amounts_serialize_as_strings() {
        let quote = SwapQuote {
            direction: SwapDirection::OneForZero,
            input_symbol: "ICP".into(),
            output_symbol: "ckBTC".into(),
            amount_in: Amount::from(100_000_000u64),
            amount_out: Amount::from(1_000_000u64),
            minimum_received: Amount::from(995_000u64),
            slippage_bps: 50,
        };
        let value = serde_json::to_value(&quote).unwrap();
        assert_eq!(value["amount_in"], "100000000");
        assert_eq!(value["minimum_received"], "995000");
        assert_eq!(value["direction"], "one_for_zero");
    }
}
