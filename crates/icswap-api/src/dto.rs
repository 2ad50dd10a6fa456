//! Data Transfer Objects for API requests and responses
//!
//! Every amount crosses the wire as a decimal string of base units.

use icp_account::AccountIdentifier;
use icswap_core::amount::as_string;
use icswap_core::{format_amount, Amount, SwapDirection, TokenSpec};
use serde::{Deserialize, Serialize};
use swap_pool::{SwapError, SwapOutcome, SwapQuote, SwapReceipt, SwapRun, SwapState};
use uuid::Uuid;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Generic API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    /// Swap step the failure belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            step: None,
        }
    }

    pub fn busy() -> Self {
        Self::new("swap_in_progress", "A swap is already running for this session")
    }

    pub fn no_session() -> Self {
        Self::new("session_unavailable", "No swap session is open")
    }
}

impl From<&SwapError> for ApiError {
    fn from(err: &SwapError) -> Self {
        let mut api = Self::new(err.error_code(), err.to_string());
        api.step = err.step().map(|s| s.to_string());
        if let SwapError::RemoteRejected { error, .. } | SwapError::Remote(error) = err {
            api.code = error.kind().to_string();
        }
        api
    }
}

/// Token as configured for the pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenDto {
    pub symbol: String,
    pub decimals: u8,
    pub transfer_fee: String,
    pub ledger_canister_id: String,
    pub standard: String,
}

impl From<&TokenSpec> for TokenDto {
    fn from(token: &TokenSpec) -> Self {
        Self {
            symbol: token.symbol.clone(),
            decimals: token.decimals,
            transfer_fee: token.transfer_fee.to_string(),
            ledger_canister_id: token.ledger_canister_id.clone(),
            standard: token.standard.as_str().to_string(),
        }
    }
}

/// Response for GET /tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokensResponse {
    pub token0: TokenDto,
    pub token1: TokenDto,
    pub slippage_presets_bps: Vec<u16>,
    pub default_slippage_bps: u16,
}

/// Request for POST /amount/parse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseAmountRequest {
    pub text: String,
    pub decimals: u8,
}

/// Request for POST /amount/format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatAmountRequest {
    #[serde(with = "as_string")]
    pub amount: Amount,
    pub decimals: u8,
}

/// Amount in base units and as decimal text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountResponse {
    #[serde(with = "as_string")]
    pub amount: Amount,
    pub formatted: String,
}

impl AmountResponse {
    pub fn new(amount: Amount, decimals: u8) -> Self {
        Self {
            formatted: format_amount(&amount, decimals),
            amount,
        }
    }
}

/// Request for POST /amount/minimum
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinimumReceivedRequest {
    #[serde(with = "as_string")]
    pub amount: Amount,
    pub tolerance_bps: u16,
}

/// Response for POST /amount/minimum
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinimumReceivedResponse {
    #[serde(with = "as_string")]
    pub minimum: Amount,
}

/// Request for POST /account/identifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountIdRequest {
    pub principal: String,
    /// 64-char hex subaccount; default subaccount when absent
    #[serde(default)]
    pub subaccount: Option<String>,
}

/// Response for POST /account/identifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountIdResponse {
    pub principal: String,
    pub account_identifier: AccountIdentifier,
}

/// Response for GET /session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub principal: String,
    pub account_identifier: AccountIdentifier,
    pub pool: String,
    pub slippage_bps: u16,
    pub state: SwapState,
}

/// Request for PUT /session/slippage. `percent` takes precedence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlippageRequest {
    #[serde(default)]
    pub tolerance_bps: Option<u16>,
    #[serde(default)]
    pub percent: Option<String>,
}

/// Query for GET /balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceQuery {
    pub token: String,
}

/// Response for GET /balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub token: String,
    #[serde(flatten)]
    pub balance: AmountResponse,
}

/// Request for POST /swap/quote. `amount` is decimal text in `token_in` units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub token_in: String,
    pub amount: String,
}

/// Response for POST /swap/quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub quote: SwapQuote,
    pub amount_out_formatted: String,
    pub minimum_received_formatted: String,
}

/// Request for POST /swap/execute, amounts in base units
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub token_in: String,
    #[serde(with = "as_string")]
    pub amount_in: Amount,
    #[serde(with = "as_string")]
    pub quoted_amount_out: Amount,
}

/// One step result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeDto {
    pub outcome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&SwapOutcome> for OutcomeDto {
    fn from(outcome: &SwapOutcome) -> Self {
        let mut dto = Self {
            outcome: outcome.kind().to_string(),
            amount: None,
            step: None,
            error_kind: None,
            message: None,
        };
        match outcome {
            SwapOutcome::Approved { allowance_granted } => {
                dto.amount = Some(allowance_granted.to_string())
            }
            SwapOutcome::Swapped { amount_out } => dto.amount = Some(amount_out.to_string()),
            SwapOutcome::Failed { step, error } => {
                dto.step = Some(step.to_string());
                dto.error_kind = Some(error.kind().to_string());
                dto.message = Some(error.to_string());
            }
            SwapOutcome::Deposited | SwapOutcome::Withdrawn => {}
        }
        dto
    }
}

/// Response for a finished sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptResponse {
    pub run_id: Uuid,
    pub direction: SwapDirection,
    #[serde(with = "as_string")]
    pub amount_in: Amount,
    #[serde(with = "as_string")]
    pub min_amount_out: Amount,
    #[serde(with = "as_string")]
    pub amount_out: Amount,
    #[serde(with = "as_string")]
    pub amount_received: Amount,
    pub outcomes: Vec<OutcomeDto>,
}

impl From<SwapReceipt> for ReceiptResponse {
    fn from(receipt: SwapReceipt) -> Self {
        Self {
            run_id: receipt.run_id,
            direction: receipt.direction,
            amount_in: receipt.amount_in,
            min_amount_out: receipt.min_amount_out,
            amount_out: receipt.amount_out,
            amount_received: receipt.amount_received,
            outcomes: receipt.outcomes.iter().map(Into::into).collect(),
        }
    }
}

/// A run as shown by GET /swap/status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunDto {
    pub run_id: Uuid,
    pub input_token: String,
    pub output_token: String,
    #[serde(with = "as_string")]
    pub amount_in: Amount,
    #[serde(with = "as_string")]
    pub min_amount_out: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_out: Option<String>,
    /// Step `POST /swap/resume` would re-invoke
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<String>,
    pub outcomes: Vec<OutcomeDto>,
}

impl From<&SwapRun> for RunDto {
    fn from(run: &SwapRun) -> Self {
        Self {
            run_id: run.run_id,
            input_token: run.request.input_token.symbol.clone(),
            output_token: run.request.output_token.symbol.clone(),
            amount_in: run.request.amount_in.clone(),
            min_amount_out: run.min_amount_out.clone(),
            amount_out: run.amount_out.as_ref().map(|a| a.to_string()),
            failed_step: run.failed_step().map(|s| s.to_string()),
            outcomes: run.outcomes.iter().map(Into::into).collect(),
        }
    }
}

/// Response for GET /swap/status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub state: SwapState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<RunDto>,
}

/// Request for POST /swap/withdraw
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawRequest {
    pub token: String,
    #[serde(with = "as_string")]
    pub amount: Amount,
}

/// Response for POST /swap/withdraw
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawResponse {
    pub outcome: OutcomeDto,
    pub state: SwapState,
}

#[cfg(test)]
mod tests {
    use super::*;
    use icswap_core::RemoteError;
    use swap_pool::SwapStep;

    #[test]
    fn test_api_error_from_remote_rejection() {
        let err = SwapError::RemoteRejected {
            step: SwapStep::Swapping,
            error: RemoteError::generic("slippage"),
        };
        let api = ApiError::from(&err);
        assert_eq!(api.code, "generic");
        assert_eq!(api.step.as_deref(), Some("swapping"));

        let json = serde_json::to_value(ApiError::busy()).unwrap();
        assert!(json.get("step").is_none());
        assert_eq!(json["code"], "swap_in_progress");
    }

    #[test]
    fn test_outcome_dto() {
        let dto = OutcomeDto::from(&SwapOutcome::Failed {
            step: SwapStep::Approving,
            error: RemoteError::TooOld,
        });
        assert_eq!(dto.outcome, "failed");
        assert_eq!(dto.error_kind.as_deref(), Some("too_old"));

        let dto = OutcomeDto::from(&SwapOutcome::Swapped {
            amount_out: "18446744073709551616".parse().unwrap(),
        });
        assert_eq!(dto.amount.as_deref(), Some("18446744073709551616"));
    }

    #[test]
    fn test_amount_response_is_lossless() {
        let amount: Amount = "123456789012345678901".parse().unwrap();
        let json = serde_json::to_value(AmountResponse::new(amount, 8)).unwrap();
        assert_eq!(json["amount"], "123456789012345678901");
        assert_eq!(json["formatted"], "1234567890123.45678901");
    }
}
