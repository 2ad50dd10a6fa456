//! Swap pool canister calls

use candid::{CandidType, Nat};
use icswap_core::{Amount, RemoteError, SwapDirection};
use serde::Deserialize;

use crate::{CanisterClient, Result};

/// `quote` / `swap` arguments. Amounts travel as decimal text.
#[derive(Debug, Clone, PartialEq, Eq, CandidType, Deserialize)]
pub struct SwapArgs {
    #[serde(rename = "amountIn")]
    pub amount_in: String,
    #[serde(rename = "zeroForOne")]
    pub zero_for_one: bool,
    #[serde(rename = "amountOutMinimum")]
    pub amount_out_minimum: String,
}

impl SwapArgs {
    pub fn new(amount_in: &Amount, direction: SwapDirection, amount_out_minimum: &Amount) -> Self {
        Self {
            amount_in: amount_in.to_string(),
            zero_for_one: direction.zero_for_one(),
            amount_out_minimum: amount_out_minimum.to_string(),
        }
    }
}

/// `depositFrom` / `withdraw` arguments
#[derive(Debug, Clone, PartialEq, Eq, CandidType, Deserialize)]
pub struct TokenAmountArgs {
    pub token: String,
    pub amount: Nat,
    pub fee: Nat,
}

impl TokenAmountArgs {
    pub fn new(token: &str, amount: &Amount, fee: &Amount) -> Self {
        Self {
            token: token.to_string(),
            amount: Nat::from(amount.clone()),
            fee: Nat::from(fee.clone()),
        }
    }
}

/// Pool rejection
#[derive(Debug, Clone, PartialEq, Eq, CandidType, Deserialize)]
pub enum PoolError {
    CommonError,
    InsufficientFunds,
    InternalError(String),
    UnsupportedToken(String),
}

impl From<PoolError> for RemoteError {
    fn from(err: PoolError) -> Self {
        match err {
            PoolError::CommonError => RemoteError::generic("Pool rejected the request"),
            PoolError::InsufficientFunds => RemoteError::InsufficientFunds { balance: None },
            PoolError::InternalError(message) => RemoteError::generic(message),
            PoolError::UnsupportedToken(token) => RemoteError::UnsupportedToken(token),
        }
    }
}

/// `variant { ok: nat; err: Error }`, the reply of every pool method
#[derive(Debug, Clone, PartialEq, Eq, CandidType, Deserialize)]
pub enum NatResult {
    #[serde(rename = "ok")]
    Ok(Nat),
    #[serde(rename = "err")]
    Err(PoolError),
}

impl From<NatResult> for std::result::Result<Amount, PoolError> {
    fn from(result: NatResult) -> Self {
        match result {
            NatResult::Ok(n) => Ok(n.0),
            NatResult::Err(e) => Err(e),
        }
    }
}

impl CanisterClient {
    /// Expected output for `amount_in`; read-only
    pub async fn pool_quote(
        &self,
        args: SwapArgs,
    ) -> Result<std::result::Result<Amount, PoolError>> {
        let pool = self.swap_pool();
        let reply: NatResult = self.query(&pool, "quote", (args,)).await?;
        Ok(reply.into())
    }

    /// Pull approved funds from the caller's ledger account into the pool
    pub async fn pool_deposit_from(
        &self,
        args: TokenAmountArgs,
    ) -> Result<std::result::Result<Amount, PoolError>> {
        let pool = self.swap_pool();
        let reply: NatResult = self.update(&pool, "depositFrom", (args,)).await?;
        Ok(reply.into())
    }

    /// Swap deposited funds; the pool rejects when the output would fall below the minimum
    pub async fn pool_swap(&self, args: SwapArgs) -> Result<std::result::Result<Amount, PoolError>> {
        let pool = self.swap_pool();
        let reply: NatResult = self.update(&pool, "swap", (args,)).await?;
        Ok(reply.into())
    }

    /// Move funds held by the pool for the caller back to the caller's ledger account
    pub async fn pool_withdraw(
        &self,
        args: TokenAmountArgs,
    ) -> Result<std::result::Result<Amount, PoolError>> {
        let pool = self.swap_pool();
        let reply: NatResult = self.update(&pool, "withdraw", (args,)).await?;
        Ok(reply.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_args_text_amounts() {
        let big: Amount = "123456789012345678901234567890".parse().unwrap();
        let args = SwapArgs::new(&big, SwapDirection::OneForZero, &Amount::from(0u32));
        assert_eq!(args.amount_in, "123456789012345678901234567890");
        assert_eq!(args.amount_out_minimum, "0");
        assert!(!args.zero_for_one);
    }

    #[test]
    fn test_swap_args_field_names() {
        let text = SwapArgs::ty().to_string();
        assert!(text.contains("amountIn"), "{text}");
        assert!(text.contains("zeroForOne"), "{text}");
        assert!(text.contains("amountOutMinimum"), "{text}");
    }

    #[test]
    fn test_result_variant_labels() {
        let text = NatResult::ty().to_string();
        assert!(text.contains("ok"), "{text}");
        assert!(text.contains("err"), "{text}");

        let ok = NatResult::Ok(Nat::from(99u32));
        let bytes = candid::encode_one(&ok).unwrap();
        let back: NatResult = candid::decode_one(&bytes).unwrap();
        let back: std::result::Result<Amount, PoolError> = back.into();
        assert_eq!(back, Ok(Amount::from(99u32)));

        let err = NatResult::Err(PoolError::InternalError("slippage".into()));
        let bytes = candid::encode_one(&err).unwrap();
        let back: NatResult = candid::decode_one(&bytes).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn test_deposit_reply_carries_nat() {
        // depositFrom and withdraw answer `ok: nat`, same as swap
        let bytes = candid::encode_one(NatResult::Ok(Nat::from(100_000_000u64))).unwrap();
        let reply: NatResult = candid::decode_one(&bytes).unwrap();
        let reply: std::result::Result<Amount, PoolError> = reply.into();
        assert_eq!(reply, Ok(Amount::from(100_000_000u64)));

        let bytes = candid::encode_one(NatResult::Err(PoolError::InsufficientFunds)).unwrap();
        let reply: NatResult = candid::decode_one(&bytes).unwrap();
        assert_eq!(reply, NatResult::Err(PoolError::InsufficientFunds));
    }

    #[test]
    fn test_pool_error_mapping() {
        assert_eq!(
            RemoteError::from(PoolError::InsufficientFunds),
            RemoteError::InsufficientFunds { balance: None }
        );
        assert_eq!(
            RemoteError::from(PoolError::InternalError("slippage".into())).to_string(),
            "slippage"
        );
        assert_eq!(
            RemoteError::from(PoolError::UnsupportedToken("XYZ".into())).kind(),
            "unsupported_token"
        );
        assert_eq!(RemoteError::from(PoolError::CommonError).kind(), "generic");
    }
}
