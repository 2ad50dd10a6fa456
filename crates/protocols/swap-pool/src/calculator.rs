//! Swap pool arithmetic
//!
//! All values are base units; nothing here touches floating point.

use icswap_core::{minimum_received, Amount, AmountError, TokenSpec};
use num_traits::Zero;

/// Balance the input ledger must hold before approving: `amount_in + fee`
pub fn required_balance(amount_in: &Amount, input: &TokenSpec) -> Amount {
    amount_in + input.fee()
}

/// Minimum acceptable output for a quoted amount under a slippage tolerance
pub fn min_amount_out(quoted_out: &Amount, tolerance_bps: u16) -> Result<Amount, AmountError> {
    minimum_received(quoted_out, tolerance_bps)
}

/// Reject zero amounts; the pool only accepts positive inputs
pub fn ensure_positive(amount: &Amount, what: &str) -> Result<(), AmountError> {
    if amount.is_zero() {
        return Err(AmountError::InvalidAmount {
            input: amount.to_string(),
            reason: format!("{what} must be positive"),
        });
    }
    Ok(())
}

/// Amount that actually lands on the ledger after a withdrawal pays its fee.
/// Returns zero when the fee exceeds the amount.
pub fn net_of_fee(amount: &Amount, token: &TokenSpec) -> Amount {
    let fee = token.fee();
    if amount > &fee {
        amount - fee
    } else {
        Amount::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icswap_core::constants::{ckbtc, icp};

    #[test]
    fn test_required_balance_adds_fee() {
        let amount = Amount::from(100_000_000u64);
        assert_eq!(
            required_balance(&amount, &icp()),
            Amount::from(100_010_000u64)
        );
        assert_eq!(required_balance(&amount, &ckbtc()), Amount::from(100_000_010u64));
    }

    #[test]
    fn test_min_amount_out() {
        assert_eq!(
            min_amount_out(&Amount::from(1_000_000u32), 50).unwrap(),
            Amount::from(995_000u32)
        );
        assert!(min_amount_out(&Amount::from(1u32), 10_001).is_err());
    }

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive(&Amount::from(1u32), "amount_in").is_ok());
        let err = ensure_positive(&Amount::zero(), "amount_in").unwrap_err();
        assert_eq!(err.error_code(), "invalid_amount");
    }

    #[test]
    fn test_net_of_fee() {
        assert_eq!(net_of_fee(&Amount::from(50_000u32), &icp()), Amount::from(40_000u32));
        assert_eq!(net_of_fee(&Amount::from(5u32), &ckbtc()), Amount::zero());
    }
}
