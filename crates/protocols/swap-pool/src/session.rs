//! Per-user swap session context

use candid::Principal;
use icp_account::AccountIdentifier;
use icswap_core::{AmountError, TokenPair, TokenSpec};

use crate::state::{Result, SwapError};

/// Everything a swap needs to know about the caller and the pool.
///
/// Opened once per user session and handed to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapSession {
    principal: Principal,
    account: AccountIdentifier,
    pair: TokenPair,
    pool: Principal,
    slippage_bps: u16,
}

impl SwapSession {
    pub fn open(
        principal: Principal,
        pair: TokenPair,
        pool: Principal,
        slippage_bps: u16,
    ) -> Result<Self> {
        check_tolerance(slippage_bps)?;
        let account = AccountIdentifier::new(&principal, None);
        tracing::info!(
            principal = %principal,
            account = %account,
            pool = %pool,
            slippage_bps,
            "Swap session opened"
        );
        Ok(Self {
            principal,
            account,
            pair,
            pool,
            slippage_bps,
        })
    }

    pub fn principal(&self) -> Principal {
        self.principal
    }

    /// Legacy account identifier of the caller's main account
    pub fn account(&self) -> &AccountIdentifier {
        &self.account
    }

    pub fn pair(&self) -> &TokenPair {
        &self.pair
    }

    pub fn pool(&self) -> Principal {
        self.pool
    }

    pub fn slippage_bps(&self) -> u16 {
        self.slippage_bps
    }

    pub fn set_slippage_bps(&mut self, bps: u16) -> Result<()> {
        check_tolerance(bps)?;
        tracing::debug!(from = self.slippage_bps, to = bps, "Slippage tolerance changed");
        self.slippage_bps = bps;
        Ok(())
    }

    /// Look up a token of the pair by symbol
    pub fn token(&self, symbol: &str) -> Result<&TokenSpec> {
        self.pair
            .token(symbol)
            .ok_or_else(|| SwapError::UnknownToken(symbol.to_string()))
    }
}

fn check_tolerance(bps: u16) -> Result<()> {
    if bps > icswap_core::constants::BPS_DENOMINATOR {
        return Err(AmountError::InvalidTolerance { bps: bps as u64 }.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use icswap_core::constants::SWAP_POOL_CANISTER_ID;

    fn pool() -> Principal {
        Principal::from_text(SWAP_POOL_CANISTER_ID).unwrap()
    }

    #[test]
    fn test_open_derives_account() {
        let session =
            SwapSession::open(Principal::anonymous(), TokenPair::default(), pool(), 50).unwrap();
        assert_eq!(
            session.account().to_hex(),
            "1c7a48ba6a562aa9eaa2481a9049cdf0433b9738c992d698c31d8abf89cadc79"
        );
        assert_eq!(session.slippage_bps(), 50);
        assert_eq!(session.pool(), pool());
    }

    #[test]
    fn test_tolerance_bounds() {
        let err = SwapSession::open(Principal::anonymous(), TokenPair::default(), pool(), 10_001)
            .unwrap_err();
        assert_eq!(err.error_code(), "invalid_tolerance");

        let mut session =
            SwapSession::open(Principal::anonymous(), TokenPair::default(), pool(), 10_000)
                .unwrap();
        assert!(session.set_slippage_bps(200).is_ok());
        assert!(session.set_slippage_bps(20_000).is_err());
        assert_eq!(session.slippage_bps(), 200);
    }

    #[test]
    fn test_token_lookup() {
        let session =
            SwapSession::open(Principal::anonymous(), TokenPair::default(), pool(), 50).unwrap();
        assert_eq!(session.token("icp").unwrap().decimals, 8);
        assert!(matches!(
            session.token("DOGE"),
            Err(SwapError::UnknownToken(_))
        ));
    }
}
