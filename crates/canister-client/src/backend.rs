//! The remote operations a swap needs, as a trait
//!
//! Every method resolves to the canister's reply or a [`RemoteError`];
//! transport failures surface as `RemoteError::Transport`.

use async_trait::async_trait;
use candid::Principal;
use icp_account::AccountIdentifier;
use icswap_core::{Amount, LedgerStandard, RemoteError, SwapDirection, TokenSpec};

use crate::ledger::{Account, ApproveArgs};
use crate::pool::{SwapArgs, TokenAmountArgs};
use crate::{canister_id, CanisterClient};

type RemoteResult<T> = std::result::Result<T, RemoteError>;

#[async_trait]
pub trait SwapBackend: Send + Sync {
    /// Ledger balance of `owner`'s main account for `token`
    async fn balance_of(&self, token: &TokenSpec, owner: Principal) -> RemoteResult<Amount>;

    /// ICRC-2 approve of `amount` to `spender`; returns the ledger block index
    async fn approve(
        &self,
        token: &TokenSpec,
        spender: Principal,
        amount: &Amount,
        fee: &Amount,
    ) -> RemoteResult<Amount>;

    /// Expected output for selling `amount_in`
    async fn quote(&self, amount_in: &Amount, direction: SwapDirection) -> RemoteResult<Amount>;

    /// Move approved funds into the pool; returns the pool's `ok` payload
    async fn deposit(&self, token: &TokenSpec, amount: &Amount, fee: &Amount)
        -> RemoteResult<Amount>;

    /// Swap deposited funds; returns the output amount credited in the pool
    async fn swap(
        &self,
        amount_in: &Amount,
        min_out: &Amount,
        direction: SwapDirection,
    ) -> RemoteResult<Amount>;

    async fn withdraw(&self, token: &TokenSpec, amount: &Amount, fee: &Amount)
        -> RemoteResult<Amount>;
}

fn ledger_of(token: &TokenSpec) -> RemoteResult<Principal> {
    canister_id(&token.ledger_canister_id).map_err(RemoteError::from)
}

#[async_trait]
impl SwapBackend for CanisterClient {
    async fn balance_of(&self, token: &TokenSpec, owner: Principal) -> RemoteResult<Amount> {
        let ledger = ledger_of(token)?;
        let balance = match token.standard {
            LedgerStandard::IcpLegacy => {
                let account = AccountIdentifier::new(&owner, None);
                self.account_balance(&ledger, &account).await?
            }
            LedgerStandard::Icrc1 => self.icrc1_balance_of(&ledger, Account::main(owner)).await?,
        };
        tracing::debug!(token = %token, %owner, %balance, "balance");
        Ok(balance)
    }

    async fn approve(
        &self,
        token: &TokenSpec,
        spender: Principal,
        amount: &Amount,
        fee: &Amount,
    ) -> RemoteResult<Amount> {
        let ledger = ledger_of(token)?;
        let args = ApproveArgs::new(spender, amount, fee);
        Ok(self.icrc2_approve(&ledger, args).await??)
    }

    async fn quote(&self, amount_in: &Amount, direction: SwapDirection) -> RemoteResult<Amount> {
        let args = SwapArgs::new(amount_in, direction, &Amount::from(0u32));
        Ok(self.pool_quote(args).await??)
    }

    async fn deposit(
        &self,
        token: &TokenSpec,
        amount: &Amount,
        fee: &Amount,
    ) -> RemoteResult<Amount> {
        let args = TokenAmountArgs::new(&token.ledger_canister_id, amount, fee);
        Ok(self.pool_deposit_from(args).await??)
    }

    async fn swap(
        &self,
        amount_in: &Amount,
        min_out: &Amount,
        direction: SwapDirection,
    ) -> RemoteResult<Amount> {
        let args = SwapArgs::new(amount_in, direction, min_out);
        Ok(self.pool_swap(args).await??)
    }

    async fn withdraw(
        &self,
        token: &TokenSpec,
        amount: &Amount,
        fee: &Amount,
    ) -> RemoteResult<Amount> {
        let args = TokenAmountArgs::new(&token.ledger_canister_id, amount, fee);
        Ok(self.pool_withdraw(args).await??)
    }
}
