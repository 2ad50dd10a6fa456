//! Ledger canister calls (ICRC-1/ICRC-2 and the legacy ICP balance endpoint)

use candid::{CandidType, Nat, Principal};
use icp_account::AccountIdentifier;
use icswap_core::{Amount, RemoteError};
use serde::Deserialize;

use crate::{CanisterClient, Result};

/// ICRC-1 account
#[derive(Debug, Clone, PartialEq, Eq, CandidType, Deserialize)]
pub struct Account {
    pub owner: Principal,
    pub subaccount: Option<Vec<u8>>,
}

impl Account {
    /// Main (default subaccount) account of a principal
    pub fn main(owner: Principal) -> Self {
        Self {
            owner,
            subaccount: None,
        }
    }
}

/// ICRC-2 `icrc2_approve` arguments
#[derive(Debug, Clone, CandidType, Deserialize)]
pub struct ApproveArgs {
    pub from_subaccount: Option<Vec<u8>>,
    pub spender: Account,
    pub amount: Nat,
    pub expected_allowance: Option<Nat>,
    pub expires_at: Option<u64>,
    pub fee: Option<Nat>,
    pub memo: Option<Vec<u8>>,
    pub created_at_time: Option<u64>,
}

impl ApproveArgs {
    /// Allowance for `spender` with an explicit fee and all optional fields unset
    pub fn new(spender: Principal, amount: &Amount, fee: &Amount) -> Self {
        Self {
            from_subaccount: None,
            spender: Account::main(spender),
            amount: Nat::from(amount.clone()),
            expected_allowance: None,
            expires_at: None,
            fee: Some(Nat::from(fee.clone())),
            memo: None,
            created_at_time: None,
        }
    }
}

/// ICRC-2 approve rejection
#[derive(Debug, Clone, PartialEq, Eq, CandidType, Deserialize)]
pub enum ApproveError {
    GenericError { message: String, error_code: Nat },
    TemporarilyUnavailable,
    Duplicate { duplicate_of: Nat },
    BadFee { expected_fee: Nat },
    AllowanceChanged { current_allowance: Nat },
    CreatedInFuture { ledger_time: u64 },
    TooOld,
    Expired { ledger_time: u64 },
    InsufficientFunds { balance: Nat },
}

impl From<ApproveError> for RemoteError {
    fn from(err: ApproveError) -> Self {
        match err {
            ApproveError::GenericError {
                message,
                error_code,
            } => RemoteError::Generic {
                message,
                error_code: Some(error_code.0),
            },
            ApproveError::TemporarilyUnavailable => RemoteError::TemporarilyUnavailable,
            ApproveError::Duplicate { duplicate_of } => RemoteError::Duplicate {
                duplicate_of: duplicate_of.0,
            },
            ApproveError::BadFee { expected_fee } => RemoteError::BadFee {
                expected_fee: expected_fee.0,
            },
            ApproveError::AllowanceChanged { current_allowance } => {
                RemoteError::AllowanceChanged {
                    current_allowance: current_allowance.0,
                }
            }
            ApproveError::CreatedInFuture { ledger_time } => {
                RemoteError::CreatedInFuture { ledger_time }
            }
            ApproveError::TooOld => RemoteError::TooOld,
            ApproveError::Expired { ledger_time } => RemoteError::Expired { ledger_time },
            ApproveError::InsufficientFunds { balance } => RemoteError::InsufficientFunds {
                balance: Some(balance.0),
            },
        }
    }
}

/// Legacy ICP `account_balance` arguments
#[derive(Debug, Clone, CandidType, Deserialize)]
pub struct AccountBalanceArgs {
    pub account: Vec<u8>,
}

/// Legacy ICP balance
#[derive(Debug, Clone, Copy, CandidType, Deserialize)]
pub struct Tokens {
    pub e8s: u64,
}

impl CanisterClient {
    /// ICRC-1 balance of an account
    pub async fn icrc1_balance_of(&self, ledger: &Principal, account: Account) -> Result<Amount> {
        let balance: Nat = self.query(ledger, "icrc1_balance_of", (account,)).await?;
        Ok(balance.0)
    }

    /// Legacy ICP balance keyed by account identifier
    pub async fn account_balance(
        &self,
        ledger: &Principal,
        account: &AccountIdentifier,
    ) -> Result<Amount> {
        let args = AccountBalanceArgs {
            account: account.to_vec(),
        };
        let tokens: Tokens = self.query(ledger, "account_balance", (args,)).await?;
        Ok(Amount::from(tokens.e8s))
    }

    /// Grant `args.spender` an allowance; returns the ledger block index
    pub async fn icrc2_approve(
        &self,
        ledger: &Principal,
        args: ApproveArgs,
    ) -> Result<std::result::Result<Amount, ApproveError>> {
        let result: std::result::Result<Nat, ApproveError> =
            self.update(ledger, "icrc2_approve", (args,)).await?;
        Ok(result.map(|block| block.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approve_args_carry_fee() {
        let spender = Principal::from_text("xmiu5-jqaaa-aaaag-qbz7q-cai").unwrap();
        let args = ApproveArgs::new(spender, &Amount::from(5_000u32), &Amount::from(10_000u32));
        assert_eq!(args.amount, Nat::from(5_000u32));
        assert_eq!(args.fee, Some(Nat::from(10_000u32)));
        assert_eq!(args.spender, Account::main(spender));
        assert!(args.expected_allowance.is_none());
        assert!(args.memo.is_none());
    }

    #[test]
    fn test_approve_error_mapping() {
        let err: RemoteError = ApproveError::BadFee {
            expected_fee: Nat::from(10_000u32),
        }
        .into();
        assert_eq!(
            err,
            RemoteError::BadFee {
                expected_fee: Amount::from(10_000u32)
            }
        );

        let err: RemoteError = ApproveError::AllowanceChanged {
            current_allowance: Nat::from(7u32),
        }
        .into();
        assert_eq!(err.kind(), "allowance_changed");

        let err: RemoteError = ApproveError::GenericError {
            message: "frozen".into(),
            error_code: Nat::from(3u32),
        }
        .into();
        assert_eq!(err.to_string(), "frozen");
    }

    #[test]
    fn test_approve_result_wire_format() {
        let reply: std::result::Result<Nat, ApproveError> = Err(ApproveError::Duplicate {
            duplicate_of: Nat::from(42u32),
        });
        let bytes = candid::encode_one(&reply).unwrap();
        let decoded: std::result::Result<Nat, ApproveError> = candid::decode_one(&bytes).unwrap();
        assert_eq!(decoded, reply);
    }
}
