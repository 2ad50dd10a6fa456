//! icp-account: Legacy ICP ledger account identifiers
//!
//! The ICP ledger keys balances by a 32-byte account identifier derived from
//! a principal and a subaccount:
//!
//! ```text
//! digest     = SHA224("\x0Aaccount-id" ++ principal ++ subaccount)
//! identifier = CRC32(digest) (big-endian) ++ digest
//! ```

pub mod account_identifier;
pub mod subaccount;

pub use account_identifier::{derive_account_identifier, AccountIdentifier};
pub use subaccount::Subaccount;

/// Account derivation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    #[error("Invalid principal {input:?}: {reason}")]
    InvalidPrincipal { input: String, reason: String },

    #[error("Invalid subaccount: expected 32 bytes, got {len}")]
    InvalidSubaccount { len: usize },

    #[error("Invalid account identifier: {reason}")]
    InvalidAccountIdentifier { reason: String },
}

impl AccountError {
    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPrincipal { .. } => "invalid_principal",
            Self::InvalidSubaccount { .. } => "invalid_subaccount",
            Self::InvalidAccountIdentifier { .. } => "invalid_account_identifier",
        }
    }
}

/// Parse a textual principal (e.g. `"2vxsx-fae"`)
pub fn parse_principal(text: &str) -> Result<candid::Principal, AccountError> {
    candid::Principal::from_text(text.trim()).map_err(|e| AccountError::InvalidPrincipal {
        input: text.to_string(),
        reason: e.to_string(),
    })
}
