//! Ledger subaccounts

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::AccountError;

/// A 32-byte subaccount tag. The default (all zeros) is the main account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subaccount(pub [u8; 32]);

impl Subaccount {
    /// Subaccount for a small index: 28 zero bytes followed by `n` big-endian
    pub fn from_u32(n: u32) -> Self {
        let mut bytes = [0u8; 32];
        bytes[28..].copy_from_slice(&n.to_be_bytes());
        Self(bytes)
    }

    /// Parse a 64-char hex subaccount
    pub fn from_hex(text: &str) -> Result<Self, AccountError> {
        let bytes = hex::decode(text.trim()).map_err(|_| AccountError::InvalidSubaccount {
            len: text.trim().len() / 2,
        })?;
        Self::try_from(bytes.as_slice())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl TryFrom<&[u8]> for Subaccount {
    type Error = AccountError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|_| AccountError::InvalidSubaccount { len: bytes.len() })?;
        Ok(Self(array))
    }
}

impl fmt::Display for Subaccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_u32_layout() {
        let sub = Subaccount::from_u32(0x0102_0304);
        assert_eq!(&sub.0[..28], &[0u8; 28]);
        assert_eq!(&sub.0[28..], &[1, 2, 3, 4]);
        assert_eq!(Subaccount::from_u32(0), Subaccount::default());
    }

    #[test]
    fn test_try_from_rejects_wrong_length() {
        assert_eq!(
            Subaccount::try_from(&[0u8; 31][..]),
            Err(AccountError::InvalidSubaccount { len: 31 })
        );
        assert_eq!(
            Subaccount::try_from(&[0u8; 33][..]),
            Err(AccountError::InvalidSubaccount { len: 33 })
        );
        assert!(Subaccount::try_from(&[7u8; 32][..]).is_ok());
    }

    #[test]
    fn test_hex_parsing() {
        let sub = Subaccount::from_hex(&"ff".repeat(32)).unwrap();
        assert_eq!(sub.0, [0xff; 32]);
        assert_eq!(sub.to_string(), "ff".repeat(32));
        assert!(Subaccount::from_hex("zz").is_err());
        assert_eq!(
            Subaccount::from_hex("0001"),
            Err(AccountError::InvalidSubaccount { len: 2 })
        );
    }
}
