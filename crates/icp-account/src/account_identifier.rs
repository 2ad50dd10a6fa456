//! Account identifier derivation
//!
//! Identifiers are derived on demand and never stored; the same principal and
//! subaccount always produce the same 32 bytes.

use std::fmt;

use candid::Principal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha224};

use crate::{AccountError, Subaccount};

/// Domain separator prepended to every preimage
const DOMAIN_SEPARATOR: &[u8] = b"\x0Aaccount-id";

/// Largest principal the network accepts (bytes)
const MAX_PRINCIPAL_LEN: usize = 29;

/// 4-byte CRC32 checksum followed by a 28-byte SHA-224 digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountIdentifier([u8; 32]);

/// Derive an account identifier from raw principal bytes.
///
/// Fails with `InvalidPrincipal` when the bytes cannot be a principal.
pub fn derive_account_identifier(
    principal_bytes: &[u8],
    subaccount: Option<&Subaccount>,
) -> Result<AccountIdentifier, AccountError> {
    if principal_bytes.len() > MAX_PRINCIPAL_LEN {
        return Err(AccountError::InvalidPrincipal {
            input: hex::encode(principal_bytes),
            reason: format!(
                "{} bytes exceeds maximum of {}",
                principal_bytes.len(),
                MAX_PRINCIPAL_LEN
            ),
        });
    }
    Ok(AccountIdentifier::from_bytes_unchecked(
        principal_bytes,
        subaccount,
    ))
}

impl AccountIdentifier {
    /// Identifier of a principal's account (default subaccount when `None`)
    pub fn new(principal: &Principal, subaccount: Option<&Subaccount>) -> Self {
        Self::from_bytes_unchecked(principal.as_slice(), subaccount)
    }

    /// Parse a textual principal and optional raw subaccount, then derive.
    pub fn from_principal_text(
        principal: &str,
        subaccount: Option<&[u8]>,
    ) -> Result<Self, AccountError> {
        let principal = crate::parse_principal(principal)?;
        let subaccount = subaccount.map(Subaccount::try_from).transpose()?;
        Ok(Self::new(&principal, subaccount.as_ref()))
    }

    fn from_bytes_unchecked(principal_bytes: &[u8], subaccount: Option<&Subaccount>) -> Self {
        let subaccount = subaccount.copied().unwrap_or_default();

        let mut hasher = Sha224::new();
        hasher.update(DOMAIN_SEPARATOR);
        hasher.update(principal_bytes);
        hasher.update(subaccount.as_bytes());
        let digest = hasher.finalize();

        let mut bytes = [0u8; 32];
        bytes[..4].copy_from_slice(&crc32fast::hash(&digest).to_be_bytes());
        bytes[4..].copy_from_slice(&digest);
        Self(bytes)
    }

    /// Parse a 64-char hex identifier, verifying its checksum
    pub fn from_hex(text: &str) -> Result<Self, AccountError> {
        let bytes = hex::decode(text.trim()).map_err(|e| AccountError::InvalidAccountIdentifier {
            reason: e.to_string(),
        })?;
        let bytes: [u8; 32] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| AccountError::InvalidAccountIdentifier {
                    reason: format!("expected 32 bytes, got {}", bytes.len()),
                })?;

        let id = Self(bytes);
        let expected = crc32fast::hash(id.digest()).to_be_bytes();
        if id.checksum() != expected {
            return Err(AccountError::InvalidAccountIdentifier {
                reason: format!(
                    "checksum mismatch: expected {}, found {}",
                    hex::encode(expected),
                    hex::encode(id.checksum())
                ),
            });
        }
        Ok(id)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub fn checksum(&self) -> [u8; 4] {
        [self.0[0], self.0[1], self.0[2], self.0[3]]
    }

    /// The 28-byte SHA-224 digest
    pub fn digest(&self) -> &[u8] {
        &self.0[4..]
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for AccountIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for AccountIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AccountIdentifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(serde::de::Error::custom)
    }
}
