//! Fixed-point amount codec
//!
//! Converts between human-readable decimal strings and integer base units.
//! Amounts stay integral from the parse boundary onward.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::constants::BPS_DENOMINATOR;
use crate::errors::AmountError;
use crate::types::Amount;

/// Parse a decimal string into base units, truncating extra fractional digits.
///
/// Accepts an optional leading `+`, and forms like `"1"`, `"1.5"`, `".5"`, `"5."`.
pub fn parse_amount(text: &str, decimals: u8) -> Result<Amount, AmountError> {
    let trimmed = text.trim();
    let invalid = |reason: &str| AmountError::InvalidAmount {
        input: text.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("empty amount"));
    }
    if trimmed.starts_with('-') {
        return Err(invalid("amount must not be negative"));
    }

    let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid("not a number"));
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit()) || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid("not a number"));
    }

    let decimals = decimals as usize;
    let kept = &frac_part[..frac_part.len().min(decimals)];

    let mut digits = String::with_capacity(int_part.len() + decimals);
    digits.push_str(int_part);
    digits.push_str(kept);
    digits.extend(std::iter::repeat('0').take(decimals - kept.len()));

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(Amount::zero());
    }

    BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(|| invalid("not a number"))
}

/// Render base units as a fixed-point string with exactly `decimals` fractional digits.
pub fn format_amount(amount: &Amount, decimals: u8) -> String {
    let digits = amount.to_str_radix(10);
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - digits.len()), digits)
    } else {
        digits
    };

    let split = padded.len() - decimals;
    format!("{}.{}", &padded[..split], &padded[split..])
}

/// Minimum acceptable output after applying a slippage tolerance.
///
/// Formula: floor(amount * (10000 - tolerance_bps) / 10000)
pub fn minimum_received(amount: &Amount, tolerance_bps: u16) -> Result<Amount, AmountError> {
    if tolerance_bps > BPS_DENOMINATOR {
        return Err(AmountError::InvalidTolerance {
            bps: u64::from(tolerance_bps),
        });
    }

    let keep = BigUint::from(BPS_DENOMINATOR - tolerance_bps);
    Ok(amount * keep / BigUint::from(BPS_DENOMINATOR))
}

/// Parse a percentage such as `"0.5"` into basis points (`50`).
pub fn parse_tolerance_percent(text: &str) -> Result<u16, AmountError> {
    let bps = parse_amount(text, 2)?;
    match bps.to_u16() {
        Some(bps) if bps <= BPS_DENOMINATOR => Ok(bps),
        _ => Err(AmountError::InvalidTolerance {
            bps: bps.to_u64().unwrap_or(u64::MAX),
        }),
    }
}

/// Serde adapter carrying amounts as decimal strings
pub mod as_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::types::Amount;

    pub fn serialize<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&amount.to_str_radix(10))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        let text = String::deserialize(deserializer)?;
        Amount::parse_bytes(text.trim().as_bytes(), 10)
            .ok_or_else(|| de::Error::custom(format!("invalid base-unit amount: {text}")))
    }
}
