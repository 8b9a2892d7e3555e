//! Denomination conversion
//!
//! Exact conversion between the ledger's smallest integer unit and its
//! 18-decimal human denomination. All arithmetic is done on decimal text
//! and 256-bit integers; no binary floating point is involved anywhere.

use alloy::primitives::U256;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of fractional digits in the human denomination
pub const DECIMALS: usize = 18;

/// Smallest units per whole human-denominated token (10^18)
pub const UNITS_PER_TOKEN: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Errors that can occur during amount conversion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error("Malformed decimal amount: {0:?}")]
    Malformed(String),
    #[error("Amount must not be negative: {0}")]
    Negative(String),
    #[error("Amount too large: {0}")]
    Overflow(String),
}

/// A non-negative or negative decimal quantity in human units, kept as text
///
/// Parsing never goes through floating point, so every digit the caller
/// typed survives until [`to_smallest_unit`] decides what to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decimal {
    negative: bool,
    integer: String,
    fraction: String,
}

impl Decimal {
    /// Whether the amount carries a leading minus sign (and is not zero)
    pub fn is_negative(&self) -> bool {
        self.negative && !self.is_zero()
    }

    /// Whether every digit is zero
    pub fn is_zero(&self) -> bool {
        self.integer.bytes().all(|b| b == b'0') && self.fraction.bytes().all(|b| b == b'0')
    }

    /// Integer digits, without leading zeros ("0" for none)
    pub fn integer_digits(&self) -> &str {
        let trimmed = self.integer.trim_start_matches('0');
        if trimmed.is_empty() {
            "0"
        } else {
            trimmed
        }
    }

    /// Fractional digits exactly as written
    pub fn fraction_digits(&self) -> &str {
        &self.fraction
    }
}

impl FromStr for Decimal {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let (negative, unsigned) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };

        let (integer, fraction) = match unsigned.split_once('.') {
            Some((i, f)) => (i, f),
            None => (unsigned, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (integer.is_empty() && fraction.is_empty()) || !all_digits(integer) || !all_digits(fraction)
        {
            return Err(UnitError::Malformed(s.to_string()));
        }

        Ok(Self {
            negative,
            integer: integer.to_string(),
            fraction: fraction.to_string(),
        })
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            f.write_str("-")?;
        }
        f.write_str(self.integer_digits())?;
        if !self.fraction.is_empty() {
            write!(f, ".{}", self.fraction)?;
        }
        Ok(())
    }
}

/// Convert a smallest-unit quantity into human units
///
/// The result always carries exactly 18 fractional digits, e.g.
/// `500000000000000000` becomes `0.500000000000000000`.
pub fn to_human_unit(smallest: U256) -> Decimal {
    let whole = smallest / UNITS_PER_TOKEN;
    let rest = (smallest % UNITS_PER_TOKEN).to_string();

    Decimal {
        negative: false,
        integer: whole.to_string(),
        fraction: format!("{}{}", "0".repeat(DECIMALS - rest.len()), rest),
    }
}

/// Convert a human-unit decimal into smallest units
///
/// Fractional digits beyond the 18th are truncated, never rounded.
/// Negative amounts are rejected; zero converts to zero.
pub fn to_smallest_unit(amount: &Decimal) -> Result<U256, UnitError> {
    if amount.is_negative() {
        return Err(UnitError::Negative(amount.to_string()));
    }

    let overflow = || UnitError::Overflow(amount.to_string());

    let whole: U256 = amount.integer_digits().parse().map_err(|_| overflow())?;
    let scaled = whole.checked_mul(UNITS_PER_TOKEN).ok_or_else(overflow)?;

    let mut fraction: String = amount.fraction.chars().take(DECIMALS).collect();
    fraction.push_str(&"0".repeat(DECIMALS - fraction.len()));
    let fraction: U256 = fraction.parse().map_err(|_| overflow())?;

    scaled.checked_add(fraction).ok_or_else(overflow)
}

/// Parse decimal text straight into smallest units
pub fn parse_amount(text: &str) -> Result<U256, UnitError> {
    to_smallest_unit(&text.parse()?)
}

/// Format smallest units as an 18-digit human decimal string
pub fn format_amount(smallest: U256) -> String {
    to_human_unit(smallest).to_string()
}
