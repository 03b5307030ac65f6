//! Integer amount arithmetic and fixed-point display helpers.
//!
//! ## Overview
//!
//! Amounts are `u128` in the asset's base unit (wei-equivalent for
//! fungibles, item count for NFTs). Every division in settlement is a floor,
//! so a payer never transfers more than the order ratio implies.
//!
//! ## Decimal Strings
//!
//! `parse_units` / `format_units` convert between human decimal strings and
//! base units through `rust_decimal`, never through floating point.
//!
//! ```
//! use dark_exchange::types::units::{parse_units, format_units, ETHER_DECIMALS};
//!
//! let fee = parse_units("0.01", ETHER_DECIMALS).unwrap();
//! assert_eq!(fee, 10_000_000_000_000_000);
//! assert_eq!(format_units(fee, ETHER_DECIMALS).unwrap(), "0.01");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Decimals of the native coin and most fungible tokens
pub const ETHER_DECIMALS: u32 = 18;

/// Largest supported decimals (10^18 fits u64)
pub const MAX_DECIMALS: u32 = 18;

/// Basis-point denominator as u128
pub const BPS_DENOMINATOR: u128 = 10_000;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert a decimal string to base units
///
/// # Returns
///
/// * `Some(u128)` - The base-unit amount
/// * `None` - If parsing fails, the value is negative, or it has more
///   fractional digits than `decimals`
///
/// # Example
///
/// ```
/// use dark_exchange::types::units::parse_units;
///
/// assert_eq!(parse_units("1", 18), Some(1_000_000_000_000_000_000));
/// assert_eq!(parse_units("0.5", 2), Some(50));
/// assert_eq!(parse_units("0.001", 2), None);
/// ```
pub fn parse_units(s: &str, decimals: u32) -> Option<u128> {
    if decimals > MAX_DECIMALS {
        return None;
    }
    let decimal = Decimal::from_str(s).ok()?;
    if decimal.is_sign_negative() {
        return None;
    }
    let scaled = decimal.checked_mul(Decimal::from(10u64.pow(decimals)))?;
    if !scaled.fract().is_zero() {
        return None;
    }
    scaled.trunc().to_u128()
}

/// Convert base units to a trimmed decimal string
///
/// Returns None if the amount exceeds what a `Decimal` can hold (~7.9e28).
pub fn format_units(value: u128, decimals: u32) -> Option<String> {
    if decimals > MAX_DECIMALS {
        return None;
    }
    let mantissa = i128::try_from(value).ok()?;
    let decimal = Decimal::try_from_i128_with_scale(mantissa, decimals).ok()?;
    Some(decimal.normalize().to_string())
}

// ============================================================================
// Arithmetic Functions
// ============================================================================

/// `value * bps / 10000`, floored
pub fn apply_bps(value: u128, bps: u32) -> Option<u128> {
    value.checked_mul(bps as u128).map(|v| v / BPS_DENOMINATOR)
}

/// `numerator * target / denominator`, floored
///
/// None on overflow or a zero denominator.
pub fn partial_floor(numerator: u128, denominator: u128, target: u128) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    numerator.checked_mul(target).map(|v| v / denominator)
}

/// Check whether flooring `numerator * target / denominator` loses 0.1% or
/// more of the exact result.
///
/// Returns None on overflow or a zero denominator.
pub fn is_rounding_error_floor(numerator: u128, denominator: u128, target: u128) -> Option<bool> {
    if denominator == 0 {
        return None;
    }
    if numerator == 0 || target == 0 {
        return Some(false);
    }
    let product = numerator.checked_mul(target)?;
    let remainder = product % denominator;
    Some(remainder.checked_mul(1000)? >= product)
}

// ============================================================================
// Unit Tests
// ============================================================================
