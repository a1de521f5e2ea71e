//! Numeric literals and the tiered parser that picks their representation.
//!
//! A literal is stored in the narrowest form that loses nothing:
//!
//! 1. Literals without a fraction or exponent become `i64` (leading `-`) or `u64`.
//! 2. Everything else, and integers that overflowed step 1, become a decimal
//!    with a 96-bit mantissa and at most 28 fractional digits.
//! 3. A decimal that rounded to zero from a non-zero literal (e.g. `1e-30`),
//!    or a literal too large for the decimal range, becomes an `f64`.
//! 4. Anything unparsable collapses to integer zero.

use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, FromPrimitive, RoundingMode, ToPrimitive, Zero};

/// Largest number of fractional digits the decimal tier keeps.
const MAX_DECIMAL_SCALE: i64 = 28;

/// Width of the decimal tier's mantissa.
const MAX_DECIMAL_BITS: u64 = 96;

/// A JSON number in its lossless representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Signed(i64),
    Unsigned(u64),
    Decimal(BigDecimal),
    Float(f64),
}

impl Number {
    /// Parse a numeric literal using the tiered integer → decimal → float policy.
    ///
    /// Never fails: an unparsable literal yields `Number::Signed(0)`.
    pub fn parse(literal: &str) -> Number {
        if !literal.contains(['.', 'e', 'E']) {
            if literal.starts_with('-') {
                if let Ok(value) = literal.parse::<i64>() {
                    return Number::Signed(value);
                }
            } else if let Ok(value) = literal.parse::<u64>() {
                return Number::Unsigned(value);
            }
        }

        if let Some(decimal) = parse_decimal(literal) {
            // Underflow: the decimal tier rounded a tiny literal down to zero.
            if decimal.is_zero() {
                if let Ok(value) = literal.parse::<f64>() {
                    if value != 0.0 {
                        return Number::Float(value);
                    }
                }
            }
            return Number::Decimal(decimal);
        }

        match literal.parse::<f64>() {
            Ok(value) if value.is_finite() => Number::Float(value),
            _ => Number::Signed(0),
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Signed(_) | Number::Unsigned(_))
    }

    /// The value as `i64` when it is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Signed(v) => Some(*v),
            Number::Unsigned(v) => i64::try_from(*v).ok(),
            Number::Decimal(d) if is_whole(d) => d.to_i64(),
            Number::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(*f as i64),
            _ => None,
        }
    }

    /// The value as `u64` when it is a non-negative integer that fits.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Number::Signed(v) => u64::try_from(*v).ok(),
            Number::Unsigned(v) => Some(*v),
            Number::Decimal(d) if is_whole(d) => d.to_u64(),
            Number::Float(f) if f.fract() == 0.0 && *f >= 0.0 && *f < u64::MAX as f64 => {
                Some(*f as u64)
            }
            _ => None,
        }
    }

    /// The value as the nearest `f64`.
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Signed(v) => *v as f64,
            Number::Unsigned(v) => *v as f64,
            // Through the literal text, which always yields the nearest f64.
            Number::Decimal(d) => d.to_string().parse().unwrap_or(f64::NAN),
            Number::Float(f) => *f,
        }
    }

    /// The value as an exact decimal; `None` for non-finite floats.
    pub fn to_decimal(&self) -> Option<BigDecimal> {
        match self {
            Number::Signed(v) => Some(BigDecimal::from(*v)),
            Number::Unsigned(v) => Some(BigDecimal::from(*v)),
            Number::Decimal(d) => Some(d.clone()),
            Number::Float(f) => BigDecimal::from_f64(*f),
        }
    }

    /// Round to the nearest integer (ties to even), if the result fits in `i128`.
    pub(crate) fn to_i128_rounded(&self) -> Option<i128> {
        match self {
            Number::Signed(v) => Some(i128::from(*v)),
            Number::Unsigned(v) => Some(i128::from(*v)),
            Number::Decimal(d) => d.with_scale_round(0, RoundingMode::HalfEven).to_i128(),
            Number::Float(f) => {
                let rounded = f.round_ties_even();
                (rounded.is_finite() && rounded.abs() < i128::MAX as f64).then_some(rounded as i128)
            }
        }
    }
}

fn is_whole(decimal: &BigDecimal) -> bool {
    decimal.with_scale(0) == *decimal
}

/// Parse the decimal tier, clamped to the range of a 96-bit, 28-digit-scale decimal.
fn parse_decimal(literal: &str) -> Option<BigDecimal> {
    let mut decimal = BigDecimal::from_str(literal).ok()?;

    let scale = decimal.fractional_digit_count();
    if scale < -MAX_DECIMAL_SCALE {
        return None;
    }
    if scale < 0 {
        decimal = decimal.with_scale(0);
    } else if scale > MAX_DECIMAL_SCALE {
        decimal = decimal.with_scale_round(MAX_DECIMAL_SCALE, RoundingMode::HalfEven);
    }

    // Shed fractional digits until the mantissa fits; an integer that still
    // doesn't fit is out of range.
    loop {
        let (mantissa, scale) = decimal.as_bigint_and_exponent();
        if mantissa.bits() <= MAX_DECIMAL_BITS {
            return Some(decimal);
        }
        if scale <= 0 {
            return None;
        }
        decimal = decimal.with_scale_round(scale - 1, RoundingMode::HalfEven);
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Signed(v) => write!(f, "{v}"),
            Number::Unsigned(v) => write!(f, "{v}"),
            Number::Decimal(d) => write!(f, "{d}"),
            Number::Float(v) => f.write_str(&format_f64(*v)),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Signed(value)
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Number::Unsigned(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl From<BigDecimal> for Number {
    fn from(value: BigDecimal) -> Self {
        Number::Decimal(value)
    }
}

/// Format a finite `f64` as a JSON number literal.
///
/// Whole numbers below 1e16 print without a fraction (`1337`), very small or
/// very large magnitudes use exponent notation (`1e-30`), everything else uses
/// the shortest text that parses back to the same value.
pub(crate) fn format_f64(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-5..1e16).contains(&magnitude) {
        format!("{value:e}")
    } else if value == 0.0 {
        // Normalize -0 to 0
        "0".to_string()
    } else {
        format!("{value}")
    }
}

/// Same policy as [`format_f64`], using `f32`'s own shortest representation.
pub(crate) fn format_f32(value: f32) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-5..1e16).contains(&magnitude) {
        format!("{value:e}")
    } else if value == 0.0 {
        "0".to_string()
    } else {
        format!("{value}")
    }
}
