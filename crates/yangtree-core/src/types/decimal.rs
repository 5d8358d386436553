//! Fixed-precision decimals (YANG `decimal64` fraction-digits)

use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

use super::restricted::ScalarBase;
use crate::errors::{Result, YangError};
use crate::value::Value;

/// Largest scale `rust_decimal` can represent
const MAX_FRACTION_DIGITS: u32 = 28;

/// Factory for decimals quantized to a fixed number of fractional digits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecisionDecimalType {
    fraction_digits: u32,
}

impl PrecisionDecimalType {
    /// Create a factory for `fraction_digits` fractional digits
    ///
    /// # Errors
    ///
    /// Returns `InvalidPrecision` above 28 digits.
    pub fn new(fraction_digits: u32) -> Result<Self> {
        if fraction_digits > MAX_FRACTION_DIGITS {
            return Err(YangError::InvalidPrecision {
                digits: fraction_digits,
            });
        }
        Ok(Self { fraction_digits })
    }

    pub fn fraction_digits(&self) -> u32 {
        self.fraction_digits
    }

    /// Quantize `raw` (or zero when absent) to this precision
    ///
    /// Rounds half to even, then rescales so exactly `fraction_digits`
    /// digits follow the point.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if `raw` is not a decimal, an integer, or a
    /// string that parses as one, and `ConstraintViolation` if the integer
    /// part leaves no room for `fraction_digits` digits in 96 bits.
    pub fn construct(&self, raw: Option<&Value>) -> Result<FixedPrecisionDecimal> {
        let input = match raw {
            None | Some(Value::Empty) => Decimal::ZERO,
            Some(value) => Decimal::from_value(value).ok_or_else(|| YangError::TypeMismatch {
                value: value.to_string(),
                expected: format!("decimal64 with {} fraction digits", self.fraction_digits),
            })?,
        };
        let value =
            quantize(input, self.fraction_digits).ok_or_else(|| YangError::ConstraintViolation {
                value: input.to_string(),
                restriction: format!("fraction-digits {}", self.fraction_digits),
            })?;
        Ok(FixedPrecisionDecimal {
            value,
            fraction_digits: self.fraction_digits,
        })
    }
}

/// `None` when the mantissa cannot hold the requested scale
fn quantize(input: Decimal, fraction_digits: u32) -> Option<Decimal> {
    let mut q = input.round_dp_with_strategy(fraction_digits, RoundingStrategy::MidpointNearestEven);
    q.rescale(fraction_digits);
    (q.scale() == fraction_digits).then_some(q)
}

/// A decimal carrying exactly `fraction_digits` fractional digits
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct FixedPrecisionDecimal {
    value: Decimal,
    fraction_digits: u32,
}

impl FixedPrecisionDecimal {
    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn fraction_digits(&self) -> u32 {
        self.fraction_digits
    }

    pub fn to_value(&self) -> Value {
        Value::Decimal(self.value)
    }
}

impl fmt::Display for FixedPrecisionDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_truncating_input_rounds_half_even() {
        let ty = PrecisionDecimalType::new(2).unwrap();
        assert_eq!(ty.construct(Some(&Value::from("2.345"))).unwrap().to_string(), "2.34");
        assert_eq!(ty.construct(Some(&Value::from("2.355"))).unwrap().to_string(), "2.36");
    }

    #[test]
    fn test_short_input_is_padded() {
        let ty = PrecisionDecimalType::new(3).unwrap();
        let d = ty.construct(Some(&Value::Int(7))).unwrap();
        assert_eq!(d.to_string(), "7.000");
        assert_eq!(d.value(), Decimal::from_str("7").unwrap());
    }

    #[test]
    fn test_precision_limit() {
        assert!(PrecisionDecimalType::new(28).is_ok());
        assert!(matches!(
            PrecisionDecimalType::new(29),
            Err(YangError::InvalidPrecision { digits: 29 })
        ));
    }

    #[test]
    fn test_non_numeric_input_rejected() {
        let ty = PrecisionDecimalType::new(1).unwrap();
        assert!(matches!(
            ty.construct(Some(&Value::from("abc"))),
            Err(YangError::TypeMismatch { .. })
        ));
    }
}
