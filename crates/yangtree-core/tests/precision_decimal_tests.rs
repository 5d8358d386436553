#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use yangtree_core::types::{PrecisionDecimalType, Restriction, RestrictedType};
use yangtree_core::{LeafType, Value, YangError};

fn dec(text: &str) -> Decimal {
    Decimal::from_str(text).unwrap()
}

#[test]
fn test_quantizes_to_fraction_digits() {
    let ty = PrecisionDecimalType::new(2).unwrap();
    let d = ty.construct(Some(&Value::from("3.14159"))).unwrap();
    assert_eq!(d.to_string(), "3.14");
    assert_eq!(d.value().scale(), 2);
    assert_eq!(d.fraction_digits(), 2);
}

#[test]
fn test_absent_value_is_zero_at_precision() {
    let ty = PrecisionDecimalType::new(2).unwrap();
    assert_eq!(ty.construct(None).unwrap().to_string(), "0.00");
    assert_eq!(ty.construct(Some(&Value::Empty)).unwrap().to_string(), "0.00");
}

#[test]
fn test_midpoints_round_to_even() {
    let ty = PrecisionDecimalType::new(1).unwrap();
    let cases = [("0.25", "0.2"), ("0.35", "0.4"), ("-0.25", "-0.2"), ("1.05", "1.0")];
    for (input, expected) in cases {
        let d = ty.construct(Some(&Value::Decimal(dec(input)))).unwrap();
        assert_eq!(d.to_string(), expected, "rounding {}", input);
    }
}

#[test]
fn test_zero_fraction_digits() {
    let ty = PrecisionDecimalType::new(0).unwrap();
    assert_eq!(ty.construct(Some(&Value::from("2.5"))).unwrap().to_string(), "2");
    assert_eq!(ty.construct(Some(&Value::from("3.5"))).unwrap().to_string(), "4");
}

#[test]
fn test_unrepresentable_precision_rejected() {
    assert!(matches!(
        LeafType::decimal(29),
        Err(YangError::InvalidPrecision { digits: 29 })
    ));
}

#[test]
fn test_decimal_leaf_applies_range_after_quantizing() {
    let ty = LeafType::Decimal {
        precision: PrecisionDecimalType::new(2).unwrap(),
        range: RestrictedType::new().with(Restriction::range("0.00..1.00").unwrap()),
    };

    // 1.004 quantizes to 1.00, which is in range
    let v = ty.construct(&Value::from("1.004")).unwrap().unwrap();
    assert_eq!(v.to_value(), Value::Decimal(dec("1.00")));

    assert!(matches!(
        ty.construct(&Value::from("1.006")),
        Err(YangError::ConstraintViolation { .. })
    ));
    assert!(matches!(
        ty.construct(&Value::from("-0.5")),
        Err(YangError::ConstraintViolation { .. })
    ));
}

#[test]
fn test_integer_part_too_wide_for_precision_is_rejected() {
    let wide = PrecisionDecimalType::new(10).unwrap();
    let err = wide
        .construct(Some(&Value::from("123456789012345678901.5")))
        .unwrap_err();
    match err {
        YangError::ConstraintViolation { value, restriction } => {
            assert_eq!(value, "123456789012345678901.5");
            assert_eq!(restriction, "fraction-digits 10");
        }
        other => panic!("expected ConstraintViolation, got {:?}", other),
    }

    let cents = PrecisionDecimalType::new(2).unwrap();
    assert!(cents.construct(Some(&Value::Decimal(Decimal::MAX))).is_err());
    // no fraction digits needed, so the widest value still fits
    let whole = PrecisionDecimalType::new(0).unwrap();
    assert_eq!(
        whole.construct(Some(&Value::Decimal(Decimal::MAX))).unwrap().value(),
        Decimal::MAX
    );
}

proptest! {
    #[test]
    fn prop_scale_matches_and_error_is_within_half_ulp(
        mantissa in -1_000_000_000i64..1_000_000_000,
        scale in 0u32..9,
        digits in 0u32..6,
    ) {
        let input = Decimal::new(mantissa, scale);
        let ty = PrecisionDecimalType::new(digits).unwrap();
        let out = ty.construct(Some(&Value::Decimal(input))).unwrap().value();

        prop_assert_eq!(out.scale(), digits);
        let half_ulp = Decimal::new(5, digits + 1);
        prop_assert!((out - input).abs() <= half_ulp);
    }
}
