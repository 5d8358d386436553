//! Leaf base types
//!
//! `LeafType` is what a schema compiler hands the engine for every leaf (and
//! for every allowed element type of a leaf-list); `LeafValue` is what a leaf
//! holds once a raw value has been accepted.

pub mod boolean;
pub mod decimal;
pub mod reference;
pub mod restricted;
pub mod typed_list;

use rust_decimal::Decimal;
use std::fmt;

pub use boolean::YangBool;
pub use decimal::{FixedPrecisionDecimal, PrecisionDecimalType};
pub use reference::{ReferenceType, ReferenceValue};
pub use restricted::{Enumeration, Restricted, RestrictedType, Restriction, ScalarBase};
pub use typed_list::{TypedList, TypedListType};

use crate::errors::{Result, YangError};
use crate::value::Value;
use restricted::RangeSet;

/// Schema-facing description of a leaf's base type
#[derive(Debug, Clone)]
pub enum LeafType {
    String(RestrictedType<String>),
    Int(RestrictedType<i64>),
    Uint(RestrictedType<u64>),
    Decimal {
        precision: PrecisionDecimalType,
        range: RestrictedType<Decimal>,
    },
    Bool,
    /// Candidates are tried in declaration order; first success wins
    Union(Vec<LeafType>),
    Reference(ReferenceType),
}

macro_rules! int_width {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $wide:ty, $narrow:ty) => {
        $(#[$doc])*
        pub fn $name() -> Self {
            LeafType::$variant(RestrictedType::new().with(Restriction::Range(RangeSet::between(
                <$wide>::from(<$narrow>::MIN),
                <$wide>::from(<$narrow>::MAX),
            ))))
        }
    };
}

impl LeafType {
    /// Unrestricted string
    pub fn string() -> Self {
        LeafType::String(RestrictedType::new())
    }

    /// String restricted to an enumeration, names in declaration order
    pub fn enumeration<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<i64>)>,
        S: Into<String>,
    {
        LeafType::String(RestrictedType::new().with(Restriction::enumeration(entries)))
    }

    int_width!(int8, Int, i64, i8);
    int_width!(int16, Int, i64, i16);
    int_width!(int32, Int, i64, i32);
    int_width!(
        /// Full-width signed integer
        int64, Int, i64, i64
    );
    int_width!(uint8, Uint, u64, u8);
    int_width!(uint16, Uint, u64, u16);
    int_width!(uint32, Uint, u64, u32);
    int_width!(uint64, Uint, u64, u64);

    /// `decimal64` with the given fraction digits and no range
    ///
    /// # Errors
    ///
    /// Returns `InvalidPrecision` above 28 digits.
    pub fn decimal(fraction_digits: u32) -> Result<Self> {
        Ok(LeafType::Decimal {
            precision: PrecisionDecimalType::new(fraction_digits)?,
            range: RestrictedType::new(),
        })
    }

    /// Construct a value of this type from `raw`
    ///
    /// `Value::Empty` yields `None` (an unset leaf) for every type. References
    /// are stored verbatim here; the tree resolves them against the registry.
    ///
    /// # Errors
    ///
    /// `TypeMismatch`, `ConstraintViolation` or `UnionMismatch` as produced by
    /// the underlying factory.
    pub fn construct(&self, raw: &Value) -> Result<Option<LeafValue>> {
        if raw.is_empty() {
            return Ok(None);
        }
        let value = match self {
            LeafType::String(ty) => LeafValue::String(ty.construct(raw)?),
            LeafType::Int(ty) => LeafValue::Int(ty.construct(raw)?),
            LeafType::Uint(ty) => LeafValue::Uint(ty.construct(raw)?),
            LeafType::Decimal { precision, range } => {
                let quantized = precision.construct(Some(raw))?;
                range.check(&quantized.to_value())?;
                LeafValue::Decimal(quantized)
            }
            LeafType::Bool => LeafValue::Bool(YangBool::parse(raw)?),
            LeafType::Union(candidates) => {
                return candidates
                    .iter()
                    .find_map(|candidate| candidate.construct(raw).ok().flatten())
                    .map(Some)
                    .ok_or_else(|| union_mismatch(raw, candidates));
            }
            LeafType::Reference(_) => LeafValue::Reference(ReferenceValue::Opaque(Some(raw.clone()))),
        };
        Ok(Some(value))
    }

    /// Whether this type (or any union member) is a reference
    pub fn involves_reference(&self) -> bool {
        match self {
            LeafType::Reference(_) => true,
            LeafType::Union(candidates) => candidates.iter().any(LeafType::involves_reference),
            _ => false,
        }
    }
}

pub(crate) fn union_mismatch(raw: &Value, candidates: &[LeafType]) -> YangError {
    YangError::UnionMismatch {
        value: raw.to_string(),
        candidates: candidates.iter().map(ToString::to_string).collect(),
    }
}

impl fmt::Display for LeafType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafType::String(ty) => write!(f, "{}", ty),
            LeafType::Int(ty) => write!(f, "{}", ty),
            LeafType::Uint(ty) => write!(f, "{}", ty),
            LeafType::Decimal { precision, range } => {
                write!(f, "decimal64({})", precision.fraction_digits())?;
                for r in range.restrictions() {
                    write!(f, " {}", r)?;
                }
                Ok(())
            }
            LeafType::Bool => f.write_str("boolean"),
            LeafType::Union(candidates) => {
                f.write_str("union(")?;
                for (i, c) in candidates.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{}", c)?;
                }
                f.write_str(")")
            }
            LeafType::Reference(ty) => write!(f, "{}", ty),
        }
    }
}

/// A value accepted by a `LeafType`
#[derive(Debug, Clone, PartialEq)]
pub enum LeafValue {
    String(Restricted<String>),
    Int(Restricted<i64>),
    Uint(Restricted<u64>),
    Decimal(FixedPrecisionDecimal),
    Bool(YangBool),
    Reference(ReferenceValue),
}

impl LeafValue {
    /// Raw form of the stored value
    ///
    /// Live pointers have no stored value and yield `Value::Empty`; read them
    /// through the tree.
    pub fn to_value(&self) -> Value {
        match self {
            LeafValue::String(v) => v.to_value(),
            LeafValue::Int(v) => v.to_value(),
            LeafValue::Uint(v) => v.to_value(),
            LeafValue::Decimal(v) => v.to_value(),
            LeafValue::Bool(v) => Value::Bool(v.get()),
            LeafValue::Reference(r) => r.stored().cloned().unwrap_or_default(),
        }
    }

    /// Integer assigned by an enumeration restriction, if any
    pub fn mapped(&self) -> Option<i64> {
        match self {
            LeafValue::String(v) => v.mapped(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int8_width_range() {
        let ty = LeafType::int8();
        assert!(ty.construct(&Value::Int(127)).unwrap().is_some());
        assert!(matches!(
            ty.construct(&Value::Int(128)),
            Err(YangError::ConstraintViolation { .. })
        ));
    }

    #[test]
    fn test_uint8_rejects_negative() {
        assert!(matches!(
            LeafType::uint8().construct(&Value::Int(-1)),
            Err(YangError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_union_first_match_wins() {
        let ty = LeafType::Union(vec![LeafType::int8(), LeafType::string()]);
        let v = ty.construct(&Value::from("12")).unwrap().unwrap();
        assert_eq!(v.to_value(), Value::Int(12));
        let v = ty.construct(&Value::from("twelve")).unwrap().unwrap();
        assert_eq!(v.to_value(), Value::from("twelve"));
    }

    #[test]
    fn test_union_none_match_names_candidates() {
        let ty = LeafType::Union(vec![LeafType::int8(), LeafType::Bool]);
        match ty.construct(&Value::from("x")) {
            Err(YangError::UnionMismatch { value, candidates }) => {
                assert_eq!(value, "x");
                assert_eq!(candidates.len(), 2);
                assert_eq!(candidates[1], "boolean");
            }
            other => panic!("expected UnionMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_is_unset_for_every_type() {
        assert!(LeafType::Bool.construct(&Value::Empty).unwrap().is_none());
        assert!(LeafType::decimal(2)
            .unwrap()
            .construct(&Value::Empty)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_enumeration_leaf_mapped_value() {
        let ty = LeafType::enumeration([("up", None), ("down", Some(5)), ("testing", None)]);
        let v = ty.construct(&Value::from("testing")).unwrap().unwrap();
        assert_eq!(v.mapped(), Some(1));
    }
}
