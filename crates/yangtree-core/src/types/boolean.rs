//! YANG booleans

use std::fmt;

use crate::errors::{Result, YangError};
use crate::value::Value;

/// Boolean leaf value with YANG's lenient input spellings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct YangBool(bool);

impl YangBool {
    /// Parse `raw`; absent input is `false`
    ///
    /// Accepts `true`/`True`/`1` and `false`/`False`/`0` as booleans,
    /// integers or strings.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for anything else.
    pub fn parse(raw: &Value) -> Result<Self> {
        let parsed = match raw {
            Value::Empty => Some(false),
            Value::Bool(b) => Some(*b),
            Value::Int(0) | Value::Uint(0) => Some(false),
            Value::Int(1) | Value::Uint(1) => Some(true),
            Value::String(s) => match s.as_str() {
                "true" | "True" | "1" => Some(true),
                "false" | "False" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        };
        parsed.map(YangBool).ok_or_else(|| YangError::TypeMismatch {
            value: raw.to_string(),
            expected: "boolean".to_string(),
        })
    }

    pub fn get(&self) -> bool {
        self.0
    }
}

impl fmt::Display for YangBool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_spellings() {
        for raw in [Value::from("True"), Value::from("1"), Value::Int(1), Value::Bool(true)] {
            assert!(YangBool::parse(&raw).unwrap().get());
        }
        for raw in [Value::from("False"), Value::from("0"), Value::Uint(0), Value::Empty] {
            assert!(!YangBool::parse(&raw).unwrap().get());
        }
    }

    #[test]
    fn test_rejected_spelling() {
        assert!(YangBool::parse(&Value::from("yes")).is_err());
        assert!(YangBool::parse(&Value::Int(2)).is_err());
    }
}
