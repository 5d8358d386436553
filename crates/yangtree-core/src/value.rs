//! Dynamic value model
//!
//! `Value` is both the raw input handed to type factories and the snapshot
//! shape returned by `get()`. Its `Display` form is the "string form" used
//! for pattern tests, key values and registry path segments.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use std::fmt;

/// A raw or snapshot value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No value supplied
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Decimal(Decimal),
    String(String),
    /// Ordered sequence (leaf-list snapshot)
    List(Vec<Value>),
    /// Named children (container or keyed-list snapshot)
    Map(IndexMap<String, Value>),
}

impl Value {
    /// Whether this is the absent value
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Short type name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Empty => "empty",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Borrow the string payload, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the map payload, if this is a map
    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Borrow the list payload, if this is a list
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Uint(u) => write!(f, "{}", u),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::String(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Uint(u)
    }
}

impl From<u32> for Value {
    fn from(u: u32) -> Self {
        Value::Uint(u64::from(u))
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display_string_forms() {
        assert_eq!(Value::from("eth0").to_string(), "eth0");
        assert_eq!(Value::from(-4i64).to_string(), "-4");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::Empty.to_string(), "");
        assert_eq!(
            Value::Decimal(Decimal::from_str("1.50").unwrap()).to_string(),
            "1.50"
        );
    }

    #[test]
    fn test_display_list() {
        let v = Value::from(vec![1i64, 2, 3]);
        assert_eq!(v.to_string(), "[1, 2, 3]");
    }
}
