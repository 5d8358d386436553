//! Restricted scalar types
//!
//! A `RestrictedType<T>` is a factory for `Restricted<T>` values: a scalar of
//! base type `T` paired with the restrictions it was constructed under. Every
//! construction and every later assignment is checked eagerly against all of
//! the restrictions; a rejected value is never stored.
//!
//! Three restriction kinds are supported, mirroring the YANG statements they
//! model:
//!
//! - **Pattern**: one or more regular expressions, each matched against the
//!   whole string form of the value. All patterns must match.
//! - **Range**: `low..high` (inclusive), with YANG's `|` alternatives and
//!   single-value parts. Only numeric bases may carry a range.
//! - **Enumeration**: a set of symbolic names with assigned integers.

use indexmap::IndexMap;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::errors::{Result, YangError};
use crate::value::Value;

/// A primitive that restrictions can be applied to
pub trait ScalarBase: Clone + PartialEq + PartialOrd + fmt::Display + fmt::Debug {
    /// Name used in type-mismatch errors
    const TYPE_NAME: &'static str;

    /// Whether range restrictions are meaningful for this base
    const NUMERIC: bool;

    /// Parse a restriction bound
    fn parse_scalar(text: &str) -> Option<Self>;

    /// Coerce a raw value into this base, if representable
    fn from_value(raw: &Value) -> Option<Self>;

    /// Convert back into a raw value
    fn to_value(&self) -> Value;
}

impl ScalarBase for String {
    const TYPE_NAME: &'static str = "string";
    const NUMERIC: bool = false;

    fn parse_scalar(text: &str) -> Option<Self> {
        Some(text.to_string())
    }

    fn from_value(raw: &Value) -> Option<Self> {
        match raw {
            Value::Empty | Value::List(_) | Value::Map(_) => None,
            other => Some(other.to_string()),
        }
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl ScalarBase for i64 {
    const TYPE_NAME: &'static str = "int64";
    const NUMERIC: bool = true;

    fn parse_scalar(text: &str) -> Option<Self> {
        text.trim().parse().ok()
    }

    fn from_value(raw: &Value) -> Option<Self> {
        match raw {
            Value::Int(i) => Some(*i),
            Value::Uint(u) => i64::try_from(*u).ok(),
            Value::Decimal(d) if d.fract().is_zero() => d.to_i64(),
            Value::String(s) => Self::parse_scalar(s),
            _ => None,
        }
    }

    fn to_value(&self) -> Value {
        Value::Int(*self)
    }
}

impl ScalarBase for u64 {
    const TYPE_NAME: &'static str = "uint64";
    const NUMERIC: bool = true;

    fn parse_scalar(text: &str) -> Option<Self> {
        text.trim().parse().ok()
    }

    fn from_value(raw: &Value) -> Option<Self> {
        match raw {
            Value::Uint(u) => Some(*u),
            Value::Int(i) => u64::try_from(*i).ok(),
            Value::Decimal(d) if d.fract().is_zero() => d.to_u64(),
            Value::String(s) => Self::parse_scalar(s),
            _ => None,
        }
    }

    fn to_value(&self) -> Value {
        Value::Uint(*self)
    }
}

impl ScalarBase for Decimal {
    const TYPE_NAME: &'static str = "decimal";
    const NUMERIC: bool = true;

    fn parse_scalar(text: &str) -> Option<Self> {
        Decimal::from_str(text.trim()).ok()
    }

    fn from_value(raw: &Value) -> Option<Self> {
        match raw {
            Value::Decimal(d) => Some(*d),
            Value::Int(i) => Some(Decimal::from(*i)),
            Value::Uint(u) => Some(Decimal::from(*u)),
            Value::String(s) => Self::parse_scalar(s),
            _ => None,
        }
    }

    fn to_value(&self) -> Value {
        Value::Decimal(*self)
    }
}

// ========== Restrictions ==========

/// Compiled set of anchored patterns
#[derive(Debug, Clone)]
pub struct PatternSet {
    sources: Vec<String>,
    compiled: Vec<Regex>,
}

impl PatternSet {
    /// Compile `patterns`, anchoring each at both ends
    ///
    /// # Errors
    ///
    /// Returns `InvalidRestriction` if a pattern fails to compile.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut sources = Vec::with_capacity(patterns.len());
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let anchored = anchor(pattern.as_ref());
            let regex = Regex::new(&anchored).map_err(|e| YangError::InvalidRestriction {
                restriction: format!("pattern {}", pattern.as_ref()),
                reason: e.to_string(),
            })?;
            sources.push(anchored);
            compiled.push(regex);
        }
        Ok(Self { sources, compiled })
    }

    /// Anchored pattern sources, in declaration order
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Whether `text` fully matches every pattern
    pub fn matches(&self, text: &str) -> bool {
        self.compiled.iter().all(|re| re.is_match(text))
    }
}

/// Anchor a pattern so it must match the whole input
///
/// Existing `^`/`$` anchors are kept as the outer anchors; the body is
/// grouped so top-level alternation stays inside them.
fn anchor(pattern: &str) -> String {
    let body = pattern.strip_prefix('^').unwrap_or(pattern);
    let body = match body.strip_suffix('$') {
        Some(stripped) if !stripped.ends_with('\\') => stripped,
        _ => body,
    };
    format!("^(?:{})$", body)
}

/// Inclusive numeric intervals, any of which admits a value
#[derive(Debug, Clone)]
pub struct RangeSet<T> {
    source: String,
    parts: Vec<(T, T)>,
}

impl<T: ScalarBase> RangeSet<T> {
    /// Parse a `low..high` range expression
    ///
    /// Whitespace around `..` and `|` is tolerated. Bounds are parsed with the
    /// base type's own parser.
    ///
    /// # Errors
    ///
    /// - `TypeMismatch` if `T` is not numeric
    /// - `InvalidRestriction` if a bound does not parse or `low > high`
    pub fn parse(expr: &str) -> Result<Self> {
        if !T::NUMERIC {
            return Err(YangError::TypeMismatch {
                value: expr.to_string(),
                expected: "numeric base type for a range argument".to_string(),
            });
        }
        let invalid = |reason: String| YangError::InvalidRestriction {
            restriction: format!("range {}", expr),
            reason,
        };

        let mut parts = Vec::new();
        for part in expr.split('|') {
            let part = part.trim();
            let (low, high) = match part.split_once("..") {
                Some((low, high)) => (low.trim(), high.trim()),
                None => (part, part),
            };
            let low = T::parse_scalar(low)
                .ok_or_else(|| invalid(format!("bad lower bound '{}'", low)))?;
            let high = T::parse_scalar(high)
                .ok_or_else(|| invalid(format!("bad upper bound '{}'", high)))?;
            if low > high {
                return Err(invalid(format!("{} is greater than {}", low, high)));
            }
            parts.push((low, high));
        }
        Ok(Self {
            source: expr.to_string(),
            parts,
        })
    }

    /// A single interval from already-typed bounds
    pub fn between(low: T, high: T) -> Self {
        Self {
            source: format!("{}..{}", low, high),
            parts: vec![(low, high)],
        }
    }

    /// Whether `value` lies inside any interval
    pub fn contains(&self, value: &T) -> bool {
        self.parts
            .iter()
            .any(|(low, high)| low <= value && value <= high)
    }

    /// The expression this set was built from
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Enumerated names with their assigned integers
#[derive(Debug, Clone, PartialEq)]
pub struct Enumeration {
    members: IndexMap<String, i64>,
}

impl Enumeration {
    /// Build an enumeration from `(name, explicit value)` pairs in declaration order
    ///
    /// Explicit values are reserved first. Every member without one then gets,
    /// in declaration order, the smallest non-negative integer not yet used.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<i64>)>,
        S: Into<String>,
    {
        let entries: Vec<(String, Option<i64>)> = entries
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .collect();

        let mut used: BTreeSet<i64> = entries.iter().filter_map(|(_, v)| *v).collect();
        let mut next = 0i64;
        let mut members = IndexMap::with_capacity(entries.len());
        for (name, explicit) in entries {
            let assigned = match explicit {
                Some(value) => value,
                None => {
                    while used.contains(&next) {
                        next += 1;
                    }
                    used.insert(next);
                    next
                }
            };
            members.insert(name, assigned);
        }
        Self { members }
    }

    /// Whether `name` is a declared member
    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Integer assigned to `name`
    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.members.get(name).copied()
    }

    /// Member names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }
}

/// One restriction on a scalar of base `T`
#[derive(Debug, Clone)]
pub enum Restriction<T> {
    Pattern(PatternSet),
    Range(RangeSet<T>),
    Enumeration(Enumeration),
}

impl<T: ScalarBase> Restriction<T> {
    /// Pattern restriction over one or more expressions
    ///
    /// # Errors
    ///
    /// Returns `InvalidRestriction` if a pattern fails to compile.
    pub fn pattern<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        PatternSet::new(patterns).map(Restriction::Pattern)
    }

    /// Range restriction parsed from `low..high`
    ///
    /// # Errors
    ///
    /// See [`RangeSet::parse`].
    pub fn range(expr: &str) -> Result<Self> {
        RangeSet::parse(expr).map(Restriction::Range)
    }

    /// Enumeration restriction from `(name, explicit value)` pairs
    pub fn enumeration<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<i64>)>,
        S: Into<String>,
    {
        Restriction::Enumeration(Enumeration::new(entries))
    }

    /// Whether `value` satisfies this restriction
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Restriction::Pattern(patterns) => patterns.matches(&value.to_string()),
            Restriction::Range(range) => range.contains(value),
            Restriction::Enumeration(members) => members.contains(&value.to_string()),
        }
    }
}

impl<T> fmt::Display for Restriction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Restriction::Pattern(p) => write!(f, "pattern {:?}", p.sources),
            Restriction::Range(r) => write!(f, "range {}", r.source),
            Restriction::Enumeration(e) => {
                let names: Vec<&str> = e.members.keys().map(String::as_str).collect();
                write!(f, "enumeration {:?}", names)
            }
        }
    }
}

// ========== Factory and Instances ==========

/// Factory for restricted values of base `T`
#[derive(Debug, Clone)]
pub struct RestrictedType<T> {
    restrictions: Rc<Vec<Restriction<T>>>,
}

impl<T: ScalarBase> RestrictedType<T> {
    /// An unrestricted factory (any value of `T`)
    pub fn new() -> Self {
        Self {
            restrictions: Rc::new(Vec::new()),
        }
    }

    /// Add a restriction; values must satisfy every restriction added
    pub fn with(mut self, restriction: Restriction<T>) -> Self {
        Rc::make_mut(&mut self.restrictions).push(restriction);
        self
    }

    /// Restrictions in the order they were added
    pub fn restrictions(&self) -> &[Restriction<T>] {
        &self.restrictions
    }

    /// Whether any restriction is an enumeration
    pub fn is_enumeration(&self) -> bool {
        self.restrictions
            .iter()
            .any(|r| matches!(r, Restriction::Enumeration(_)))
    }

    /// Coerce and validate `raw` without constructing an instance
    ///
    /// # Errors
    ///
    /// - `TypeMismatch` if `raw` cannot be represented as `T`
    /// - `ConstraintViolation` naming the first restriction that rejects it
    pub fn check(&self, raw: &Value) -> Result<T> {
        let value = T::from_value(raw).ok_or_else(|| YangError::TypeMismatch {
            value: raw.to_string(),
            expected: T::TYPE_NAME.to_string(),
        })?;
        if let Some(failed) = self.restrictions.iter().find(|r| !r.admits(&value)) {
            return Err(YangError::ConstraintViolation {
                value: value.to_string(),
                restriction: failed.to_string(),
            });
        }
        Ok(value)
    }

    /// Construct a restricted value from `raw`
    ///
    /// # Errors
    ///
    /// See [`RestrictedType::check`].
    pub fn construct(&self, raw: &Value) -> Result<Restricted<T>> {
        let value = self.check(raw)?;
        Ok(Restricted {
            value,
            ty: self.clone(),
        })
    }
}

impl<T: ScalarBase> Default for RestrictedType<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ScalarBase> fmt::Display for RestrictedType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(T::TYPE_NAME)?;
        for r in self.restrictions.iter() {
            write!(f, " {}", r)?;
        }
        Ok(())
    }
}

/// A scalar that satisfied its restrictions when stored
#[derive(Debug, Clone)]
pub struct Restricted<T> {
    value: T,
    ty: RestrictedType<T>,
}

impl<T: ScalarBase> Restricted<T> {
    /// The underlying scalar
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The factory this value was built by
    pub fn restricted_type(&self) -> &RestrictedType<T> {
        &self.ty
    }

    /// Replace the value, re-validating against the same restrictions
    ///
    /// # Errors
    ///
    /// Leaves the current value untouched and returns the validation error.
    pub fn set(&mut self, raw: &Value) -> Result<()> {
        self.value = self.ty.check(raw)?;
        Ok(())
    }

    /// Integer assigned to this value by an enumeration restriction
    pub fn mapped(&self) -> Option<i64> {
        let name = self.value.to_string();
        self.ty.restrictions.iter().find_map(|r| match r {
            Restriction::Enumeration(e) => e.value_of(&name),
            _ => None,
        })
    }

    /// Convert into a raw value
    pub fn to_value(&self) -> Value {
        self.value.to_value()
    }
}

impl<T: PartialEq> PartialEq for Restricted<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: fmt::Display> fmt::Display for Restricted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
