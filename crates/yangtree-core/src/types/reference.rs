//! Leafref types
//!
//! A `ReferenceType` only describes the reference; resolving it needs the
//! path registry and the referencing element, so construction happens on
//! the tree (see `Tree::resolve_reference`).

use std::fmt;

use crate::value::Value;

/// A leaf whose value is defined by another node of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceType {
    path: String,
    require_instance: bool,
}

impl ReferenceType {
    /// Reference to `path` (absolute, or relative to the referencing leaf)
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            require_instance: false,
        }
    }

    /// Require the value to name an existing target
    pub fn require_instance(mut self, require: bool) -> Self {
        self.require_instance = require;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn requires_instance(&self) -> bool {
        self.require_instance
    }

    /// Name of the referenced leaf: the last path segment without predicate
    pub fn leaf_name(&self) -> &str {
        let last = self.path.rsplit('/').next().unwrap_or(&self.path);
        last.split('[').next().unwrap_or(last)
    }
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "leafref {}", self.path)
    }
}

/// A constructed reference
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceValue {
    /// Live alias of the single leaf at `path`; reads re-resolve
    Pointer { path: String },
    /// Value validated against existing targets (`None` when unset)
    Checked(Option<Value>),
    /// Value stored verbatim without an existence check
    Opaque(Option<Value>),
}

impl ReferenceValue {
    /// Stored value of a non-pointer reference
    pub fn stored(&self) -> Option<&Value> {
        match self {
            ReferenceValue::Pointer { .. } => None,
            ReferenceValue::Checked(v) | ReferenceValue::Opaque(v) => v.as_ref(),
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, ReferenceValue::Pointer { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_name_strips_predicate() {
        assert_eq!(ReferenceType::new("/a/b/c").leaf_name(), "c");
        assert_eq!(ReferenceType::new("../peer[name=x]").leaf_name(), "peer");
        assert_eq!(ReferenceType::new("local").leaf_name(), "local");
    }

    #[test]
    fn test_require_instance_defaults_off() {
        let ty = ReferenceType::new("/a");
        assert!(!ty.requires_instance());
        assert!(ty.require_instance(true).requires_instance());
    }
}
