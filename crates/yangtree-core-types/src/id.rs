//! Arena identifiers
//!
//! Every element of a tree lives in one owning arena; parents, children and
//! registry entries refer to each other through these indices rather than
//! through owning pointers.

use serde::{Deserialize, Serialize};

/// Index of an element inside its tree's arena
///
/// Slots are never reused within one tree, so a stale id held after its
/// element was removed resolves to "not found" instead of a different element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId(usize);

impl ElementId {
    /// Wrap a raw arena slot index
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw arena slot index
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
