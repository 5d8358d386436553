//! yangtree core - runtime type and validation layer for YANG-modelled trees
//!
//! This crate turns compiled schema descriptions into live, constraint
//! enforcing values and containers, including:
//! - Restricted scalars (pattern, range, enumeration) and fixed-precision decimals
//! - Typed leaf-lists and keyed lists with synthetic-key fallback
//! - An element arena with change tracking, choice handling and path registration
//! - Reference (leafref) resolution against the path registry
//!
//! Everything is single-threaded and in-memory; a tree and its path helper
//! must be confined to one thread.

pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod tree;
pub mod types;
pub mod value;

// Macros expand to paths under this re-export
pub use yangtree_core_types;

// Re-export commonly used types
pub use config::CoreConfig;
pub use errors::{ExError, ExErrorKind, Result, YangError};
pub use tree::{
    ChoiceMember, ContainerSchema, Element, ElementSpec, ListSchema, MemoryPathHelper, NodeSchema,
    NodeValue, PathHelper, Registered, SharedPathHelper, Tree,
};
pub use types::{LeafType, LeafValue, ReferenceType, ReferenceValue, TypedListType};
pub use value::Value;
pub use yangtree_core_types::ElementId;
