//! Core types shared across yangtree facilities
//!
//! This crate provides foundational types used by the engine, the error
//! and logging facilities, and by any tree assembler built on top:
//!
//! - **Identifiers**: `ElementId`, the arena index of one tree element
//! - **Schema constants**: Canonical field keys and event names

pub mod id;
pub mod schema;

pub use id::ElementId;
