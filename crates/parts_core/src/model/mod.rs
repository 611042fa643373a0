//! Domain model for the part catalogue.
//!
//! # Responsibility
//! - Define the `Part` record surfaced to callers and its mutable subset.
//! - Provide the timestamp representation used on the wire.
//!
//! # Invariants
//! - Deletion is a soft-delete marker in storage and never appears in the
//!   model returned to callers.

pub mod part;
pub mod timestamp;
