//! Part domain model.
//!
//! # Responsibility
//! - Define the canonical part record returned by reads.
//! - Define the caller-supplied fields accepted by create and update.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused.
//! - `created_at` is assigned by the store and never changes.
//! - The soft-delete marker is storage-only state; a `Part` is always live.

use crate::model::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// Store-assigned part identifier.
pub type PartId = i64;

/// A live part as seen by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    /// Reference to an external manufacturer. Not checked by the core.
    pub manufacturer_id: i64,
    /// Opaque vendor code.
    pub vendor_code: String,
    pub created_at: Timestamp,
}

/// Caller-mutable part fields, shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartDraft {
    pub manufacturer_id: i64,
    pub vendor_code: String,
}

impl PartDraft {
    pub fn new(manufacturer_id: i64, vendor_code: impl Into<String>) -> Self {
        Self {
            manufacturer_id,
            vendor_code: vendor_code.into(),
        }
    }
}
