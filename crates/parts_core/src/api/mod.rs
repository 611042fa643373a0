//! RPC message types and status taxonomy.
//!
//! # Responsibility
//! - Define versioned request/response envelopes for each part operation.
//! - Define the status codes callers can observe.
//!
//! # Invariants
//! - Message types carry no storage state (no deletion marker).

mod status;
pub mod v1;

pub use status::{Code, Status};
