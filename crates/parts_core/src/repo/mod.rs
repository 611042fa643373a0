//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract the part service depends on.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Reads only ever return live rows (`deleted_at IS NULL`).
//! - Writes report affected-row counts; deciding what a zero count means is
//!   left to the caller.

pub mod part_repo;
