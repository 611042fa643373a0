//! Service layer for part use-cases.
//!
//! # Responsibility
//! - Orchestrate repository calls into RPC-shaped operations.
//! - Own the caller-facing error taxonomy mapping.

pub mod part_service;
