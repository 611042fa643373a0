//! Core domain logic for the part catalogue service.
//! This crate owns the RPC contract, the storage schema, and the mapping of
//! storage outcomes onto caller-facing statuses.

pub mod api;
pub mod context;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use api::v1::{PartServiceApi, API_VERSION};
pub use api::{Code, Status};
pub use context::{CallContext, Interrupted};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::part::{Part, PartDraft, PartId};
pub use model::timestamp::{Timestamp, TimestampError};
pub use repo::part_repo::{PartRepository, RepoError, RepoResult, SqlitePartRepository};
pub use service::part_service::PartService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
