//! Part use-case service.
//!
//! # Responsibility
//! - Gate every call on the caller's API version.
//! - Delegate persistence to a `PartRepository`, one statement per call.
//! - Translate repository outcomes into versioned responses or `Status`.
//!
//! # Invariants
//! - The version gate runs before any storage access.
//! - Update/Delete matching zero live rows fail with `NotFound`.
//! - Every other failure, including Read of a missing id, is `Unknown`.
//! - The service keeps no per-call state.

use crate::api::v1::{
    CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, PartServiceApi, ReadAllRequest,
    ReadAllResponse, ReadRequest, ReadResponse, UpdateRequest, UpdateResponse, API_VERSION,
};
use crate::api::{Code, Status};
use crate::context::CallContext;
use crate::model::part::{PartDraft, PartId};
use crate::repo::part_repo::{PartRepository, RepoError};
use log::{debug, error, info, warn};
use std::time::Instant;

/// Part service over an injected repository.
pub struct PartService<R: PartRepository> {
    repo: R,
}

impl<R: PartRepository> PartService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the repository this service delegates to.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn check_api(&self, requested: &str) -> Result<(), Status> {
        if !requested.is_empty() && requested != API_VERSION {
            return Err(Status::unimplemented(format!(
                "unsupported API version: service implements API version '{API_VERSION}', but asked for '{requested}'"
            )));
        }
        Ok(())
    }

    fn create_inner(
        &self,
        ctx: &CallContext,
        request: CreateRequest,
    ) -> Result<CreateResponse, Status> {
        self.check_api(&request.api)?;

        let draft = PartDraft::new(request.manufacturer_id, request.vendor_code);
        let id = self
            .repo
            .insert_part(ctx, &draft)
            .map_err(|err| Status::unknown(format!("failed to insert data into Part: {err}")))?;

        Ok(CreateResponse {
            api: API_VERSION.to_string(),
            id,
        })
    }

    fn read_inner(&self, ctx: &CallContext, request: ReadRequest) -> Result<ReadResponse, Status> {
        self.check_api(&request.api)?;

        let part = match self.repo.find_live_part(ctx, request.id) {
            Ok(Some(part)) => part,
            Ok(None) => {
                return Err(Status::unknown(format!(
                    "failed to select fields from Part: no live row with ID='{}'",
                    request.id
                )));
            }
            Err(err @ RepoError::InvalidTimestamp { .. }) => {
                return Err(invalid_created_at(&err));
            }
            Err(err) => {
                return Err(Status::unknown(format!(
                    "failed to select fields from Part: {err}"
                )));
            }
        };

        Ok(ReadResponse {
            api: API_VERSION.to_string(),
            part,
        })
    }

    fn update_inner(
        &self,
        ctx: &CallContext,
        request: UpdateRequest,
    ) -> Result<UpdateResponse, Status> {
        self.check_api(&request.api)?;

        let draft = PartDraft::new(request.manufacturer_id, request.vendor_code);
        let changed = self
            .repo
            .update_live_part(ctx, request.id, &draft)
            .map_err(|err| Status::unknown(format!("failed to update Part: {err}")))?;
        let updated = affected_rows(changed, request.id)?;

        Ok(UpdateResponse {
            api: API_VERSION.to_string(),
            updated,
        })
    }

    fn delete_inner(
        &self,
        ctx: &CallContext,
        request: DeleteRequest,
    ) -> Result<DeleteResponse, Status> {
        self.check_api(&request.api)?;

        let changed = self
            .repo
            .soft_delete_part(ctx, request.id)
            .map_err(|err| Status::unknown(format!("failed to delete Part: {err}")))?;
        let deleted = affected_rows(changed, request.id)?;

        Ok(DeleteResponse {
            api: API_VERSION.to_string(),
            deleted,
        })
    }

    fn read_all_inner(
        &self,
        ctx: &CallContext,
        request: ReadAllRequest,
    ) -> Result<ReadAllResponse, Status> {
        self.check_api(&request.api)?;

        let parts = self.repo.list_live_parts(ctx).map_err(|err| match err {
            RepoError::RowScan(_) => {
                Status::unknown(format!("failed to retrieve values from Part: {err}"))
            }
            RepoError::Cursor(_) | RepoError::ScanInterrupted(_) => {
                Status::unknown(format!("failed to retrieve data from Part: {err}"))
            }
            RepoError::InvalidTimestamp { .. } => invalid_created_at(&err),
            _ => Status::unknown(format!("failed to select from Part: {err}")),
        })?;

        Ok(ReadAllResponse {
            api: API_VERSION.to_string(),
            parts,
        })
    }
}

impl<R: PartRepository> PartServiceApi for PartService<R> {
    fn create(&self, ctx: &CallContext, request: CreateRequest) -> Result<CreateResponse, Status> {
        let started_at = Instant::now();
        let result = self.create_inner(ctx, request);
        log_call("create", started_at, &result);
        result
    }

    fn read(&self, ctx: &CallContext, request: ReadRequest) -> Result<ReadResponse, Status> {
        let started_at = Instant::now();
        let result = self.read_inner(ctx, request);
        log_call("read", started_at, &result);
        result
    }

    fn update(&self, ctx: &CallContext, request: UpdateRequest) -> Result<UpdateResponse, Status> {
        let started_at = Instant::now();
        let result = self.update_inner(ctx, request);
        log_call("update", started_at, &result);
        result
    }

    fn delete(&self, ctx: &CallContext, request: DeleteRequest) -> Result<DeleteResponse, Status> {
        let started_at = Instant::now();
        let result = self.delete_inner(ctx, request);
        log_call("delete", started_at, &result);
        result
    }

    fn read_all(
        &self,
        ctx: &CallContext,
        request: ReadAllRequest,
    ) -> Result<ReadAllResponse, Status> {
        let started_at = Instant::now();
        let result = self.read_all_inner(ctx, request);
        if let Ok(response) = &result {
            debug!(
                "event=rpc_call module=service method=read_all rows={}",
                response.parts.len()
            );
        }
        log_call("read_all", started_at, &result);
        result
    }
}

/// Converts an affected-row count into the response value.
///
/// Zero rows means the id has no live row.
fn affected_rows(changed: usize, id: PartId) -> Result<i64, Status> {
    let rows = i64::try_from(changed).map_err(|err| {
        Status::unknown(format!("failed to retrieve rows affected value: {err}"))
    })?;

    if rows == 0 {
        return Err(Status::not_found(format!("Part with ID='{id}' is not found")));
    }

    Ok(rows)
}

fn invalid_created_at(err: &RepoError) -> Status {
    Status::unknown(format!("created_at field has invalid format: {err}"))
}

fn log_call<T>(method: &'static str, started_at: Instant, result: &Result<T, Status>) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => info!(
            "event=rpc_call module=service method={method} status=ok duration_ms={duration_ms}"
        ),
        Err(status) if status.code() == Code::Unknown => error!(
            "event=rpc_call module=service method={method} status=error duration_ms={duration_ms} error_code={}",
            status.code()
        ),
        Err(status) => warn!(
            "event=rpc_call module=service method={method} status=error duration_ms={duration_ms} error_code={}",
            status.code()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::affected_rows;
    use crate::api::Code;

    #[test]
    fn affected_rows_zero_is_not_found() {
        let status = affected_rows(0, 42).unwrap_err();
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "Part with ID='42' is not found");
    }

    #[test]
    fn affected_rows_one_is_echoed() {
        assert_eq!(affected_rows(1, 42), Ok(1));
    }

    #[test]
    fn affected_rows_overflow_is_unknown() {
        let status = affected_rows(usize::MAX, 42).unwrap_err();
        assert_eq!(status.code(), Code::Unknown);
        assert!(status
            .message()
            .starts_with("failed to retrieve rows affected value"));
    }
}
