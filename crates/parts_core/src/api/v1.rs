//! Version 1 of the part service RPC surface.
//!
//! Every request carries the caller's API version in `api`; every response
//! echoes the version the service implements. Request fields default when
//! absent on the wire.

use crate::api::Status;
use crate::context::CallContext;
use crate::model::part::{Part, PartId};
use serde::{Deserialize, Serialize};

/// API version implemented by this module.
pub const API_VERSION: &str = "v1";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateRequest {
    pub api: String,
    pub manufacturer_id: i64,
    pub vendor_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateResponse {
    pub api: String,
    pub id: PartId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadRequest {
    pub api: String,
    pub id: PartId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadResponse {
    pub api: String,
    pub part: Part,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateRequest {
    pub api: String,
    pub id: PartId,
    pub manufacturer_id: i64,
    pub vendor_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub api: String,
    /// Always 1 on success; zero matches are reported as `NotFound`.
    pub updated: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteRequest {
    pub api: String,
    pub id: PartId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub api: String,
    /// Always 1 on success; zero matches are reported as `NotFound`.
    pub deleted: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadAllRequest {
    pub api: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadAllResponse {
    pub api: String,
    /// Live parts. Empty, never absent, when nothing is stored.
    pub parts: Vec<Part>,
}

/// Server side of the part service, one method per RPC.
///
/// Transports decode a request, call the matching method with a per-call
/// context, and encode either the response or the returned [`Status`].
pub trait PartServiceApi {
    fn create(&self, ctx: &CallContext, request: CreateRequest) -> Result<CreateResponse, Status>;
    fn read(&self, ctx: &CallContext, request: ReadRequest) -> Result<ReadResponse, Status>;
    fn update(&self, ctx: &CallContext, request: UpdateRequest) -> Result<UpdateResponse, Status>;
    fn delete(&self, ctx: &CallContext, request: DeleteRequest) -> Result<DeleteResponse, Status>;
    fn read_all(
        &self,
        ctx: &CallContext,
        request: ReadAllRequest,
    ) -> Result<ReadAllResponse, Status>;
}

#[cfg(test)]
mod tests {
    use super::{CreateRequest, ReadAllResponse};

    #[test]
    fn missing_request_fields_take_defaults() {
        let request: CreateRequest =
            serde_json::from_str(r#"{"vendor_code":"X-1"}"#).unwrap();
        assert_eq!(request.api, "");
        assert_eq!(request.manufacturer_id, 0);
        assert_eq!(request.vendor_code, "X-1");
    }

    #[test]
    fn empty_read_all_serializes_an_empty_list() {
        let response = ReadAllResponse {
            api: "v1".to_string(),
            parts: Vec::new(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["parts"], serde_json::json!([]));
    }
}
