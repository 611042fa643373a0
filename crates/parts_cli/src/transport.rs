//! Line-delimited JSON transport for the part service.
//!
//! # Responsibility
//! - Decode one call per input line and dispatch it to `PartServiceApi`.
//! - Encode one reply per output line: `{"ok":...}` or `{"error":...}`.
//!
//! # Invariants
//! - A malformed line yields an error reply; it never stops the loop.
//! - Every call runs under its own `CallContext`.
//! - Output is flushed after each reply.

use log::{debug, info};
use parts_core::api::v1::{
    CreateRequest, DeleteRequest, ReadAllRequest, ReadRequest, UpdateRequest,
};
use parts_core::{CallContext, PartServiceApi, Status};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{self, BufRead, Write};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Method {
    Create,
    Read,
    Update,
    Delete,
    ReadAll,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    method: Method,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Reply {
    Ok(Value),
    Error(Status),
}

/// Counters reported when the loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeStats {
    pub calls: u64,
    pub errors: u64,
}

/// Serves calls until `input` is exhausted.
///
/// # Errors
/// Returns I/O errors from reading `input` or writing `output`. Call failures
/// are replies, not errors.
pub fn serve<S: PartServiceApi>(
    service: &S,
    input: impl BufRead,
    mut output: impl Write,
    call_timeout: Option<Duration>,
) -> io::Result<ServeStats> {
    let mut stats = ServeStats::default();
    info!("event=serve_start module=transport status=ok");

    for line in input.split(b'\n') {
        let line = line?;
        let line = line.trim_ascii();
        if line.is_empty() {
            continue;
        }

        let ctx = call_timeout.map_or_else(CallContext::background, CallContext::with_timeout);
        let reply = dispatch(service, &ctx, line);
        stats.calls += 1;
        if matches!(reply, Reply::Error(_)) {
            stats.errors += 1;
        }

        serde_json::to_writer(&mut output, &reply)?;
        output.write_all(b"\n")?;
        output.flush()?;
    }

    info!(
        "event=serve_stop module=transport status=ok calls={} errors={}",
        stats.calls, stats.errors
    );
    Ok(stats)
}

fn dispatch<S: PartServiceApi>(service: &S, ctx: &CallContext, line: &[u8]) -> Reply {
    let envelope: Envelope = match serde_json::from_slice(line) {
        Ok(envelope) => envelope,
        Err(err) => {
            debug!("event=decode module=transport status=error error={err}");
            return Reply::Error(Status::unknown(format!("failed to decode request: {err}")));
        }
    };

    let params = match envelope.params {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };

    match envelope.method {
        Method::Create => call(params, |request: CreateRequest| service.create(ctx, request)),
        Method::Read => call(params, |request: ReadRequest| service.read(ctx, request)),
        Method::Update => call(params, |request: UpdateRequest| service.update(ctx, request)),
        Method::Delete => call(params, |request: DeleteRequest| service.delete(ctx, request)),
        Method::ReadAll => {
            call(params, |request: ReadAllRequest| service.read_all(ctx, request))
        }
    }
}

fn call<Req, Resp>(params: Value, handler: impl FnOnce(Req) -> Result<Resp, Status>) -> Reply
where
    Req: DeserializeOwned,
    Resp: Serialize,
{
    let request = match serde_json::from_value(params) {
        Ok(request) => request,
        Err(err) => {
            return Reply::Error(Status::unknown(format!("failed to decode request: {err}")));
        }
    };

    match handler(request) {
        Ok(response) => match serde_json::to_value(response) {
            Ok(value) => Reply::Ok(value),
            Err(err) => Reply::Error(Status::unknown(format!(
                "failed to encode response: {err}"
            ))),
        },
        Err(status) => Reply::Error(status),
    }
}
