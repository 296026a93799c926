/*!
Response enveloping and notification framing.

Every successful handler result is wrapped as `{result, meta}` before it
lands in the JSON-RPC `result` field; diagnostics may opt out. Probe-to-
client notifications are JSON-RPC messages without an `id`.
*/

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Value};

use crate::types::ProbeError;

/// Milliseconds since the Unix epoch.
pub(crate) fn timestamp_ms() -> u64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .unwrap_or_default()
    .as_millis() as u64
}

/// Wrap a handler result in the standard envelope.
pub(crate) fn envelope(result: Value, object_id: Option<&str>) -> Value {
  let mut meta = json!({ "timestamp": timestamp_ms() });
  if let Some(id) = object_id {
    meta["objectId"] = json!(id);
  }
  json!({ "result": result, "meta": meta })
}

/// One outbound notification frame (no `id`).
pub(crate) fn notification(method: &str, params: Value) -> String {
  json!({
    "jsonrpc": "2.0",
    "method": method,
    "params": params,
  })
  .to_string()
}

/// JSON-RPC error member for a probe error.
pub(crate) fn error_object(err: &ProbeError) -> Value {
  let mut obj = json!({
    "code": err.code(),
    "message": err.to_string(),
  });
  if let Some(data) = err.data() {
    obj["data"] = data;
  }
  obj
}

pub(crate) fn response_ok(id: &Value, result: Value) -> String {
  json!({ "jsonrpc": "2.0", "id": id, "result": result }).to_string()
}

pub(crate) fn response_err(id: &Value, err: &ProbeError) -> String {
  json!({ "jsonrpc": "2.0", "id": id, "error": error_object(err) }).to_string()
}
