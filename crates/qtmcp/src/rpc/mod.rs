/*!
JSON-RPC 2.0 dispatch.

One text frame in, one response out. Requests are validated, routed by
method name through a handler table, and their results wrapped in the
response envelope centrally; handlers return unwrapped values. Messages
without an `id` are notifications and never produce a response, even on
error.
*/

pub(crate) mod envelope;

use std::collections::HashMap;

use serde_json::Value;

use crate::types::{ProbeError, ProbeResult};

/// Successful handler output before enveloping.
#[derive(Debug, Clone)]
pub(crate) struct Reply {
  pub(crate) value: Value,
  pub(crate) object_id: Option<String>,
  pub(crate) raw: bool,
}

impl Reply {
  /// A result to be wrapped in the standard envelope.
  pub(crate) fn new(value: Value) -> Self {
    Self {
      value,
      object_id: None,
      raw: false,
    }
  }

  /// A result about one object; its id lands in `meta.objectId`.
  pub(crate) fn for_object(value: Value, object_id: String) -> Self {
    Self {
      value,
      object_id: Some(object_id),
      raw: false,
    }
  }

  /// A diagnostic result that bypasses the envelope.
  pub(crate) fn raw(value: Value) -> Self {
    Self {
      value,
      object_id: None,
      raw: true,
    }
  }
}

pub(crate) type Handler = Box<dyn Fn(&Value) -> ProbeResult<Reply> + Send + Sync>;

/// Method table routing requests to handlers.
#[derive(Default)]
pub(crate) struct Dispatcher {
  methods: HashMap<&'static str, Handler>,
  aliases: HashMap<&'static str, &'static str>,
}

impl std::fmt::Debug for Dispatcher {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Dispatcher")
      .field("methods", &self.methods.len())
      .field("aliases", &self.aliases.len())
      .finish()
  }
}

impl Dispatcher {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn register(&mut self, name: &'static str, handler: Handler) {
    debug_assert!(
      !self.methods.contains_key(name),
      "method {name} registered twice"
    );
    self.methods.insert(name, handler);
  }

  /// Accept `legacy` as a deprecated spelling of `canonical`.
  pub(crate) fn alias(&mut self, legacy: &'static str, canonical: &'static str) {
    self.aliases.insert(legacy, canonical);
  }

  /// Registered canonical method names, sorted.
  pub(crate) fn method_names(&self) -> Vec<&'static str> {
    let mut names: Vec<_> = self.methods.keys().copied().collect();
    names.sort_unstable();
    names
  }

  /// Process one frame. `None` means no response (the frame was a
  /// notification).
  pub(crate) fn handle_message(&self, text: &str) -> Option<String> {
    let parsed: Value = match serde_json::from_str(text) {
      Ok(v) => v,
      Err(e) => {
        return Some(envelope::response_err(
          &Value::Null,
          &ProbeError::Parse(e.to_string()),
        ));
      }
    };

    let id = parsed.get("id").cloned();
    let version_ok = parsed.get("jsonrpc").and_then(Value::as_str) == Some("2.0");
    let Some(method) = parsed.get("method").and_then(Value::as_str) else {
      return Some(envelope::response_err(
        &Value::Null,
        &ProbeError::InvalidRequest("missing method".into()),
      ));
    };
    if !version_ok {
      return Some(envelope::response_err(
        &Value::Null,
        &ProbeError::InvalidRequest("missing jsonrpc: \"2.0\"".into()),
      ));
    }

    let canonical = self.aliases.get(method).copied().unwrap_or(method);
    let Some(handler) = self.methods.get(canonical) else {
      let id = id?;
      return Some(envelope::response_err(
        &id,
        &ProbeError::UnknownMethod(method.to_owned()),
      ));
    };

    let params = parsed.get("params").cloned().unwrap_or(Value::Null);
    let outcome = handler(&params);

    // Notifications are fire-and-forget.
    let id = id?;
    Some(match outcome {
      Ok(reply) => {
        let result = if reply.raw {
          reply.value
        } else {
          envelope::envelope(reply.value, reply.object_id.as_deref())
        };
        envelope::response_ok(&id, result)
      }
      Err(err) => envelope::response_err(&id, &err),
    })
  }
}

// === Param extraction helpers shared by all API surfaces ===

pub(crate) fn str_param<'a>(params: &'a Value, name: &str) -> ProbeResult<&'a str> {
  opt_str_param(params, name)?
    .ok_or_else(|| ProbeError::InvalidParams(format!("missing parameter {name:?}")))
}

pub(crate) fn opt_str_param<'a>(params: &'a Value, name: &str) -> ProbeResult<Option<&'a str>> {
  match params.get(name) {
    None | Some(Value::Null) => Ok(None),
    Some(Value::String(s)) => Ok(Some(s)),
    Some(_) => Err(ProbeError::InvalidParams(format!(
      "parameter {name:?} must be a string"
    ))),
  }
}

pub(crate) fn f64_param(params: &Value, name: &str) -> ProbeResult<f64> {
  opt_f64_param(params, name)?
    .ok_or_else(|| ProbeError::InvalidParams(format!("missing parameter {name:?}")))
}

pub(crate) fn opt_f64_param(params: &Value, name: &str) -> ProbeResult<Option<f64>> {
  match params.get(name) {
    None | Some(Value::Null) => Ok(None),
    Some(v) => v.as_f64().map(Some).ok_or_else(|| {
      ProbeError::InvalidParams(format!("parameter {name:?} must be a number"))
    }),
  }
}

pub(crate) fn opt_u64_param(params: &Value, name: &str) -> ProbeResult<Option<u64>> {
  match params.get(name) {
    None | Some(Value::Null) => Ok(None),
    Some(v) => v.as_u64().map(Some).ok_or_else(|| {
      ProbeError::InvalidParams(format!(
        "parameter {name:?} must be a non-negative integer"
      ))
    }),
  }
}

pub(crate) fn opt_bool_param(params: &Value, name: &str) -> ProbeResult<Option<bool>> {
  match params.get(name) {
    None | Some(Value::Null) => Ok(None),
    Some(v) => v.as_bool().map(Some).ok_or_else(|| {
      ProbeError::InvalidParams(format!("parameter {name:?} must be a boolean"))
    }),
  }
}

pub(crate) fn value_param<'a>(params: &'a Value, name: &str) -> ProbeResult<&'a Value> {
  params
    .get(name)
    .ok_or_else(|| ProbeError::InvalidParams(format!("missing parameter {name:?}")))
}
