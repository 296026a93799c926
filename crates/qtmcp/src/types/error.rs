/*!
Error taxonomy for probe operations.

Every failure a client can observe maps to a distinct JSON-RPC error code.
Reserved JSON-RPC codes sit at the top; domain errors are grouped in decade
ranges below -32000.
*/

use serde_json::{json, Value};

/// Errors that can occur during probe operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProbeError {
  #[error("parse error: {0}")]
  Parse(String),

  #[error("invalid request: {0}")]
  InvalidRequest(String),

  #[error("method not found: {0}")]
  UnknownMethod(String),

  #[error("invalid params: {0}")]
  InvalidParams(String),

  #[error("internal error: {0}")]
  Internal(String),

  #[error("object not found: {0}")]
  ObjectNotFound(String),

  #[error("object is no longer alive: {0}")]
  ObjectStale(String),

  #[error("object is not a widget: {0}")]
  NotAWidget(String),

  #[error("property not found: {name} on {object}")]
  PropertyNotFound { object: String, name: String },

  #[error("property is read-only: {name} on {object}")]
  PropertyReadOnly { object: String, name: String },

  #[error("cannot convert value for property {name} (expected {expected})")]
  PropertyTypeMismatch { name: String, expected: String },

  #[error("method not found: {name} on {object}")]
  NoSuchMethod { object: String, name: String },

  #[error("method invocation failed: {name}: {reason}")]
  InvocationFailed { name: String, reason: String },

  #[error("method argument mismatch: {name}: {reason}")]
  ArgumentMismatch { name: String, reason: String },

  #[error("signal not found: {name} on {object}")]
  SignalNotFound { object: String, name: String },

  #[error("subscription not found: {0}")]
  SubscriptionNotFound(String),

  #[error("widget is not visible: {0}")]
  WidgetNotVisible(String),

  #[error("widget is not enabled: {0}")]
  WidgetNotEnabled(String),

  #[error("screen capture failed: {0}")]
  CaptureFailed(String),

  #[error("name not registered: {0}")]
  NameNotFound(String),

  #[error("name already registered: {0}")]
  NameExists(String),

  #[error("failed to load name map: {0}")]
  NameLoadError(String),

  #[error("no active window")]
  NoActiveWindow,

  #[error("coordinate ({x}, {y}) outside window {width}x{height}")]
  CoordinateOutOfBounds {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
  },

  #[error("no focused widget")]
  NoFocusedWidget,

  #[error("cannot parse key: {0}")]
  KeyParse(String),

  #[error("ref not found: {0}")]
  RefNotFound(String),

  #[error("ref is no longer valid: {0}")]
  RefStale(String),

  #[error("no input strategy applies: {0}")]
  FormInputUnsupported(String),

  #[error("accessibility tree too large: {0}")]
  TreeTooLarge(String),

  #[error("too many matches: {count} (cap {cap})")]
  FindTooManyResults { count: usize, cap: usize },

  #[error("cannot perform navigation: {0}")]
  NavigateInvalid(String),

  #[error("console capture is not installed")]
  ConsoleNotAvailable,

  #[error("declarative scene introspection is not available")]
  QmlNotAvailable,

  #[error("declarative context not found: {0}")]
  QmlContextNotFound(String),

  #[error("object is not a scene item: {0}")]
  NotQmlItem(String),

  #[error("model not found: {0}")]
  ModelNotFound(String),

  #[error("model index ({row}, {column}) outside {row_count}x{column_count}")]
  ModelIndexOutOfBounds {
    row: usize,
    column: usize,
    row_count: usize,
    column_count: usize,
  },

  #[error("model role not found: {0}")]
  RoleNotFound(String),

  #[error("object is not a model: {0}")]
  NotAModel(String),
}

/// Result type for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

impl ProbeError {
  /// The JSON-RPC error code for this error.
  pub fn code(&self) -> i32 {
    match self {
      Self::Parse(_) => -32700,
      Self::InvalidRequest(_) => -32600,
      Self::UnknownMethod(_) => -32601,
      Self::InvalidParams(_) => -32602,
      Self::Internal(_) => -32603,
      Self::ObjectNotFound(_) => -32001,
      Self::ObjectStale(_) => -32002,
      Self::NotAWidget(_) => -32003,
      Self::PropertyNotFound { .. } => -32010,
      Self::PropertyReadOnly { .. } => -32011,
      Self::PropertyTypeMismatch { .. } => -32012,
      Self::NoSuchMethod { .. } => -32020,
      Self::InvocationFailed { .. } => -32021,
      Self::ArgumentMismatch { .. } => -32022,
      Self::SignalNotFound { .. } => -32030,
      Self::SubscriptionNotFound(_) => -32031,
      Self::WidgetNotVisible(_) => -32040,
      Self::WidgetNotEnabled(_) => -32041,
      Self::CaptureFailed(_) => -32042,
      Self::NameNotFound(_) => -32050,
      Self::NameExists(_) => -32051,
      Self::NameLoadError(_) => -32052,
      Self::NoActiveWindow => -32060,
      Self::CoordinateOutOfBounds { .. } => -32061,
      Self::NoFocusedWidget => -32062,
      Self::KeyParse(_) => -32063,
      Self::RefNotFound(_) => -32070,
      Self::RefStale(_) => -32071,
      Self::FormInputUnsupported(_) => -32072,
      Self::TreeTooLarge(_) => -32073,
      Self::FindTooManyResults { .. } => -32074,
      Self::NavigateInvalid(_) => -32075,
      Self::ConsoleNotAvailable => -32076,
      Self::QmlNotAvailable => -32080,
      Self::QmlContextNotFound(_) => -32081,
      Self::NotQmlItem(_) => -32082,
      Self::ModelNotFound(_) => -32090,
      Self::ModelIndexOutOfBounds { .. } => -32091,
      Self::RoleNotFound(_) => -32092,
      Self::NotAModel(_) => -32093,
    }
  }

  /// Structured context attached to the JSON-RPC error object.
  pub fn data(&self) -> Option<Value> {
    match self {
      Self::UnknownMethod(m) => Some(json!({ "method": m })),
      Self::ObjectNotFound(id) | Self::ObjectStale(id) | Self::NotAWidget(id) => {
        Some(json!({ "objectId": id }))
      }
      Self::PropertyNotFound { object, name } | Self::PropertyReadOnly { object, name } => {
        Some(json!({ "objectId": object, "property": name }))
      }
      Self::PropertyTypeMismatch { name, expected } => {
        Some(json!({ "property": name, "expectedType": expected }))
      }
      Self::NoSuchMethod { object, name } => {
        Some(json!({ "objectId": object, "methodName": name }))
      }
      Self::InvocationFailed { name, reason } | Self::ArgumentMismatch { name, reason } => {
        Some(json!({ "methodName": name, "hint": reason }))
      }
      Self::SignalNotFound { object, name } => Some(json!({ "objectId": object, "signal": name })),
      Self::SubscriptionNotFound(id) => Some(json!({ "subscriptionId": id })),
      Self::WidgetNotVisible(id) | Self::WidgetNotEnabled(id) => Some(json!({ "objectId": id })),
      Self::NameNotFound(n) | Self::NameExists(n) => Some(json!({ "name": n })),
      Self::CoordinateOutOfBounds {
        x,
        y,
        width,
        height,
      } => Some(json!({
        "x": x,
        "y": y,
        "windowWidth": width,
        "windowHeight": height,
      })),
      Self::KeyParse(token) => Some(json!({ "token": token })),
      Self::RefNotFound(r) | Self::RefStale(r) => Some(json!({ "ref": r })),
      Self::FindTooManyResults { count, cap } => Some(json!({ "count": count, "cap": cap })),
      Self::NavigateInvalid(action) => Some(json!({ "action": action })),
      Self::NotQmlItem(id) | Self::ModelNotFound(id) | Self::NotAModel(id) => {
        Some(json!({ "objectId": id }))
      }
      Self::ModelIndexOutOfBounds {
        row,
        column,
        row_count,
        column_count,
      } => Some(json!({
        "row": row,
        "column": column,
        "rowCount": row_count,
        "columnCount": column_count,
      })),
      Self::RoleNotFound(role) => Some(json!({ "role": role })),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn codes_follow_the_decade_layout() {
    assert_eq!(ProbeError::Parse(String::new()).code(), -32700);
    assert_eq!(ProbeError::ObjectNotFound("x".into()).code(), -32001);
    assert_eq!(
      ProbeError::PropertyNotFound {
        object: "o".into(),
        name: "p".into()
      }
      .code(),
      -32010
    );
    assert_eq!(ProbeError::NoActiveWindow.code(), -32060);
    assert_eq!(ProbeError::RefNotFound("ref_1".into()).code(), -32070);
    assert_eq!(ProbeError::NotAModel("x".into()).code(), -32093);
  }

  #[test]
  fn out_of_bounds_carries_window_size() {
    let err = ProbeError::CoordinateOutOfBounds {
      x: 9999.0,
      y: 9999.0,
      width: 400.0,
      height: 300.0,
    };
    let data = err.data().unwrap();
    assert_eq!(data["windowWidth"], 400.0);
    assert_eq!(data["windowHeight"], 300.0);
  }
}
