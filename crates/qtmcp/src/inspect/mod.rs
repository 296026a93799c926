/*!
Reflective object inspection.

Reads and writes declared properties, invokes methods, and lists signals
through the host's reflection surface. Every failure is a typed error; no
null ever reaches a client.
*/

pub(crate) mod value;

use serde_json::{json, Value};

use crate::host::{InvokeFault, PropertyWriteError, SharedObject};
use crate::types::{ProbeError, ProbeResult};

/// Class name, display name, inheritance, and (for widgets) view state.
pub(crate) fn object_info(obj: &SharedObject) -> Value {
  let mut info = json!({
    "className": obj.class_name(),
    "superClasses": obj.super_classes(),
  });
  let name = obj.object_name();
  if !name.is_empty() {
    info["objectName"] = json!(name);
  }
  if let Some(widget) = obj.as_widget() {
    info["visible"] = json!(widget.visible());
    info["enabled"] = json!(widget.enabled());
    let g = widget.global_geometry();
    info["geometry"] = json!({ "x": g.x, "y": g.y, "width": g.width, "height": g.height });
  }
  info
}

/// All declared properties with current values.
pub(crate) fn list_properties(obj: &SharedObject) -> Value {
  let props: Vec<Value> = obj
    .properties()
    .iter()
    .map(|spec| {
      let current = if spec.readable {
        obj
          .read_property(&spec.name)
          .map_or(Value::Null, |v| value::to_json(&v))
      } else {
        Value::Null
      };
      json!({
        "name": spec.name,
        "type": spec.type_name,
        "readable": spec.readable,
        "writable": spec.writable,
        "stored": spec.stored,
        "value": current,
      })
    })
    .collect();
  Value::Array(props)
}

pub(crate) fn get_property(obj: &SharedObject, path: &str, name: &str) -> ProbeResult<Value> {
  let exists = obj.properties().iter().any(|p| p.name == name);
  if !exists {
    return Err(ProbeError::PropertyNotFound {
      object: path.to_owned(),
      name: name.to_owned(),
    });
  }
  let current = obj
    .read_property(name)
    .ok_or_else(|| ProbeError::PropertyNotFound {
      object: path.to_owned(),
      name: name.to_owned(),
    })?;
  Ok(value::to_json(&current))
}

pub(crate) fn set_property(
  obj: &SharedObject,
  path: &str,
  name: &str,
  new_value: &Value,
) -> ProbeResult<()> {
  let spec = obj
    .properties()
    .into_iter()
    .find(|p| p.name == name)
    .ok_or_else(|| ProbeError::PropertyNotFound {
      object: path.to_owned(),
      name: name.to_owned(),
    })?;
  if !spec.writable {
    return Err(ProbeError::PropertyReadOnly {
      object: path.to_owned(),
      name: name.to_owned(),
    });
  }

  let typed = value::from_json_typed(new_value, &spec.type_name, name)?;
  obj.write_property(name, typed).map_err(|e| match e {
    PropertyWriteError::NotFound => ProbeError::PropertyNotFound {
      object: path.to_owned(),
      name: name.to_owned(),
    },
    PropertyWriteError::ReadOnly => ProbeError::PropertyReadOnly {
      object: path.to_owned(),
      name: name.to_owned(),
    },
    PropertyWriteError::TypeMismatch => ProbeError::PropertyTypeMismatch {
      name: name.to_owned(),
      expected: spec.type_name.clone(),
    },
  })
}

/// Declared invokable methods. Signals are listed separately.
pub(crate) fn list_methods(obj: &SharedObject) -> Value {
  let methods: Vec<Value> = obj
    .methods()
    .iter()
    .map(|m| {
      json!({
        "name": m.name,
        "signature": m.signature(),
        "returnType": m.return_type,
        "parameterTypes": m.parameter_types,
        "access": m.access.as_str(),
      })
    })
    .collect();
  Value::Array(methods)
}

pub(crate) fn invoke_method(
  obj: &SharedObject,
  path: &str,
  name: &str,
  args: &[Value],
) -> ProbeResult<Value> {
  let candidates: Vec<_> = obj
    .methods()
    .into_iter()
    .filter(|m| m.name == name)
    .collect();
  if candidates.is_empty() {
    return Err(ProbeError::NoSuchMethod {
      object: path.to_owned(),
      name: name.to_owned(),
    });
  }

  let spec = candidates
    .iter()
    .find(|m| m.parameter_types.len() == args.len())
    .ok_or_else(|| ProbeError::ArgumentMismatch {
      name: name.to_owned(),
      reason: format!(
        "no overload takes {} argument(s); candidates take {:?}",
        args.len(),
        candidates
          .iter()
          .map(|m| m.parameter_types.len())
          .collect::<Vec<_>>()
      ),
    })?;

  let mut parsed = Vec::with_capacity(args.len());
  for (i, (arg, ty)) in args.iter().zip(&spec.parameter_types).enumerate() {
    let v = value::from_json_typed(arg, ty, &format!("argument {i}")).map_err(|_| {
      ProbeError::ArgumentMismatch {
        name: name.to_owned(),
        reason: format!("argument {i} cannot convert to {ty}"),
      }
    })?;
    parsed.push(v);
  }

  match obj.invoke(name, &parsed) {
    Ok(ret) => Ok(ret.map_or(Value::Null, |v| value::to_json(&v))),
    Err(InvokeFault::NotFound) => Err(ProbeError::NoSuchMethod {
      object: path.to_owned(),
      name: name.to_owned(),
    }),
    Err(InvokeFault::ArgumentMismatch(reason)) => Err(ProbeError::ArgumentMismatch {
      name: name.to_owned(),
      reason,
    }),
    Err(InvokeFault::Failed(reason)) => Err(ProbeError::InvocationFailed {
      name: name.to_owned(),
      reason,
    }),
  }
}

pub(crate) fn list_signals(obj: &SharedObject) -> Value {
  let signals: Vec<Value> = obj
    .signals()
    .iter()
    .map(|s| {
      json!({
        "name": s.name,
        "signature": s.signature(),
        "parameterTypes": s.parameter_types,
      })
    })
    .collect();
  Value::Array(signals)
}

/// Most-derived class first, down to the root class.
pub(crate) fn inheritance_chain(obj: &SharedObject) -> Vec<String> {
  let mut chain = vec![obj.class_name()];
  chain.extend(obj.super_classes());
  chain
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testutil::SimTree;

  #[test]
  fn property_round_trip_is_observable_on_the_object() {
    let tree = SimTree::sample();
    let btn = tree.object("btn");
    set_property(&btn, "/App/win/btn", "text", &json!("Ok")).unwrap();
    assert_eq!(get_property(&btn, "/App/win/btn", "text").unwrap(), json!("Ok"));
    assert_eq!(
      btn.read_property("text").unwrap().as_str(),
      Some("Ok")
    );
  }

  #[test]
  fn missing_and_read_only_properties_are_distinct_errors() {
    let tree = SimTree::sample();
    let btn = tree.object("btn");
    let missing = set_property(&btn, "id", "nope", &json!(1)).unwrap_err();
    assert_eq!(missing.code(), -32010);
    let read_only = set_property(&btn, "id", "className", &json!("X")).unwrap_err();
    assert_eq!(read_only.code(), -32011);
  }

  #[test]
  fn invoke_checks_arity_before_calling() {
    let tree = SimTree::sample();
    let btn = tree.object("btn");
    let err = invoke_method(&btn, "id", "setText", &[]).unwrap_err();
    assert_eq!(err.code(), -32022);
    let err = invoke_method(&btn, "id", "nothing", &[]).unwrap_err();
    assert_eq!(err.code(), -32020);
    let ok = invoke_method(&btn, "id", "setText", &[json!("Go")]).unwrap();
    assert_eq!(ok, Value::Null);
    assert_eq!(btn.read_property("text").unwrap().as_str(), Some("Go"));
  }

  #[test]
  fn inheritance_chain_starts_at_the_object() {
    let tree = SimTree::sample();
    let btn = tree.object("btn");
    let chain = inheritance_chain(&btn);
    assert_eq!(chain.first().map(String::as_str), Some("Button"));
    assert_eq!(chain.last().map(String::as_str), Some("Object"));
  }
}
