/*!
Value conversion between host property values and JSON.

Serialization is deterministic and documented: geometry types become
`{x,y}`-style objects, colors become `{r,g,b,a}` with 0-255 channels, and
anything the probe cannot decompose is carried as
`{_type: "...", value: "..."}`.

Parsing is type-directed when the target type is known (property writes)
and structural when it is not (invoke arguments).
*/

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::host::PropValue;
use crate::types::{Color, Point, ProbeError, ProbeResult, Rect, Size};

/// Serialize a host value to its JSON form.
pub(crate) fn to_json(value: &PropValue) -> Value {
  match value {
    PropValue::Bool(b) => json!(b),
    PropValue::Int(i) => json!(i),
    PropValue::Float(f) => json!(f),
    PropValue::Str(s) => json!(s),
    PropValue::Point(p) => json!({ "x": p.x, "y": p.y }),
    PropValue::Size(s) => json!({ "width": s.width, "height": s.height }),
    PropValue::Rect(r) => json!({ "x": r.x, "y": r.y, "width": r.width, "height": r.height }),
    PropValue::Color(c) => json!({ "r": c.r, "g": c.g, "b": c.b, "a": c.a }),
    PropValue::List(items) => Value::Array(items.iter().map(to_json).collect()),
    PropValue::Map(map) => {
      let mut out = Map::new();
      for (k, v) in map {
        out.insert(k.clone(), to_json(v));
      }
      Value::Object(out)
    }
    PropValue::Opaque { type_name, repr } => json!({ "_type": type_name, "value": repr }),
  }
}

/// Parse JSON into a host value of a known target type.
///
/// Fails with `PropertyTypeMismatch` naming `prop` when the input cannot be
/// converted. An unrecognized target type falls back to structural parsing.
pub(crate) fn from_json_typed(value: &Value, target: &str, prop: &str) -> ProbeResult<PropValue> {
  let mismatch = || ProbeError::PropertyTypeMismatch {
    name: prop.to_owned(),
    expected: target.to_owned(),
  };

  match target {
    "bool" => value.as_bool().map(PropValue::Bool).ok_or_else(mismatch),
    "int" | "uint" | "long" => {
      if let Some(i) = value.as_i64() {
        Ok(PropValue::Int(i))
      } else {
        Err(mismatch())
      }
    }
    "double" | "float" => value.as_f64().map(PropValue::Float).ok_or_else(mismatch),
    "string" => value
      .as_str()
      .map(|s| PropValue::Str(s.to_owned()))
      .ok_or_else(mismatch),
    "point" => parse_point(value).map(PropValue::Point).ok_or_else(mismatch),
    "size" => parse_size(value).map(PropValue::Size).ok_or_else(mismatch),
    "rect" => parse_rect(value).map(PropValue::Rect).ok_or_else(mismatch),
    "color" => parse_color(value).map(PropValue::Color).ok_or_else(mismatch),
    "list" | "stringlist" => match value {
      Value::Array(items) => Ok(PropValue::List(items.iter().map(from_json).collect())),
      _ => Err(mismatch()),
    },
    "map" => match value {
      Value::Object(obj) => {
        let mut map = BTreeMap::new();
        for (k, v) in obj {
          map.insert(k.clone(), from_json(v));
        }
        Ok(PropValue::Map(map))
      }
      _ => Err(mismatch()),
    },
    _ => Ok(from_json(value)),
  }
}

/// Structural parse used for invoke arguments, where no target type exists.
/// Object shapes are recognized by their keys.
pub(crate) fn from_json(value: &Value) -> PropValue {
  match value {
    Value::Bool(b) => PropValue::Bool(*b),
    Value::Number(n) => {
      if let Some(i) = n.as_i64() {
        PropValue::Int(i)
      } else {
        PropValue::Float(n.as_f64().unwrap_or(0.0))
      }
    }
    Value::String(s) => PropValue::Str(s.clone()),
    Value::Array(items) => PropValue::List(items.iter().map(from_json).collect()),
    Value::Object(obj) => {
      if let Some(r) = parse_rect(value) {
        return PropValue::Rect(r);
      }
      if let Some(p) = parse_point(value) {
        return PropValue::Point(p);
      }
      if let Some(s) = parse_size(value) {
        return PropValue::Size(s);
      }
      if let Some(c) = parse_color(value) {
        return PropValue::Color(c);
      }
      if let (Some(Value::String(t)), Some(v)) = (obj.get("_type"), obj.get("value")) {
        return PropValue::Opaque {
          type_name: t.clone(),
          repr: v.as_str().map_or_else(|| v.to_string(), str::to_owned),
        };
      }
      let mut map = BTreeMap::new();
      for (k, v) in obj {
        map.insert(k.clone(), from_json(v));
      }
      PropValue::Map(map)
    }
    Value::Null => PropValue::Opaque {
      type_name: "null".to_owned(),
      repr: String::new(),
    },
  }
}

fn num(value: &Value, key: &str) -> Option<f64> {
  value.get(key)?.as_f64()
}

fn parse_point(value: &Value) -> Option<Point> {
  let obj = value.as_object()?;
  if obj.len() != 2 {
    return None;
  }
  Some(Point::new(num(value, "x")?, num(value, "y")?))
}

fn parse_size(value: &Value) -> Option<Size> {
  let obj = value.as_object()?;
  if obj.len() != 2 {
    return None;
  }
  Some(Size::new(num(value, "width")?, num(value, "height")?))
}

fn parse_rect(value: &Value) -> Option<Rect> {
  let obj = value.as_object()?;
  if obj.len() != 4 {
    return None;
  }
  Some(Rect::new(
    num(value, "x")?,
    num(value, "y")?,
    num(value, "width")?,
    num(value, "height")?,
  ))
}

fn parse_color(value: &Value) -> Option<Color> {
  if let Some(hex) = value.as_str() {
    return Color::from_hex(hex);
  }
  let obj = value.as_object()?;
  if !obj.contains_key("r") || !obj.contains_key("g") || !obj.contains_key("b") {
    return None;
  }
  let channel = |key: &str| -> Option<u8> {
    let v = num(value, key)?;
    if (0.0..=255.0).contains(&v) {
      Some(v as u8)
    } else {
      None
    }
  };
  Some(Color::rgba(
    channel("r")?,
    channel("g")?,
    channel("b")?,
    if obj.contains_key("a") {
      channel("a")?
    } else {
      255
    },
  ))
}
