/*!
Reflection metadata surfaced by host objects.

A host adapter exposes each object's declared properties, invokable methods
and signals through these descriptor types, and moves values across the seam
as [`PropValue`]. JSON conversion lives in the inspector, not here.
*/

use std::collections::BTreeMap;

use crate::types::{Color, Point, Rect, Size};

/// A typed value crossing the probe/host boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
  Bool(bool),
  Int(i64),
  Float(f64),
  Str(String),
  Point(Point),
  Size(Size),
  Rect(Rect),
  Color(Color),
  List(Vec<PropValue>),
  Map(BTreeMap<String, PropValue>),
  /// A host type the probe cannot decompose; carried as its string form.
  Opaque {
    type_name: String,
    repr: String,
  },
}

impl PropValue {
  /// The probe-side type name used in descriptors and conversions.
  pub fn type_name(&self) -> &str {
    match self {
      Self::Bool(_) => "bool",
      Self::Int(_) => "int",
      Self::Float(_) => "double",
      Self::Str(_) => "string",
      Self::Point(_) => "point",
      Self::Size(_) => "size",
      Self::Rect(_) => "rect",
      Self::Color(_) => "color",
      Self::List(_) => "list",
      Self::Map(_) => "map",
      Self::Opaque { type_name, .. } => type_name,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Self::Str(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Self::Bool(b) => Some(*b),
      _ => None,
    }
  }

  pub fn as_i64(&self) -> Option<i64> {
    match self {
      Self::Int(i) => Some(*i),
      Self::Float(f) => Some(*f as i64),
      _ => None,
    }
  }

  pub fn as_f64(&self) -> Option<f64> {
    match self {
      Self::Float(f) => Some(*f),
      Self::Int(i) => Some(*i as f64),
      _ => None,
    }
  }

  pub fn as_rect(&self) -> Option<Rect> {
    match self {
      Self::Rect(r) => Some(*r),
      _ => None,
    }
  }
}

impl From<bool> for PropValue {
  fn from(b: bool) -> Self {
    Self::Bool(b)
  }
}

impl From<i64> for PropValue {
  fn from(i: i64) -> Self {
    Self::Int(i)
  }
}

impl From<f64> for PropValue {
  fn from(f: f64) -> Self {
    Self::Float(f)
  }
}

impl From<&str> for PropValue {
  fn from(s: &str) -> Self {
    Self::Str(s.to_owned())
  }
}

impl From<String> for PropValue {
  fn from(s: String) -> Self {
    Self::Str(s)
  }
}

impl From<Rect> for PropValue {
  fn from(r: Rect) -> Self {
    Self::Rect(r)
  }
}

impl From<Point> for PropValue {
  fn from(p: Point) -> Self {
    Self::Point(p)
  }
}

/// Declared property of a host object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySpec {
  pub name: String,
  pub type_name: String,
  pub readable: bool,
  pub writable: bool,
  pub stored: bool,
}

impl PropertySpec {
  /// A plain readable+writable property, the common case.
  pub fn plain(name: &str, type_name: &str) -> Self {
    Self {
      name: name.to_owned(),
      type_name: type_name.to_owned(),
      readable: true,
      writable: true,
      stored: true,
    }
  }

  pub fn read_only(name: &str, type_name: &str) -> Self {
    Self {
      writable: false,
      ..Self::plain(name, type_name)
    }
  }
}

/// Access level of an invokable method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodAccess {
  Public,
  Protected,
  Private,
}

impl MethodAccess {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Public => "public",
      Self::Protected => "protected",
      Self::Private => "private",
    }
  }
}

/// Declared invokable method of a host object. Signals are not methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpec {
  pub name: String,
  pub return_type: String,
  pub parameter_types: Vec<String>,
  pub access: MethodAccess,
}

impl MethodSpec {
  /// `name(type, type)` rendering used in listings.
  pub fn signature(&self) -> String {
    format!("{}({})", self.name, self.parameter_types.join(", "))
  }
}

/// Declared signal of a host object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalSpec {
  pub name: String,
  pub parameter_types: Vec<String>,
}

impl SignalSpec {
  pub fn signature(&self) -> String {
    format!("{}({})", self.name, self.parameter_types.join(", "))
  }
}

/// Why a property write was refused by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyWriteError {
  NotFound,
  ReadOnly,
  TypeMismatch,
}

/// Why a method invocation failed inside the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvokeFault {
  NotFound,
  ArgumentMismatch(String),
  Failed(String),
}
