/*! Geometry and color wire types. */

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A point in logical (device-independent) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Point {
  pub x: f64,
  pub y: f64,
}

impl Point {
  pub const fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}

/// A width/height pair in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Size {
  pub width: f64,
  pub height: f64,
}

impl Size {
  pub const fn new(width: f64, height: f64) -> Self {
    Self { width, height }
  }
}

/// An axis-aligned rectangle in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rect {
  pub x: f64,
  pub y: f64,
  pub width: f64,
  pub height: f64,
}

impl Rect {
  pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
    Self {
      x,
      y,
      width,
      height,
    }
  }

  /// Geometric center of the rectangle.
  pub fn center(&self) -> Point {
    Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
  }

  /// Whether the point lies inside (edges inclusive on the origin side).
  pub fn contains(&self, p: Point) -> bool {
    p.x >= self.x && p.y >= self.y && p.x < self.x + self.width && p.y < self.y + self.height
  }

  pub fn is_empty(&self) -> bool {
    self.width <= 0.0 || self.height <= 0.0
  }

  pub const fn size(&self) -> Size {
    Size::new(self.width, self.height)
  }
}

/// An RGBA color with 0-255 channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Color {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}

impl Color {
  pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
    Self { r, g, b, a: 255 }
  }

  pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
    Self { r, g, b, a }
  }

  /// Parse a CSS-style hex string: `#rgb`, `#rrggbb` or `#rrggbbaa`.
  pub fn from_hex(s: &str) -> Option<Self> {
    let hex = s.strip_prefix('#')?;
    let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
      3 => {
        let nib = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
        let (r, g, b) = (nib(0)?, nib(1)?, nib(2)?);
        Some(Self::rgb(r * 17, g * 17, b * 17))
      }
      6 => Some(Self::rgb(digit(0)?, digit(2)?, digit(4)?)),
      8 => Some(Self::rgba(digit(0)?, digit(2)?, digit(4)?, digit(6)?)),
      _ => None,
    }
  }
}
