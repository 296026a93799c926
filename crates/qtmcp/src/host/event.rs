/*! Synthetic input events posted into the host. */

use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Mouse button for synthetic events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
  #[default]
  Left,
  Right,
  Middle,
}

/// Modifier keys held during a synthetic key event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModifiers {
  pub ctrl: bool,
  pub shift: bool,
  pub alt: bool,
  pub meta: bool,
}

impl KeyModifiers {
  pub const NONE: Self = Self {
    ctrl: false,
    shift: false,
    alt: false,
    meta: false,
  };

  pub fn is_empty(&self) -> bool {
    *self == Self::NONE
  }
}

/// A single synthetic input event, positioned in widget-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
  MousePress {
    position: Point,
    button: MouseButton,
  },
  MouseRelease {
    position: Point,
    button: MouseButton,
  },
  MouseDoubleClick {
    position: Point,
    button: MouseButton,
  },
  MouseMove {
    position: Point,
  },
  /// Wheel deltas in eighths of a degree; a full notch is 120.
  MouseWheel {
    position: Point,
    delta_x: f64,
    delta_y: f64,
  },
  KeyPress {
    code: u32,
    modifiers: KeyModifiers,
    /// Text the key produces, empty for non-printing keys.
    text: String,
  },
  KeyRelease {
    code: u32,
    modifiers: KeyModifiers,
  },
}
