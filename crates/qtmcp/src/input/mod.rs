/*!
Synthetic input delivery.

Builds mouse and key event sequences and posts them through the host,
flushing the event loop between individual events so multi-step sequences
land in order. Interaction requires the target widget to be visible and
enabled.
*/

pub(crate) mod keymap;

use crate::host::{Host, InputEvent, KeyModifiers, MouseButton, SharedObject};
use crate::registry;
use crate::types::{Point, ProbeError, ProbeResult};

/// Interpolation steps for a synthetic drag.
const DRAG_STEPS: usize = 6;

/// Mouse press followed by release, at `pos` or the widget center.
pub(crate) fn click(
  host: &dyn Host,
  obj: &SharedObject,
  button: MouseButton,
  pos: Option<Point>,
) -> ProbeResult<()> {
  let position = target_position(obj, pos)?;
  post(host, obj, InputEvent::MousePress { position, button })?;
  post(host, obj, InputEvent::MouseRelease { position, button })?;
  host.process_events();
  Ok(())
}

pub(crate) fn double_click(
  host: &dyn Host,
  obj: &SharedObject,
  button: MouseButton,
  pos: Option<Point>,
) -> ProbeResult<()> {
  let position = target_position(obj, pos)?;
  post(host, obj, InputEvent::MousePress { position, button })?;
  post(host, obj, InputEvent::MouseRelease { position, button })?;
  post(host, obj, InputEvent::MouseDoubleClick { position, button })?;
  post(host, obj, InputEvent::MouseRelease { position, button })?;
  host.process_events();
  Ok(())
}

pub(crate) fn press(
  host: &dyn Host,
  obj: &SharedObject,
  button: MouseButton,
  pos: Option<Point>,
) -> ProbeResult<()> {
  let position = target_position(obj, pos)?;
  post(host, obj, InputEvent::MousePress { position, button })
}

pub(crate) fn release(
  host: &dyn Host,
  obj: &SharedObject,
  button: MouseButton,
  pos: Option<Point>,
) -> ProbeResult<()> {
  let position = target_position(obj, pos)?;
  post(host, obj, InputEvent::MouseRelease { position, button })
}

pub(crate) fn move_to(host: &dyn Host, obj: &SharedObject, pos: Point) -> ProbeResult<()> {
  require_widget(obj)?;
  post(host, obj, InputEvent::MouseMove { position: pos })
}

/// Press, interpolated moves, release.
pub(crate) fn drag(
  host: &dyn Host,
  obj: &SharedObject,
  start: Point,
  end: Point,
  button: MouseButton,
) -> ProbeResult<()> {
  require_interactable(obj)?;
  post(
    host,
    obj,
    InputEvent::MousePress {
      position: start,
      button,
    },
  )?;
  for step in 1..=DRAG_STEPS {
    let t = step as f64 / DRAG_STEPS as f64;
    let position = Point::new(start.x + (end.x - start.x) * t, start.y + (end.y - start.y) * t);
    post(host, obj, InputEvent::MouseMove { position })?;
    host.process_events();
  }
  post(
    host,
    obj,
    InputEvent::MouseRelease {
      position: end,
      button,
    },
  )?;
  host.process_events();
  Ok(())
}

/// Wheel scroll. Positive `dy` scrolls the content down, so the wheel
/// delta is inverted (wheel-up convention).
pub(crate) fn scroll(
  host: &dyn Host,
  obj: &SharedObject,
  pos: Option<Point>,
  dx: f64,
  dy: f64,
) -> ProbeResult<()> {
  let position = target_position(obj, pos)?;
  post(
    host,
    obj,
    InputEvent::MouseWheel {
      position,
      delta_x: -dx * 120.0,
      delta_y: -dy * 120.0,
    },
  )?;
  host.process_events();
  Ok(())
}

/// Type a string one character at a time, flushing between characters.
pub(crate) fn send_text(host: &dyn Host, obj: &SharedObject, text: &str) -> ProbeResult<()> {
  require_interactable(obj)?;
  for ch in text.chars() {
    let code = ch.to_ascii_uppercase() as u32;
    post(
      host,
      obj,
      InputEvent::KeyPress {
        code,
        modifiers: KeyModifiers::NONE,
        text: ch.to_string(),
      },
    )?;
    post(
      host,
      obj,
      InputEvent::KeyRelease {
        code,
        modifiers: KeyModifiers::NONE,
      },
    )?;
    host.process_events();
  }
  Ok(())
}

pub(crate) fn send_key(
  host: &dyn Host,
  obj: &SharedObject,
  code: u32,
  modifiers: KeyModifiers,
) -> ProbeResult<()> {
  require_interactable(obj)?;
  post(
    host,
    obj,
    InputEvent::KeyPress {
      code,
      modifiers,
      text: String::new(),
    },
  )?;
  post(host, obj, InputEvent::KeyRelease { code, modifiers })?;
  host.process_events();
  Ok(())
}

/// Parse and deliver a combo like `ctrl+shift+s`.
pub(crate) fn send_key_sequence(host: &dyn Host, obj: &SharedObject, combo: &str) -> ProbeResult<()> {
  let (modifiers, code) = keymap::parse_combo(combo)?;
  send_key(host, obj, code, modifiers)
}

fn post(host: &dyn Host, obj: &SharedObject, event: InputEvent) -> ProbeResult<()> {
  if host.post_input(obj, event) {
    Ok(())
  } else {
    Err(ProbeError::Internal("input delivery failed".into()))
  }
}

/// Default to the widget center; validates interactability either way.
fn target_position(obj: &SharedObject, pos: Option<Point>) -> ProbeResult<Point> {
  let widget = require_interactable(obj)?;
  Ok(pos.unwrap_or_else(|| {
    let g = widget.geometry();
    Point::new(g.width / 2.0, g.height / 2.0)
  }))
}

fn require_widget(obj: &SharedObject) -> ProbeResult<&dyn crate::host::Widget> {
  obj
    .as_widget()
    .ok_or_else(|| ProbeError::NotAWidget(registry::object_path(obj)))
}

fn require_interactable(obj: &SharedObject) -> ProbeResult<&dyn crate::host::Widget> {
  let widget = require_widget(obj)?;
  if !widget.visible() {
    return Err(ProbeError::WidgetNotVisible(registry::object_path(obj)));
  }
  if !widget.enabled() {
    return Err(ProbeError::WidgetNotEnabled(registry::object_path(obj)));
  }
  Ok(widget)
}
