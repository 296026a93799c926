/*!
Coordinate-based computer-use API surface (`cu.*`).

Blind click/type automation against the active window. Coordinates are
window-local logical pixels, validated against the window size before any
event is synthesized; events land on the deepest visible widget under the
point, the way a real pointer would.
*/

use std::sync::Arc;

use serde_json::{json, Value};

use super::native::widget_at_global;
use crate::capture;
use crate::host::{CaptureRegion, MouseButton, SharedObject};
use crate::input;
use crate::probe::ProbeShared;
use crate::rpc::{f64_param, opt_f64_param, opt_str_param, str_param, Dispatcher, Reply};
use crate::types::{Point, ProbeError, ProbeResult};

pub(super) fn register(d: &mut Dispatcher, shared: &Arc<ProbeShared>) {
  use super::method;

  method(d, shared, "cu.screenshot", screenshot);
  method(d, shared, "cu.click", click);
  method(d, shared, "cu.rightClick", right_click);
  method(d, shared, "cu.middleClick", middle_click);
  method(d, shared, "cu.doubleClick", double_click);
  method(d, shared, "cu.mouseMove", mouse_move);
  method(d, shared, "cu.drag", drag);
  method(d, shared, "cu.mouseDown", mouse_down);
  method(d, shared, "cu.mouseUp", mouse_up);
  method(d, shared, "cu.type", type_text);
  method(d, shared, "cu.key", key);
  method(d, shared, "cu.scroll", scroll);
  method(d, shared, "cu.cursorPosition", cursor_position);
}

fn screenshot(shared: &Arc<ProbeShared>, _params: &Value) -> ProbeResult<Reply> {
  let window = active_window(shared)?;
  // Logical pixels so coordinates in the image match click coordinates.
  let image = capture::capture(shared.host.as_ref(), &window, CaptureRegion::WindowLogical)?;
  Ok(Reply::new(image))
}

fn click(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  click_with(shared, params, MouseButton::Left)
}

fn right_click(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  click_with(shared, params, MouseButton::Right)
}

fn middle_click(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  click_with(shared, params, MouseButton::Middle)
}

fn click_with(
  shared: &Arc<ProbeShared>,
  params: &Value,
  button: MouseButton,
) -> ProbeResult<Reply> {
  let (target, local) = target_at(shared, params)?;
  input::click(shared.host.as_ref(), &target, button, Some(local))?;
  Ok(Reply::new(json!({ "clicked": true })))
}

fn double_click(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let (target, local) = target_at(shared, params)?;
  input::double_click(shared.host.as_ref(), &target, MouseButton::Left, Some(local))?;
  Ok(Reply::new(json!({ "clicked": true })))
}

fn mouse_move(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let (target, local) = target_at(shared, params)?;
  input::move_to(shared.host.as_ref(), &target, local)?;
  Ok(Reply::new(json!({ "moved": true })))
}

fn mouse_down(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let (target, local) = target_at(shared, params)?;
  input::press(shared.host.as_ref(), &target, parse_button(params)?, Some(local))?;
  Ok(Reply::new(json!({ "pressed": true })))
}

fn mouse_up(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let (target, local) = target_at(shared, params)?;
  input::release(shared.host.as_ref(), &target, parse_button(params)?, Some(local))?;
  Ok(Reply::new(json!({ "released": true })))
}

fn drag(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let window = active_window(shared)?;
  let start = window_point(shared, &window, params, "startX", "startY")?;
  let end = window_point(shared, &window, params, "endX", "endY")?;

  let target = widget_at_global(&shared.host.roots(), start)
    .unwrap_or_else(|| Arc::clone(&window));
  let origin = widget_origin(&target)?;
  input::drag(
    shared.host.as_ref(),
    &target,
    Point::new(start.x - origin.x, start.y - origin.y),
    Point::new(end.x - origin.x, end.y - origin.y),
    parse_button(params)?,
  )?;
  Ok(Reply::new(json!({ "dragged": true })))
}

fn type_text(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let text = str_param(params, "text")?;
  let focused = shared
    .host
    .focused_object()
    .ok_or(ProbeError::NoFocusedWidget)?;
  input::send_text(shared.host.as_ref(), &focused, text)?;
  Ok(Reply::new(json!({ "typed": true })))
}

fn key(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let combo = str_param(params, "key")?;
  let focused = shared
    .host
    .focused_object()
    .ok_or(ProbeError::NoFocusedWidget)?;
  input::send_key_sequence(shared.host.as_ref(), &focused, combo)?;
  Ok(Reply::new(json!({ "sent": true })))
}

fn scroll(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let (target, local) = target_at(shared, params)?;
  let dx = opt_f64_param(params, "dx")?.unwrap_or(0.0);
  let dy = opt_f64_param(params, "dy")?.unwrap_or(0.0);
  input::scroll(shared.host.as_ref(), &target, Some(local), dx, dy)?;
  Ok(Reply::new(json!({ "scrolled": true })))
}

fn cursor_position(shared: &Arc<ProbeShared>, _params: &Value) -> ProbeResult<Reply> {
  let p = shared.host.cursor_position();
  Ok(Reply::new(json!({ "x": p.x, "y": p.y })))
}

// === Coordinate plumbing ===

fn active_window(shared: &Arc<ProbeShared>) -> ProbeResult<SharedObject> {
  shared
    .host
    .active_window()
    .ok_or(ProbeError::NoActiveWindow)
}

/// Validate a window-local point and convert it to global coordinates.
fn window_point(
  shared: &Arc<ProbeShared>,
  window: &SharedObject,
  params: &Value,
  x_name: &str,
  y_name: &str,
) -> ProbeResult<Point> {
  let x = f64_param(params, x_name)?;
  let y = f64_param(params, y_name)?;
  let widget = window
    .as_widget()
    .ok_or_else(|| ProbeError::NotAWidget(shared.object_path(window)))?;
  let size = widget.geometry().size();
  if x < 0.0 || y < 0.0 || x >= size.width || y >= size.height {
    return Err(ProbeError::CoordinateOutOfBounds {
      x,
      y,
      width: size.width,
      height: size.height,
    });
  }
  Ok(widget.map_to_global(Point::new(x, y)))
}

/// Resolve `{x, y}` in the active window to the widget under the point
/// and the point in that widget's coordinates.
fn target_at(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<(SharedObject, Point)> {
  let window = active_window(shared)?;
  let global = window_point(shared, &window, params, "x", "y")?;
  let target =
    widget_at_global(&shared.host.roots(), global).unwrap_or_else(|| Arc::clone(&window));
  let origin = widget_origin(&target)?;
  Ok((target, Point::new(global.x - origin.x, global.y - origin.y)))
}

fn widget_origin(obj: &SharedObject) -> ProbeResult<Point> {
  let widget = obj
    .as_widget()
    .ok_or_else(|| ProbeError::NotAWidget(crate::registry::object_path(obj)))?;
  Ok(widget.map_to_global(Point::new(0.0, 0.0)))
}

fn parse_button(params: &Value) -> ProbeResult<MouseButton> {
  match opt_str_param(params, "button")? {
    None | Some("left") => Ok(MouseButton::Left),
    Some("right") => Ok(MouseButton::Right),
    Some("middle") => Ok(MouseButton::Middle),
    Some(other) => Err(ProbeError::InvalidParams(format!(
      "unknown button {other:?}"
    ))),
  }
}
