/*!
Native object-id API surface (`qt.*`).

Rich introspection keyed by stable object identifiers. Every handler
resolves ids through the three-style resolver, so hierarchical paths,
`#N` numeric refs, and symbolic aliases are interchangeable. The legacy
flat `qtmcp.*` namespace is accepted as deprecated aliases.
*/

use std::sync::Arc;

use serde_json::{json, Value};

use crate::capture;
use crate::host::{CaptureRegion, MouseButton, SharedObject};
use crate::input;
use crate::inspect;
use crate::probe::ProbeShared;
use crate::rpc::{
  self, opt_bool_param, opt_str_param, opt_u64_param, str_param, value_param, Dispatcher, Reply,
};
use crate::types::{Point, ProbeError, ProbeResult, Rect, SubscriptionId};

pub(super) fn register(d: &mut Dispatcher, shared: &Arc<ProbeShared>) {
  use super::method;

  method(d, shared, "qt.objects.find", objects_find);
  method(d, shared, "qt.objects.findByClass", objects_find_by_class);
  method(d, shared, "qt.objects.tree", objects_tree);
  method(d, shared, "qt.objects.info", objects_info);
  method(d, shared, "qt.objects.inspect", objects_inspect);
  method(d, shared, "qt.objects.query", objects_query);

  method(d, shared, "qt.properties.list", properties_list);
  method(d, shared, "qt.properties.get", properties_get);
  method(d, shared, "qt.properties.set", properties_set);

  method(d, shared, "qt.methods.list", methods_list);
  method(d, shared, "qt.methods.invoke", methods_invoke);

  method(d, shared, "qt.signals.list", signals_list);
  method(d, shared, "qt.signals.subscribe", signals_subscribe);
  method(d, shared, "qt.signals.unsubscribe", signals_unsubscribe);
  method(d, shared, "qt.signals.setLifecycle", signals_set_lifecycle);

  method(d, shared, "qt.ui.click", ui_click);
  method(d, shared, "qt.ui.sendKeys", ui_send_keys);
  method(d, shared, "qt.ui.screenshot", ui_screenshot);
  method(d, shared, "qt.ui.geometry", ui_geometry);
  method(d, shared, "qt.ui.hitTest", ui_hit_test);

  method(d, shared, "qt.names.register", names_register);
  method(d, shared, "qt.names.unregister", names_unregister);
  method(d, shared, "qt.names.list", names_list);
  method(d, shared, "qt.names.validate", names_validate);
  method(d, shared, "qt.names.load", names_load);
  method(d, shared, "qt.names.save", names_save);

  method(d, shared, "qt.qml.inspect", qml_inspect);
  method(d, shared, "qt.models.list", models_list);
  method(d, shared, "qt.models.info", models_info);
  method(d, shared, "qt.models.data", models_data);

  for &(legacy, canonical) in LEGACY_ALIASES {
    d.alias(legacy, canonical);
  }
}

/// Deprecated flat method names accepted for older clients.
const LEGACY_ALIASES: &[(&str, &str)] = &[
  ("qtmcp.findObjects", "qt.objects.find"),
  ("qtmcp.findObjectsByClass", "qt.objects.findByClass"),
  ("qtmcp.getObjectTree", "qt.objects.tree"),
  ("qtmcp.getObjectInfo", "qt.objects.info"),
  ("qtmcp.inspectObject", "qt.objects.inspect"),
  ("qtmcp.queryObjects", "qt.objects.query"),
  ("qtmcp.listProperties", "qt.properties.list"),
  ("qtmcp.getProperty", "qt.properties.get"),
  ("qtmcp.setProperty", "qt.properties.set"),
  ("qtmcp.listMethods", "qt.methods.list"),
  ("qtmcp.invokeMethod", "qt.methods.invoke"),
  ("qtmcp.listSignals", "qt.signals.list"),
  ("qtmcp.subscribeSignal", "qt.signals.subscribe"),
  ("qtmcp.unsubscribeSignal", "qt.signals.unsubscribe"),
  ("qtmcp.setLifecycleNotifications", "qt.signals.setLifecycle"),
  ("qtmcp.click", "qt.ui.click"),
  ("qtmcp.sendKeys", "qt.ui.sendKeys"),
  ("qtmcp.screenshot", "qt.ui.screenshot"),
  ("qtmcp.getGeometry", "qt.ui.geometry"),
  ("qtmcp.hitTest", "qt.ui.hitTest"),
  ("qtmcp.registerName", "qt.names.register"),
  ("qtmcp.unregisterName", "qt.names.unregister"),
  ("qtmcp.listNames", "qt.names.list"),
  ("qtmcp.validateNames", "qt.names.validate"),
  ("qtmcp.loadNames", "qt.names.load"),
  ("qtmcp.saveNames", "qt.names.save"),
  ("qtmcp.inspectQml", "qt.qml.inspect"),
  ("qtmcp.listModels", "qt.models.list"),
  ("qtmcp.getModelInfo", "qt.models.info"),
  ("qtmcp.getModelData", "qt.models.data"),
];

// === Objects ===

fn objects_find(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  if let Some(id) = opt_str_param(params, "objectId")? {
    let obj = shared.resolve_object(id)?;
    return Ok(Reply::new(json!({
      "objects": [shared.object_summary(&obj)],
      "count": 1,
    })));
  }

  let name = str_param(params, "objectName")?;
  let root = resolve_opt_root(shared, params)?;
  let found = shared.registry.find_by_display_name(name, root.as_ref());
  let objects: Vec<Value> = found.iter().map(|o| shared.object_summary(o)).collect();
  Ok(Reply::new(json!({
    "count": objects.len(),
    "objects": objects,
  })))
}

fn objects_find_by_class(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let class = str_param(params, "className")?;
  let root = resolve_opt_root(shared, params)?;
  let found = shared.registry.find_all_by_class(class, root.as_ref());
  let objects: Vec<Value> = found.iter().map(|o| shared.object_summary(o)).collect();
  Ok(Reply::new(json!({
    "count": objects.len(),
    "objects": objects,
  })))
}

fn objects_tree(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let depth = opt_u64_param(params, "depth")?.unwrap_or(100) as usize;

  fn build(shared: &Arc<ProbeShared>, obj: &SharedObject, depth_left: usize) -> Value {
    let mut node = json!({
      "id": shared.object_path(obj),
      "className": obj.class_name(),
    });
    let name = obj.object_name();
    if !name.is_empty() {
      node["objectName"] = json!(name);
    }
    if depth_left > 0 {
      let children: Vec<Value> = obj
        .children()
        .iter()
        .map(|c| build(shared, c, depth_left - 1))
        .collect();
      if !children.is_empty() {
        node["children"] = Value::Array(children);
      }
    }
    node
  }

  match opt_str_param(params, "rootId")? {
    Some(id) => {
      let root = shared.resolve_object(id)?;
      let path = shared.object_path(&root);
      Ok(Reply::for_object(
        json!({ "tree": build(shared, &root, depth) }),
        path,
      ))
    }
    None => {
      let trees: Vec<Value> = shared
        .host
        .roots()
        .iter()
        .map(|r| build(shared, r, depth))
        .collect();
      Ok(Reply::new(json!({ "trees": trees })))
    }
  }
}

fn objects_info(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let id = str_param(params, "objectId")?;
  let obj = shared.resolve_object(id)?;
  let (path, _) = shared.expose(&obj);
  Ok(Reply::for_object(inspect::object_info(&obj), path))
}

fn objects_inspect(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let id = str_param(params, "objectId")?;
  let obj = shared.resolve_object(id)?;
  let (path, _) = shared.expose(&obj);
  let mut result = inspect::object_info(&obj);
  result["properties"] = inspect::list_properties(&obj);
  result["methods"] = inspect::list_methods(&obj);
  result["signals"] = inspect::list_signals(&obj);
  result["inheritance"] = json!(inspect::inheritance_chain(&obj));
  Ok(Reply::for_object(result, path))
}

fn objects_query(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let class = opt_str_param(params, "className")?;
  let name_contains = opt_str_param(params, "objectNameContains")?.map(str::to_lowercase);
  let text_contains = opt_str_param(params, "textContains")?.map(str::to_lowercase);
  let visible_only = opt_bool_param(params, "visibleOnly")?.unwrap_or(false);
  let limit = opt_u64_param(params, "limit")?.unwrap_or(50) as usize;

  let mut objects = Vec::new();
  let mut total = 0usize;
  for weak in shared.registry.all_objects() {
    let Some(obj) = weak.upgrade() else {
      continue;
    };
    if let Some(class) = class {
      if obj.class_name() != class {
        continue;
      }
    }
    if let Some(needle) = &name_contains {
      if !obj.object_name().to_lowercase().contains(needle) {
        continue;
      }
    }
    if let Some(needle) = &text_contains {
      let text = obj
        .read_property("text")
        .and_then(|v| v.as_str().map(str::to_lowercase));
      if !text.is_some_and(|t| t.contains(needle)) {
        continue;
      }
    }
    if visible_only && !obj.as_widget().is_some_and(|w| w.visible()) {
      continue;
    }
    total += 1;
    if objects.len() < limit {
      objects.push(shared.object_summary(&obj));
    }
  }

  Ok(Reply::new(json!({
    "count": total,
    "objects": objects,
    "truncated": total > objects.len(),
  })))
}

// === Properties ===

fn properties_list(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let id = str_param(params, "objectId")?;
  let obj = shared.resolve_object(id)?;
  let (path, _) = shared.expose(&obj);
  Ok(Reply::for_object(
    json!({ "properties": inspect::list_properties(&obj) }),
    path,
  ))
}

fn properties_get(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let id = str_param(params, "objectId")?;
  let name = str_param(params, "name")?;
  let obj = shared.resolve_object(id)?;
  let (path, _) = shared.expose(&obj);
  let value = inspect::get_property(&obj, &path, name)?;
  Ok(Reply::for_object(json!({ "value": value }), path))
}

fn properties_set(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let id = str_param(params, "objectId")?;
  let name = str_param(params, "name")?;
  let value = value_param(params, "value")?;
  let obj = shared.resolve_object(id)?;
  let (path, _) = shared.expose(&obj);
  inspect::set_property(&obj, &path, name, value)?;
  Ok(Reply::for_object(json!({ "success": true }), path))
}

// === Methods ===

fn methods_list(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let id = str_param(params, "objectId")?;
  let obj = shared.resolve_object(id)?;
  let (path, _) = shared.expose(&obj);
  Ok(Reply::for_object(
    json!({ "methods": inspect::list_methods(&obj) }),
    path,
  ))
}

fn methods_invoke(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let id = str_param(params, "objectId")?;
  let name = str_param(params, "method")?;
  let args = match params.get("args") {
    None | Some(Value::Null) => Vec::new(),
    Some(Value::Array(items)) => items.clone(),
    Some(_) => {
      return Err(ProbeError::InvalidParams(
        "parameter \"args\" must be an array".into(),
      ));
    }
  };
  let obj = shared.resolve_object(id)?;
  let (path, _) = shared.expose(&obj);
  let ret = inspect::invoke_method(&obj, &path, name, &args)?;
  Ok(Reply::for_object(json!({ "returnValue": ret }), path))
}

// === Signals ===

fn signals_list(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let id = str_param(params, "objectId")?;
  let obj = shared.resolve_object(id)?;
  let (path, _) = shared.expose(&obj);
  Ok(Reply::for_object(
    json!({ "signals": inspect::list_signals(&obj) }),
    path,
  ))
}

fn signals_subscribe(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let id = str_param(params, "objectId")?;
  let signal = str_param(params, "signal")?;
  let obj = shared.resolve_object(id)?;
  let (path, _) = shared.expose(&obj);
  let sub = shared.monitor.subscribe(&obj, &path, signal)?;
  Ok(Reply::for_object(
    json!({ "subscriptionId": sub.to_string() }),
    path,
  ))
}

fn signals_unsubscribe(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let raw = str_param(params, "subscriptionId")?;
  let sub = SubscriptionId::parse(raw)
    .ok_or_else(|| ProbeError::SubscriptionNotFound(raw.to_owned()))?;
  // Removing an already-gone subscription is a successful no-op.
  let removed = shared.monitor.unsubscribe(sub);
  Ok(Reply::new(json!({ "removed": removed })))
}

fn signals_set_lifecycle(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let enabled = opt_bool_param(params, "enabled")?
    .ok_or_else(|| ProbeError::InvalidParams("missing parameter \"enabled\"".into()))?;
  shared.monitor.set_lifecycle(enabled);
  Ok(Reply::new(json!({ "enabled": enabled })))
}

// === UI ===

fn ui_click(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let id = str_param(params, "objectId")?;
  let obj = shared.resolve_object(id)?;
  let (path, _) = shared.expose(&obj);
  let button = parse_button(params)?;
  let position = parse_opt_point(params, "position")?;
  input::click(shared.host.as_ref(), &obj, button, position)?;
  Ok(Reply::for_object(json!({ "clicked": true }), path))
}

fn ui_send_keys(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let id = str_param(params, "objectId")?;
  let obj = shared.resolve_object(id)?;
  let (path, _) = shared.expose(&obj);

  if let Some(text) = opt_str_param(params, "text")? {
    input::send_text(shared.host.as_ref(), &obj, text)?;
    return Ok(Reply::for_object(json!({ "sent": true }), path));
  }
  if let Some(keys) = opt_str_param(params, "keys")? {
    input::send_key_sequence(shared.host.as_ref(), &obj, keys)?;
    return Ok(Reply::for_object(json!({ "sent": true }), path));
  }
  Err(ProbeError::InvalidParams(
    "either \"text\" or \"keys\" is required".into(),
  ))
}

fn ui_screenshot(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let obj = match opt_str_param(params, "objectId")? {
    Some(id) => shared.resolve_object(id)?,
    None => shared
      .host
      .active_window()
      .ok_or(ProbeError::NoActiveWindow)?,
  };
  let (path, _) = shared.expose(&obj);

  let region = match opt_str_param(params, "mode")?.unwrap_or("widget") {
    "widget" => CaptureRegion::Widget,
    "window" => CaptureRegion::Window,
    "windowLogical" => CaptureRegion::WindowLogical,
    "screen" => CaptureRegion::Screen,
    "region" => {
      let rect = params
        .get("rect")
        .ok_or_else(|| ProbeError::InvalidParams("mode \"region\" requires \"rect\"".into()))?;
      CaptureRegion::Region(parse_rect(rect)?)
    }
    other => {
      return Err(ProbeError::InvalidParams(format!(
        "unknown screenshot mode {other:?}"
      )));
    }
  };

  let image = capture::capture(shared.host.as_ref(), &obj, region)?;
  Ok(Reply::for_object(image, path))
}

fn ui_geometry(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let id = str_param(params, "objectId")?;
  let obj = shared.resolve_object(id)?;
  let (path, _) = shared.expose(&obj);
  let widget = obj
    .as_widget()
    .ok_or_else(|| ProbeError::NotAWidget(path.clone()))?;
  let local = widget.geometry();
  let global = widget.global_geometry();
  Ok(Reply::for_object(
    json!({
      "local": { "x": local.x, "y": local.y, "width": local.width, "height": local.height },
      "global": { "x": global.x, "y": global.y, "width": global.width, "height": global.height },
      "devicePixelRatio": shared.host.device_pixel_ratio(),
    }),
    path,
  ))
}

fn ui_hit_test(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let x = rpc::f64_param(params, "x")?;
  let y = rpc::f64_param(params, "y")?;
  let point = Point::new(x, y);
  let hit = widget_at_global(&shared.host.roots(), point)
    .ok_or_else(|| ProbeError::ObjectNotFound(format!("no widget at ({x}, {y})")))?;
  let (path, _) = shared.expose(&hit);
  Ok(Reply::for_object(
    json!({ "objectId": path.clone(), "className": hit.class_name() }),
    path,
  ))
}

/// Deepest visible widget containing a global point. Later siblings are
/// checked first, matching paint order.
pub(super) fn widget_at_global(roots: &[SharedObject], p: Point) -> Option<SharedObject> {
  fn descend(obj: &SharedObject, p: Point) -> Option<SharedObject> {
    match obj.as_widget() {
      Some(w) => {
        if !w.visible() || !w.global_geometry().contains(p) {
          return None;
        }
        let children = obj.children();
        for child in children.iter().rev() {
          if let Some(hit) = descend(child, p) {
            return Some(hit);
          }
        }
        Some(Arc::clone(obj))
      }
      None => {
        let children = obj.children();
        children.iter().rev().find_map(|c| descend(c, p))
      }
    }
  }
  roots.iter().find_map(|r| descend(r, p))
}

// === Names ===

fn names_register(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let name = str_param(params, "name")?;
  let id = str_param(params, "objectId")?;
  let overwrite = opt_bool_param(params, "overwrite")?.unwrap_or(true);
  // Normalize whatever id style the client used to a hierarchical path.
  let obj = shared.resolve_object(id)?;
  let path = shared.object_path(&obj);
  shared.names.register(name, &path, overwrite)?;
  Ok(Reply::new(json!({ "registered": true, "name": name, "path": path })))
}

fn names_unregister(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let name = str_param(params, "name")?;
  shared.names.unregister(name)?;
  Ok(Reply::new(json!({ "removed": true })))
}

fn names_list(shared: &Arc<ProbeShared>, _params: &Value) -> ProbeResult<Reply> {
  let names = shared.names.list();
  Ok(Reply::new(json!({
    "count": names.len(),
    "names": names,
  })))
}

fn names_validate(shared: &Arc<ProbeShared>, _params: &Value) -> ProbeResult<Reply> {
  let mut valid = Vec::new();
  let mut stale = Vec::new();
  for (name, path) in shared.names.list() {
    if shared.resolve_object(&path).is_ok() {
      valid.push(name);
    } else {
      stale.push(name);
    }
  }
  Ok(Reply::new(json!({ "valid": valid, "stale": stale })))
}

fn names_load(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let path = match opt_str_param(params, "path")? {
    Some(p) => std::path::PathBuf::from(p),
    None => shared.config.name_map_path.clone(),
  };
  let loaded = shared.names.load_file(&path)?;
  Ok(Reply::new(json!({ "loaded": loaded })))
}

fn names_save(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let path = match opt_str_param(params, "path")? {
    Some(p) => std::path::PathBuf::from(p),
    None => shared.config.name_map_path.clone(),
  };
  let saved = shared.names.save_file(&path)?;
  Ok(Reply::new(json!({
    "saved": saved,
    "path": path.display().to_string(),
  })))
}

// === Declarative scene items ===

fn qml_inspect(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  if !shared.host.supports_scene_items() {
    return Err(ProbeError::QmlNotAvailable);
  }
  if let Some(ctx) = opt_str_param(params, "context")? {
    // Named evaluation contexts are not exposed by the host seam.
    return Err(ProbeError::QmlContextNotFound(ctx.to_owned()));
  }
  let id = str_param(params, "objectId")?;
  let obj = shared.resolve_object(id)?;
  let (path, _) = shared.expose(&obj);
  let item = obj
    .as_item()
    .ok_or_else(|| ProbeError::NotQmlItem(path.clone()))?
    .item_info();
  let item = serde_json::to_value(item)
    .map_err(|e| ProbeError::Internal(format!("serializing item: {e}")))?;
  Ok(Reply::for_object(json!({ "item": item }), path))
}

// === Data models ===

fn models_list(shared: &Arc<ProbeShared>, _params: &Value) -> ProbeResult<Reply> {
  let mut models = Vec::new();
  for weak in shared.registry.all_objects() {
    let Some(obj) = weak.upgrade() else {
      continue;
    };
    if let Some(model) = obj.as_model() {
      models.push(json!({
        "id": shared.object_path(&obj),
        "className": obj.class_name(),
        "rows": model.row_count(),
        "columns": model.column_count(),
      }));
    }
  }
  Ok(Reply::new(json!({
    "count": models.len(),
    "models": models,
  })))
}

fn models_info(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let id = str_param(params, "objectId")?;
  let obj = shared
    .resolve_object(id)
    .map_err(|_| ProbeError::ModelNotFound(id.to_owned()))?;
  let (path, _) = shared.expose(&obj);
  let model = obj
    .as_model()
    .ok_or_else(|| ProbeError::NotAModel(path.clone()))?;
  Ok(Reply::for_object(
    json!({
      "rowCount": model.row_count(),
      "columnCount": model.column_count(),
      "roles": model.roles(),
    }),
    path,
  ))
}

fn models_data(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let id = str_param(params, "objectId")?;
  let row = opt_u64_param(params, "row")?
    .ok_or_else(|| ProbeError::InvalidParams("missing parameter \"row\"".into()))? as usize;
  let column = opt_u64_param(params, "column")?
    .ok_or_else(|| ProbeError::InvalidParams("missing parameter \"column\"".into()))?
    as usize;
  let role = opt_str_param(params, "role")?.unwrap_or("display");

  let obj = shared
    .resolve_object(id)
    .map_err(|_| ProbeError::ModelNotFound(id.to_owned()))?;
  let (path, _) = shared.expose(&obj);
  let model = obj
    .as_model()
    .ok_or_else(|| ProbeError::NotAModel(path.clone()))?;

  let (rows, cols) = (model.row_count(), model.column_count());
  if row >= rows || column >= cols {
    return Err(ProbeError::ModelIndexOutOfBounds {
      row,
      column,
      row_count: rows,
      column_count: cols,
    });
  }
  if !model.roles().iter().any(|r| r == role) {
    return Err(ProbeError::RoleNotFound(role.to_owned()));
  }

  let value = model
    .cell(row, column, role)
    .map_or(Value::Null, |v| inspect::value::to_json(&v));
  Ok(Reply::for_object(json!({ "value": value }), path))
}

// === Shared param parsing ===

fn resolve_opt_root(
  shared: &Arc<ProbeShared>,
  params: &Value,
) -> ProbeResult<Option<SharedObject>> {
  match opt_str_param(params, "root")? {
    Some(id) => Ok(Some(shared.resolve_object(id)?)),
    None => Ok(None),
  }
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

fn parse_opt_point(params: &Value, name: &str) -> ProbeResult<Option<Point>> {
  match params.get(name) {
    None | Some(Value::Null) => Ok(None),
    Some(v) => {
      let x = v.get("x").and_then(Value::as_f64);
      let y = v.get("y").and_then(Value::as_f64);
      match (x, y) {
        (Some(x), Some(y)) => Ok(Some(Point::new(x, y))),
        _ => Err(ProbeError::InvalidParams(format!(
          "parameter {name:?} must be {{x, y}}"
        ))),
      }
    }
  }
}

fn parse_rect(v: &Value) -> ProbeResult<Rect> {
  let get = |key: &str| v.get(key).and_then(Value::as_f64);
  match (get("x"), get("y"), get("width"), get("height")) {
    (Some(x), Some(y), Some(w), Some(h)) => Ok(Rect::new(x, y, w, h)),
    _ => Err(ProbeError::InvalidParams(
      "rect must be {x, y, width, height}".into(),
    )),
  }
}
