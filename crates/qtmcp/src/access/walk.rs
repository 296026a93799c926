/*!
Accessibility tree walkers.

Builds pruned JSON trees of the visible accessibility graph, minting
`ref_N` handles as nodes are exposed, and implements the query, click,
form-input and navigation operations layered on top.
*/

use std::sync::Arc;

use serde_json::{json, Value};

use super::refs::RefStore;
use super::role::{Action, Role};
use crate::host::{Accessible, Host, MouseButton, StandardShortcut};
use crate::input;
use crate::types::{ProbeError, ProbeResult};

/// Hard ceiling on requested page depth.
pub(crate) const MAX_PAGE_DEPTH: usize = 15;
/// Depth used by text extraction and find, which do not mint per level.
const DEEP_WALK_DEPTH: usize = 30;
/// Matches beyond this cap fail the find instead of flooding the client.
const FIND_CAP: usize = 20;
/// Default cap on total emitted text for a page read.
pub(crate) const DEFAULT_MAX_CHARS: usize = 20_000;

/// Which nodes of the page get refs and appear in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PageFilter {
  All,
  Interactive,
}

impl PageFilter {
  pub(crate) fn parse(s: &str) -> Option<Self> {
    match s {
      "all" => Some(Self::All),
      "interactive" => Some(Self::Interactive),
      _ => None,
    }
  }
}

/// Parameters for a page read.
#[derive(Debug, Clone)]
pub(crate) struct PageParams {
  pub(crate) ref_id: Option<String>,
  pub(crate) filter: PageFilter,
  pub(crate) depth: usize,
  pub(crate) max_chars: usize,
}

impl Default for PageParams {
  fn default() -> Self {
    Self {
      ref_id: None,
      filter: PageFilter::All,
      depth: MAX_PAGE_DEPTH,
      max_chars: DEFAULT_MAX_CHARS,
    }
  }
}

struct WalkCtx<'a> {
  refs: &'a RefStore,
  filter: PageFilter,
  max_chars: usize,
  chars: usize,
  nodes: usize,
  truncated: bool,
}

/// Read the accessibility tree under the active window (or a previously
/// exposed node). Clears every existing ref before walking.
pub(crate) fn read_page(
  host: &dyn Host,
  refs: &RefStore,
  params: &PageParams,
) -> ProbeResult<Value> {
  if params.depth > MAX_PAGE_DEPTH {
    return Err(ProbeError::TreeTooLarge(format!(
      "requested depth {} exceeds {MAX_PAGE_DEPTH}",
      params.depth
    )));
  }

  // Resolve the scope node before clearing; its ref dies with the clear.
  let root = match &params.ref_id {
    Some(r) => refs.resolve_str(r)?,
    None => active_window_accessible(host)?,
  };
  refs.clear();

  let mut ctx = WalkCtx {
    refs,
    filter: params.filter,
    max_chars: params.max_chars,
    chars: 0,
    nodes: 0,
    truncated: false,
  };
  let tree = walk_node(&root, params.depth, &mut ctx).unwrap_or(Value::Null);

  Ok(json!({
    "tree": tree,
    "totalNodes": ctx.nodes,
    "truncated": ctx.truncated,
  }))
}

/// Case-insensitive substring search over the active window's tree.
/// Existing refs are preserved; matches mint new refs past the current
/// maximum.
pub(crate) fn find(host: &dyn Host, refs: &RefStore, query: &str) -> ProbeResult<Value> {
  let root = active_window_accessible(host)?;
  let needle = query.to_lowercase();

  let mut matches = Vec::new();
  collect_matches(&root, &needle, DEEP_WALK_DEPTH, &mut matches);

  if matches.len() > FIND_CAP {
    return Err(ProbeError::FindTooManyResults {
      count: matches.len(),
      cap: FIND_CAP,
    });
  }

  let rendered: Vec<Value> = matches
    .into_iter()
    .map(|iface| {
      let r = refs.mint(iface.clone());
      let mut node = json!({
        "ref": r.to_string(),
        "role": iface.role().as_str(),
        "className": node_class(&iface),
      });
      if let Some(name) = iface.name() {
        node["name"] = json!(name);
      }
      if let Some(obj_name) = node_object_name(&iface) {
        node["objectName"] = json!(obj_name);
      }
      if let Some(b) = iface.bounds() {
        node["bounds"] = json!({ "x": b.x, "y": b.y, "width": b.width, "height": b.height });
      }
      if let Some(states) = iface.states().to_json() {
        node["states"] = states;
      }
      node
    })
    .collect();

  Ok(json!({ "count": rendered.len(), "matches": rendered }))
}

/// Concatenated text of visible text-bearing nodes, newline separated.
pub(crate) fn page_text(host: &dyn Host) -> ProbeResult<Value> {
  let root = active_window_accessible(host)?;
  let mut lines = Vec::new();
  collect_text(&root, DEEP_WALK_DEPTH, &mut lines);
  Ok(json!({ "text": lines.join("\n") }))
}

/// Activate a node: accessibility press when available, else a synthetic
/// mouse click at the node's center.
pub(crate) fn click(host: &dyn Host, refs: &RefStore, ref_str: &str) -> ProbeResult<Value> {
  let iface = refs.resolve_str(ref_str)?;

  if iface.actions().contains(&Action::Press) && iface.perform(Action::Press) {
    return Ok(json!({ "clicked": true, "method": "action" }));
  }

  let obj = iface
    .object()
    .upgrade()
    .ok_or_else(|| ProbeError::RefStale(ref_str.to_owned()))?;
  let widget = obj
    .as_widget()
    .ok_or_else(|| ProbeError::NotAWidget(ref_str.to_owned()))?;
  let bounds = iface
    .bounds()
    .ok_or_else(|| ProbeError::FormInputUnsupported("node has no geometry".into()))?;
  let origin = widget.global_geometry();
  let center = bounds.center();
  let local = crate::types::Point::new(center.x - origin.x, center.y - origin.y);
  input::click(host, &obj, MouseButton::Left, Some(local))?;
  Ok(json!({ "clicked": true, "method": "mouse" }))
}

/// Type-directed form input. Strategies are tried in a fixed order; when
/// none applies the call fails with `FormInputUnsupported`.
pub(crate) fn form_input(refs: &RefStore, ref_str: &str, value: &Value) -> ProbeResult<Value> {
  let iface = refs.resolve_str(ref_str)?;

  // Choice widgets match the string against option labels first.
  if iface.role() == Role::ComboBox {
    let wanted = value
      .as_str()
      .map(str::to_owned)
      .unwrap_or_else(|| value.to_string());
    let wanted_lower = wanted.to_lowercase();
    let options = iface.option_texts();
    if let Some(index) = options.iter().position(|o| o.to_lowercase() == wanted_lower) {
      if iface.select_option(index) {
        return Ok(json!({ "success": true, "method": "comboSelect", "index": index }));
      }
    }
    if iface.editable() && iface.replace_text(&wanted) {
      return Ok(json!({ "success": true, "method": "comboText" }));
    }
    return Err(ProbeError::FormInputUnsupported(format!(
      "no option matches {wanted:?} and the box is not editable"
    )));
  }

  if let Some(wanted) = value.as_bool() {
    if iface.actions().contains(&Action::Toggle) {
      let current = iface.states().checked;
      if current == wanted {
        return Ok(json!({ "success": true, "method": "toggle", "changed": false }));
      }
      if iface.perform(Action::Toggle) {
        return Ok(json!({ "success": true, "method": "toggle", "changed": true }));
      }
      return Err(ProbeError::FormInputUnsupported("toggle refused".into()));
    }
  }

  if let Some(number) = value.as_f64() {
    if !value.is_string() && iface.numeric_value().is_some() {
      if iface.set_numeric_value(number) {
        return Ok(json!({ "success": true, "method": "value" }));
      }
      return Err(ProbeError::FormInputUnsupported(
        "value interface refused the number".into(),
      ));
    }
  }

  if let Some(text) = value.as_str() {
    if iface.replace_text(text) {
      return Ok(json!({ "success": true, "method": "text" }));
    }
    if iface.set_value_string(text) {
      return Ok(json!({ "success": true, "method": "valueString" }));
    }
  }

  Err(ProbeError::FormInputUnsupported(format!(
    "no strategy for {} on role {}",
    value_kind(value),
    iface.role().as_str()
  )))
}

/// Tab/menu activation and history navigation.
pub(crate) fn navigate(
  host: &dyn Host,
  refs: &RefStore,
  action: &str,
  ref_str: Option<&str>,
) -> ProbeResult<Value> {
  match action {
    "activateTab" | "activateMenuItem" => {
      let r = ref_str.ok_or_else(|| {
        ProbeError::InvalidParams(format!("{action} requires a ref parameter"))
      })?;
      let iface = refs.resolve_str(r)?;
      if iface.perform(Action::Press) {
        Ok(json!({ "navigated": true, "action": action }))
      } else {
        Err(ProbeError::NavigateInvalid(action.to_owned()))
      }
    }
    "back" | "forward" => {
      let shortcut = if action == "back" {
        StandardShortcut::Back
      } else {
        StandardShortcut::Forward
      };
      if host.trigger_shortcut(shortcut) {
        Ok(json!({ "navigated": true, "action": action }))
      } else {
        Err(ProbeError::NavigateInvalid(action.to_owned()))
      }
    }
    other => Err(ProbeError::InvalidParams(format!(
      "unknown navigate action {other:?}"
    ))),
  }
}

/// Top-level window summary for orientation.
pub(crate) fn tabs_context(host: &dyn Host) -> Value {
  let active = host.active_window();
  let windows: Vec<Value> = host
    .roots()
    .iter()
    .filter_map(|root| {
      let widget = root.as_widget()?;
      if !widget.is_window() || !widget.visible() {
        return None;
      }
      let g = widget.global_geometry();
      let mut entry = json!({
        "windowTitle": widget.window_title().unwrap_or_default(),
        "className": root.class_name(),
        "isActive": active
          .as_ref()
          .is_some_and(|a| crate::host::object_addr(a) == crate::host::object_addr(root)),
        "geometry": { "x": g.x, "y": g.y, "width": g.width, "height": g.height },
      });
      let name = root.object_name();
      if !name.is_empty() {
        entry["objectName"] = json!(name);
      }
      Some(entry)
    })
    .collect();
  json!({ "count": windows.len(), "windows": windows })
}

fn active_window_accessible(host: &dyn Host) -> ProbeResult<Arc<dyn Accessible>> {
  let window = host.active_window().ok_or(ProbeError::NoActiveWindow)?;
  host
    .accessible(&window)
    .ok_or_else(|| ProbeError::Internal("active window has no accessibility interface".into()))
}

fn walk_node(iface: &Arc<dyn Accessible>, depth_left: usize, ctx: &mut WalkCtx<'_>) -> Option<Value> {
  if ctx.truncated || !iface.is_valid() || !iface.visible() {
    return None;
  }

  let role = iface.role();
  let name = iface.name();
  let text = iface.text();

  let charge = name.as_deref().map_or(0, str::len) + text.as_deref().map_or(0, str::len);
  if ctx.nodes > 0 && ctx.chars + charge > ctx.max_chars {
    ctx.truncated = true;
    return None;
  }
  ctx.chars += charge;

  let minted = match ctx.filter {
    PageFilter::All => Some(ctx.refs.mint(iface.clone())),
    PageFilter::Interactive if role.is_interactive() => Some(ctx.refs.mint(iface.clone())),
    PageFilter::Interactive => None,
  };

  let mut children = Vec::new();
  if depth_left > 0 {
    for i in 0..iface.child_count() {
      if let Some(child) = iface.child(i) {
        if let Some(rendered) = walk_node(&child, depth_left - 1, ctx) {
          children.push(rendered);
        }
      }
    }
  }

  // Interactive filter keeps a non-interactive node only as scaffolding
  // around kept descendants.
  if ctx.filter == PageFilter::Interactive && minted.is_none() && children.is_empty() {
    return None;
  }

  ctx.nodes += 1;
  let mut node = json!({
    "role": role.as_str(),
    "className": node_class(iface),
  });
  if let Some(r) = minted {
    node["ref"] = json!(r.to_string());
  }
  if let Some(name) = name {
    node["name"] = json!(name);
  }
  if let Some(obj_name) = node_object_name(iface) {
    node["objectName"] = json!(obj_name);
  }
  if let Some(b) = iface.bounds() {
    node["bounds"] = json!({ "x": b.x, "y": b.y, "width": b.width, "height": b.height });
  }
  if let Some(states) = iface.states().to_json() {
    node["states"] = states;
  }
  if !children.is_empty() {
    node["children"] = Value::Array(children);
  }
  Some(node)
}

fn collect_matches(
  iface: &Arc<dyn Accessible>,
  needle: &str,
  depth_left: usize,
  out: &mut Vec<Arc<dyn Accessible>>,
) {
  if !iface.is_valid() || !iface.visible() {
    return;
  }
  let haystacks = [
    iface.name(),
    Some(iface.role().as_str().to_owned()),
    iface.description(),
    node_object_name(iface),
    Some(node_class(iface)),
  ];
  let hit = haystacks
    .iter()
    .flatten()
    .any(|h| h.to_lowercase().contains(needle));
  if hit {
    out.push(iface.clone());
  }
  if depth_left > 0 {
    for i in 0..iface.child_count() {
      if let Some(child) = iface.child(i) {
        collect_matches(&child, needle, depth_left - 1, out);
      }
    }
  }
}

fn collect_text(iface: &Arc<dyn Accessible>, depth_left: usize, out: &mut Vec<String>) {
  if !iface.is_valid() || !iface.visible() {
    return;
  }
  if iface.role().is_text_bearing() {
    if let Some(line) = iface.text().or_else(|| iface.name()) {
      if !line.is_empty() {
        out.push(line);
      }
    }
  }
  if depth_left > 0 {
    for i in 0..iface.child_count() {
      if let Some(child) = iface.child(i) {
        collect_text(&child, depth_left - 1, out);
      }
    }
  }
}

fn node_class(iface: &Arc<dyn Accessible>) -> String {
  iface
    .object()
    .upgrade()
    .map(|o| o.class_name())
    .unwrap_or_default()
}

fn node_object_name(iface: &Arc<dyn Accessible>) -> Option<String> {
  let obj = iface.object().upgrade()?;
  let name = obj.object_name();
  if name.is_empty() {
    None
  } else {
    Some(name)
  }
}

fn value_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "bool",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}
