/*!
Hierarchical path generation and navigation.

A path is `/`-separated segments from a top-level root down to the object.
Each segment is the display name when set, else `text_<prefix>` when a text
property is set, else the class name with `#index` disambiguating identical
unnamed siblings in construction order (index 1 omitted).

Paths are recomputed from the live parent chain on every call. Display
names can change after construction, so caching here would go stale.
*/

use std::sync::Arc;

use crate::host::{PropValue, SharedObject};

const TEXT_SEGMENT_CHARS: usize = 20;

/// Compute the current hierarchical path of a live object.
pub(crate) fn object_path(obj: &SharedObject) -> String {
  let mut chain = Vec::new();
  let mut cur = obj.clone();
  loop {
    chain.push(cur.clone());
    match cur.parent() {
      Some(p) => cur = p,
      None => break,
    }
  }
  chain.reverse();

  let mut parts = Vec::with_capacity(chain.len());
  for node in &chain {
    let siblings = match node.parent() {
      Some(p) => p.children(),
      None => vec![node.clone()],
    };
    parts.push(segment_for(node, &siblings));
  }
  format!("/{}", parts.join("/"))
}

/// Walk a path down from the given roots. `None` when any segment fails to
/// match a live child.
pub(crate) fn navigate(roots: &[SharedObject], path: &str) -> Option<SharedObject> {
  let trimmed = path.strip_prefix('/').unwrap_or(path);
  if trimmed.is_empty() {
    return None;
  }
  let mut segments = trimmed.split('/');
  let first = segments.next()?;

  let mut current = roots
    .iter()
    .find(|r| segment_for(r, std::slice::from_ref(*r)) == first)?
    .clone();

  for seg in segments {
    let children = current.children();
    current = children
      .iter()
      .find(|c| segment_for(c, &children) == seg)?
      .clone();
  }
  Some(current)
}

/// Segment for one node given its sibling list (construction order).
fn segment_for(node: &SharedObject, siblings: &[SharedObject]) -> String {
  let name = node.object_name();
  if !name.is_empty() {
    return name.replace('/', "_");
  }

  if let Some(text) = text_of(node) {
    return format!("text_{}", sanitize_text(&text));
  }

  let class = node.class_name();
  let mut index = 1;
  for sib in siblings {
    if Arc::ptr_eq(sib, node) {
      break;
    }
    if sib.object_name().is_empty() && text_of(sib).is_none() && sib.class_name() == class {
      index += 1;
    }
  }
  if index == 1 {
    class
  } else {
    format!("{class}#{index}")
  }
}

fn text_of(node: &SharedObject) -> Option<String> {
  match node.read_property("text") {
    Some(PropValue::Str(s)) if !s.is_empty() => Some(s),
    _ => None,
  }
}

/// First characters of a text property, non-alphanumerics replaced.
fn sanitize_text(text: &str) -> String {
  text
    .chars()
    .take(TEXT_SEGMENT_CHARS)
    .map(|c| if c.is_alphanumeric() { c } else { '_' })
    .collect()
}
