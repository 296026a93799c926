/*!
Three-style object id resolution.

A single entry point accepts any of the client-visible naming styles and
dispatches on the parsed variant: `#N` numeric refs hit the session table,
exact alias matches recurse into the alias's bound path, and everything
else is navigated as a hierarchical path.
*/

use parking_lot::Mutex;

use crate::host::SharedObject;
use crate::names::NameMap;
use crate::registry;
use crate::session::Session;
use crate::types::{ObjectId, ObjectRef, ProbeError, ProbeResult};

/// Aliases may point at aliases; cap the chase.
const MAX_ALIAS_DEPTH: usize = 8;

/// Classify a client-supplied id string.
pub(crate) fn parse(names: &NameMap, s: &str) -> ObjectId {
  if let Some(r) = ObjectRef::parse(s) {
    return ObjectId::Numeric(r.0);
  }
  if names.get(s).is_some() {
    return ObjectId::Alias(s.to_owned());
  }
  ObjectId::Path(s.to_owned())
}

/// Resolve any id style to a live object.
pub(crate) fn resolve(
  roots: &[SharedObject],
  names: &NameMap,
  session: &Mutex<Session>,
  id: &str,
) -> ProbeResult<SharedObject> {
  resolve_inner(roots, names, session, id, 0)
}

fn resolve_inner(
  roots: &[SharedObject],
  names: &NameMap,
  session: &Mutex<Session>,
  id: &str,
  depth: usize,
) -> ProbeResult<SharedObject> {
  if depth > MAX_ALIAS_DEPTH {
    return Err(ProbeError::ObjectNotFound(format!("{id} (alias loop)")));
  }
  match parse(names, id) {
    ObjectId::Numeric(n) => session.lock().resolve(n),
    ObjectId::Alias(alias) => {
      let target = names
        .get(&alias)
        .ok_or_else(|| ProbeError::NameNotFound(alias.clone()))?;
      resolve_inner(roots, names, session, &target, depth + 1)
        .map_err(|_| ProbeError::ObjectNotFound(format!("{alias} -> {target}")))
    }
    ObjectId::Path(path) => registry::navigate(roots, &path)
      .ok_or_else(|| ProbeError::ObjectNotFound(path.clone())),
  }
}
