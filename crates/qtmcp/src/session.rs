/*!
Per-client session state.

Numeric `#N` refs, the id cache used for destroyed notifications, and the
counters behind them live only between connect and disconnect. `reset`
implements the disconnect cleanup for this slice of state.
*/

use std::collections::HashMap;

use crate::host::{object_addr, SharedObject, WeakObject};
use crate::types::{ObjectRef, ProbeError, ProbeResult};

/// Session-scoped tables for one client.
#[derive(Debug)]
pub(crate) struct Session {
  numeric: HashMap<u64, WeakObject>,
  by_addr: HashMap<usize, u64>,
  next_ref: u64,
  /// Last hierarchical path exposed for an address, for destroyed
  /// notifications (dead objects cannot compute their own id).
  id_cache: HashMap<usize, String>,
}

impl Session {
  pub(crate) fn new() -> Self {
    Self {
      numeric: HashMap::new(),
      by_addr: HashMap::new(),
      next_ref: 1,
      id_cache: HashMap::new(),
    }
  }

  /// Mint a numeric ref for an object, reusing the ref from an earlier
  /// exposure of the same live object. Also remembers the path for later
  /// destroyed notifications.
  pub(crate) fn mint(&mut self, obj: &SharedObject, path: &str) -> ObjectRef {
    let addr = object_addr(obj);
    self.id_cache.insert(addr, path.to_owned());
    if let Some(&n) = self.by_addr.get(&addr) {
      return ObjectRef(n);
    }
    let n = self.next_ref;
    self.next_ref += 1;
    self.numeric.insert(n, std::sync::Arc::downgrade(obj));
    self.by_addr.insert(addr, n);
    ObjectRef(n)
  }

  /// Resolve `#n`. Unknown refs and dead targets are distinct errors.
  pub(crate) fn resolve(&self, n: u64) -> ProbeResult<SharedObject> {
    let label = ObjectRef(n).to_string();
    match self.numeric.get(&n) {
      None => Err(ProbeError::ObjectNotFound(label)),
      Some(weak) => weak.upgrade().ok_or(ProbeError::ObjectStale(label)),
    }
  }

  /// Take the cached path for a dying object and unlink its address so a
  /// recycled allocation cannot collide. The numeric entry stays: its weak
  /// handle is already dead and resolves to `ObjectStale`.
  pub(crate) fn forget(&mut self, addr: usize) -> Option<String> {
    self.by_addr.remove(&addr);
    self.id_cache.remove(&addr)
  }

  pub(crate) fn numeric_count(&self) -> usize {
    self.numeric.len()
  }

  /// Disconnect cleanup: all refs and caches gone, counter restarts.
  pub(crate) fn reset(&mut self) {
    self.numeric.clear();
    self.by_addr.clear();
    self.id_cache.clear();
    self.next_ref = 1;
  }
}
