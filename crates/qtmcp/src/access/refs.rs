/*!
Ephemeral accessibility ref store.

Two tables keyed by the same counter: ref to accessibility interface, and
ref to the underlying object's weak handle. `read_page` clears both and
restarts the counter at 1; `find` appends, continuing from the current
maximum so earlier refs stay resolvable. Everything is cleared when the
client disconnects.
*/

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::host::{Accessible, WeakObject};
use crate::types::{AccessRef, ProbeError, ProbeResult};

#[derive(Default)]
struct RefTables {
  interfaces: HashMap<u64, Arc<dyn Accessible>>,
  objects: HashMap<u64, WeakObject>,
  next: u64,
}

/// Session-scoped store of minted `ref_N` handles.
#[derive(Default)]
pub(crate) struct RefStore {
  inner: Mutex<RefTables>,
}

impl std::fmt::Debug for RefStore {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RefStore")
      .field("len", &self.len())
      .finish()
  }
}

impl RefStore {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Drop all refs and restart the counter at 1. Page reads do this before
  /// walking.
  pub(crate) fn clear(&self) {
    let mut tables = self.inner.lock();
    tables.interfaces.clear();
    tables.objects.clear();
    tables.next = 0;
  }

  /// Mint the next ref for an interface.
  pub(crate) fn mint(&self, iface: Arc<dyn Accessible>) -> AccessRef {
    let mut tables = self.inner.lock();
    tables.next += 1;
    let n = tables.next;
    tables.objects.insert(n, iface.object());
    tables.interfaces.insert(n, iface);
    AccessRef(n)
  }

  /// Resolve a ref to its interface. Unknown refs and dead targets are
  /// distinct errors.
  pub(crate) fn resolve(&self, r: AccessRef) -> ProbeResult<Arc<dyn Accessible>> {
    let label = r.to_string();
    let tables = self.inner.lock();
    let iface = tables
      .interfaces
      .get(&r.0)
      .cloned()
      .ok_or(ProbeError::RefNotFound(label.clone()))?;
    let object_alive = tables
      .objects
      .get(&r.0)
      .is_some_and(|w| w.strong_count() > 0);
    drop(tables);
    if !object_alive || !iface.is_valid() {
      return Err(ProbeError::RefStale(label));
    }
    Ok(iface)
  }

  /// Parse and resolve a `ref_N` string.
  pub(crate) fn resolve_str(&self, s: &str) -> ProbeResult<Arc<dyn Accessible>> {
    let r = AccessRef::parse(s).ok_or_else(|| ProbeError::RefNotFound(s.to_owned()))?;
    self.resolve(r)
  }

  pub(crate) fn len(&self) -> usize {
    self.inner.lock().interfaces.len()
  }

  /// Highest ref minted so far, 0 when empty.
  pub(crate) fn current_max(&self) -> u64 {
    self.inner.lock().next
  }

  /// Disconnect cleanup.
  pub(crate) fn reset(&self) {
    self.clear();
  }
}
