/*!
Live-object index.

Tracks every UI object in the process through weak handles. Entries are
created by the add-object hook at the start of construction, so only the
pointer and the observed class name are cached; everything else is read
live. Entries whose weak handle has nulled (tombstones) are filtered out
of every lookup and pruned opportunistically.

The mutex guards only the tables. It is never held across a dereference of
a host object.
*/

mod path;

pub(crate) use path::{navigate, object_path};

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::host::{object_addr, SharedObject, WeakObject};

/// One tracked object: a weak handle plus what was safe to cache at
/// registration time.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
  pub(crate) weak: WeakObject,
  pub(crate) class_name: String,
}

#[derive(Debug, Default)]
struct Tables {
  entries: HashMap<u64, Entry>,
  by_addr: HashMap<usize, u64>,
  next_serial: u64,
}

/// Index of all live UI objects, keyed by registration serial.
#[derive(Debug, Default)]
pub(crate) struct Registry {
  inner: Mutex<Tables>,
}

impl Registry {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Register an object. Idempotent per live address.
  pub(crate) fn insert(&self, obj: &SharedObject) {
    let addr = object_addr(obj);
    let class_name = obj.class_name();
    let mut tables = self.inner.lock();
    if tables.by_addr.contains_key(&addr) {
      return;
    }
    let serial = tables.next_serial;
    tables.next_serial += 1;
    tables.entries.insert(
      serial,
      Entry {
        weak: std::sync::Arc::downgrade(obj),
        class_name,
      },
    );
    tables.by_addr.insert(addr, serial);
  }

  /// Drop the entry for an object, returning its cached class name.
  pub(crate) fn remove(&self, obj: &SharedObject) -> Option<String> {
    self.remove_addr(object_addr(obj))
  }

  pub(crate) fn remove_addr(&self, addr: usize) -> Option<String> {
    let mut tables = self.inner.lock();
    let serial = tables.by_addr.remove(&addr)?;
    tables.entries.remove(&serial).map(|e| e.class_name)
  }

  /// Number of live entries (tombstones excluded).
  pub(crate) fn len(&self) -> usize {
    let tables = self.inner.lock();
    tables
      .entries
      .values()
      .filter(|e| e.weak.strong_count() > 0)
      .count()
  }

  /// Weak handles to every tracked object, pruning tombstones as a side
  /// effect. Callers must tolerate handles dying between enumeration and
  /// upgrade.
  pub(crate) fn all_objects(&self) -> Vec<WeakObject> {
    let mut tables = self.inner.lock();
    let dead: Vec<u64> = tables
      .entries
      .iter()
      .filter(|(_, e)| e.weak.strong_count() == 0)
      .map(|(serial, _)| *serial)
      .collect();
    for serial in dead {
      if let Some(entry) = tables.entries.remove(&serial) {
        let addr = tables
          .by_addr
          .iter()
          .find(|(_, s)| **s == serial)
          .map(|(a, _)| *a);
        if let Some(addr) = addr {
          tables.by_addr.remove(&addr);
        }
        drop(entry);
      }
    }
    tables.entries.values().map(|e| e.weak.clone()).collect()
  }

  /// Find a live object by its display name, optionally below `root`.
  pub(crate) fn find_by_display_name(
    &self,
    name: &str,
    root: Option<&SharedObject>,
  ) -> Option<SharedObject> {
    self
      .live_objects()
      .into_iter()
      .find(|obj| obj.object_name() == name && under_root(obj, root))
  }

  /// Find all live objects of an exact class, optionally below `root`.
  pub(crate) fn find_all_by_class(
    &self,
    class_name: &str,
    root: Option<&SharedObject>,
  ) -> Vec<SharedObject> {
    self
      .live_objects()
      .into_iter()
      .filter(|obj| obj.class_name() == class_name && under_root(obj, root))
      .collect()
  }

  fn live_objects(&self) -> Vec<SharedObject> {
    self
      .all_objects()
      .into_iter()
      .filter_map(|w| w.upgrade())
      .collect()
  }
}

/// Whether `obj` is `root` or one of its descendants. No root means yes.
fn under_root(obj: &SharedObject, root: Option<&SharedObject>) -> bool {
  let Some(root) = root else {
    return true;
  };
  let root_addr = object_addr(root);
  let mut cur = obj.clone();
  loop {
    if object_addr(&cur) == root_addr {
      return true;
    }
    match cur.parent() {
      Some(p) => cur = p,
      None => return false,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testutil::SimTree;

  #[test]
  fn insert_is_idempotent() {
    let tree = SimTree::sample();
    let registry = Registry::new();
    let button = tree.object("btn");
    registry.insert(&button);
    registry.insert(&button);
    assert_eq!(registry.len(), 1);
  }

  #[test]
  fn dead_objects_disappear_from_lookups() {
    let tree = SimTree::sample();
    let registry = Registry::new();
    for obj in tree.all() {
      registry.insert(&obj);
    }
    let before = registry.len();

    tree.destroy("btn");
    assert_eq!(registry.all_objects().len(), before - 1);
    assert!(registry.find_by_display_name("btn", None).is_none());
  }

  #[test]
  fn class_lookup_scopes_to_root() {
    let tree = SimTree::sample();
    let registry = Registry::new();
    for obj in tree.all() {
      registry.insert(&obj);
    }
    let window = tree.object("win");
    let buttons = registry.find_all_by_class("Button", Some(&window));
    assert!(!buttons.is_empty());
    for b in &buttons {
      assert_eq!(b.class_name(), "Button");
    }
  }
}
