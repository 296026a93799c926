/*!
Object lifecycle hooks.

Installs the probe's creation/destruction callbacks into the host and
fans events out to the registry, the signal monitor, and the session id
cache. The host chains the callbacks behind any previously installed
consumer (the prior callback runs first); installation here is
idempotent per probe.

The added callback fires at the start of construction, before the
derived object is fully built, so only the pointer and the observed
class name are taken at that point. Ids are recomputed from the live
parent chain when needed, never cached here.
*/

use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::host::{object_addr, HookSink, SharedObject};
use crate::probe::ProbeShared;
use crate::registry::{self, Registry};

/// Install the lifecycle hooks into the host. A second call is a no-op.
pub(crate) fn install(shared: &Arc<ProbeShared>) {
  if shared.hooks_installed.swap(true, Ordering::SeqCst) {
    return;
  }

  let added_target = Arc::downgrade(shared);
  let removed_target = Arc::downgrade(shared);
  shared.host.install_hooks(HookSink {
    object_added: Arc::new(move |obj| {
      if let Some(s) = added_target.upgrade() {
        object_added(&s, obj);
      }
    }),
    object_removed: Arc::new(move |obj| {
      if let Some(s) = removed_target.upgrade() {
        object_removed(&s, obj);
      }
    }),
  });
}

/// Register `obj` and every descendant. Run once at startup to catch
/// objects constructed before the hooks existed.
pub(crate) fn scan_existing(registry: &Registry, obj: &SharedObject) {
  registry.insert(obj);
  for child in obj.children() {
    scan_existing(registry, &child);
  }
}

fn object_added(shared: &ProbeShared, obj: &SharedObject) {
  shared.registry.insert(obj);
  if shared.monitor.lifecycle_enabled() {
    // Still under construction; the path is whatever the current parent
    // chain yields.
    let path = registry::object_path(obj);
    shared.monitor.notify_created(Some(&path), &obj.class_name());
  }
}

fn object_removed(shared: &ProbeShared, obj: &SharedObject) {
  let addr = object_addr(obj);
  let class_name = shared
    .registry
    .remove(obj)
    .unwrap_or_else(|| obj.class_name());

  // Subscriptions go first; only then may a destroyed notification fire.
  let sub_cached = shared.monitor.drop_for_object(addr);
  let session_cached = shared.session.lock().forget(addr);
  let cached_id = sub_cached.or(session_cached);
  shared
    .monitor
    .notify_destroyed(cached_id.as_deref(), &class_name);
}
