/*!
Signal monitoring and lifecycle notifications.

Subscriptions bind a client-visible object id and a signal to a `sub_N`
handle. The sink installed on the host only formats a notification frame
and enqueues it on the outbound broadcast channel; delivery to the
transport happens on its own task, never inside the emitting call stack.

Destroying an object drops all of its subscriptions before any destroyed
lifecycle notification goes out.
*/

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::broadcast;

use crate::host::{object_addr, SharedObject, SignalConnection, SignalSink};
use crate::inspect::value;
use crate::rpc::envelope;
use crate::types::{ProbeError, ProbeResult, SubscriptionId};

const NOTIFICATION_CAPACITY: usize = 1024;

#[derive(Debug)]
struct Subscription {
  addr: usize,
  object_id: String,
  signal: String,
  _connection: SignalConnection,
}

#[derive(Debug)]
struct SubTable {
  next: u64,
  subs: HashMap<u64, Subscription>,
}

/// Signal subscription table and notification source.
#[derive(Debug)]
pub(crate) struct Monitor {
  table: Mutex<SubTable>,
  lifecycle: AtomicBool,
  outbound: broadcast::Sender<String>,
}

impl Monitor {
  pub(crate) fn new() -> Self {
    let (outbound, _) = broadcast::channel(NOTIFICATION_CAPACITY);
    Self {
      table: Mutex::new(SubTable {
        next: 1,
        subs: HashMap::new(),
      }),
      lifecycle: AtomicBool::new(false),
      outbound,
    }
  }

  /// Receiver for outbound notification frames.
  pub(crate) fn notifications(&self) -> broadcast::Receiver<String> {
    self.outbound.subscribe()
  }

  /// Subscribe to a named signal on an object.
  pub(crate) fn subscribe(
    &self,
    obj: &SharedObject,
    object_id: &str,
    signal: &str,
  ) -> ProbeResult<SubscriptionId> {
    let known = obj.signals().iter().any(|s| s.name == signal);
    if !known {
      return Err(ProbeError::SignalNotFound {
        object: object_id.to_owned(),
        name: signal.to_owned(),
      });
    }

    let id = {
      let mut table = self.table.lock();
      let id = SubscriptionId(table.next);
      table.next += 1;
      id
    };

    let sink: SignalSink = {
      let outbound = self.outbound.clone();
      let sub_label = id.to_string();
      let object_id = object_id.to_owned();
      let signal = signal.to_owned();
      std::sync::Arc::new(move |args| {
        let arguments: Vec<serde_json::Value> = args.iter().map(value::to_json).collect();
        let params = json!({
          "subscriptionId": sub_label,
          "objectId": object_id,
          "signal": signal,
          "arguments": arguments,
          "timestamp": envelope::timestamp_ms(),
        });
        // Enqueue only; a full channel drops the frame, never blocks the
        // emitting thread.
        let _ = outbound.send(envelope::notification("qtmcp.signalEmitted", params));
      })
    };

    let connection = obj
      .connect(signal, sink)
      .ok_or_else(|| ProbeError::SignalNotFound {
        object: object_id.to_owned(),
        name: signal.to_owned(),
      })?;

    let mut table = self.table.lock();
    table.subs.insert(
      id.0,
      Subscription {
        addr: object_addr(obj),
        object_id: object_id.to_owned(),
        signal: signal.to_owned(),
        _connection: connection,
      },
    );
    Ok(id)
  }

  /// Remove a subscription. A second call with the same id is a no-op.
  pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
    self.table.lock().subs.remove(&id.0).is_some()
  }

  pub(crate) fn subscription_count(&self) -> usize {
    self.table.lock().subs.len()
  }

  pub(crate) fn set_lifecycle(&self, enabled: bool) {
    self.lifecycle.store(enabled, Ordering::Relaxed);
  }

  pub(crate) fn lifecycle_enabled(&self) -> bool {
    self.lifecycle.load(Ordering::Relaxed)
  }

  /// Drop every subscription on a dying object, returning one of the cached
  /// object ids for the destroyed notification.
  pub(crate) fn drop_for_object(&self, addr: usize) -> Option<String> {
    let mut table = self.table.lock();
    let dead: Vec<u64> = table
      .subs
      .iter()
      .filter(|(_, s)| s.addr == addr)
      .map(|(id, _)| *id)
      .collect();
    let mut cached_id = None;
    for id in dead {
      if let Some(sub) = table.subs.remove(&id) {
        cached_id.get_or_insert(sub.object_id);
      }
    }
    cached_id
  }

  /// Emit an object-created lifecycle notification if enabled.
  pub(crate) fn notify_created(&self, object_id: Option<&str>, class_name: &str) {
    if !self.lifecycle_enabled() {
      return;
    }
    let mut params = json!({
      "className": class_name,
      "event": "created",
      "timestamp": envelope::timestamp_ms(),
    });
    if let Some(id) = object_id {
      params["objectId"] = json!(id);
    }
    let _ = self
      .outbound
      .send(envelope::notification("qtmcp.objectCreated", params));
  }

  /// Emit an object-destroyed lifecycle notification if enabled. The id is
  /// present only when the object was exposed to the client before death.
  pub(crate) fn notify_destroyed(&self, object_id: Option<&str>, class_name: &str) {
    if !self.lifecycle_enabled() {
      return;
    }
    let mut params = json!({
      "className": class_name,
      "event": "destroyed",
      "timestamp": envelope::timestamp_ms(),
    });
    if let Some(id) = object_id {
      params["objectId"] = json!(id);
    }
    let _ = self
      .outbound
      .send(envelope::notification("qtmcp.objectDestroyed", params));
  }

  /// Disconnect cleanup: every subscription dropped, lifecycle off,
  /// `sub_N` counter restarts for the next client.
  pub(crate) fn reset(&self) {
    let mut table = self.table.lock();
    table.subs.clear();
    table.next = 1;
    drop(table);
    self.set_lifecycle(false);
  }

  /// Registered signal names for a subscription, for diagnostics.
  #[cfg(test)]
  pub(crate) fn signal_of(&self, id: SubscriptionId) -> Option<String> {
    self.table.lock().subs.get(&id.0).map(|s| s.signal.clone())
  }
}
