/*!
The probe instance.

Owns every subsystem and wires the host's lifecycle hooks into them.
`handle_message` is synchronous and must run on the host's UI thread; the
transport enqueues frames through [`Probe::enqueue`] and the host drains
them with [`Probe::pump`] from its event loop. Clone is cheap (Arc bumps).
*/

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::access::RefStore;
use crate::api;
use crate::config::Config;
use crate::hooks;
use crate::host::{Host, LogSink, SharedObject};
use crate::logbuf::LogBuffer;
use crate::monitor::Monitor;
use crate::names::NameMap;
use crate::registry::{self, Registry};
use crate::resolver;
use crate::rpc::Dispatcher;
use crate::session::Session;
use crate::types::{ObjectRef, ProbeResult};

/// Queued frame from the transport: raw text plus its reply slot.
type InboxItem = (String, oneshot::Sender<Option<String>>);

/// Everything the API handlers reach for.
pub(crate) struct ProbeShared {
  pub(crate) host: Arc<dyn Host>,
  pub(crate) config: Config,
  pub(crate) registry: Registry,
  pub(crate) names: NameMap,
  pub(crate) monitor: Monitor,
  pub(crate) refs: RefStore,
  pub(crate) session: Mutex<Session>,
  pub(crate) logbuf: LogBuffer,
  pub(crate) hooks_installed: AtomicBool,
}

impl std::fmt::Debug for ProbeShared {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ProbeShared")
      .field("config", &self.config)
      .finish_non_exhaustive()
  }
}

impl ProbeShared {
  /// Resolve any of the three id styles to a live object.
  pub(crate) fn resolve_object(&self, id: &str) -> ProbeResult<SharedObject> {
    let roots = self.host.roots();
    resolver::resolve(&roots, &self.names, &self.session, id)
  }

  /// Current hierarchical path of a live object.
  pub(crate) fn object_path(&self, obj: &SharedObject) -> String {
    registry::object_path(obj)
  }

  /// Expose an object to the client: compute its path and mint (or reuse)
  /// its session numeric ref.
  pub(crate) fn expose(&self, obj: &SharedObject) -> (String, ObjectRef) {
    let path = self.object_path(obj);
    let num = self.session.lock().mint(obj, &path);
    (path, num)
  }

  /// Standard object summary used by listing endpoints.
  pub(crate) fn object_summary(&self, obj: &SharedObject) -> Value {
    let (path, num) = self.expose(obj);
    let mut summary = json!({
      "id": path,
      "ref": num.to_string(),
      "className": obj.class_name(),
    });
    let name = obj.object_name();
    if !name.is_empty() {
      summary["objectName"] = json!(name);
    }
    summary
  }

  /// Disconnect cleanup: session refs, accessibility refs, subscriptions,
  /// and the lifecycle toggle all reset.
  pub(crate) fn disconnect_cleanup(&self) {
    self.session.lock().reset();
    self.refs.reset();
    self.monitor.reset();
  }
}

/// In-process introspection and remote-control probe.
pub struct Probe {
  shared: Arc<ProbeShared>,
  dispatcher: Arc<Dispatcher>,
  inbox_tx: mpsc::UnboundedSender<InboxItem>,
  inbox_rx: Arc<Mutex<mpsc::UnboundedReceiver<InboxItem>>>,
}

impl Clone for Probe {
  fn clone(&self) -> Self {
    Self {
      shared: Arc::clone(&self.shared),
      dispatcher: Arc::clone(&self.dispatcher),
      inbox_tx: self.inbox_tx.clone(),
      inbox_rx: Arc::clone(&self.inbox_rx),
    }
  }
}

impl std::fmt::Debug for Probe {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Probe").finish_non_exhaustive()
  }
}

impl Probe {
  /// Install the probe into a host using environment configuration.
  pub fn install(host: Arc<dyn Host>) -> Self {
    Self::with_config(host, Config::from_env())
  }

  /// Install with explicit configuration. With `enabled` false no hooks or
  /// log capture are installed and no alias map is loaded.
  pub fn with_config(host: Arc<dyn Host>, config: Config) -> Self {
    let shared = Arc::new(ProbeShared {
      host: Arc::clone(&host),
      config: config.clone(),
      registry: Registry::new(),
      names: NameMap::new(),
      monitor: Monitor::new(),
      refs: RefStore::new(),
      session: Mutex::new(Session::new()),
      logbuf: LogBuffer::new(),
      hooks_installed: AtomicBool::new(false),
    });

    if config.enabled {
      let log_target = Arc::downgrade(&shared);
      let sink: LogSink = Arc::new(move |entry| {
        if let Some(s) = log_target.upgrade() {
          s.logbuf.push(entry);
        }
      });
      let installed = host.install_log_capture(sink);
      shared.logbuf.set_installed(installed);

      hooks::install(&shared);
      // Objects constructed before the hooks existed.
      for root in host.roots() {
        hooks::scan_existing(&shared.registry, &root);
      }

      shared.names.load_if_exists(&config.name_map_path);
    }

    let dispatcher = Arc::new(api::build_dispatcher(&shared));
    let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
    Self {
      shared,
      dispatcher,
      inbox_tx,
      inbox_rx: Arc::new(Mutex::new(inbox_rx)),
    }
  }

  pub fn config(&self) -> &Config {
    &self.shared.config
  }

  /// Process one JSON-RPC frame. Must run on the UI thread. `None` means
  /// the frame was a notification and gets no response.
  pub fn handle_message(&self, text: &str) -> Option<String> {
    self.dispatcher.handle_message(text)
  }

  /// Subscribe to outbound notification frames.
  pub fn notifications(&self) -> broadcast::Receiver<String> {
    self.shared.monitor.notifications()
  }

  /// Queue a frame from the transport; the reply arrives once the host
  /// pumps the inbox on the UI thread.
  pub fn enqueue(&self, text: String) -> oneshot::Receiver<Option<String>> {
    let (reply_tx, reply_rx) = oneshot::channel();
    if self.inbox_tx.send((text, reply_tx)).is_err() {
      log::warn!("probe inbox is gone; dropping frame");
    }
    reply_rx
  }

  /// Drain queued frames. Call from the host's UI thread, e.g. on a timer
  /// or an event-loop wake.
  pub fn pump(&self) {
    loop {
      let item = self.inbox_rx.lock().try_recv();
      match item {
        Ok((text, reply_tx)) => {
          let response = self.handle_message(&text);
          let _ = reply_tx.send(response);
        }
        Err(_) => break,
      }
    }
  }

  /// Transport callback: the client went away, session state dies with it.
  pub fn client_disconnected(&self) {
    self.shared.disconnect_cleanup();
  }

  /// Live signal subscription count, for diagnostics and tests.
  pub fn subscription_count(&self) -> usize {
    self.shared.monitor.subscription_count()
  }

  #[cfg(test)]
  pub(crate) fn shared(&self) -> &Arc<ProbeShared> {
    &self.shared
  }
}
