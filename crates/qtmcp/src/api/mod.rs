/*!
API surface registration.

Three coexisting surfaces share one dispatcher: the object-id based native
surface (`qt.*`), the coordinate-based computer-use surface (`cu.*`), and
the accessibility-ref surface (`chr.*`). Which ones get registered is
gated by the configured mode; the diagnostics methods are always there.
*/

mod chrome;
mod computer_use;
mod native;

use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};

use crate::probe::ProbeShared;
use crate::rpc::{Dispatcher, Reply};
use crate::rpc::envelope;
use crate::types::ProbeResult;

/// Build the dispatcher for a probe, registering surfaces per mode.
pub(crate) fn build_dispatcher(shared: &Arc<ProbeShared>) -> Dispatcher {
  let mut d = Dispatcher::new();
  register_diagnostics(&mut d, shared);

  let mode = shared.config.mode;
  if mode.native() {
    native::register(&mut d, shared);
  }
  if mode.computer_use() {
    computer_use::register(&mut d, shared);
  }
  if mode.chrome() {
    chrome::register(&mut d, shared);
  }
  d
}

/// Register one handler function bound to the shared probe state.
pub(crate) fn method(
  d: &mut Dispatcher,
  shared: &Arc<ProbeShared>,
  name: &'static str,
  f: fn(&Arc<ProbeShared>, &Value) -> ProbeResult<Reply>,
) {
  let s = Arc::clone(shared);
  d.register(name, Box::new(move |params| f(&s, params)));
}

fn register_diagnostics(d: &mut Dispatcher, shared: &Arc<ProbeShared>) {
  method(d, shared, "qt.ping", ping);
  method(d, shared, "qt.version", version);
  method(d, shared, "qt.modes", modes);
  d.alias("qtmcp.ping", "qt.ping");
  d.alias("qtmcp.version", "qt.version");
  d.alias("qtmcp.modes", "qt.modes");
}

/// Liveness check including a measured event-loop round trip.
fn ping(shared: &Arc<ProbeShared>, _params: &Value) -> ProbeResult<Reply> {
  let started = Instant::now();
  shared.host.process_events();
  let latency = started.elapsed().as_millis() as u64;
  Ok(Reply::raw(json!({
    "pong": true,
    "timestamp": envelope::timestamp_ms(),
    "eventLoopLatency": latency,
  })))
}

fn version(shared: &Arc<ProbeShared>, _params: &Value) -> ProbeResult<Reply> {
  Ok(Reply::raw(json!({
    "version": env!("CARGO_PKG_VERSION"),
    "protocolVersion": "2.0",
    "toolkit": shared.host.toolkit_version(),
  })))
}

fn modes(shared: &Arc<ProbeShared>, _params: &Value) -> ProbeResult<Reply> {
  let mode = shared.config.mode;
  let mut namespaces = Vec::new();
  if mode.native() {
    namespaces.push("qt");
  }
  if mode.computer_use() {
    namespaces.push("cu");
  }
  if mode.chrome() {
    namespaces.push("chr");
  }
  Ok(Reply::raw(json!({
    "mode": mode.as_str(),
    "namespaces": namespaces,
  })))
}
