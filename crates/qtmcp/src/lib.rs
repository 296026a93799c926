/*!
QtMCP - in-process introspection and remote-control probe for GUI
applications.

A host agent connects over a local WebSocket and drives the probe via
JSON-RPC 2.0 to discover widgets, read and mutate properties, invoke
methods, monitor signals, capture screenshots, and simulate input. Three
API surfaces share the transport: the object-id native surface (`qt.*`),
the coordinate computer-use surface (`cu.*`), and the accessibility-ref
surface (`chr.*`).

The probe binds to a toolkit through the [`host`] trait seam and holds UI
objects only through weak handles; a dead object is a typed error, never
a crash.

```ignore
use std::sync::Arc;
use qtmcp::Probe;

let host: Arc<dyn qtmcp::host::Host> = my_toolkit_adapter();
let probe = Probe::install(host);

// Transport thread:
let reply = probe.enqueue(frame);
// UI thread, once per event-loop turn:
probe.pump();
```
*/

mod access;
mod api;
mod capture;
mod config;
mod hooks;
pub mod host;
mod input;
mod inspect;
mod logbuf;
mod monitor;
mod names;
mod probe;
mod registry;
mod resolver;
mod rpc;
mod session;
mod types;

#[cfg(test)]
pub(crate) mod testutil;

pub use access::{Action, Role, StateFlags};
pub use config::{Config, Mode, DEFAULT_NAME_MAP, DEFAULT_PORT};
pub use logbuf::{LogEntry, Severity};
pub use probe::Probe;
pub use types::{AccessRef, Color, ObjectId, ObjectRef, Point, ProbeError, ProbeResult, Rect, Size, SubscriptionId};
