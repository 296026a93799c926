/*!
WebSocket transport for the QtMCP probe.

Bridges a local WebSocket endpoint to the in-process probe core: each text
frame is exactly one JSON-RPC message, responses flow back on the same
socket, and outbound notifications are forwarded as they arrive. One
client at a time; a disconnect clears the probe's session state.

```ignore
let probe = Probe::install(host);
tokio::spawn(qtmcp_ws::serve(probe.clone()));
// UI thread: probe.pump() once per event-loop turn.
```
*/

mod server;

pub use server::{serve, serve_on};
