/*!
WebSocket server implementation.

The socket task never touches UI objects itself: frames are queued into
the probe's inbox and answered once the host pumps them on the UI thread.
*/

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::{
  extract::{
    ws::{Message, WebSocket, WebSocketUpgrade},
    State,
  },
  response::Response,
  routing::get,
  Router,
};
use qtmcp::Probe;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

/// Shared state for the socket handlers.
#[derive(Clone)]
struct WsState {
  probe: Probe,
  /// One client at a time; set while a session is active.
  claimed: Arc<AtomicBool>,
}

/// Serve on the port from the probe's configuration (default 9222).
pub async fn serve(probe: Probe) -> std::io::Result<()> {
  let port = probe.config().port;
  serve_on(probe, port).await
}

/// Serve the probe on an explicit loopback port.
pub async fn serve_on(probe: Probe, port: u16) -> std::io::Result<()> {
  let state = WsState {
    probe,
    claimed: Arc::new(AtomicBool::new(false)),
  };

  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods(Any)
    .allow_headers(Any);

  let app = Router::new()
    .route("/ws", get(websocket_handler))
    .layer(cors)
    .with_state(state);

  let addr = format!("127.0.0.1:{port}");
  let listener = tokio::net::TcpListener::bind(&addr).await?;
  log::info!("probe transport listening on ws://{addr}/ws");

  axum::serve(listener, app).await
}

async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<WsState>) -> Response {
  ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: WsState) {
  // Single-client gate: a second connection is refused outright.
  if state
    .claimed
    .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
    .is_err()
  {
    log::warn!("rejecting second client; one session at a time");
    let _ = socket.send(Message::Close(None)).await;
    return;
  }

  log::info!("client connected");
  let mut notifications = state.probe.notifications();

  loop {
    tokio::select! {
      frame = socket.recv() => {
        match frame {
          Some(Ok(Message::Text(text))) => {
            let reply = state.probe.enqueue(text);
            match reply.await {
              // Notifications produce no response frame.
              Ok(Some(response)) => {
                if socket.send(Message::Text(response)).await.is_err() {
                  break;
                }
              }
              Ok(None) => {}
              Err(_) => {
                log::warn!("probe dropped a queued frame");
                break;
              }
            }
          }
          Some(Ok(Message::Binary(_))) => {
            log::warn!("ignoring binary frame; the protocol is text-only");
          }
          Some(Ok(Message::Close(_))) | None => break,
          Some(Ok(_)) => {}
          Some(Err(e)) => {
            log::warn!("websocket error: {e}");
            break;
          }
        }
      }

      outbound = notifications.recv() => {
        match outbound {
          Ok(frame) => {
            if socket.send(Message::Text(frame)).await.is_err() {
              break;
            }
          }
          Err(broadcast::error::RecvError::Lagged(n)) => {
            log::warn!("client lagged, dropped {n} notifications");
          }
          Err(broadcast::error::RecvError::Closed) => break,
        }
      }
    }
  }

  log::info!("client disconnected");
  state.probe.client_disconnected();
  state.claimed.store(false, Ordering::Release);
}
