//! WebSocket upgrade + message loop. Each connection gets its own
//! `PlayDriver`; client frames, timer events and scheduled advances are
//! multiplexed on one task, so the session sees one action at a time.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tokio::sync::mpsc;
use tracing::{info, error, instrument, debug};
use uuid::Uuid;

use crate::play::PlayDriver;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "quizapp_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn send_all(socket: &mut WebSocket, msgs: Vec<ServerWsMessage>) -> bool {
  for m in msgs {
    let out = serde_json::to_string(&m).unwrap_or_else(|e| {
      serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
    });
    if let Err(e) = socket.send(Message::Text(out)).await {
      error!(target: "quizapp_backend", error = %e, "WS send error");
      return false;
    }
  }
  true
}

#[instrument(level = "info", skip(socket, state), fields(session_id = %Uuid::new_v4()))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "quizapp_backend", "WebSocket connected");
  let (timer_tx, mut timer_rx) = mpsc::unbounded_channel();
  let (advance_tx, mut advance_rx) = mpsc::unbounded_channel();
  let mut driver = PlayDriver::new(state, timer_tx, advance_tx);

  loop {
    let replies = tokio::select! {
      incoming = socket.recv() => match incoming {
        Some(Ok(Message::Text(txt))) => match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(msg) => {
            debug!(target: "quizapp_backend", "WS received: {:?}", &msg);
            driver.handle_client(msg).await
          }
          Err(e) => vec![ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }],
        },
        Some(Ok(Message::Ping(payload))) => {
          let _ = socket.send(Message::Pong(payload)).await;
          continue;
        }
        Some(Ok(Message::Close(_))) | None => break,
        Some(Ok(_)) => continue,
        Some(Err(e)) => {
          error!(target: "quizapp_backend", error = %e, "WS receive error");
          break;
        }
      },
      Some(ev) = timer_rx.recv() => driver.handle_timer(ev),
      Some(ticket) = advance_rx.recv() => driver.handle_advance(ticket).await,
    };

    if !send_all(&mut socket, replies).await {
      break;
    }
  }

  driver.shutdown().await;
  info!(target: "quizapp_backend", "WebSocket disconnected");
}
