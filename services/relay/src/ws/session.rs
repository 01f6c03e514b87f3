//! Manages the lifecycle of a single chat WebSocket connection.

use super::protocol::{ClientEvent, ServerEvent};
use crate::state::AppState;
use anyhow::Result;
use axum::{
    extract::{
        State,
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use relay_core::Message;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, info, instrument, warn};

/// Axum handler to upgrade an HTTP connection to a WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Main handler for an individual WebSocket connection.
#[instrument(name = "ws_connection", skip_all, fields(connection_id))]
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id: u32 = rand::random();
    tracing::Span::current().record("connection_id", connection_id);

    // Subscribe before reading anything so no broadcast after this point is missed.
    let broadcasts = state.broadcaster.subscribe();
    info!(
        listeners = state.broadcaster.listener_count(),
        "Client connected."
    );

    let (socket_tx, socket_rx) = socket.split();
    if let Err(e) = run_connection(&state, socket_tx, socket_rx, broadcasts).await {
        error!(error = ?e, "Connection terminated with error.");
    }
    info!("Client disconnected.");
}

/// Relays client events into the chat service and broadcasts back out until
/// either side closes.
async fn run_connection(
    state: &Arc<AppState>,
    mut socket_tx: SplitSink<WebSocket, WsMessage>,
    mut socket_rx: SplitStream<WebSocket>,
    mut broadcasts: broadcast::Receiver<Message>,
) -> Result<()> {
    loop {
        tokio::select! {
            incoming = socket_rx.next() => {
                match incoming {
                    Some(Ok(WsMessage::Text(text))) => {
                        handle_client_event(state, &mut socket_tx, text.as_str()).await?;
                    }
                    Some(Ok(WsMessage::Close(_))) | None => {
                        debug!("Client closed the socket.");
                        break;
                    }
                    Some(Ok(WsMessage::Binary(_))) => warn!("Ignoring binary frame."),
                    Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_))) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "Error receiving from client WebSocket.");
                        break;
                    }
                }
            },
            broadcast = broadcasts.recv() => {
                match broadcast {
                    Ok(message) => send_event(&mut socket_tx, ServerEvent::NewMessage(message)).await?,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Connection fell behind; broadcasts were dropped.");
                    }
                    Err(RecvError::Closed) => break,
                }
            },
        }
    }
    Ok(())
}

async fn handle_client_event(
    state: &Arc<AppState>,
    socket_tx: &mut SplitSink<WebSocket, WsMessage>,
    text: &str,
) -> Result<()> {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::SendMessage(message)) => {
            state.chat.send_message(message).await;
        }
        Ok(ClientEvent::GetMessages) => {
            let history = state.chat.list_messages().await;
            send_event(socket_tx, ServerEvent::MessagesHistory(history)).await?;
        }
        Err(e) => warn!(error = %e, "Ignoring unparseable client event."),
    }
    Ok(())
}

/// Serializes and sends a `ServerEvent` to one client.
pub(crate) async fn send_event(
    socket_tx: &mut SplitSink<WebSocket, WsMessage>,
    event: ServerEvent,
) -> Result<()> {
    let serialized = serde_json::to_string(&event)?;
    socket_tx.send(WsMessage::Text(serialized.into())).await?;
    Ok(())
}
