//! Live meeting socket.
//!
//! Each connection gets its own [`Session`]. Frames are handled strictly in
//! order: the next frame is not read until every reply to the current one
//! has been sent.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use tracing::{debug, info, warn};

use crate::api::AppState;
use crate::session::{InboundPayload, Outbound, OutboundKind, Session};

pub fn router() -> Router<AppState> {
    Router::new().route("/ws", get(ws_upgrade))
}

async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn send_frame(
    tx: &mut SplitSink<WebSocket, Message>,
    frame: &Outbound,
) -> Result<(), axum::Error> {
    let text = match serde_json::to_string(frame) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to encode outbound frame: {}", e);
            return Ok(());
        }
    };
    tx.send(Message::Text(text)).await
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut tx, mut rx) = socket.split();
    let mut session = Session::new();
    info!("WebSocket connected: {}", session.id);

    let hello = state.orchestrator.connected(&session);
    if send_frame(&mut tx, &hello).await.is_err() {
        return;
    }

    'frames: while let Some(msg) = rx.next().await {
        let frames = match msg {
            Ok(Message::Text(text)) => state.orchestrator.handle(&mut session, &text).await,
            Ok(Message::Binary(audio)) => {
                debug!("Audio frame received: {} bytes", audio.len());
                match state.stt.transcribe(audio).await {
                    Ok(text) => {
                        state
                            .orchestrator
                            .handle_payload(&mut session, InboundPayload::text(text))
                            .await
                    }
                    Err(e) => {
                        warn!("Transcription failed for {}: {}", session.id, e);
                        vec![Outbound::new(
                            OutboundKind::Warning,
                            &session.id,
                            "⚠️ Não consegui transcrever o áudio agora.",
                        )]
                    }
                }
            }
            Ok(Message::Close(_)) => {
                info!("WebSocket closing: {}", session.id);
                break;
            }
            Ok(_) => continue,
            Err(e) => {
                warn!("WebSocket error on {}: {}", session.id, e);
                break;
            }
        };

        for frame in &frames {
            if send_frame(&mut tx, frame).await.is_err() {
                break 'frames;
            }
        }

        if session.is_closed() {
            let _ = tx.send(Message::Close(None)).await;
            break;
        }
    }

    info!("WebSocket disconnected: {}", session.id);
}
