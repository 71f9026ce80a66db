use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::SinkExt;
use futures::StreamExt;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::DispatchError;
use crate::notify::Topic;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct WsParams {
    /// `order:{id}`, `restaurant:{id}`, `rider:{id}` or `admin`.
    pub topic: String,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, DispatchError> {
    let topic: Topic = params
        .topic
        .parse()
        .map_err(DispatchError::BadRequest)?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, topic)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, topic: Topic) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.notifier.subscribe();

    info!(topic = %topic, "websocket client subscribed");

    let send_task = tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            if event.topic != topic {
                continue;
            }

            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(err) => {
                    warn!(error = %err, "failed to serialize event for ws");
                    continue;
                }
            };

            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let recv_task = tokio::spawn(async move {
        while let Some(Ok(_msg)) = receiver.next().await {}
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    info!("websocket client disconnected");
}
