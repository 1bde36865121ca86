use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use tracing::{debug, info};

use crate::progress::{ProgressRegistry, ProgressSubscription};

pub fn ws_routes() -> Router<Arc<ProgressRegistry>> {
    Router::new().route("/:job_id", get(ws_upgrade))
}

async fn ws_upgrade(
    ws: WebSocketUpgrade,
    Path(job_id): Path<String>,
    State(registry): State<Arc<ProgressRegistry>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, job_id, registry))
}

/// Forward progress messages to one observer until it disconnects.
///
/// Inbound traffic is treated as keep-alive and ignored; only a close frame
/// or a transport error ends the subscription.
async fn handle_socket(socket: WebSocket, job_id: String, registry: Arc<ProgressRegistry>) {
    let ProgressSubscription { id, mut receiver } = registry.subscribe(&job_id).await;
    info!(job_id = %job_id, subscriber = %id, "progress observer connected");

    let (mut outbound, mut inbound) = socket.split();

    loop {
        tokio::select! {
            message = receiver.recv() => {
                let Some(message) = message else { break };
                let text = match serde_json::to_string(&message) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::error!(job_id = %job_id, error = %e, "failed to encode progress message");
                        continue;
                    },
                };
                if outbound.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            incoming = inbound.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(other)) => {
                        debug!(job_id = %job_id, message = ?other, "ignoring inbound websocket traffic");
                    },
                }
            }
        }
    }

    registry.unsubscribe(&job_id, id).await;
    info!(job_id = %job_id, subscriber = %id, "progress observer disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_structure() {
        let router = ws_routes();
        assert!(format!("{:?}", router).contains("Router"));
    }
}
