use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, RwLock};

use crate::api::AppState;
use crate::events::MapEvents;
use crate::mock_map::MockMap;

/// Notification pushed to clients on every map update.
pub const MAP_UPDATED: &str = r#"{"type":"map_updated"}"#;

/// Republish every map-update event on the WebSocket broadcast channel.
pub fn forward_map_updates(events: &MapEvents, broadcast_tx: broadcast::Sender<String>) {
    events.on_map_update(move || {
        // Fails only when no client is connected
        let _ = broadcast_tx.send(MAP_UPDATED.to_string());
    });
}

pub async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();

    // Map updates and request replies share one outbound queue
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(256);

    let mut updates = state.broadcast_tx.subscribe();
    let update_tx = outbound_tx.clone();
    let update_task = tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(msg) => {
                    if update_tx.send(msg).await.is_err() {
                        break;
                    }
                }
                // A slow client may miss notifications; the next one still refreshes it
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!("WebSocket client lagged by {} updates", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let send_task = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            if sink.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    let map = state.map.clone();
    let request_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = stream.next().await {
            if let Message::Text(text) = msg {
                handle_client_message(&text, &map, &outbound_tx).await;
            }
        }
    });

    // Any side closing ends the session
    tokio::select! {
        _ = update_task => {},
        _ = send_task => {},
        _ = request_task => {},
    }
}

async fn handle_client_message(
    text: &str,
    map: &Arc<RwLock<MockMap>>,
    sender: &mpsc::Sender<String>,
) {
    let msg: serde_json::Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(_) => return,
    };

    if msg.get("type").and_then(|t| t.as_str()) == Some("get_map") {
        let snapshot = map.read().await.get_map();
        tracing::debug!("WebSocket map request: {} layers", snapshot.layers.len());

        let reply = serde_json::json!({ "type": "map", "map": snapshot });
        let _ = sender.send(reply.to_string()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;

    fn shared_map() -> Arc<RwLock<MockMap>> {
        Arc::new(RwLock::new(MockMap::new(&MapConfig {
            width: 6,
            height: 4,
            ..MapConfig::default()
        })))
    }

    #[tokio::test]
    async fn test_get_map_reply() {
        let map = shared_map();
        let (tx, mut rx) = mpsc::channel(4);

        handle_client_message(r#"{"type":"get_map"}"#, &map, &tx).await;

        let reply: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(reply["type"], "map");
        assert_eq!(reply["map"]["layers"].as_array().unwrap().len(), 3);
        assert_eq!(reply["map"]["entities"][1]["type"], "robot_position");
    }

    #[tokio::test]
    async fn test_other_messages_ignored() {
        let map = shared_map();
        let (tx, mut rx) = mpsc::channel(4);

        handle_client_message("not json", &map, &tx).await;
        handle_client_message(r#"{"type":"catch_up"}"#, &map, &tx).await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_map_updates_reach_subscribers() {
        let events = MapEvents::new();
        let (broadcast_tx, mut subscriber) = broadcast::channel(4);
        forward_map_updates(&events, broadcast_tx);

        events.emit();

        assert_eq!(subscriber.recv().await.unwrap(), MAP_UPDATED);
    }

    #[test]
    fn test_update_without_subscribers_is_dropped() {
        let events = MapEvents::new();
        let (broadcast_tx, subscriber) = broadcast::channel::<String>(4);
        drop(subscriber);
        forward_map_updates(&events, broadcast_tx);

        // Must not panic with nobody listening
        events.emit();
        assert_eq!(events.listener_count(), 1);
    }
}
