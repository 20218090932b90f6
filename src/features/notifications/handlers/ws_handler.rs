use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::features::notifications::models::{ClientEvent, DirectMessage, ServerEvent};
use crate::features::notifications::registry::{ConnectionHandle, Notifier};

/// Shared state of the WebSocket endpoint
#[derive(Clone)]
pub struct WsState {
    pub notifier: Arc<dyn Notifier>,
    /// Outbound queue length per connection
    pub channel_capacity: usize,
}

/// Open the real-time notification channel
#[utoipa::path(
    get,
    path = "/ws",
    responses(
        (status = 101, description = "Switching to the WebSocket protocol"),
    ),
    tag = "notifications"
)]
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<WsState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: WsState) {
    let connection_id = Uuid::new_v4();
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerEvent>(state.channel_capacity);
    let handle = ConnectionHandle::new(connection_id, tx);

    debug!("WebSocket connection {} opened", connection_id);

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Failed to serialize event: {:?}", e);
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    dispatch(state.notifier.as_ref(), &handle, text.as_str());
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!("WebSocket connection {} errored: {}", connection_id, e);
                    break;
                }
            },
            _ = &mut send_task => break,
        }
    }

    if let Some(user_id) = state.notifier.unregister(connection_id) {
        info!("User {} went offline", user_id);
    }
    send_task.abort();

    debug!("WebSocket connection {} closed", connection_id);
}

/// Apply one client frame; malformed frames are ignored
pub fn dispatch(notifier: &dyn Notifier, handle: &ConnectionHandle, frame: &str) {
    let event = match serde_json::from_str::<ClientEvent>(frame) {
        Ok(event) => event,
        Err(e) => {
            debug!(
                "Ignoring malformed frame on connection {}: {}",
                handle.connection_id, e
            );
            return;
        }
    };

    match event {
        ClientEvent::RegisterUser(user_id) => {
            notifier.register(user_id, handle.clone());
            info!(
                "User {} registered with connection {}",
                user_id, handle.connection_id
            );
        }
        ClientEvent::SendMessage(outgoing) => {
            let delivered = notifier.notify(
                outgoing.recipient_id,
                ServerEvent::ReceiveMessage(DirectMessage {
                    message: outgoing.message,
                    from: handle.connection_id,
                }),
            );
            if delivered {
                debug!("Message relayed to {}", outgoing.recipient_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::notifications::registry::InMemoryNotifier;
    use serde_json::json;

    fn connection() -> (ConnectionHandle, mpsc::Receiver<ServerEvent>) {
        let (tx, rx) = mpsc::channel(8);
        (ConnectionHandle::new(Uuid::new_v4(), tx), rx)
    }

    #[test]
    fn test_register_frame_binds_user() {
        let notifier = InMemoryNotifier::new();
        let (handle, _rx) = connection();
        let user = Uuid::new_v4();

        let frame = json!({ "event": "registerUser", "data": user }).to_string();
        dispatch(&notifier, &handle, &frame);

        let bound = notifier.lookup(user).unwrap();
        assert_eq!(bound.connection_id, handle.connection_id);
    }

    #[test]
    fn test_send_message_relays_with_sender_connection() {
        let notifier = InMemoryNotifier::new();
        let (sender, _sender_rx) = connection();
        let (recipient, mut recipient_rx) = connection();
        let recipient_user = Uuid::new_v4();
        notifier.register(recipient_user, recipient);

        let frame = json!({
            "event": "sendMessage",
            "data": { "recipient_id": recipient_user, "message": "crew dispatched" }
        })
        .to_string();
        dispatch(&notifier, &sender, &frame);

        match recipient_rx.try_recv().unwrap() {
            ServerEvent::ReceiveMessage(msg) => {
                assert_eq!(msg.message, "crew dispatched");
                assert_eq!(msg.from, sender.connection_id);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_garbage_frame_is_ignored() {
        let notifier = InMemoryNotifier::new();
        let (handle, _rx) = connection();

        dispatch(&notifier, &handle, "hello?");
        dispatch(&notifier, &handle, r#"{"event":"registerUser","data":"not-a-uuid"}"#);

        assert_eq!(notifier.online_count(), 0);
    }
}
