use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;
use uuid::Uuid;

use crate::features::notifications::models::ServerEvent;

/// Outbound side of one live socket
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub connection_id: Uuid,
    sender: mpsc::Sender<ServerEvent>,
}

impl ConnectionHandle {
    pub fn new(connection_id: Uuid, sender: mpsc::Sender<ServerEvent>) -> Self {
        Self {
            connection_id,
            sender,
        }
    }

    /// Queue an event without waiting; returns false if it was dropped
    pub fn try_send(&self, event: ServerEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!("Dropping event for connection {}: queue full", self.connection_id);
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Dropping event for connection {}: closed", self.connection_id);
                false
            }
        }
    }
}

/// Process-wide map of online users to their connection
pub trait Notifier: Send + Sync {
    /// Bind a user to a connection, replacing any previous binding
    fn register(&self, user_id: Uuid, handle: ConnectionHandle);

    /// Drop whichever user is bound to this connection
    fn unregister(&self, connection_id: Uuid) -> Option<Uuid>;

    fn lookup(&self, user_id: Uuid) -> Option<ConnectionHandle>;

    /// Deliver at most once; a user without a connection gets nothing
    fn notify(&self, user_id: Uuid, event: ServerEvent) -> bool {
        match self.lookup(user_id) {
            Some(handle) => handle.try_send(event),
            None => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryNotifier {
    connections: DashMap<Uuid, ConnectionHandle>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn online_count(&self) -> usize {
        self.connections.len()
    }
}

impl Notifier for InMemoryNotifier {
    fn register(&self, user_id: Uuid, handle: ConnectionHandle) {
        let connection_id = handle.connection_id;
        self.connections.insert(user_id, handle);
        debug!(
            "User {} registered on connection {} ({} online)",
            user_id,
            connection_id,
            self.online_count()
        );
    }

    fn unregister(&self, connection_id: Uuid) -> Option<Uuid> {
        let user_id = self
            .connections
            .iter()
            .find(|entry| entry.value().connection_id == connection_id)
            .map(|entry| *entry.key())?;

        // A newer connection may have re-registered the user in between
        self.connections
            .remove_if(&user_id, |_, handle| handle.connection_id == connection_id)
            .map(|(user_id, _)| {
                debug!("User {} disconnected", user_id);
                user_id
            })
    }

    fn lookup(&self, user_id: Uuid) -> Option<ConnectionHandle> {
        self.connections.get(&user_id).map(|entry| entry.value().clone())
    }
}
