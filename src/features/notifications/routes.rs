use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::notifications::handlers::{self, WsState};
use crate::features::notifications::registry::Notifier;

pub fn routes(notifier: Arc<dyn Notifier>, channel_capacity: usize) -> Router {
    Router::new()
        .route("/ws", get(handlers::ws_handler))
        .with_state(WsState {
            notifier,
            channel_capacity,
        })
}
