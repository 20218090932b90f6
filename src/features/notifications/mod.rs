//! Real-time push of report events over WebSocket.
//!
//! A connection announces its user with a `registerUser` frame; from then on
//! report events routed to that user are written to the socket. Delivery is
//! best effort: nothing is queued for users without a live connection.

pub mod handlers;
pub mod models;
pub mod registry;
pub mod routes;
pub mod services;

pub use registry::{ConnectionHandle, InMemoryNotifier, Notifier};
pub use services::ReportNotifier;
