use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::users::handlers;
use crate::features::users::services::UserService;

pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/users/register", post(handlers::register))
        .route("/api/users/login", post(handlers::login))
        .with_state(service)
}
