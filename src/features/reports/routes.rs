use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::features::media::dtos::MAX_IMAGE_SIZE;
use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// Multipart overhead allowed on top of the image itself
const FORM_OVERHEAD: usize = 1024 * 1024;

/// Report routes that need no token
pub fn public_routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route(
            "/api/reports/report",
            post(handlers::create_report)
                .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + FORM_OVERHEAD)),
        )
        .route("/api/reports", get(handlers::list_reports))
        .route(
            "/api/reports/report/user/{user_id}",
            get(handlers::list_user_reports),
        )
        .route(
            "/api/reports/report/category/{user_id}",
            get(handlers::list_category_reports),
        )
        .route(
            "/api/reports/report/{id}",
            get(handlers::get_report)
                .put(handlers::update_report)
                .delete(handlers::delete_report)
                .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + FORM_OVERHEAD)),
        )
        .route(
            "/api/reports/report/{id}/image-url",
            get(handlers::get_report_image_url),
        )
        .with_state(service)
}

/// Report routes behind the bearer-token middleware (applied by the caller)
pub fn protected_routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route(
            "/api/reports/report/status/{id}",
            put(handlers::update_report_status)
                .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + FORM_OVERHEAD)),
        )
        .with_state(service)
}
