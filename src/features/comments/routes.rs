use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::comments::handlers;
use crate::features::comments::services::CommentService;

pub fn routes(service: Arc<CommentService>) -> Router {
    Router::new()
        .route(
            "/api/comments/report/category_comment/{id}/{category}",
            get(handlers::list_category_comments),
        )
        .route(
            "/api/comments/report/category_comment/{id}",
            axum::routing::delete(handlers::delete_report_comments),
        )
        .route(
            "/api/comments/report/{report_id}",
            get(handlers::get_report_comment),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::Category;
    use crate::features::reports::dtos::{CreateReportDto, UpdateStatusDto};
    use crate::features::reports::models::ReportStatus;
    use crate::shared::test_helpers::TestContext;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_comment_endpoints() {
        let ctx = TestContext::new();
        let server = TestServer::new(routes(ctx.comment_service.clone())).unwrap();
        let citizen = ctx.create_citizen().await;
        let authority = ctx.create_authority(Category::PublicSafety).await;

        let report = ctx
            .report_service
            .create(
                CreateReportDto {
                    user_id: citizen.id,
                    category: "Public Safety".to_string(),
                    subcategory: "Vandalism".to_string(),
                    description: "Graffiti on the park fence".to_string(),
                    location_lat: 32.7940,
                    location_long: 34.9896,
                    priority: None,
                },
                None,
            )
            .await
            .unwrap();
        ctx.report_service
            .update_status(
                report.id,
                UpdateStatusDto {
                    status: ReportStatus::Resolved,
                    comment_text: None,
                },
                None,
                authority.id,
            )
            .await
            .unwrap();

        let response = server
            .get(&format!(
                "/api/comments/report/category_comment/{}/Public%20Safety",
                authority.id
            ))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"][0]["comment_text"], "Status updated to resolved");

        let response = server
            .get(&format!("/api/comments/report/{}", report.id))
            .await;
        response.assert_status_ok();

        let response = server
            .delete(&format!(
                "/api/comments/report/category_comment/{}",
                report.id
            ))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["report"]["report_id"], report.id.to_string());

        server
            .get(&format!("/api/comments/report/{}", report.id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .delete(&format!(
                "/api/comments/report/category_comment/{}",
                Uuid::new_v4()
            ))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
