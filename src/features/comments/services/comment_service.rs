use std::sync::Arc;

use futures::future::join_all;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::Category;
use crate::features::comments::dtos::{CommentResponseDto, DeletedCommentsDto};
use crate::features::comments::models::Comment;
use crate::features::comments::repositories::CommentRepository;
use crate::features::media::{MediaService, UrlExpiry};
use crate::features::reports::ReportService;

pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    reports: Arc<ReportService>,
    media: Arc<MediaService>,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        reports: Arc<ReportService>,
        media: Arc<MediaService>,
    ) -> Self {
        Self {
            comments,
            reports,
            media,
        }
    }

    /// Comments an authority wrote on reports of one category
    pub async fn list_by_user_and_category(
        &self,
        user_id: Uuid,
        category: &str,
    ) -> Result<Vec<CommentResponseDto>> {
        let category: Category = category.parse()?;

        let comments = self
            .comments
            .list_by_user_and_category(user_id, category)
            .await?;

        Ok(join_all(
            comments
                .into_iter()
                .map(|c| self.to_response(c, UrlExpiry::List)),
        )
        .await)
    }

    pub async fn get_by_report(&self, report_id: Uuid) -> Result<CommentResponseDto> {
        let comment = self.find_by_report(report_id).await?;
        Ok(self.to_response(comment, UrlExpiry::Detail).await)
    }

    /// Remove the report's comments and, if it still exists, the report itself
    pub async fn delete_by_report(&self, report_id: Uuid) -> Result<DeletedCommentsDto> {
        self.find_by_report(report_id).await?;

        let removed = self.comments.delete_by_report(report_id).await?;
        for comment in &removed {
            self.media.discard(comment.image_key.as_deref()).await;
        }

        let report = if self.reports.exists(report_id).await? {
            Some(self.reports.delete(report_id).await?)
        } else {
            tracing::debug!("Report {} already gone, removed orphaned comments", report_id);
            None
        };

        tracing::info!(
            "Comments deleted: report_id={}, removed={}",
            report_id,
            removed.len()
        );

        Ok(DeletedCommentsDto {
            report_id,
            comments_removed: removed.len(),
            report,
        })
    }

    async fn find_by_report(&self, report_id: Uuid) -> Result<Comment> {
        self.comments
            .find_latest_by_report(report_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Comment not found for this report_id".to_string())
            })
    }

    async fn to_response(&self, comment: Comment, expiry: UrlExpiry) -> CommentResponseDto {
        let image_url = self
            .media
            .resolve(comment.image_key.as_deref(), expiry)
            .await;
        CommentResponseDto::new(comment, image_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::notifications::models::ServerEvent;
    use crate::features::reports::dtos::{CreateReportDto, UpdateStatusDto};
    use crate::features::reports::models::ReportStatus;
    use crate::features::users::User;
    use crate::shared::test_helpers::{sample_image, TestContext};

    async fn reviewed_report(ctx: &TestContext, citizen: &User, authority: &User) -> Uuid {
        let report = ctx
            .report_service
            .create(
                CreateReportDto {
                    user_id: citizen.id,
                    category: "Health & Sanitation".to_string(),
                    subcategory: "Overflowing Trash Bins".to_string(),
                    description: "Bins not collected for a week".to_string(),
                    location_lat: 31.7683,
                    location_long: 35.2137,
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
                    status: ReportStatus::InProgress,
                    comment_text: Some("Truck scheduled".to_string()),
                },
                Some(sample_image()),
                authority.id,
            )
            .await
            .unwrap();

        report.id
    }

    #[tokio::test]
    async fn test_list_by_user_and_category() {
        let ctx = TestContext::new();
        let citizen = ctx.create_citizen().await;
        let authority = ctx.create_authority(Category::HealthAndSanitation).await;
        let report_id = reviewed_report(&ctx, &citizen, &authority).await;

        let comments = ctx
            .comment_service
            .list_by_user_and_category(authority.id, "Health & Sanitation")
            .await
            .unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].report_id, report_id);
        assert_eq!(comments[0].comment_text, "Truck scheduled");
        assert!(comments[0]
            .image_url
            .as_deref()
            .is_some_and(|u| u.ends_with("expires=60")));

        let other = ctx
            .comment_service
            .list_by_user_and_category(authority.id, "Public Safety")
            .await
            .unwrap();
        assert!(other.is_empty());

        let err = ctx
            .comment_service
            .list_by_user_and_category(authority.id, "Parking")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_by_report() {
        let ctx = TestContext::new();
        let citizen = ctx.create_citizen().await;
        let authority = ctx.create_authority(Category::HealthAndSanitation).await;
        let report_id = reviewed_report(&ctx, &citizen, &authority).await;

        let comment = ctx.comment_service.get_by_report(report_id).await.unwrap();
        assert_eq!(comment.status, ReportStatus::InProgress);
        assert_eq!(comment.citizen_name, citizen.username);

        let err = ctx
            .comment_service
            .get_by_report(Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Comment not found for this report_id"));
    }

    #[tokio::test]
    async fn test_delete_by_report_removes_report() {
        let ctx = TestContext::new();
        let citizen = ctx.create_citizen().await;
        let authority = ctx.create_authority(Category::HealthAndSanitation).await;
        let report_id = reviewed_report(&ctx, &citizen, &authority).await;
        let mut inbox = ctx.connect(authority.id);

        let deleted = ctx.comment_service.delete_by_report(report_id).await.unwrap();
        assert_eq!(deleted.comments_removed, 1);
        assert!(deleted.report.is_some());
        assert!(!ctx.report_service.exists(report_id).await.unwrap());
        assert_eq!(ctx.media_store.len(), 0);
        assert!(matches!(
            inbox.try_recv(),
            Ok(ServerEvent::ReportDeleted(ref e)) if e.report_id == report_id
        ));

        let err = ctx
            .comment_service
            .delete_by_report(report_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
