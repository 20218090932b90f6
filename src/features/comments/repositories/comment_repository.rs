use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::categories::Category;
use crate::features::comments::models::{Comment, UpsertComment};

/// Persistence for report comments
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert, or overwrite the existing comment of the same author on the same report
    async fn upsert(&self, comment: UpsertComment) -> Result<Comment>;

    async fn find(&self, report_id: Uuid, user_id: Uuid) -> Result<Option<Comment>>;

    /// Most recent comment on a report
    async fn find_latest_by_report(&self, report_id: Uuid) -> Result<Option<Comment>>;

    async fn list_by_user_and_category(
        &self,
        user_id: Uuid,
        category: Category,
    ) -> Result<Vec<Comment>>;

    /// Remove every comment on a report and return what was removed
    async fn delete_by_report(&self, report_id: Uuid) -> Result<Vec<Comment>>;
}

const COMMENT_COLUMNS: &str = "id, report_id, user_id, comment_text, status, category, \
    citizen_name, phone_number, image_key, timestamp";

pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn upsert(&self, comment: UpsertComment) -> Result<Comment> {
        let sql = format!(
            r#"
            INSERT INTO comments (
                id, report_id, user_id, comment_text, status, category,
                citizen_name, phone_number, image_key, timestamp
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
            ON CONFLICT (report_id, user_id) DO UPDATE SET
                comment_text = EXCLUDED.comment_text,
                status = EXCLUDED.status,
                category = EXCLUDED.category,
                citizen_name = EXCLUDED.citizen_name,
                phone_number = EXCLUDED.phone_number,
                image_key = EXCLUDED.image_key,
                timestamp = NOW()
            RETURNING {}
            "#,
            COMMENT_COLUMNS
        );

        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(Uuid::new_v4())
            .bind(comment.report_id)
            .bind(comment.user_id)
            .bind(&comment.comment_text)
            .bind(comment.status)
            .bind(comment.category)
            .bind(&comment.citizen_name)
            .bind(&comment.phone_number)
            .bind(&comment.image_key)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to upsert comment: {:?}", e);
                e
            })?;

        Ok(comment)
    }

    async fn find(&self, report_id: Uuid, user_id: Uuid) -> Result<Option<Comment>> {
        let sql = format!(
            "SELECT {} FROM comments WHERE report_id = $1 AND user_id = $2",
            COMMENT_COLUMNS
        );

        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(report_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(comment)
    }

    async fn find_latest_by_report(&self, report_id: Uuid) -> Result<Option<Comment>> {
        let sql = format!(
            "SELECT {} FROM comments WHERE report_id = $1 ORDER BY timestamp DESC LIMIT 1",
            COMMENT_COLUMNS
        );

        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(report_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(comment)
    }

    async fn list_by_user_and_category(
        &self,
        user_id: Uuid,
        category: Category,
    ) -> Result<Vec<Comment>> {
        let sql = format!(
            "SELECT {} FROM comments WHERE user_id = $1 AND category = $2 ORDER BY timestamp DESC",
            COMMENT_COLUMNS
        );

        let comments = sqlx::query_as::<_, Comment>(&sql)
            .bind(user_id)
            .bind(category)
            .fetch_all(&self.pool)
            .await?;

        Ok(comments)
    }

    async fn delete_by_report(&self, report_id: Uuid) -> Result<Vec<Comment>> {
        let sql = format!(
            "DELETE FROM comments WHERE report_id = $1 RETURNING {}",
            COMMENT_COLUMNS
        );

        let comments = sqlx::query_as::<_, Comment>(&sql)
            .bind(report_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(comments)
    }
}
