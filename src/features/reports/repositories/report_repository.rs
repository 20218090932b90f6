use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::categories::Category;
use crate::features::reports::models::{CreateReport, Report};

/// Persistence for citizen reports
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn insert(&self, report: CreateReport) -> Result<Report>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>>;

    async fn list_all(&self) -> Result<Vec<Report>>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Report>>;

    async fn list_by_category(&self, category: Category) -> Result<Vec<Report>>;

    /// Write every mutable column and bump `updated_at`
    async fn update(&self, report: &Report) -> Result<Report>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

const REPORT_COLUMNS: &str = "id, user_id, category, subcategory, description, image_key, \
    location_lat, location_long, status, priority, created_at, updated_at";

pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list_where(&self, clause: &str, bind: Option<ListFilter>) -> Result<Vec<Report>> {
        let sql = format!(
            "SELECT {} FROM reports {} ORDER BY created_at DESC",
            REPORT_COLUMNS, clause
        );

        let query = sqlx::query_as::<_, Report>(&sql);
        let query = match bind {
            Some(ListFilter::User(user_id)) => query.bind(user_id),
            Some(ListFilter::Category(category)) => query.bind(category),
            None => query,
        };

        Ok(query.fetch_all(&self.pool).await?)
    }
}

enum ListFilter {
    User(Uuid),
    Category(Category),
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn insert(&self, report: CreateReport) -> Result<Report> {
        let sql = format!(
            r#"
            INSERT INTO reports (
                id, user_id, category, subcategory, description, image_key,
                location_lat, location_long, priority
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            REPORT_COLUMNS
        );

        let report = sqlx::query_as::<_, Report>(&sql)
            .bind(Uuid::new_v4())
            .bind(report.user_id)
            .bind(report.category)
            .bind(report.subcategory)
            .bind(&report.description)
            .bind(&report.image_key)
            .bind(report.location_lat)
            .bind(report.location_long)
            .bind(report.priority)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert report: {:?}", e);
                e
            })?;

        Ok(report)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>> {
        let sql = format!("SELECT {} FROM reports WHERE id = $1", REPORT_COLUMNS);

        let report = sqlx::query_as::<_, Report>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(report)
    }

    async fn list_all(&self) -> Result<Vec<Report>> {
        self.list_where("", None).await
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Report>> {
        self.list_where("WHERE user_id = $1", Some(ListFilter::User(user_id)))
            .await
    }

    async fn list_by_category(&self, category: Category) -> Result<Vec<Report>> {
        self.list_where("WHERE category = $1", Some(ListFilter::Category(category)))
            .await
    }

    async fn update(&self, report: &Report) -> Result<Report> {
        let sql = format!(
            r#"
            UPDATE reports SET
                category = $2,
                subcategory = $3,
                description = $4,
                image_key = $5,
                location_lat = $6,
                location_long = $7,
                status = $8,
                priority = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            REPORT_COLUMNS
        );

        let updated = sqlx::query_as::<_, Report>(&sql)
            .bind(report.id)
            .bind(report.category)
            .bind(report.subcategory)
            .bind(&report.description)
            .bind(&report.image_key)
            .bind(report.location_lat)
            .bind(report.location_long)
            .bind(report.status)
            .bind(report.priority)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update report {}: {:?}", report.id, e);
                e
            })?;

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
