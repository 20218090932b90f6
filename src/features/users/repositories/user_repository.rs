use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::Category;
use crate::features::users::models::{NewUser, User};

/// Persistence for user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user; a taken email yields `AppError::Conflict`
    async fn insert(&self, user: NewUser) -> Result<User>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>>;

    /// Authorities responsible for a category
    async fn list_authorities(&self, category: Category) -> Result<Vec<User>>;

    async fn touch_login(&self, id: Uuid) -> Result<()>;
}

const USER_COLUMNS: &str = "id, username, email, password_hash, role, phone_number, \
    related_category, registration_date, last_login_at";

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User> {
        let sql = format!(
            r#"
            INSERT INTO users (id, username, email, password_hash, role, phone_number, related_category)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .bind(&user.phone_number)
            .bind(user.related_category)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    AppError::Conflict("User with this email already exists".to_string())
                }
                e => {
                    tracing::error!("Failed to insert user: {:?}", e);
                    AppError::Database(e)
                }
            })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("SELECT {} FROM users WHERE id = ANY($1)", USER_COLUMNS);

        let users = sqlx::query_as::<_, User>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn list_authorities(&self, category: Category) -> Result<Vec<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE role = 'authority' AND related_category = $1",
            USER_COLUMNS
        );

        let users = sqlx::query_as::<_, User>(&sql)
            .bind(category)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn touch_login(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
