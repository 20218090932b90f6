//! In-memory doubles and a wired service graph for tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::number::en::NumberWithFormat;
use fake::Fake;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::core::config::{AuthConfig, MediaConfig};
use crate::core::error::{AppError, Result};
use crate::features::auth::TokenService;
use crate::features::categories::Category;
use crate::features::comments::models::{Comment, UpsertComment};
use crate::features::comments::{CommentRepository, CommentService};
use crate::features::media::dtos::ImageUpload;
use crate::features::media::MediaService;
use crate::features::notifications::models::ServerEvent;
use crate::features::notifications::{ConnectionHandle, InMemoryNotifier, Notifier, ReportNotifier};
use crate::features::reports::models::{CreateReport, Report, ReportPriority, ReportStatus};
use crate::features::reports::repositories::ReportRepository;
use crate::features::reports::ReportService;
use crate::features::users::models::{NewUser, User, UserRole};
use crate::features::users::services::hash_password;
use crate::features::users::{UserRepository, UserService};
use crate::modules::storage::MediaStore;

pub const TEST_PASSWORD: &str = "password123";

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<Uuid, User>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User> {
        if self.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            phone_number: user.phone_number,
            related_category: user.related_category,
            registration_date: Utc::now(),
            last_login_at: None,
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.clone()))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| u.clone()))
            .collect())
    }

    async fn list_authorities(&self, category: Category) -> Result<Vec<User>> {
        Ok(self
            .users
            .iter()
            .filter(|u| u.role == UserRole::Authority && u.related_category == Some(category))
            .map(|u| u.clone())
            .collect())
    }

    async fn touch_login(&self, id: Uuid) -> Result<()> {
        if let Some(mut user) = self.users.get_mut(&id) {
            user.last_login_at = Some(Utc::now());
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryReportRepository {
    reports: DashMap<Uuid, Report>,
}

impl InMemoryReportRepository {
    fn sorted(&self, keep: impl Fn(&Report) -> bool) -> Vec<Report> {
        let mut reports: Vec<Report> = self
            .reports
            .iter()
            .filter(|r| keep(r.value()))
            .map(|r| r.clone())
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reports
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn insert(&self, report: CreateReport) -> Result<Report> {
        let now = Utc::now();
        let report = Report {
            id: Uuid::new_v4(),
            user_id: report.user_id,
            category: report.category,
            subcategory: report.subcategory,
            description: report.description,
            image_key: report.image_key,
            location_lat: report.location_lat,
            location_long: report.location_long,
            status: ReportStatus::Pending,
            priority: report.priority,
            created_at: now,
            updated_at: now,
        };
        self.reports.insert(report.id, report.clone());
        Ok(report)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>> {
        Ok(self.reports.get(&id).map(|r| r.clone()))
    }

    async fn list_all(&self) -> Result<Vec<Report>> {
        Ok(self.sorted(|_| true))
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Report>> {
        Ok(self.sorted(|r| r.user_id == user_id))
    }

    async fn list_by_category(&self, category: Category) -> Result<Vec<Report>> {
        Ok(self.sorted(|r| r.category == category))
    }

    async fn update(&self, report: &Report) -> Result<Report> {
        let mut updated = report.clone();
        updated.updated_at = Utc::now();
        self.reports.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.reports.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryCommentRepository {
    comments: DashMap<Uuid, Comment>,
    writes_fail: AtomicBool,
}

impl InMemoryCommentRepository {
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    /// Make every later `upsert` fail with a database error
    pub fn fail_writes(&self) {
        self.writes_fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn upsert(&self, comment: UpsertComment) -> Result<Comment> {
        if self.writes_fail.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let id = self
            .comments
            .iter()
            .find(|c| c.report_id == comment.report_id && c.user_id == comment.user_id)
            .map(|c| c.id)
            .unwrap_or_else(Uuid::new_v4);

        let stored = Comment {
            id,
            report_id: comment.report_id,
            user_id: comment.user_id,
            comment_text: comment.comment_text,
            status: comment.status,
            category: comment.category,
            citizen_name: comment.citizen_name,
            phone_number: comment.phone_number,
            image_key: comment.image_key,
            timestamp: Utc::now(),
        };
        self.comments.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find(&self, report_id: Uuid, user_id: Uuid) -> Result<Option<Comment>> {
        Ok(self
            .comments
            .iter()
            .find(|c| c.report_id == report_id && c.user_id == user_id)
            .map(|c| c.clone()))
    }

    async fn find_latest_by_report(&self, report_id: Uuid) -> Result<Option<Comment>> {
        Ok(self
            .comments
            .iter()
            .filter(|c| c.report_id == report_id)
            .map(|c| c.clone())
            .max_by_key(|c| c.timestamp))
    }

    async fn list_by_user_and_category(
        &self,
        user_id: Uuid,
        category: Category,
    ) -> Result<Vec<Comment>> {
        Ok(self
            .comments
            .iter()
            .filter(|c| c.user_id == user_id && c.category == category)
            .map(|c| c.clone())
            .collect())
    }

    async fn delete_by_report(&self, report_id: Uuid) -> Result<Vec<Comment>> {
        let ids: Vec<Uuid> = self
            .comments
            .iter()
            .filter(|c| c.report_id == report_id)
            .map(|c| c.id)
            .collect();

        Ok(ids
            .into_iter()
            .filter_map(|id| self.comments.remove(&id).map(|(_, c)| c))
            .collect())
    }
}

/// Object store double; `failing()` refuses signing and deletes
#[derive(Default)]
pub struct InMemoryMediaStore {
    objects: DashMap<String, Vec<u8>>,
    failing: bool,
}

impl InMemoryMediaStore {
    pub fn failing() -> Self {
        Self {
            objects: DashMap::new(),
            failing: true,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }
}

#[async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn upload(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<()> {
        self.objects.insert(key.to_string(), data);
        Ok(())
    }

    async fn presign_get(&self, key: &str, expiry_secs: u32) -> Result<String> {
        if self.failing {
            return Err(AppError::Storage("signing disabled".to_string()));
        }
        Ok(format!("memory://reports/{}?expires={}", key, expiry_secs))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        if self.failing {
            return Err(AppError::Storage("delete disabled".to_string()));
        }
        self.objects.remove(key);
        Ok(())
    }
}

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret".to_string(),
        token_expiry: Duration::from_secs(3600),
        jwt_leeway: Duration::from_secs(0),
        bcrypt_cost: 4,
    }
}

pub fn sample_image() -> ImageUpload {
    ImageUpload {
        data: vec![0xff, 0xd8, 0xff, 0xe0],
        content_type: "image/jpeg".to_string(),
        file_name: "photo.jpg".to_string(),
    }
}

/// A report that was never persisted, for routing and mapping tests
pub fn sample_report(user_id: Uuid, category: Category) -> Report {
    let now = Utc::now();
    Report {
        id: Uuid::new_v4(),
        user_id,
        category,
        subcategory: category.subcategories()[0],
        description: "Sample report".to_string(),
        image_key: None,
        location_lat: 32.0853,
        location_long: 34.7818,
        status: ReportStatus::Pending,
        priority: ReportPriority::Medium,
        created_at: now,
        updated_at: now,
    }
}

/// Every service wired to in-memory storage
pub struct TestContext {
    pub users: Arc<InMemoryUserRepository>,
    pub reports: Arc<InMemoryReportRepository>,
    pub comments: Arc<InMemoryCommentRepository>,
    pub media_store: Arc<InMemoryMediaStore>,
    pub notifier: Arc<InMemoryNotifier>,
    pub token_service: Arc<TokenService>,
    pub user_service: Arc<UserService>,
    pub report_service: Arc<ReportService>,
    pub comment_service: Arc<CommentService>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_media_store(InMemoryMediaStore::default())
    }

    pub fn with_media_store(store: InMemoryMediaStore) -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        let reports = Arc::new(InMemoryReportRepository::default());
        let comments = Arc::new(InMemoryCommentRepository::default());
        let media_store = Arc::new(store);
        let notifier = Arc::new(InMemoryNotifier::new());

        let auth_config = test_auth_config();
        let token_service = Arc::new(TokenService::new(&auth_config));
        let media = Arc::new(MediaService::new(media_store.clone(), MediaConfig::default()));
        let report_notifier = Arc::new(ReportNotifier::new(users.clone(), notifier.clone()));

        let user_service = Arc::new(UserService::new(
            users.clone(),
            token_service.clone(),
            auth_config.bcrypt_cost,
        ));
        let report_service = Arc::new(ReportService::new(
            reports.clone(),
            users.clone(),
            comments.clone(),
            media.clone(),
            report_notifier.clone(),
        ));
        let comment_service = Arc::new(CommentService::new(
            comments.clone(),
            report_service.clone(),
            media,
        ));

        Self {
            users,
            reports,
            comments,
            media_store,
            notifier,
            token_service,
            user_service,
            report_service,
            comment_service,
        }
    }

    async fn create_user(&self, role: UserRole, related_category: Option<Category>) -> User {
        let name: String = Name().fake();
        let email: String = SafeEmail().fake();
        let phone_number = match role {
            UserRole::Citizen => Some(NumberWithFormat("05########").fake::<String>()),
            UserRole::Authority => None,
        };

        self.users
            .insert(NewUser {
                username: name,
                email: format!("{}.{}", Uuid::new_v4().simple(), email),
                password_hash: hash_password(TEST_PASSWORD, 4).await.unwrap(),
                role,
                phone_number,
                related_category,
            })
            .await
            .unwrap()
    }

    pub async fn create_citizen(&self) -> User {
        self.create_user(UserRole::Citizen, None).await
    }

    pub async fn create_authority(&self, category: Category) -> User {
        self.create_user(UserRole::Authority, Some(category)).await
    }

    /// Attach a live connection for `user_id` and return its inbox
    pub fn connect(&self, user_id: Uuid) -> mpsc::Receiver<ServerEvent> {
        let (tx, rx) = mpsc::channel(16);
        self.notifier
            .register(user_id, ConnectionHandle::new(Uuid::new_v4(), tx));
        rx
    }

    pub fn token(&self, user: &User) -> String {
        self.token_service.issue(user).unwrap()
    }
}
