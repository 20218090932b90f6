use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::parse_pair;
use crate::features::comments::models::UpsertComment;
use crate::features::comments::CommentRepository;
use crate::features::media::dtos::{ImageUpload, SignedUrlDto};
use crate::features::media::{MediaService, UrlExpiry};
use crate::features::notifications::models::{citizen_contact, DeletedReportEvent, ReportEvent};
use crate::features::notifications::ReportNotifier;
use crate::features::reports::dtos::{
    CreateReportDto, DeletedReportDto, ReportResponseDto, UpdateReportDto, UpdateStatusDto,
};
use crate::features::reports::models::{CreateReport, Report};
use crate::features::reports::repositories::ReportRepository;
use crate::features::users::{User, UserRepository};

/// Result of a content update
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    Updated(ReportResponseDto),
    /// Every submitted field matched the stored report; nothing was written
    Unchanged(ReportResponseDto),
}

/// Report lifecycle: creation, edits, status changes, deletion and reads
pub struct ReportService {
    reports: Arc<dyn ReportRepository>,
    users: Arc<dyn UserRepository>,
    comments: Arc<dyn CommentRepository>,
    media: Arc<MediaService>,
    notifier: Arc<ReportNotifier>,
}

impl ReportService {
    pub fn new(
        reports: Arc<dyn ReportRepository>,
        users: Arc<dyn UserRepository>,
        comments: Arc<dyn CommentRepository>,
        media: Arc<MediaService>,
        notifier: Arc<ReportNotifier>,
    ) -> Self {
        Self {
            reports,
            users,
            comments,
            media,
            notifier,
        }
    }

    pub async fn create(
        &self,
        dto: CreateReportDto,
        image: Option<ImageUpload>,
    ) -> Result<ReportResponseDto> {
        let (category, subcategory) = parse_pair(&dto.category, &dto.subcategory)?;

        let owner = self
            .users
            .find_by_id(dto.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let image_key = match image {
            Some(image) => Some(self.media.store_image(image).await?),
            None => None,
        };

        let inserted = self
            .reports
            .insert(CreateReport {
                user_id: owner.id,
                category,
                subcategory,
                description: dto.description,
                image_key: image_key.clone(),
                location_lat: dto.location_lat,
                location_long: dto.location_long,
                priority: dto.priority.unwrap_or_default(),
            })
            .await;

        let report = match inserted {
            Ok(report) => report,
            Err(e) => {
                self.media.discard(image_key.as_deref()).await;
                return Err(e);
            }
        };

        tracing::info!(
            "Report created: id={}, user_id={}, category={}",
            report.id,
            report.user_id,
            report.category
        );

        self.notifier
            .report_added(self.event(&report, Some(&owner)).await)
            .await;

        Ok(self
            .to_response(report, Some(&owner), UrlExpiry::Detail)
            .await)
    }

    pub async fn update_content(
        &self,
        report_id: Uuid,
        dto: UpdateReportDto,
        image: Option<ImageUpload>,
    ) -> Result<UpdateOutcome> {
        let report = self.find(report_id).await?;

        let mut updated = report.clone();
        if dto.category.is_some() || dto.subcategory.is_some() {
            let category = dto
                .category
                .unwrap_or_else(|| report.category.as_str().to_string());
            let subcategory = dto
                .subcategory
                .unwrap_or_else(|| report.subcategory.as_str().to_string());
            let (category, subcategory) = parse_pair(&category, &subcategory)?;
            updated.category = category;
            updated.subcategory = subcategory;
        }
        if let Some(description) = dto.description {
            updated.description = description;
        }
        if let Some(lat) = dto.location_lat {
            updated.location_lat = lat;
        }
        if let Some(long) = dto.location_long {
            updated.location_long = long;
        }
        if let Some(priority) = dto.priority {
            updated.priority = priority;
        }

        let owner = self.users.find_by_id(report.user_id).await?;

        if updated == report && image.is_none() {
            tracing::debug!("Report {} unchanged, skipping write", report.id);
            let response = self
                .to_response(report, owner.as_ref(), UrlExpiry::Detail)
                .await;
            return Ok(UpdateOutcome::Unchanged(response));
        }

        let new_key = match image {
            Some(image) => Some(self.media.store_image(image).await?),
            None => None,
        };
        if new_key.is_some() {
            updated.image_key = new_key.clone();
        }

        let saved = match self.reports.update(&updated).await {
            Ok(saved) => saved,
            Err(e) => {
                self.media.discard(new_key.as_deref()).await;
                return Err(e);
            }
        };

        if new_key.is_some() {
            self.media.discard(report.image_key.as_deref()).await;
        }

        tracing::info!("Report updated: id={}", saved.id);

        self.notifier
            .report_updated(self.event(&saved, owner.as_ref()).await)
            .await;

        Ok(UpdateOutcome::Updated(
            self.to_response(saved, owner.as_ref(), UrlExpiry::Detail)
                .await,
        ))
    }

    /// Any authority may change the status of any report, whatever its category
    pub async fn update_status(
        &self,
        report_id: Uuid,
        dto: UpdateStatusDto,
        image: Option<ImageUpload>,
        actor_id: Uuid,
    ) -> Result<ReportResponseDto> {
        let report = self.find(report_id).await?;

        let actor = self.users.find_by_id(actor_id).await?;
        if !actor.as_ref().is_some_and(User::is_authority) {
            return Err(AppError::Forbidden(
                "Access denied. Only authority users can update report status.".to_string(),
            ));
        }

        if !report.status.can_transition_to(dto.status) {
            return Err(AppError::Validation(format!(
                "Cannot move report from {} back to {}",
                report.status, dto.status
            )));
        }

        let owner = self.users.find_by_id(report.user_id).await?;
        let (citizen_name, phone_number) = citizen_contact(owner.as_ref());

        let previous = self.comments.find(report.id, actor_id).await?;

        let image_key = match image {
            Some(image) => Some(self.media.store_image(image).await?),
            None => None,
        };

        let upserted = self
            .comments
            .upsert(UpsertComment {
                report_id: report.id,
                user_id: actor_id,
                comment_text: dto
                    .comment_text
                    .unwrap_or_else(|| format!("Status updated to {}", dto.status)),
                status: dto.status,
                category: report.category,
                citizen_name,
                phone_number,
                image_key: image_key.clone(),
            })
            .await;

        if let Err(e) = upserted {
            self.media.discard(image_key.as_deref()).await;
            return Err(e);
        }

        if let Some(previous) = previous {
            if previous.image_key != image_key {
                self.media.discard(previous.image_key.as_deref()).await;
            }
        }

        let mut updated = report.clone();
        updated.status = dto.status;
        let saved = self.reports.update(&updated).await?;

        tracing::info!(
            "Report status updated: id={}, {} -> {}, by={}",
            saved.id,
            report.status,
            saved.status,
            actor_id
        );

        self.notifier
            .status_updated(self.event(&saved, owner.as_ref()).await)
            .await;

        Ok(self
            .to_response(saved, owner.as_ref(), UrlExpiry::Detail)
            .await)
    }

    /// Remove a report with its comments; stored images are deleted best-effort
    pub async fn delete(&self, report_id: Uuid) -> Result<DeletedReportDto> {
        let report = self.find(report_id).await?;

        let owner = self.users.find_by_id(report.user_id).await?;
        let (citizen_name, phone_number) = citizen_contact(owner.as_ref());

        let removed_comments = self.comments.delete_by_report(report.id).await?;
        self.reports.delete(report.id).await?;

        self.media.discard(report.image_key.as_deref()).await;
        for comment in &removed_comments {
            self.media.discard(comment.image_key.as_deref()).await;
        }

        tracing::info!(
            "Report deleted: id={}, comments_removed={}",
            report.id,
            removed_comments.len()
        );

        self.notifier
            .report_deleted(DeletedReportEvent {
                report_id: report.id,
                category: report.category,
                citizen_name: citizen_name.clone(),
                phone_number: phone_number.clone(),
            })
            .await;

        Ok(DeletedReportDto {
            report_id: report.id,
            category: report.category,
            citizen_name,
            phone_number,
        })
    }

    pub async fn list_all(&self) -> Result<Vec<ReportResponseDto>> {
        let reports = self.reports.list_all().await?;
        self.to_responses(reports, UrlExpiry::Detail).await
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<ReportResponseDto>> {
        let reports = self.reports.list_by_user(user_id).await?;
        self.to_responses(reports, UrlExpiry::List).await
    }

    /// Reports in the category the given authority is responsible for
    pub async fn list_for_authority(&self, user_id: Uuid) -> Result<Vec<ReportResponseDto>> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !user.is_authority() {
            return Err(AppError::Forbidden(
                "Access denied. Only authority users can access this data.".to_string(),
            ));
        }

        let category = user.related_category.ok_or_else(|| {
            AppError::Internal(format!("Authority {} has no related category", user.id))
        })?;

        let reports = self.reports.list_by_category(category).await?;
        self.to_responses(reports, UrlExpiry::List).await
    }

    pub async fn get(&self, report_id: Uuid) -> Result<ReportResponseDto> {
        let report = self.find(report_id).await?;
        let owner = self.users.find_by_id(report.user_id).await?;
        Ok(self
            .to_response(report, owner.as_ref(), UrlExpiry::Detail)
            .await)
    }

    pub async fn image_url(&self, report_id: Uuid) -> Result<SignedUrlDto> {
        let not_found = || AppError::NotFound("Report or image not found".to_string());

        let report = self.reports.find_by_id(report_id).await?.ok_or_else(not_found)?;
        let key = report.image_key.ok_or_else(not_found)?;

        let signed_url = self.media.signed_url(&key, UrlExpiry::Detail).await?;

        Ok(SignedUrlDto {
            signed_url,
            expires_in: self.media.expiry_secs(UrlExpiry::Detail),
        })
    }

    pub async fn exists(&self, report_id: Uuid) -> Result<bool> {
        Ok(self.reports.find_by_id(report_id).await?.is_some())
    }

    async fn find(&self, report_id: Uuid) -> Result<Report> {
        self.reports
            .find_by_id(report_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Report not found".to_string()))
    }

    async fn event(&self, report: &Report, owner: Option<&User>) -> ReportEvent {
        let image_url = self
            .media
            .resolve(report.image_key.as_deref(), UrlExpiry::List)
            .await;
        ReportEvent::new(report, owner, image_url)
    }

    async fn to_response(
        &self,
        report: Report,
        owner: Option<&User>,
        expiry: UrlExpiry,
    ) -> ReportResponseDto {
        let image_url = self.media.resolve(report.image_key.as_deref(), expiry).await;
        ReportResponseDto::new(report, image_url, citizen_contact(owner))
    }

    async fn to_responses(
        &self,
        reports: Vec<Report>,
        expiry: UrlExpiry,
    ) -> Result<Vec<ReportResponseDto>> {
        let mut owner_ids: Vec<Uuid> = reports.iter().map(|r| r.user_id).collect();
        owner_ids.sort_unstable();
        owner_ids.dedup();

        let owners: HashMap<Uuid, User> = self
            .users
            .find_by_ids(&owner_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let responses = reports.into_iter().map(|report| {
            let owner = owners.get(&report.user_id);
            self.to_response(report, owner, expiry)
        });

        Ok(join_all(responses).await)
    }
}
