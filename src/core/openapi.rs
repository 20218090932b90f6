use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::categories::{
    dtos as categories_dtos, handlers as categories_handlers, models as categories_models,
};
use crate::features::comments::{dtos as comments_dtos, handlers as comments_handlers};
use crate::features::media::dtos as media_dtos;
use crate::features::notifications::{
    handlers as notifications_handlers, models as notifications_models,
};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::users::{
    dtos as users_dtos, handlers as users_handlers, models as users_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Users
        users_handlers::register,
        users_handlers::login,
        // Categories (public)
        categories_handlers::list_categories,
        // Reports
        reports_handlers::create_report,
        reports_handlers::list_reports,
        reports_handlers::list_user_reports,
        reports_handlers::list_category_reports,
        reports_handlers::get_report,
        reports_handlers::get_report_image_url,
        reports_handlers::update_report,
        reports_handlers::update_report_status,
        reports_handlers::delete_report,
        // Comments
        comments_handlers::list_category_comments,
        comments_handlers::get_report_comment,
        comments_handlers::delete_report_comments,
        // Notifications
        notifications_handlers::ws_handler,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Users
            users_models::UserRole,
            users_dtos::RegisterRequestDto,
            users_dtos::LoginRequestDto,
            users_dtos::UserResponseDto,
            users_dtos::LoginResponseDto,
            ApiResponse<users_dtos::UserResponseDto>,
            ApiResponse<users_dtos::LoginResponseDto>,
            // Categories
            categories_models::Category,
            categories_models::Subcategory,
            categories_dtos::CategoryTreeDto,
            ApiResponse<Vec<categories_dtos::CategoryTreeDto>>,
            // Media
            media_dtos::SignedUrlDto,
            ApiResponse<media_dtos::SignedUrlDto>,
            // Reports
            reports_models::ReportStatus,
            reports_models::ReportPriority,
            reports_dtos::CreateReportForm,
            reports_dtos::UpdateReportForm,
            reports_dtos::UpdateStatusForm,
            reports_dtos::ReportResponseDto,
            reports_dtos::DeletedReportDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<reports_dtos::DeletedReportDto>,
            // Comments
            comments_dtos::CommentResponseDto,
            comments_dtos::DeletedCommentsDto,
            ApiResponse<comments_dtos::CommentResponseDto>,
            ApiResponse<Vec<comments_dtos::CommentResponseDto>>,
            ApiResponse<comments_dtos::DeletedCommentsDto>,
            // WebSocket event payloads
            notifications_models::ReportEvent,
            notifications_models::DeletedReportEvent,
            notifications_models::DirectMessage,
        )
    ),
    tags(
        (name = "users", description = "Registration and sign in"),
        (name = "categories", description = "Report categories (public)"),
        (name = "reports", description = "Citizen reports and their status workflow"),
        (name = "comments", description = "Authority comments on reports"),
        (name = "notifications", description = "WebSocket push of report events"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "UrbanCenter API",
        version = "0.1.0",
        description = "API documentation for UrbanCenter",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/users/register",
            "/api/users/login",
            "/api/categories",
            "/api/reports",
            "/api/reports/report",
            "/api/reports/report/{id}",
            "/api/reports/report/status/{id}",
            "/api/comments/report/{report_id}",
            "/ws",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
    }
}
