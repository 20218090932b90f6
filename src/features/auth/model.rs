use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::categories::Category;
use crate::features::users::UserRole;

/// Caller identity extracted from a verified bearer token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_category: Option<Category>,
}

/// JWT payload issued at login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_category: Option<Category>,
    pub iat: i64,
    pub exp: i64,
}
