use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::Category;
use crate::features::users::models::{User, UserRole};

/// Request DTO for user registration
///
/// Every field is optional at the wire level so that missing fields
/// are reported with one consistent message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    pub username: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    pub password: Option<String>,

    /// "citizen" or "authority"
    pub role: Option<String>,

    /// Required for authorities, forbidden for citizens
    pub related_category: Option<String>,

    /// Required for citizens, ignored for authorities
    pub phone_number: Option<String>,
}

/// Request DTO for user login
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginRequestDto {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public view of a user; never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponseDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub registration_date: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponseDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            role: u.role,
            related_category: u.related_category,
            phone_number: u.phone_number,
            registration_date: u.registration_date,
            last_login_at: u.last_login_at,
        }
    }
}

/// Response DTO for a successful login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponseDto {
    /// HS256 JWT to send as `Authorization: Bearer <token>`
    pub token: String,
    pub user: UserResponseDto,
}
