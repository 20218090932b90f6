use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::TokenService;
use crate::features::categories::Category;
use crate::features::users::dtos::{
    LoginRequestDto, LoginResponseDto, RegisterRequestDto, UserResponseDto,
};
use crate::features::users::models::{NewUser, UserRole};
use crate::features::users::repositories::UserRepository;
use crate::features::users::services::{hash_password, verify_password};
use crate::shared::validation::PHONE_REGEX;

/// Registration and login for citizens and authorities
pub struct UserService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    bcrypt_cost: u32,
}

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<TokenService>,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            tokens,
            bcrypt_cost,
        }
    }

    pub async fn register(&self, dto: RegisterRequestDto) -> Result<UserResponseDto> {
        let (Some(username), Some(email), Some(password), Some(role)) = (
            required(&dto.username),
            required(&dto.email),
            required(&dto.password),
            required(&dto.role),
        ) else {
            return Err(AppError::Validation("All fields are required".to_string()));
        };

        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let role: UserRole = role.parse().map_err(|_| {
            AppError::Validation("Role must be 'citizen' or 'authority'".to_string())
        })?;

        let (related_category, phone_number) = match role {
            UserRole::Authority => {
                let raw = required(&dto.related_category).ok_or_else(|| {
                    AppError::Validation("Authority users must have a related category".to_string())
                })?;
                let category = raw
                    .parse::<Category>()
                    .map_err(|_| AppError::Validation("Invalid related category".to_string()))?;
                // Authorities never carry a phone number
                (Some(category), None)
            }
            UserRole::Citizen => {
                if required(&dto.related_category).is_some() {
                    return Err(AppError::Validation(
                        "Citizen users cannot have a related category".to_string(),
                    ));
                }
                let phone = required(&dto.phone_number).ok_or_else(|| {
                    AppError::Validation("Citizen users must have a phone number".to_string())
                })?;
                if !PHONE_REGEX.is_match(phone) {
                    return Err(AppError::Validation(
                        "Phone number must be 10 to 15 digits".to_string(),
                    ));
                }
                (None, Some(phone.to_string()))
            }
        };

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let password_hash = hash_password(password, self.bcrypt_cost).await?;

        let user = self
            .users
            .insert(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
                role,
                phone_number,
                related_category,
            })
            .await?;

        tracing::info!("User registered: id={}, role={}", user.id, user.role);

        Ok(user.into())
    }

    pub async fn login(&self, dto: LoginRequestDto) -> Result<LoginResponseDto> {
        let (Some(email), Some(password)) = (required(&dto.email), required(&dto.password)) else {
            return Err(AppError::Validation(
                "Email and password are required".to_string(),
            ));
        };

        let mut user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::BadRequest("User not found".to_string()))?;

        if !verify_password(password, &user.password_hash).await? {
            return Err(AppError::BadRequest("Invalid password".to_string()));
        }

        let token = self.tokens.issue(&user)?;

        self.users.touch_login(user.id).await?;
        user.last_login_at = Some(Utc::now());

        tracing::info!("User signed in: id={}", user.id);

        Ok(LoginResponseDto {
            token,
            user: user.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::TestContext;

    fn citizen_dto(email: &str) -> RegisterRequestDto {
        RegisterRequestDto {
            username: Some("alice".to_string()),
            email: Some(email.to_string()),
            password: Some("hunter22".to_string()),
            role: Some("citizen".to_string()),
            related_category: None,
            phone_number: Some("0501234567".to_string()),
        }
    }

    fn assert_validation(err: AppError, expected: &str) {
        match err {
            AppError::Validation(msg) => assert_eq!(msg, expected),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_citizen() {
        let ctx = TestContext::new();

        let user = ctx
            .user_service
            .register(citizen_dto("alice@example.com"))
            .await
            .unwrap();

        assert_eq!(user.role, UserRole::Citizen);
        assert_eq!(user.phone_number.as_deref(), Some("0501234567"));
        assert_eq!(user.related_category, None);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let ctx = TestContext::new();
        ctx.user_service
            .register(citizen_dto("alice@example.com"))
            .await
            .unwrap();

        let err = ctx
            .user_service
            .register(citizen_dto("alice@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(ref m) if m == "User with this email already exists"));
    }

    #[tokio::test]
    async fn test_register_missing_fields() {
        let ctx = TestContext::new();
        let mut dto = citizen_dto("alice@example.com");
        dto.password = Some("  ".to_string());

        let err = ctx.user_service.register(dto).await.unwrap_err();
        assert_validation(err, "All fields are required");
    }

    #[tokio::test]
    async fn test_register_role_shape_rules() {
        let ctx = TestContext::new();

        let mut dto = citizen_dto("a@example.com");
        dto.related_category = Some("Road Hazards".to_string());
        assert_validation(
            ctx.user_service.register(dto).await.unwrap_err(),
            "Citizen users cannot have a related category",
        );

        let mut dto = citizen_dto("b@example.com");
        dto.phone_number = None;
        assert_validation(
            ctx.user_service.register(dto).await.unwrap_err(),
            "Citizen users must have a phone number",
        );

        let mut dto = citizen_dto("c@example.com");
        dto.phone_number = Some("050-123-4567".to_string());
        assert_validation(
            ctx.user_service.register(dto).await.unwrap_err(),
            "Phone number must be 10 to 15 digits",
        );

        let mut dto = citizen_dto("d@example.com");
        dto.role = Some("authority".to_string());
        assert_validation(
            ctx.user_service.register(dto).await.unwrap_err(),
            "Authority users must have a related category",
        );

        let mut dto = citizen_dto("e@example.com");
        dto.role = Some("authority".to_string());
        dto.related_category = Some("Parking".to_string());
        assert_validation(
            ctx.user_service.register(dto).await.unwrap_err(),
            "Invalid related category",
        );
    }

    #[tokio::test]
    async fn test_register_authority_drops_phone() {
        let ctx = TestContext::new();
        let mut dto = citizen_dto("roads@city.gov");
        dto.role = Some("authority".to_string());
        dto.related_category = Some("Road Hazards".to_string());

        let user = ctx.user_service.register(dto).await.unwrap();

        assert_eq!(user.related_category, Some(Category::RoadHazards));
        assert_eq!(user.phone_number, None);
    }

    #[tokio::test]
    async fn test_login_flow() {
        let ctx = TestContext::new();
        let registered = ctx
            .user_service
            .register(citizen_dto("alice@example.com"))
            .await
            .unwrap();

        let login = ctx
            .user_service
            .login(LoginRequestDto {
                email: Some("alice@example.com".to_string()),
                password: Some("hunter22".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(login.user.id, registered.id);
        assert!(login.user.last_login_at.is_some());
        let caller = ctx.token_service.validate(&login.token).unwrap();
        assert_eq!(caller.user_id, registered.id);
    }

    #[tokio::test]
    async fn test_login_errors() {
        let ctx = TestContext::new();
        ctx.user_service
            .register(citizen_dto("alice@example.com"))
            .await
            .unwrap();

        let err = ctx
            .user_service
            .login(LoginRequestDto {
                email: Some("bob@example.com".to_string()),
                password: Some("hunter22".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "User not found"));

        let err = ctx
            .user_service
            .login(LoginRequestDto {
                email: Some("alice@example.com".to_string()),
                password: Some("wrong".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "Invalid password"));
    }
}
