use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, Claims};
use crate::features::users::User;

/// Issues and verifies HS256 session tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: Duration,
    leeway: u64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            expiry: config.token_expiry,
            leeway: config.jwt_leeway.as_secs(),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            related_category: user.related_category,
            iat: now,
            exp: now + self.expiry.as_secs() as i64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to sign token: {:?}", e);
            AppError::Internal(format!("Failed to sign token: {}", e))
        })
    }

    pub fn validate(&self, token: &str) -> Result<AuthenticatedUser> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!("Rejected token: {}", e);
            AppError::Forbidden("Invalid token".to_string())
        })?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::Forbidden("Invalid token".to_string()))?;

        Ok(AuthenticatedUser {
            user_id,
            role: data.claims.role,
            related_category: data.claims.related_category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::Category;
    use crate::features::users::UserRole;

    fn config(expiry_secs: u64) -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_expiry: Duration::from_secs(expiry_secs),
            jwt_leeway: Duration::from_secs(0),
            bcrypt_cost: 4,
        }
    }

    fn authority() -> User {
        User {
            id: Uuid::new_v4(),
            username: "roads".to_string(),
            email: "roads@city.gov".to_string(),
            password_hash: String::new(),
            role: UserRole::Authority,
            phone_number: None,
            related_category: Some(Category::RoadHazards),
            registration_date: Utc::now(),
            last_login_at: None,
        }
    }

    #[test]
    fn test_issue_then_validate() {
        let service = TokenService::new(&config(3600));
        let user = authority();

        let token = service.issue(&user).unwrap();
        let caller = service.validate(&token).unwrap();

        assert_eq!(caller.user_id, user.id);
        assert_eq!(caller.role, UserRole::Authority);
        assert_eq!(caller.related_category, Some(Category::RoadHazards));
    }

    #[test]
    fn test_rejects_foreign_signature() {
        let token = TokenService::new(&config(3600)).issue(&authority()).unwrap();

        let mut other = config(3600);
        other.jwt_secret = "another-secret".to_string();
        let err = TokenService::new(&other).validate(&token).unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_rejects_garbage() {
        let service = TokenService::new(&config(3600));
        assert!(service.validate("not-a-jwt").is_err());
    }
}
