use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::users::dtos::{
    LoginRequestDto, LoginResponseDto, RegisterRequestDto, UserResponseDto,
};
use crate::features::users::services::UserService;
use crate::shared::types::ApiResponse;

/// Register a citizen or authority account
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 200, description = "User registered successfully", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error or email already registered")
    ),
    tag = "users"
)]
pub async fn register(
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let user = service.register(dto).await?;
    Ok(Json(ApiResponse::success(
        Some(user),
        Some("User registered successfully".to_string()),
        None,
    )))
}

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Sign in successful", body = ApiResponse<LoginResponseDto>),
        (status = 400, description = "Missing credentials, unknown user or wrong password")
    ),
    tag = "users"
)]
pub async fn login(
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<LoginResponseDto>>> {
    let response = service.login(dto).await?;
    Ok(Json(ApiResponse::success(
        Some(response),
        Some("Sign in successful".to_string()),
        None,
    )))
}
