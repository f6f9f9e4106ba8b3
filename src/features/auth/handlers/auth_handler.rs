use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    ForgotPasswordRequestDto, LoginRequestDto, LoginResponseDto, ResetPasswordRequestDto,
    SessionResponseDto,
};
use crate::features::auth::services::AuthService;
use crate::features::auth::session::SessionContext;
use crate::shared::types::ApiResponse;
use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 502, description = "Auth API unavailable")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<LoginResponseDto>>> {
    dto.validate()?;

    let response = service.login(dto).await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Request a password reset email
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordRequestDto,
    responses(
        (status = 200, description = "Reset email requested"),
        (status = 400, description = "Validation error")
    ),
    tag = "auth"
)]
pub async fn forgot_password(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<ForgotPasswordRequestDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()?;

    let message = service.forgot_password(dto).await?;
    Ok(Json(ApiResponse::success(None, Some(message), None)))
}

/// Set a new password with a reset token
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordRequestDto,
    responses(
        (status = 200, description = "Password reset"),
        (status = 400, description = "Validation error or invalid token")
    ),
    tag = "auth"
)]
pub async fn reset_password(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<ResetPasswordRequestDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()?;

    let message = service.reset_password(dto).await?;
    Ok(Json(ApiResponse::success(None, Some(message), None)))
}

/// Inspect the current session
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Session is live", body = ApiResponse<SessionResponseDto>),
        (status = 401, description = "Session expired or invalid")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_session(
    session: SessionContext,
    State(service): State<Arc<AuthService>>,
) -> Result<Json<ApiResponse<SessionResponseDto>>> {
    Ok(Json(ApiResponse::success(
        Some(service.describe_session(&session)),
        None,
        None,
    )))
}
