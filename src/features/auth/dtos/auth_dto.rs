use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request DTO for login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Request DTO for completing a password reset from the emailed link
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequestDto {
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub token: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Response DTO for a successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponseDto {
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Expiry read from the token, when it carries one
    pub expires_at: Option<DateTime<Utc>>,
    pub user: AuthUserDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthUserDto {
    pub id: String,
    pub email: String,
    pub nombre: String,
    pub role: String,
}

/// Current session as seen by the gateway
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponseDto {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub expires_at: DateTime<Utc>,
    /// Seconds left before the token expires
    pub remaining_seconds: i64,
}
