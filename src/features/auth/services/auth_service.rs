use std::sync::Arc;

use chrono::Utc;

use crate::core::error::{AppError, Result};
use crate::features::auth::clients::AuthApi;
use crate::features::auth::dtos::{
    AuthUserDto, ForgotPasswordRequestDto, LoginRequestDto, LoginResponseDto,
    ResetPasswordRequestDto, SessionResponseDto,
};
use crate::features::auth::session::{inspect_token, SessionContext};

const DEFAULT_FORGOT_MESSAGE: &str =
    "If the email is registered, a password reset link has been sent";
const DEFAULT_RESET_MESSAGE: &str = "Password has been reset";

/// Service for login and password recovery against the auth API
pub struct AuthService {
    auth_api: Arc<dyn AuthApi>,
}

impl AuthService {
    pub fn new(auth_api: Arc<dyn AuthApi>) -> Self {
        Self { auth_api }
    }

    /// Logs in and normalizes the token field of the reply.
    ///
    /// A token that is already unreadable or expired is refused here rather than on
    /// the next request.
    pub async fn login(&self, dto: LoginRequestDto) -> Result<LoginResponseDto> {
        let reply = self.auth_api.login(&dto.email, &dto.password).await?;

        let access_token = reply
            .access_token
            .or(reply.token)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                tracing::error!("Auth API login reply carried no token");
                AppError::ExternalServiceError("Login response did not include a token".to_string())
            })?;

        let claims = inspect_token(&access_token, Utc::now()).map_err(|e| {
            tracing::warn!("Auth API issued an unusable token: {}", e);
            AppError::ExternalServiceError("Login returned an unusable token".to_string())
        })?;

        let user = reply.user.unwrap_or_default();
        tracing::info!("User {} logged in", dto.email);

        Ok(LoginResponseDto {
            access_token,
            token_type: reply.token_type.unwrap_or_else(|| "Bearer".to_string()),
            expires_at: chrono::DateTime::from_timestamp(claims.exp, 0),
            user: AuthUserDto {
                id: if user.id.is_empty() {
                    claims.sub.unwrap_or_default()
                } else {
                    user.id
                },
                email: if user.email.is_empty() {
                    dto.email
                } else {
                    user.email
                },
                nombre: user.nombre,
                role: user.role,
            },
        })
    }

    pub async fn forgot_password(&self, dto: ForgotPasswordRequestDto) -> Result<String> {
        let message = self.auth_api.forgot_password(&dto.email).await?;
        Ok(message.unwrap_or_else(|| DEFAULT_FORGOT_MESSAGE.to_string()))
    }

    pub async fn reset_password(&self, dto: ResetPasswordRequestDto) -> Result<String> {
        let message = self
            .auth_api
            .reset_password(&dto.token, &dto.new_password)
            .await?;
        Ok(message.unwrap_or_else(|| DEFAULT_RESET_MESSAGE.to_string()))
    }

    pub fn describe_session(&self, session: &SessionContext) -> SessionResponseDto {
        SessionResponseDto {
            user_id: session.claims.sub.clone(),
            email: session.claims.email.clone(),
            role: session.claims.role.clone(),
            expires_at: session.expires_at,
            remaining_seconds: session.remaining().num_seconds(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::{FakeAuthApi, PASSWORD};
    use super::*;

    fn service() -> AuthService {
        AuthService::new(Arc::new(FakeAuthApi))
    }

    #[tokio::test]
    async fn test_login_accepts_legacy_token_field() {
        let response = service()
            .login(LoginRequestDto {
                email: "ana@example.com".to_string(),
                password: PASSWORD.to_string(),
            })
            .await
            .unwrap();

        assert!(!response.access_token.is_empty());
        assert_eq!(response.token_type, "Bearer");
        assert!(response.expires_at.unwrap() > Utc::now());
        assert_eq!(response.user.nombre, "Ana");
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let result = service()
            .login(LoginRequestDto {
                email: "ana@example.com".to_string(),
                password: "nope".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_forgot_password_falls_back_to_default_message() {
        let message = service()
            .forgot_password(ForgotPasswordRequestDto {
                email: "ana@example.com".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(message, DEFAULT_FORGOT_MESSAGE);
    }
}
