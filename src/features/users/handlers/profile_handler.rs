use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::AppError;
use crate::core::extractor::AppJson;
use crate::features::auth::SessionContext;
use crate::features::users::dtos::{
    ChangePasswordDto, UpdateProfileDto, UpdateProfileImageDto, UserProfileDto,
};
use crate::features::users::services::ProfileService;
use crate::shared::types::ApiResponse;

/// Get the current user's profile
#[utoipa::path(
    get,
    path = "/api/me",
    tag = "users",
    responses(
        (status = 200, description = "Current profile", body = ApiResponse<UserProfileDto>),
        (status = 401, description = "Session expired or invalid")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_profile(
    session: SessionContext,
    State(service): State<Arc<ProfileService>>,
) -> Result<Json<ApiResponse<UserProfileDto>>, AppError> {
    let profile = service.get_profile(session.bearer()).await?;
    Ok(Json(ApiResponse::success(Some(profile), None, None)))
}

/// Update the current user's personal data
#[utoipa::path(
    put,
    path = "/api/me",
    tag = "users",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserProfileDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Session expired or invalid")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_profile(
    session: SessionContext,
    State(service): State<Arc<ProfileService>>,
    AppJson(dto): AppJson<UpdateProfileDto>,
) -> Result<Json<ApiResponse<UserProfileDto>>, AppError> {
    dto.validate()?;

    let profile = service.update_profile(session.bearer(), dto).await?;
    Ok(Json(ApiResponse::success(
        Some(profile),
        Some("Profile updated successfully".to_string()),
        None,
    )))
}

/// Change the current user's password
#[utoipa::path(
    post,
    path = "/api/me/password",
    tag = "users",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<String>),
        (status = 400, description = "Weak password, mismatch or wrong current password"),
        (status = 401, description = "Session expired or invalid")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn change_password(
    session: SessionContext,
    State(service): State<Arc<ProfileService>>,
    AppJson(dto): AppJson<ChangePasswordDto>,
) -> Result<Json<ApiResponse<String>>, AppError> {
    dto.validate()?;

    let message = service.change_password(session.bearer(), dto).await?;
    Ok(Json(ApiResponse::success(None, Some(message), None)))
}

/// Set or clear the current user's profile picture
///
/// Expects the key and URL returned by `POST /api/files/profile`. The previous
/// picture is removed from storage once replaced.
#[utoipa::path(
    put,
    path = "/api/me/image",
    tag = "users",
    request_body = UpdateProfileImageDto,
    responses(
        (status = 200, description = "Profile picture updated", body = ApiResponse<UserProfileDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Session expired or invalid"),
        (status = 403, description = "Image is not one of the user's uploads")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_profile_image(
    session: SessionContext,
    State(service): State<Arc<ProfileService>>,
    AppJson(dto): AppJson<UpdateProfileImageDto>,
) -> Result<Json<ApiResponse<UserProfileDto>>, AppError> {
    dto.validate()?;
    let user_id = session
        .user_id()
        .ok_or_else(|| AppError::Forbidden("Session does not identify a user".to_string()))?;

    let profile = service
        .update_profile_image(session.bearer(), user_id, dto)
        .await?;
    Ok(Json(ApiResponse::success(Some(profile), None, None)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::session::test_tokens::valid_token;
    use crate::features::files::FileService;
    use crate::features::users::routes::routes;
    use crate::features::users::services::profile_service::fakes::{
        FakeProfileApi, CURRENT_PASSWORD,
    };
    use crate::modules::storage::memory::InMemoryObjectStore;
    use crate::shared::test_helpers::with_session;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn server(image: Option<&str>) -> (TestServer, Arc<InMemoryObjectStore>) {
        let store = Arc::new(InMemoryObjectStore::new());
        if let Some(key) = image {
            store.insert(key);
        }
        let files = Arc::new(FileService::new(store.clone()));
        let service = Arc::new(ProfileService::new(
            Arc::new(FakeProfileApi::with_image(image)),
            files,
        ));
        (
            TestServer::new(with_session(routes(service))).unwrap(),
            store,
        )
    }

    #[tokio::test]
    async fn test_get_profile() {
        let (server, _) = server(None);
        let response = server
            .get("/api/me")
            .authorization_bearer(valid_token())
            .await;
        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["data"]["id"], "42");
        assert_eq!(body["data"]["email"], "ana@example.com");
    }

    #[tokio::test]
    async fn test_profile_requires_session() {
        let (server, _) = server(None);
        server
            .get("/api/me")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_update_profile_validates_fields() {
        let (server, _) = server(None);
        server
            .put("/api/me")
            .authorization_bearer(valid_token())
            .json(&json!({
                "nombre": "A",
                "apellidos": "Gómez",
                "email": "ana@example.com",
                "telefono": "300-abc"
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .put("/api/me")
            .authorization_bearer(valid_token())
            .json(&json!({
                "nombre": "Ana María",
                "apellidos": "Gómez",
                "email": "ana@example.com",
                "telefono": "+57 (300) 123-4567"
            }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["data"]["nombre"], "Ana María");
    }

    #[tokio::test]
    async fn test_change_password() {
        let (server, _) = server(None);

        server
            .post("/api/me/password")
            .authorization_bearer(valid_token())
            .json(&json!({
                "currentPassword": CURRENT_PASSWORD,
                "newPassword": "Billetes.2024",
                "confirmPassword": "Billetes.2025"
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .post("/api/me/password")
            .authorization_bearer(valid_token())
            .json(&json!({
                "currentPassword": CURRENT_PASSWORD,
                "newPassword": "billetes2024",
                "confirmPassword": "billetes2024"
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .post("/api/me/password")
            .authorization_bearer(valid_token())
            .json(&json!({
                "currentPassword": CURRENT_PASSWORD,
                "newPassword": "Billetes.2024",
                "confirmPassword": "Billetes.2024"
            }))
            .await;
        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>()["message"],
            "Password changed successfully"
        );
    }

    #[tokio::test]
    async fn test_replacing_profile_image_discards_old_object() {
        let (server, store) = server(Some("42/profile-1.png"));
        store.insert("42/profile-2.png");

        let response = server
            .put("/api/me/image")
            .authorization_bearer(valid_token())
            .json(&json!({
                "profile_image": "http://storage.test/img-billetes/42/profile-2.png",
                "profile_image_path": "42/profile-2.png"
            }))
            .await;
        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>()["data"]["profile_image_path"],
            "42/profile-2.png"
        );
        assert_eq!(store.keys(), vec!["42/profile-2.png".to_string()]);
    }

    #[tokio::test]
    async fn test_profile_image_must_be_own_upload() {
        let (server, store) = server(Some("42/profile-1.png"));
        store.insert("7/profile-9.png");

        server
            .put("/api/me/image")
            .authorization_bearer(valid_token())
            .json(&json!({ "profile_image_path": "7/profile-9.png" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        assert!(store.contains("42/profile-1.png"));
        assert!(store.contains("7/profile-9.png"));
    }
}
