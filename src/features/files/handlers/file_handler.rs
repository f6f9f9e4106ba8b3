use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::core::error::AppError;
use crate::core::extractor::AppJson;
use crate::features::auth::SessionContext;
use crate::features::files::dtos::{
    DeleteFileDto, DeleteFileResponseDto, ImageFace, UploadBanknoteImageDto,
    UploadProfileImageDto, UploadedFileDto,
};
use crate::features::files::services::{FileService, ImageUpload};
use crate::shared::types::ApiResponse;

/// Image plus the text fields of a multipart form
struct ImageForm {
    image: Option<ImageUpload>,
    fields: HashMap<String, String>,
}

async fn read_image_form(mut multipart: Multipart) -> Result<ImageForm, AppError> {
    let mut form = ImageForm {
        image: None,
        fields: HashMap::new(),
    };

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let data = field.bytes().await.map_err(|e| {
                debug!("Failed to read file bytes: {}", e);
                AppError::BadRequest(format!("Failed to read file data: {}", e))
            })?;

            form.image = Some(ImageUpload {
                data: data.to_vec(),
                content_type,
            });
        } else if !name.is_empty() {
            let text = field.text().await.map_err(|e| {
                AppError::BadRequest(format!("Failed to read field '{}': {}", name, e))
            })?;
            form.fields.insert(name, text);
        }
    }

    Ok(form)
}

fn optional_id(fields: &HashMap<String, String>, name: &str) -> Result<Option<i64>, AppError> {
    match fields.get(name).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("{} must be a number", name))),
    }
}

fn session_user(session: &SessionContext) -> Result<&str, AppError> {
    session
        .user_id()
        .ok_or_else(|| AppError::Forbidden("Session does not identify a user".to_string()))
}

/// Upload a banknote image
///
/// Accepts multipart/form-data with `file`, `tipo` (anverso or reverso) and the
/// optional `pais_id` and `billete_id`.
#[utoipa::path(
    post,
    path = "/api/files/banknotes",
    tag = "files",
    request_body(
        content = UploadBanknoteImageDto,
        content_type = "multipart/form-data",
        description = "Banknote face image",
    ),
    responses(
        (status = 201, description = "Image uploaded", body = ApiResponse<UploadedFileDto>),
        (status = 400, description = "Invalid file or form"),
        (status = 401, description = "Session expired or invalid"),
        (status = 413, description = "File too large")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_banknote_image(
    _session: SessionContext,
    State(service): State<Arc<FileService>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UploadedFileDto>>), AppError> {
    let form = read_image_form(multipart).await?;

    let face = form
        .fields
        .get("tipo")
        .and_then(|t| ImageFace::parse(t))
        .ok_or_else(|| AppError::BadRequest("tipo must be 'anverso' or 'reverso'".to_string()))?;
    let country_id = optional_id(&form.fields, "pais_id")?;
    let banknote_id = optional_id(&form.fields, "billete_id")?;
    let image = form
        .image
        .ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;

    let uploaded = service
        .upload_banknote_image(image, country_id, banknote_id, face)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(uploaded), None, None)),
    ))
}

/// Upload a profile picture for the current user
#[utoipa::path(
    post,
    path = "/api/files/profile",
    tag = "files",
    request_body(
        content = UploadProfileImageDto,
        content_type = "multipart/form-data",
        description = "Profile picture",
    ),
    responses(
        (status = 201, description = "Image uploaded", body = ApiResponse<UploadedFileDto>),
        (status = 400, description = "Invalid file"),
        (status = 401, description = "Session expired or invalid")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_profile_image(
    session: SessionContext,
    State(service): State<Arc<FileService>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UploadedFileDto>>), AppError> {
    let user_id = session_user(&session)?;
    let image = read_image_form(multipart)
        .await?
        .image
        .ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;

    let uploaded = service.upload_profile_image(image, user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(uploaded), None, None)),
    ))
}

/// Delete an image by key or public URL
#[utoipa::path(
    delete,
    path = "/api/files",
    tag = "files",
    request_body = DeleteFileDto,
    responses(
        (status = 200, description = "Image deleted", body = ApiResponse<DeleteFileResponseDto>),
        (status = 400, description = "Invalid path or URL"),
        (status = 403, description = "Not authorized to delete this file"),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_file(
    session: SessionContext,
    State(service): State<Arc<FileService>>,
    AppJson(dto): AppJson<DeleteFileDto>,
) -> Result<Json<ApiResponse<DeleteFileResponseDto>>, AppError> {
    let user_id = session_user(&session)?;
    service.delete(&dto, user_id).await?;

    Ok(Json(ApiResponse::success(
        Some(DeleteFileResponseDto { deleted: true }),
        Some("File deleted successfully".to_string()),
        None,
    )))
}
