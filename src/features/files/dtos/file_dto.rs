use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::ALLOWED_IMAGE_TYPES;

/// Banknote image upload form, for Swagger UI documentation only.
/// The handler reads the multipart body directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadBanknoteImageDto {
    /// The image to upload (jpeg, png, gif or webp, up to 5 MB)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    /// Face of the banknote: "anverso" or "reverso"
    #[schema(example = "anverso")]
    pub tipo: String,
    /// Country id; omitted for banknotes not yet assigned
    pub pais_id: Option<i64>,
    /// Banknote id; omitted while the banknote is being created
    pub billete_id: Option<i64>,
}

/// Profile picture upload form, for Swagger UI documentation only.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadProfileImageDto {
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Banknote face an image belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageFace {
    Anverso,
    Reverso,
}

impl ImageFace {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFace::Anverso => "anverso",
            ImageFace::Reverso => "reverso",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "anverso" => Some(ImageFace::Anverso),
            "reverso" => Some(ImageFace::Reverso),
            _ => None,
        }
    }
}

/// Response DTO for an uploaded image
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadedFileDto {
    /// Object key inside the bucket; keep it to delete or replace the image
    pub path: String,
    /// Public URL of the image
    pub url: String,
    pub content_type: String,
    /// Size of the image in bytes
    pub size: usize,
}

/// Request DTO for deleting an image, by key or by public URL
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteFileDto {
    pub path: Option<String>,
    pub url: Option<String>,
}

/// Response DTO for delete operations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteFileResponseDto {
    pub deleted: bool,
}

pub fn is_image_type_allowed(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&content_type)
}

pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}
