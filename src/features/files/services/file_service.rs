use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::{
    extension_for, is_image_type_allowed, DeleteFileDto, ImageFace, UploadedFileDto,
};
use crate::modules::storage::ObjectStore;
use crate::shared::constants::{ALLOWED_IMAGE_TYPES, MAX_IMAGE_SIZE};

const BANKNOTE_PREFIX: &str = "billetes";

/// Image received from a multipart form
#[derive(Debug)]
pub struct ImageUpload {
    pub data: Vec<u8>,
    pub content_type: String,
}

impl ImageUpload {
    /// Checks type and size, returning the file extension to store it under.
    pub fn validate(&self) -> Result<&'static str> {
        if self.data.is_empty() {
            return Err(AppError::BadRequest("File is empty".to_string()));
        }

        if self.data.len() > MAX_IMAGE_SIZE {
            return Err(AppError::BadRequest(format!(
                "File too large. Maximum size is {} MB",
                MAX_IMAGE_SIZE / 1024 / 1024
            )));
        }

        if !is_image_type_allowed(&self.content_type) {
            return Err(AppError::BadRequest(format!(
                "File type '{}' is not allowed. Allowed types: {}",
                self.content_type,
                ALLOWED_IMAGE_TYPES.join(", ")
            )));
        }

        extension_for(&self.content_type)
            .ok_or_else(|| AppError::BadRequest("Unsupported image type".to_string()))
    }
}

/// `billetes/{pais|sin-pais}/{billete|temp}/{face}-{millis}.{ext}`
pub fn banknote_image_key(
    country_id: Option<i64>,
    banknote_id: Option<i64>,
    face: ImageFace,
    millis: i64,
    ext: &str,
) -> String {
    let country = country_id.map_or_else(|| "sin-pais".to_string(), |id| id.to_string());
    let banknote = banknote_id.map_or_else(|| "temp".to_string(), |id| id.to_string());
    format!(
        "{}/{}/{}/{}-{}.{}",
        BANKNOTE_PREFIX,
        country,
        banknote,
        face.as_str(),
        millis,
        ext
    )
}

/// `{user_id}/profile-{millis}.{ext}`
pub fn profile_image_key(user_id: &str, millis: i64, ext: &str) -> String {
    format!("{}/profile-{}.{}", user_id, millis, ext)
}

/// True when `key` lies under the `{user_id}/` profile prefix.
pub fn is_profile_key_of(key: &str, user_id: &str) -> bool {
    !user_id.is_empty()
        && !key.contains("..")
        && key
            .strip_prefix(user_id)
            .and_then(|rest| rest.strip_prefix('/'))
            .map_or(false, |name| !name.is_empty())
}

/// Service for image uploads and removals
pub struct FileService {
    store: Arc<dyn ObjectStore>,
}

impl FileService {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    pub async fn upload_banknote_image(
        &self,
        upload: ImageUpload,
        country_id: Option<i64>,
        banknote_id: Option<i64>,
        face: ImageFace,
    ) -> Result<UploadedFileDto> {
        let ext = upload.validate()?;
        let key = banknote_image_key(
            country_id,
            banknote_id,
            face,
            Utc::now().timestamp_millis(),
            ext,
        );
        self.store_image(key, upload).await
    }

    pub async fn upload_profile_image(
        &self,
        upload: ImageUpload,
        user_id: &str,
    ) -> Result<UploadedFileDto> {
        let ext = upload.validate()?;
        let key = profile_image_key(user_id, Utc::now().timestamp_millis(), ext);
        self.store_image(key, upload).await
    }

    async fn store_image(&self, key: String, upload: ImageUpload) -> Result<UploadedFileDto> {
        let size = upload.data.len();
        debug!("Uploading {} ({} bytes)", key, size);

        let path = self
            .store
            .upload(&key, upload.data, &upload.content_type)
            .await?;
        info!("Stored image {}", path);

        Ok(UploadedFileDto {
            url: self.store.public_url(&path),
            path,
            content_type: upload.content_type,
            size,
        })
    }

    /// Removes an image named by key or URL.
    ///
    /// Banknote images may be removed by any session; profile images only by their owner.
    pub async fn delete(&self, dto: &DeleteFileDto, user_id: &str) -> Result<()> {
        let key = self.resolve_key(dto)?;

        if !key.starts_with(&format!("{}/", BANKNOTE_PREFIX)) && !is_profile_key_of(&key, user_id)
        {
            return Err(AppError::Forbidden(
                "Not authorized to delete this file".to_string(),
            ));
        }

        self.store.remove(&key).await?;
        info!("Removed image {}", key);
        Ok(())
    }

    /// Object key behind a stored reference. Keys pass through; URLs must point into the bucket.
    pub fn storage_key(&self, reference: &str) -> Option<String> {
        let reference = reference.trim();
        if reference.is_empty() {
            None
        } else if reference.contains("://") {
            self.store.key_from_url(reference)
        } else {
            Some(reference.trim_start_matches('/').to_string())
        }
    }

    /// Best-effort removal of a replaced image; failures are only logged.
    pub async fn discard(&self, key: &str) {
        match self.store.remove(key).await {
            Ok(()) => info!("Removed replaced image {}", key),
            Err(e) => warn!("Failed to remove previous image {}: {}", key, e),
        }
    }

    fn resolve_key(&self, dto: &DeleteFileDto) -> Result<String> {
        let path = dto
            .path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());
        let url = dto.url.as_deref().map(str::trim).filter(|u| !u.is_empty());

        match (path, url) {
            (Some(path), _) if !path.contains("..") => Ok(path.trim_start_matches('/').to_string()),
            (Some(_), _) => Err(AppError::BadRequest("Invalid file path".to_string())),
            (None, Some(url)) => self.store.key_from_url(url).ok_or_else(|| {
                AppError::BadRequest("URL does not belong to the image storage".to_string())
            }),
            (None, None) => Err(AppError::Validation(
                "Either path or url is required".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::storage::memory::{InMemoryObjectStore, MEMORY_BASE_URL};

    fn png(size: usize) -> ImageUpload {
        ImageUpload {
            data: vec![0u8; size],
            content_type: "image/png".to_string(),
        }
    }

    #[test]
    fn test_banknote_image_key() {
        assert_eq!(
            banknote_image_key(Some(3), Some(17), ImageFace::Anverso, 1700000000000, "jpg"),
            "billetes/3/17/anverso-1700000000000.jpg"
        );
        assert_eq!(
            banknote_image_key(None, None, ImageFace::Reverso, 5, "png"),
            "billetes/sin-pais/temp/reverso-5.png"
        );
    }

    #[test]
    fn test_image_validation() {
        assert_eq!(png(10).validate().unwrap(), "png");
        assert!(png(0).validate().is_err());
        assert!(png(MAX_IMAGE_SIZE + 1).validate().is_err());

        let pdf = ImageUpload {
            data: vec![1],
            content_type: "application/pdf".to_string(),
        };
        assert!(matches!(pdf.validate(), Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_profile_upload_and_owner_delete() {
        let store = Arc::new(InMemoryObjectStore::new());
        let service = FileService::new(store.clone());

        let uploaded = service.upload_profile_image(png(10), "42").await.unwrap();
        assert!(uploaded.path.starts_with("42/profile-"));
        assert!(uploaded.path.ends_with(".png"));
        assert_eq!(uploaded.url, format!("{}/{}", MEMORY_BASE_URL, uploaded.path));

        let by_url = DeleteFileDto {
            path: None,
            url: Some(uploaded.url.clone()),
        };
        assert!(matches!(
            service.delete(&by_url, "7").await,
            Err(AppError::Forbidden(_))
        ));
        service.delete(&by_url, "42").await.unwrap();
        assert!(!store.contains(&uploaded.path));
    }

    #[tokio::test]
    async fn test_delete_requires_a_reference() {
        let service = FileService::new(Arc::new(InMemoryObjectStore::new()));
        let empty = DeleteFileDto {
            path: Some("  ".to_string()),
            url: None,
        };
        assert!(matches!(
            service.delete(&empty, "42").await,
            Err(AppError::Validation(_))
        ));

        let traversal = DeleteFileDto {
            path: Some("billetes/../42/profile-1.png".to_string()),
            url: None,
        };
        assert!(matches!(
            service.delete(&traversal, "7").await,
            Err(AppError::BadRequest(_))
        ));

        let foreign = DeleteFileDto {
            path: None,
            url: Some("https://example.com/x.png".to_string()),
        };
        assert!(matches!(
            service.delete(&foreign, "42").await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_profile_key_ownership() {
        assert!(is_profile_key_of("42/profile-1.png", "42"));
        assert!(!is_profile_key_of("7/profile-9.png", "42"));
        assert!(!is_profile_key_of("420/profile-1.png", "42"));
        assert!(!is_profile_key_of("42/../7/profile-9.png", "42"));
        assert!(!is_profile_key_of("42/", "42"));
        assert!(!is_profile_key_of("/profile-1.png", ""));
    }

    #[test]
    fn test_storage_key_only_resolves_bucket_references() {
        let service = FileService::new(Arc::new(InMemoryObjectStore::new()));
        assert_eq!(
            service
                .storage_key(&format!("{}/42/profile-1.png", MEMORY_BASE_URL))
                .as_deref(),
            Some("42/profile-1.png")
        );
        assert_eq!(
            service.storage_key("/42/profile-1.png").as_deref(),
            Some("42/profile-1.png")
        );
        assert_eq!(service.storage_key("https://cdn.example.com/a.png"), None);
        assert_eq!(service.storage_key("  "), None);
    }

    #[tokio::test]
    async fn test_discard_ignores_missing_objects() {
        let store = Arc::new(InMemoryObjectStore::new());
        store.insert("42/profile-1.png");
        let service = FileService::new(store.clone());

        service.discard("42/profile-1.png").await;
        assert!(!store.contains("42/profile-1.png"));

        service.discard("42/profile-1.png").await;
    }
}
