use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::files::services::is_profile_key_of;
use crate::features::files::FileService;
use crate::features::users::clients::ProfileApi;
use crate::features::users::dtos::{
    ChangePasswordDto, UpdateProfileDto, UpdateProfileImageDto, UserProfileDto,
};

const DEFAULT_PASSWORD_MESSAGE: &str = "Password changed successfully";

/// Service for the current user's profile
pub struct ProfileService {
    profile_api: Arc<dyn ProfileApi>,
    files: Arc<FileService>,
}

impl ProfileService {
    pub fn new(profile_api: Arc<dyn ProfileApi>, files: Arc<FileService>) -> Self {
        Self { profile_api, files }
    }

    pub async fn get_profile(&self, token: &str) -> Result<UserProfileDto> {
        self.profile_api.get_profile(token).await
    }

    pub async fn update_profile(&self, token: &str, dto: UpdateProfileDto) -> Result<UserProfileDto> {
        let profile = self.profile_api.update_profile(token, &dto).await?;
        tracing::info!("Profile {} updated", profile.id);
        Ok(profile)
    }

    pub async fn change_password(&self, token: &str, dto: ChangePasswordDto) -> Result<String> {
        let message = self
            .profile_api
            .change_password(token, &dto.current_password, &dto.new_password)
            .await?;
        Ok(message.unwrap_or_else(|| DEFAULT_PASSWORD_MESSAGE.to_string()))
    }

    /// Points the profile at a new picture (or none) and removes the replaced one.
    ///
    /// A picture that lives in the bucket must be one of the caller's own uploads. Only
    /// the caller's own previous upload is ever removed, and only after the profile no
    /// longer references it.
    pub async fn update_profile_image(
        &self,
        token: &str,
        user_id: &str,
        dto: UpdateProfileImageDto,
    ) -> Result<UserProfileDto> {
        let new_url = dto.profile_image.as_deref().filter(|u| !u.trim().is_empty());
        let new_path = dto
            .profile_image_path
            .as_deref()
            .filter(|p| !p.trim().is_empty());

        let new_key = new_path.or(new_url).and_then(|r| self.files.storage_key(r));
        if let Some(key) = &new_key {
            if !is_profile_key_of(key, user_id) {
                return Err(AppError::Forbidden(
                    "Profile image must be one of your own uploads".to_string(),
                ));
            }
        }

        let current = self.profile_api.get_profile(token).await?;
        let previous = [
            current.profile_image_path.as_deref(),
            current.profile_image.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter_map(|r| self.files.storage_key(r))
        .find(|key| is_profile_key_of(key, user_id));

        let updated = self
            .profile_api
            .update_profile_image(token, new_url, new_path)
            .await?;

        if let Some(previous) = previous.filter(|p| Some(p) != new_key.as_ref()) {
            self.files.discard(&previous).await;
        }

        Ok(updated)
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::{FakeProfileApi, CURRENT_PASSWORD};
    use super::*;
    use crate::modules::storage::memory::InMemoryObjectStore;

    fn service(old_path: Option<&str>) -> (ProfileService, Arc<InMemoryObjectStore>) {
        let store = Arc::new(InMemoryObjectStore::new());
        if let Some(path) = old_path {
            store.insert(path);
        }
        let files = Arc::new(FileService::new(store.clone()));
        (
            ProfileService::new(Arc::new(FakeProfileApi::with_image(old_path)), files),
            store,
        )
    }

    #[tokio::test]
    async fn test_replacing_image_removes_previous_object() {
        let (service, store) = service(Some("42/profile-1.png"));
        store.insert("42/profile-2.png");

        let updated = service
            .update_profile_image(
                "tok",
                "42",
                UpdateProfileImageDto {
                    profile_image: Some("http://storage.test/img-billetes/42/profile-2.png".to_string()),
                    profile_image_path: Some("42/profile-2.png".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.profile_image_path.as_deref(), Some("42/profile-2.png"));
        assert!(!store.contains("42/profile-1.png"));
        assert!(store.contains("42/profile-2.png"));
    }

    #[tokio::test]
    async fn test_clearing_image() {
        let (service, store) = service(Some("42/profile-1.png"));

        let updated = service
            .update_profile_image(
                "tok",
                "42",
                UpdateProfileImageDto {
                    profile_image: None,
                    profile_image_path: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.profile_image, None);
        assert!(store.keys().is_empty());
    }

    #[tokio::test]
    async fn test_same_image_is_kept() {
        let (service, store) = service(Some("42/profile-1.png"));
        service
            .update_profile_image(
                "tok",
                "42",
                UpdateProfileImageDto {
                    profile_image: None,
                    profile_image_path: Some("42/profile-1.png".to_string()),
                },
            )
            .await
            .unwrap();
        assert!(store.contains("42/profile-1.png"));
    }

    #[tokio::test]
    async fn test_change_password_with_wrong_current_password() {
        let (service, _) = service(None);
        let dto = |current: &str| ChangePasswordDto {
            current_password: current.to_string(),
            new_password: "Billetes.2024".to_string(),
            confirm_password: "Billetes.2024".to_string(),
        };

        assert!(matches!(
            service.change_password("tok", dto("wrong")).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(
            service.change_password("tok", dto(CURRENT_PASSWORD)).await.unwrap(),
            DEFAULT_PASSWORD_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_foreign_picture_cannot_be_claimed() {
        let (service, store) = service(None);
        store.insert("7/profile-9.png");

        for dto in [
            UpdateProfileImageDto {
                profile_image: None,
                profile_image_path: Some("7/profile-9.png".to_string()),
            },
            UpdateProfileImageDto {
                profile_image: Some("http://storage.test/img-billetes/7/profile-9.png".to_string()),
                profile_image_path: None,
            },
            UpdateProfileImageDto {
                profile_image: None,
                profile_image_path: Some("42/../7/profile-9.png".to_string()),
            },
        ] {
            assert!(matches!(
                service.update_profile_image("tok", "42", dto).await,
                Err(AppError::Forbidden(_))
            ));
        }

        service
            .update_profile_image(
                "tok",
                "42",
                UpdateProfileImageDto {
                    profile_image: None,
                    profile_image_path: None,
                },
            )
            .await
            .unwrap();
        assert!(store.contains("7/profile-9.png"));
    }

    #[tokio::test]
    async fn test_previously_stored_foreign_path_is_never_removed() {
        let (service, store) = service(Some("7/profile-9.png"));

        service
            .update_profile_image(
                "tok",
                "42",
                UpdateProfileImageDto {
                    profile_image: None,
                    profile_image_path: None,
                },
            )
            .await
            .unwrap();
        assert!(store.contains("7/profile-9.png"));
    }

    #[tokio::test]
    async fn test_external_picture_url_is_not_treated_as_a_key() {
        let external = "https://cdn.example.com/ana.png";
        let store = Arc::new(InMemoryObjectStore::new());
        store.insert(external);
        let api = FakeProfileApi::with_image(None);
        api.profile.lock().unwrap().profile_image = Some(external.to_string());
        let service = ProfileService::new(
            Arc::new(api),
            Arc::new(FileService::new(store.clone())),
        );

        let updated = service
            .update_profile_image(
                "tok",
                "42",
                UpdateProfileImageDto {
                    profile_image: None,
                    profile_image_path: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.profile_image, None);
        assert!(store.contains(external));
    }
}
