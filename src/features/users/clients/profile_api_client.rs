use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::core::config::UpstreamConfig;
use crate::core::error::{AppError, Result};
use crate::features::users::dtos::{UpdateProfileDto, UserProfileDto};
use crate::modules::upstream::{self, build_http_client, transport_error};

const SERVICE: &str = "Auth";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordChange<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

#[derive(Serialize)]
struct ProfileImage<'a> {
    profile_image: Option<&'a str>,
    profile_image_path: Option<&'a str>,
}

/// Profile operations of the auth API, performed with the user's own token
#[async_trait]
pub trait ProfileApi: Send + Sync {
    async fn get_profile(&self, token: &str) -> Result<UserProfileDto>;

    async fn update_profile(&self, token: &str, dto: &UpdateProfileDto) -> Result<UserProfileDto>;

    /// Returns the upstream confirmation message, if any.
    async fn change_password(
        &self,
        token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<Option<String>>;

    async fn update_profile_image(
        &self,
        token: &str,
        url: Option<&str>,
        path: Option<&str>,
    ) -> Result<UserProfileDto>;
}

pub struct ProfileApiClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl ProfileApiClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        Ok(Self {
            base_url: config.auth_api_url.clone(),
            http_client: build_http_client(config.timeout)?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Some deployments wrap the profile as `{"user": {...}}`
fn unwrap_profile(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("user") && !map.contains_key("email") => {
            map.remove("user").unwrap_or(Value::Null)
        }
        other => other,
    }
}

async fn read_profile(response: reqwest::Response) -> Result<UserProfileDto> {
    let value: Value = upstream::read_json(SERVICE, response).await?;
    serde_json::from_value(unwrap_profile(value)).map_err(|e| {
        tracing::error!("Failed to parse profile: {}", e);
        AppError::ExternalServiceError(format!("Failed to parse profile response: {}", e))
    })
}

#[async_trait]
impl ProfileApi for ProfileApiClient {
    async fn get_profile(&self, token: &str) -> Result<UserProfileDto> {
        let response = self
            .http_client
            .get(self.url("auth/perfil/"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        read_profile(response).await
    }

    async fn update_profile(&self, token: &str, dto: &UpdateProfileDto) -> Result<UserProfileDto> {
        let response = self
            .http_client
            .put(self.url("auth/perfil/"))
            .bearer_auth(token)
            .json(dto)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        read_profile(response).await
    }

    async fn change_password(
        &self,
        token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<Option<String>> {
        let response = self
            .http_client
            .post(self.url("auth/cambiar-password/"))
            .bearer_auth(token)
            .json(&PasswordChange {
                current_password,
                new_password,
            })
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        let value: Value = upstream::read_json(SERVICE, response).await?;
        Ok(value
            .get("message")
            .and_then(Value::as_str)
            .map(String::from))
    }

    async fn update_profile_image(
        &self,
        token: &str,
        url: Option<&str>,
        path: Option<&str>,
    ) -> Result<UserProfileDto> {
        let response = self
            .http_client
            .put(self.url("auth/perfil/imagen/"))
            .bearer_auth(token)
            .json(&ProfileImage {
                profile_image: url,
                profile_image_path: path,
            })
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        read_profile(response).await
    }
}
