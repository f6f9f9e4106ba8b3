use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use crate::core::config::UpstreamConfig;
use crate::core::error::{AppError, Result};
use crate::modules::upstream::{self, build_http_client, transport_error};

const SERVICE: &str = "Auth";

/// Login payload as returned by the auth API
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamLogin {
    #[serde(default)]
    pub access_token: Option<String>,
    /// Older deployments answer with `token` only
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub user: Option<UpstreamUser>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamUser {
    #[serde(default, deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub role: String,
}

fn id_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Unauthenticated account operations of the auth API
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<UpstreamLogin>;

    /// Returns the confirmation message to show the user.
    async fn forgot_password(&self, email: &str) -> Result<Option<String>>;

    async fn reset_password(&self, token: &str, new_password: &str) -> Result<Option<String>>;
}

pub struct AuthApiClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl AuthApiClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        Ok(Self {
            base_url: config.auth_api_url.clone(),
            http_client: build_http_client(config.timeout)?,
        })
    }

    async fn post_for_message(&self, path: &str, body: &Value) -> Result<Option<String>> {
        let response = self
            .http_client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        let reply: MessageResponse = upstream::read_json(SERVICE, response).await?;
        Ok(reply.message)
    }
}

#[async_trait]
impl AuthApi for AuthApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<UpstreamLogin> {
        tracing::debug!("Logging in {}", email);

        let response = self
            .http_client
            .post(format!("{}auth/login/", self.base_url))
            .json(&Credentials { email, password })
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        // A 401 here means bad credentials, not an expired session
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        upstream::read_json(SERVICE, response).await
    }

    async fn forgot_password(&self, email: &str) -> Result<Option<String>> {
        self.post_for_message("auth/forgot-password/", &json!({ "email": email }))
            .await
    }

    async fn reset_password(&self, token: &str, new_password: &str) -> Result<Option<String>> {
        self.post_for_message(
            "auth/reset-password/",
            &json!({ "token": token, "new_password": new_password }),
        )
        .await
    }
}
