//! Shared plumbing for the remote catalog and auth APIs
//!
//! Both upstreams speak JSON over HTTP and report failures with a JSON body that
//! carries `detail`, `message` or `error`. This module maps those responses onto
//! [`AppError`] in one place.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::core::error::{AppError, Result};

/// Message returned to callers whenever their session can no longer be used
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired or invalid, please log in again";

#[derive(Debug, Default, Deserialize)]
struct UpstreamErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))
}

/// Pulls a human readable message out of an upstream error body.
pub fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<UpstreamErrorBody>(body).ok()?;

    let detail = parsed.detail.and_then(|d| match d {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        // FastAPI validation errors arrive as a list of {loc, msg, type}
        serde_json::Value::Array(items) => {
            let msgs: Vec<String> = items
                .iter()
                .filter_map(|i| i.get("msg").and_then(|m| m.as_str()).map(String::from))
                .collect();
            (!msgs.is_empty()).then(|| msgs.join("; "))
        }
        other => Some(other.to_string()),
    });

    detail
        .or(parsed.message)
        .or(parsed.error)
        .filter(|m| !m.trim().is_empty())
}

/// Maps a non-success upstream status onto the matching application error.
pub fn error_for_status(service: &str, status: reqwest::StatusCode, body: &str) -> AppError {
    let message = extract_error_message(body);

    match status.as_u16() {
        401 => AppError::Unauthorized(SESSION_EXPIRED_MESSAGE.to_string()),
        403 => AppError::Forbidden(
            message.unwrap_or_else(|| "Operation not allowed for this account".to_string()),
        ),
        404 => AppError::NotFound(message.unwrap_or_else(|| "Resource not found".to_string())),
        409 => AppError::Conflict(message.unwrap_or_else(|| "Resource already exists".to_string())),
        400 | 422 => {
            AppError::Validation(message.unwrap_or_else(|| format!("Invalid request: {}", body)))
        }
        _ => {
            tracing::error!("{} API error: HTTP {} - {}", service, status, body);
            AppError::ExternalServiceError(format!("{} API error: HTTP {}", service, status))
        }
    }
}

/// Checks the status and decodes a JSON body, mapping every failure to [`AppError`].
pub async fn read_json<T: DeserializeOwned>(service: &str, response: reqwest::Response) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(error_for_status(service, status, &body));
    }

    response.json::<T>().await.map_err(|e| {
        tracing::error!("Failed to parse {} API response: {}", service, e);
        AppError::ExternalServiceError(format!("Failed to parse {} response: {}", service, e))
    })
}

/// Same as [`read_json`] for endpoints whose body is irrelevant.
pub async fn expect_success(service: &str, response: reqwest::Response) -> Result<()> {
    let status = response.status();

    if status.is_success() {
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    Err(error_for_status(service, status, &body))
}

pub fn transport_error(service: &str, e: reqwest::Error) -> AppError {
    tracing::error!("Request to {} API failed: {}", service, e);
    if e.is_timeout() {
        AppError::ExternalServiceError(format!("{} API timed out", service))
    } else {
        AppError::ExternalServiceError(format!("Failed to reach {} API: {}", service, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_extract_error_message_variants() {
        assert_eq!(
            extract_error_message(r#"{"detail":"Credenciales inválidas"}"#).as_deref(),
            Some("Credenciales inválidas")
        );
        assert_eq!(
            extract_error_message(r#"{"message":"País ya existe"}"#).as_deref(),
            Some("País ya existe")
        );
        assert_eq!(
            extract_error_message(
                r#"{"detail":[{"loc":["body","email"],"msg":"field required","type":"missing"}]}"#
            )
            .as_deref(),
            Some("field required")
        );
        assert_eq!(extract_error_message("<html>oops</html>"), None);
        assert_eq!(extract_error_message(r#"{"message":"  "}"#), None);
    }

    #[test]
    fn test_unauthorized_maps_to_session_expired() {
        let err = error_for_status("Catalog", StatusCode::UNAUTHORIZED, "{}");
        match err {
            AppError::Unauthorized(msg) => assert_eq!(msg, SESSION_EXPIRED_MESSAGE),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            error_for_status("Catalog", StatusCode::NOT_FOUND, ""),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            error_for_status("Catalog", StatusCode::CONFLICT, ""),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            error_for_status("Catalog", StatusCode::UNPROCESSABLE_ENTITY, "{}"),
            AppError::Validation(_)
        ));
        assert!(matches!(
            error_for_status("Catalog", StatusCode::SERVICE_UNAVAILABLE, ""),
            AppError::ExternalServiceError(_)
        ));
    }
}
