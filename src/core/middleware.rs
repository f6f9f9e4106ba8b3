use crate::core::error::AppError;
use crate::features::auth::session::SessionContext;
use crate::modules::upstream::SESSION_EXPIRED_MESSAGE;
use axum::{
    extract::Request,
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::prelude::*;
use chrono::Utc;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    // If origins list contains "*", allow any origin
    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        // Parse origins into HeaderValue
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn basic_auth_middleware(
    valid_credentials: Arc<String>,
) -> impl Fn(
    Request,
    Next,
)
    -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, Response>> + Send>>
       + Clone {
    move |req: Request, next: Next| {
        let credentials = valid_credentials.clone();
        Box::pin(async move {
            let auth_header = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|header| header.to_str().ok());

            if let Some(auth_header) = auth_header {
                if let Some(encoded) = auth_header.strip_prefix("Basic ") {
                    if let Ok(decoded) = BASE64_STANDARD.decode(encoded) {
                        if let Ok(creds) = String::from_utf8(decoded) {
                            if creds == *credentials {
                                return Ok(next.run(req).await);
                            }
                        }
                    }
                }
            }

            Err((
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"Swagger UI\"")],
                "Unauthorized",
            )
                .into_response())
        })
    }
}

/// Rejects requests without a live bearer token and exposes the session to handlers.
///
/// The token is decoded, not verified; the upstream APIs verify it on every forwarded call.
pub async fn session_middleware(mut req: Request, next: Next) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Unauthorized(SESSION_EXPIRED_MESSAGE.to_string()))?;

    let session = SessionContext::from_token(token, Utc::now())?;
    tracing::debug!(
        "Session for {} valid for {}s",
        session.user_id().unwrap_or("-"),
        session.remaining().num_seconds()
    );

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::session::test_tokens::{token_expiring_in, valid_token};
    use axum::{middleware, routing::get, Router};
    use axum_test::TestServer;
    use chrono::Duration;
    use serde_json::Value;

    async fn whoami(session: SessionContext) -> String {
        session.user_id().unwrap_or_default().to_string()
    }

    fn server() -> TestServer {
        let app = Router::new()
            .route("/private", get(whoami))
            .layer(middleware::from_fn(session_middleware));
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_live_token_reaches_handler() {
        let response = server()
            .get("/private")
            .authorization_bearer(valid_token())
            .await;
        response.assert_status_ok();
        response.assert_text("42");
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let response = server()
            .get("/private")
            .authorization_bearer(token_expiring_in(Duration::hours(-1)))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body = response.json::<Value>();
        assert_eq!(body["message"], SESSION_EXPIRED_MESSAGE);
    }

    #[tokio::test]
    async fn test_missing_or_garbage_header_is_rejected() {
        let server = server();
        server
            .get("/private")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        server
            .get("/private")
            .authorization_bearer("not-a-jwt")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
