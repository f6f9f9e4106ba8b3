#[cfg(test)]
use crate::core::middleware::session_middleware;

#[cfg(test)]
use axum::Router;

/// Guards `router` with the real session middleware, as `main` does.
#[cfg(test)]
pub fn with_session(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(session_middleware))
}
