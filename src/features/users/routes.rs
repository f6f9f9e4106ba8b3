use crate::features::users::handlers::{
    change_password, get_profile, update_profile, update_profile_image,
};
use crate::features::users::services::ProfileService;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

pub fn routes(service: Arc<ProfileService>) -> Router {
    Router::new()
        .route("/api/me", get(get_profile).put(update_profile))
        .route("/api/me/password", post(change_password))
        .route("/api/me/image", put(update_profile_image))
        .with_state(service)
}
