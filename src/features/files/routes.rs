use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, post},
    Router,
};
use std::sync::Arc;

use crate::features::files::handlers::{delete_file, upload_banknote_image, upload_profile_image};
use crate::features::files::services::FileService;
use crate::shared::constants::MAX_IMAGE_SIZE;

/// Multipart overhead allowed on top of the image itself
const FORM_OVERHEAD: usize = 1024 * 1024;

/// Create routes for the files feature (all require a session)
pub fn routes(file_service: Arc<FileService>) -> Router {
    Router::new()
        .route(
            "/api/files/banknotes",
            post(upload_banknote_image).layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + FORM_OVERHEAD)),
        )
        .route(
            "/api/files/profile",
            post(upload_profile_image).layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + FORM_OVERHEAD)),
        )
        .route("/api/files", delete(delete_file))
        .with_state(file_service)
}
