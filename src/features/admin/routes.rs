use std::sync::Arc;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::features::admin::handlers;
use crate::features::admin::services::AdminService;

/// Create admin routes, nested under `/api/admin` (all require a session)
pub fn routes(admin_service: Arc<AdminService>) -> Router {
    Router::new()
        .route("/countries", post(handlers::create_country))
        .route(
            "/banknotes",
            get(handlers::list_banknotes).post(handlers::create_banknote),
        )
        .route(
            "/banknotes/{id}",
            put(handlers::update_banknote).delete(handlers::delete_banknote),
        )
        .route("/banknotes/{id}/sold", patch(handlers::set_sold))
        .route("/banknotes/{id}/featured", patch(handlers::set_featured))
        .route("/features", get(handlers::list_features))
        .route("/statistics", get(handlers::get_statistics))
        .with_state(admin_service)
}
