use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::catalog::handlers;
use crate::features::catalog::services::CatalogService;

/// Public catalog routes; no session required
pub fn routes(service: Arc<CatalogService>) -> Router {
    Router::new()
        .route("/api/catalog/countries", get(handlers::list_countries))
        .route("/api/catalog/continents", get(handlers::list_continents))
        .route(
            "/api/catalog/continents/{continent}/countries",
            get(handlers::list_continent_countries),
        )
        .route("/api/catalog/explore", get(handlers::explore))
        .route("/api/catalog/price-range", get(handlers::get_price_range))
        .route("/api/catalog/featured", get(handlers::list_featured))
        .route("/api/catalog/banknotes/{id}", get(handlers::get_banknote))
        .with_state(service)
}
