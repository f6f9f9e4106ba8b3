use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::catalog::dtos::{
    BanknoteDetailDto, CountryListQuery, CountrySummaryDto, ExploreQuery, ExplorerViewDto,
};
use crate::features::catalog::services::CatalogService;
use crate::features::catalog::taxonomy::{
    ContinentGroup, CountryGroup, EnrichedBanknote, PriceRange,
};
use crate::shared::types::{ApiResponse, Meta};

/// List countries with their assigned continent and banknote count
#[utoipa::path(
    get,
    path = "/api/catalog/countries",
    params(CountryListQuery),
    responses(
        (status = 200, description = "Countries of the catalog", body = ApiResponse<Vec<CountrySummaryDto>>),
        (status = 400, description = "Unknown continent"),
        (status = 502, description = "Catalog API unavailable")
    ),
    tag = "catalog"
)]
pub async fn list_countries(
    State(service): State<Arc<CatalogService>>,
    Query(query): Query<CountryListQuery>,
) -> Result<Json<ApiResponse<Vec<CountrySummaryDto>>>> {
    let countries = service.list_countries(query.continente.as_deref()).await?;
    let total = countries.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(countries),
        None,
        Some(Meta { total }),
    )))
}

/// Continent groups, most populated first
#[utoipa::path(
    get,
    path = "/api/catalog/continents",
    responses(
        (status = 200, description = "Continent groups", body = ApiResponse<Vec<ContinentGroup>>),
        (status = 502, description = "Catalog API unavailable")
    ),
    tag = "catalog"
)]
pub async fn list_continents(
    State(service): State<Arc<CatalogService>>,
) -> Result<Json<ApiResponse<Vec<ContinentGroup>>>> {
    let continents = service.continents().await?;
    Ok(Json(ApiResponse::success(Some(continents), None, None)))
}

/// Country groups of one continent
#[utoipa::path(
    get,
    path = "/api/catalog/continents/{continent}/countries",
    params(
        ("continent" = String, Path, description = "Continent label, e.g. América")
    ),
    responses(
        (status = 200, description = "Country groups", body = ApiResponse<Vec<CountryGroup>>),
        (status = 400, description = "Unknown continent")
    ),
    tag = "catalog"
)]
pub async fn list_continent_countries(
    State(service): State<Arc<CatalogService>>,
    Path(continent): Path<String>,
) -> Result<Json<ApiResponse<Vec<CountryGroup>>>> {
    let countries = service.countries_in(&continent).await?;
    Ok(Json(ApiResponse::success(Some(countries), None, None)))
}

/// Explorer view for a continent, country and filter selection
#[utoipa::path(
    get,
    path = "/api/catalog/explore",
    params(ExploreQuery),
    responses(
        (status = 200, description = "Explorer view", body = ApiResponse<ExplorerViewDto>),
        (status = 400, description = "Invalid navigation or price range"),
        (status = 404, description = "Country not found in continent")
    ),
    tag = "catalog"
)]
pub async fn explore(
    State(service): State<Arc<CatalogService>>,
    Query(query): Query<ExploreQuery>,
) -> Result<Json<ApiResponse<ExplorerViewDto>>> {
    let view = service.explore(&query).await?;
    Ok(Json(ApiResponse::success(Some(view), None, None)))
}

/// Price slider bounds and default selection
#[utoipa::path(
    get,
    path = "/api/catalog/price-range",
    responses(
        (status = 200, description = "Price range", body = ApiResponse<PriceRange>)
    ),
    tag = "catalog"
)]
pub async fn get_price_range(
    State(service): State<Arc<CatalogService>>,
) -> Result<Json<ApiResponse<PriceRange>>> {
    let range = service.price_range().await?;
    Ok(Json(ApiResponse::success(Some(range), None, None)))
}

/// Featured banknotes that are still available
#[utoipa::path(
    get,
    path = "/api/catalog/featured",
    responses(
        (status = 200, description = "Featured banknotes", body = ApiResponse<Vec<EnrichedBanknote>>)
    ),
    tag = "catalog"
)]
pub async fn list_featured(
    State(service): State<Arc<CatalogService>>,
) -> Result<Json<ApiResponse<Vec<EnrichedBanknote>>>> {
    let featured = service.featured().await?;
    let total = featured.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(featured),
        None,
        Some(Meta { total }),
    )))
}

/// Get banknote detail
#[utoipa::path(
    get,
    path = "/api/catalog/banknotes/{id}",
    params(
        ("id" = i64, Path, description = "Banknote ID")
    ),
    responses(
        (status = 200, description = "Banknote found", body = ApiResponse<BanknoteDetailDto>),
        (status = 404, description = "Banknote not found")
    ),
    tag = "catalog"
)]
pub async fn get_banknote(
    State(service): State<Arc<CatalogService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<BanknoteDetailDto>>> {
    let banknote = service.banknote_detail(id).await?;
    Ok(Json(ApiResponse::success(Some(banknote), None, None)))
}
