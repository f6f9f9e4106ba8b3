use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::admin::dtos::*;
use crate::features::admin::services::AdminService;
use crate::features::auth::SessionContext;
use crate::modules::catalog_api::{Banknote, Country, FeatureTag, Page};
use crate::shared::types::{ApiResponse, Meta};

/// Register a country
#[utoipa::path(
    post,
    path = "/api/admin/countries",
    request_body = CreateCountryDto,
    responses(
        (status = 201, description = "Country created", body = ApiResponse<Country>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Session expired or invalid"),
        (status = 409, description = "Country already exists")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_country(
    session: SessionContext,
    State(service): State<Arc<AdminService>>,
    AppJson(dto): AppJson<CreateCountryDto>,
) -> Result<(StatusCode, Json<ApiResponse<Country>>)> {
    dto.validate()?;

    let country = service.create_country(session.bearer(), dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(country), None, None)),
    ))
}

/// List banknotes (paginated, filterable)
#[utoipa::path(
    get,
    path = "/api/admin/banknotes",
    params(BanknoteListQuery),
    responses(
        (status = 200, description = "Page of banknotes", body = ApiResponse<Page<Banknote>>),
        (status = 401, description = "Session expired or invalid")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_banknotes(
    session: SessionContext,
    State(service): State<Arc<AdminService>>,
    Query(query): Query<BanknoteListQuery>,
) -> Result<Json<ApiResponse<Page<Banknote>>>> {
    let page = service.list_banknotes(session.bearer(), query).await?;
    let total = page.total;
    Ok(Json(ApiResponse::success(
        Some(page),
        None,
        Some(Meta { total }),
    )))
}

/// Create a banknote
#[utoipa::path(
    post,
    path = "/api/admin/banknotes",
    request_body = BanknoteDto,
    responses(
        (status = 201, description = "Banknote created", body = ApiResponse<Banknote>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Session expired or invalid")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_banknote(
    session: SessionContext,
    State(service): State<Arc<AdminService>>,
    AppJson(dto): AppJson<BanknoteDto>,
) -> Result<(StatusCode, Json<ApiResponse<Banknote>>)> {
    dto.validate()?;

    let banknote = service.create_banknote(session.bearer(), dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(banknote), None, None)),
    ))
}

/// Replace a banknote
#[utoipa::path(
    put,
    path = "/api/admin/banknotes/{id}",
    params(
        ("id" = i64, Path, description = "Banknote ID")
    ),
    request_body = BanknoteDto,
    responses(
        (status = 200, description = "Banknote updated", body = ApiResponse<Banknote>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Banknote not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_banknote(
    session: SessionContext,
    State(service): State<Arc<AdminService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<BanknoteDto>,
) -> Result<Json<ApiResponse<Banknote>>> {
    dto.validate()?;

    let banknote = service.update_banknote(session.bearer(), id, dto).await?;
    Ok(Json(ApiResponse::success(Some(banknote), None, None)))
}

/// Delete a banknote
#[utoipa::path(
    delete,
    path = "/api/admin/banknotes/{id}",
    params(
        ("id" = i64, Path, description = "Banknote ID")
    ),
    responses(
        (status = 200, description = "Banknote deleted"),
        (status = 404, description = "Banknote not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_banknote(
    session: SessionContext,
    State(service): State<Arc<AdminService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_banknote(session.bearer(), id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some(format!("Banknote {} deleted", id)),
        None,
    )))
}

/// Mark a banknote as sold or available
#[utoipa::path(
    patch,
    path = "/api/admin/banknotes/{id}/sold",
    params(
        ("id" = i64, Path, description = "Banknote ID")
    ),
    request_body = ToggleDto,
    responses(
        (status = 200, description = "Banknote updated", body = ApiResponse<Banknote>),
        (status = 404, description = "Banknote not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn set_sold(
    session: SessionContext,
    State(service): State<Arc<AdminService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<ToggleDto>,
) -> Result<Json<ApiResponse<Banknote>>> {
    let banknote = service.set_sold(session.bearer(), id, dto.value).await?;
    Ok(Json(ApiResponse::success(Some(banknote), None, None)))
}

/// Feature or unfeature a banknote
#[utoipa::path(
    patch,
    path = "/api/admin/banknotes/{id}/featured",
    params(
        ("id" = i64, Path, description = "Banknote ID")
    ),
    request_body = ToggleDto,
    responses(
        (status = 200, description = "Banknote updated", body = ApiResponse<Banknote>),
        (status = 404, description = "Banknote not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn set_featured(
    session: SessionContext,
    State(service): State<Arc<AdminService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<ToggleDto>,
) -> Result<Json<ApiResponse<Banknote>>> {
    let banknote = service.set_featured(session.bearer(), id, dto.value).await?;
    Ok(Json(ApiResponse::success(Some(banknote), None, None)))
}

/// List feature tags for the banknote form
#[utoipa::path(
    get,
    path = "/api/admin/features",
    responses(
        (status = 200, description = "Feature tags", body = ApiResponse<Vec<FeatureTag>>)
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_features(
    session: SessionContext,
    State(service): State<Arc<AdminService>>,
) -> Result<Json<ApiResponse<Vec<FeatureTag>>>> {
    let features = service.list_features(session.bearer()).await?;
    Ok(Json(ApiResponse::success(Some(features), None, None)))
}

/// Inventory statistics
#[utoipa::path(
    get,
    path = "/api/admin/statistics",
    responses(
        (status = 200, description = "Inventory statistics", body = ApiResponse<InventoryStatisticsDto>)
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_statistics(
    _session: SessionContext,
    State(service): State<Arc<AdminService>>,
) -> Result<Json<ApiResponse<InventoryStatisticsDto>>> {
    let stats = service.statistics().await?;
    Ok(Json(ApiResponse::success(Some(stats), None, None)))
}
