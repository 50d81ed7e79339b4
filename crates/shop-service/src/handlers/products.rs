//! Product handlers.

use crate::auth::Identity;
use crate::authz::{self, Requirement};
use crate::errors::ApiError;
use crate::models::Product;
use crate::repositories::products;
use crate::routes::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// Query parameters for product listing.
#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<String>,
}

/// Handler for GET /api/v1/products
#[instrument(skip_all, name = "shop.handlers.list_products")]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    authz::require(Some(&identity), &Requirement::AuthenticatedOnly)?;

    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * limit;

    let products = products::list(&state.pool, query.category.as_deref(), limit, offset).await?;
    Ok(Json(products))
}

/// Query parameters for product search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// Handler for GET /api/v1/products/search
///
/// The search term is passed to the repository as a bind parameter, never
/// spliced into the query text.
#[instrument(skip_all, name = "shop.handlers.search_products")]
pub async fn search_products(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    authz::require(Some(&identity), &Requirement::AuthenticatedOnly)?;

    if query.q.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Search query cannot be empty".to_string(),
        ));
    }

    let products = products::search(&state.pool, query.q.trim()).await?;
    Ok(Json(products))
}

/// Handler for GET /api/v1/products/:id
#[instrument(skip_all, name = "shop.handlers.get_product")]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<Product>, ApiError> {
    authz::require(Some(&identity), &Requirement::AuthenticatedOnly)?;

    let product = products::get_by_id(&state.pool, product_id)
        .await?
        .ok_or(ApiError::NotFound("product"))?;
    Ok(Json(product))
}

/// Body for product creation and replacement.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: i32,
    pub category: Option<String>,
}

/// Handler for POST /api/v1/products (admin only).
#[instrument(skip_all, name = "shop.handlers.create_product")]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<ProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    authz::require(Some(&identity), &Requirement::AdminOnly)?;

    let product = products::create(
        &state.pool,
        &payload.name,
        payload.description.as_deref(),
        payload.price_cents,
        payload.stock,
        payload.category.as_deref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Handler for PUT /api/v1/products/:id (admin only).
#[instrument(skip_all, name = "shop.handlers.update_product")]
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<ProductRequest>,
) -> Result<Json<Product>, ApiError> {
    authz::require(Some(&identity), &Requirement::AdminOnly)?;

    let product = products::update(
        &state.pool,
        product_id,
        &payload.name,
        payload.description.as_deref(),
        payload.price_cents,
        payload.stock,
        payload.category.as_deref(),
    )
    .await?
    .ok_or(ApiError::NotFound("product"))?;

    Ok(Json(product))
}

/// Handler for DELETE /api/v1/products/:id (admin only).
#[instrument(skip_all, name = "shop.handlers.delete_product")]
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(product_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    authz::require(Some(&identity), &Requirement::AdminOnly)?;

    if !products::delete(&state.pool, product_id).await? {
        return Err(ApiError::NotFound("product"));
    }

    Ok(StatusCode::NO_CONTENT)
}
