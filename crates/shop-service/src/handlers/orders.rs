//! Order handlers.
//!
//! Order access is resource-scoped: ownership is checked against the stored
//! order's `user_id`, not anything the caller supplied.

use crate::auth::{Identity, Role};
use crate::authz::{self, Requirement};
use crate::errors::ApiError;
use crate::models::Order;
use crate::repositories::orders;
use crate::routes::AppState;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Handler for GET /api/v1/orders
///
/// Admins see every order; everyone else sees only their own.
#[instrument(skip_all, name = "shop.handlers.list_orders")]
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<Order>>, ApiError> {
    authz::require(Some(&identity), &Requirement::AuthenticatedOnly)?;

    let orders = match identity.role {
        Role::Admin => orders::list_all(&state.pool).await?,
        Role::Customer => orders::list_by_user(&state.pool, identity.user_id).await?,
    };

    Ok(Json(orders))
}

/// Handler for GET /api/v1/orders/:id
///
/// The order is fetched first so the ownership check runs against the stored
/// row. A customer probing someone else's order id gets 403, not 404: the
/// order exists, they just may not see it.
#[instrument(skip_all, name = "shop.handlers.get_order")]
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Order>, ApiError> {
    authz::require(Some(&identity), &Requirement::AuthenticatedOnly)?;

    let order = orders::get_by_id(&state.pool, order_id)
        .await?
        .ok_or(ApiError::NotFound("order"))?;

    authz::require(Some(&identity), &Requirement::SelfOrAdmin(order.user_id))?;

    Ok(Json(order))
}
