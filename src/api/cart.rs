use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, auth::CurrentUser, types::CartItemDto, validation};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: i32,
    pub quantity: i32,
    pub size: String,
    pub color: String,
}

#[derive(Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

/// POST /cart/add-to-cart
/// Adding an already-present (product, size, color) line merges quantities.
pub async fn add_to_cart(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<AddToCartRequest>,
) -> Result<Json<ApiResponse<CartItemDto>>, ApiError> {
    validation::validate_id(payload.product_id)?;
    validation::validate_quantity(payload.quantity)?;
    validation::validate_required(&payload.size, "Size")?;
    validation::validate_required(&payload.color, "Color")?;

    let product = state
        .store()
        .get_product(payload.product_id)
        .await
        .map_err(|e| ApiError::database(format!("Failed to add to cart: {e}")))?
        .ok_or_else(|| ApiError::not_found("Product", &payload.product_id.to_string()))?;

    let item = state
        .store()
        .add_cart_item(
            user.user_id,
            product.id,
            payload.quantity,
            payload.size.trim(),
            payload.color.trim(),
        )
        .await
        .map_err(|e| ApiError::database(format!("Failed to add to cart: {e}")))?;

    Ok(Json(ApiResponse::success(CartItemDto::from_item(
        item,
        Some(product),
    ))))
}

/// GET /cart/fetch-cart
pub async fn fetch_cart(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<CartItemDto>>>, ApiError> {
    let items = state
        .store()
        .list_cart_items(user.user_id)
        .await
        .map_err(|e| ApiError::database(format!("Failed to fetch cart: {e}")))?;

    let items = items
        .into_iter()
        .map(|(item, product)| CartItemDto::from_item(item, product))
        .collect();

    Ok(Json(ApiResponse::success(items)))
}

/// PUT /cart/update/{id}
/// Overwrites the quantity as given; zero and negative values are stored
/// verbatim, there is no server-side minimum.
pub async fn update_cart_item_quantity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> Result<Json<ApiResponse<CartItemDto>>, ApiError> {
    validation::validate_id(id)?;

    let item = state
        .store()
        .update_cart_item_quantity(id, user.user_id, payload.quantity)
        .await
        .map_err(|e| ApiError::database(format!("Failed to update cart item: {e}")))?
        .ok_or_else(|| ApiError::not_found("Cart item", &id.to_string()))?;

    let product = state
        .store()
        .get_product(item.product_id)
        .await
        .map_err(|e| ApiError::database(format!("Failed to update cart item: {e}")))?;

    Ok(Json(ApiResponse::success(CartItemDto::from_item(
        item, product,
    ))))
}

/// DELETE /cart/remove/{id}
pub async fn remove_from_cart(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    validation::validate_id(id)?;

    let removed = state
        .store()
        .remove_cart_item(id, user.user_id)
        .await
        .map_err(|e| ApiError::database(format!("Failed to remove cart item: {e}")))?;

    if !removed {
        return Err(ApiError::not_found("Cart item", &id.to_string()));
    }

    Ok(Json(ApiResponse::success(())))
}

/// POST /cart/clear-cart
pub async fn clear_cart(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<u64>>, ApiError> {
    let removed = state
        .store()
        .clear_cart(user.user_id)
        .await
        .map_err(|e| ApiError::database(format!("Failed to clear cart: {e}")))?;

    Ok(Json(ApiResponse::success(removed)))
}
