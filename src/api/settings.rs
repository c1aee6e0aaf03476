use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{
    ApiError, ApiResponse, AppState, auth::AdminUser, products::upload_all, types::ProductDto,
    validation,
};
use crate::entities::feature_banners;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedProductsRequest {
    pub product_ids: Vec<i32>,
}

/// POST /settings/banners (multipart)
pub async fn add_banners(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<Vec<feature_banners::Model>>>, ApiError> {
    let mut uploads: Vec<(String, Vec<u8>)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() != Some("images") {
            continue;
        }
        let filename = field.file_name().unwrap_or("banner").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("Failed to read banner image: {e}")))?;
        uploads.push((filename, bytes.to_vec()));
    }

    if uploads.is_empty() {
        return Err(ApiError::validation("No files provided"));
    }

    let image_urls = upload_all(&state, uploads).await?;

    let banners = state
        .store()
        .add_banners(image_urls)
        .await
        .map_err(|e| ApiError::database(format!("Failed to save banners: {e}")))?;

    tracing::info!(count = banners.len(), "Banners added");

    Ok(Json(ApiResponse::success(banners)))
}

/// GET /settings/get-banners
pub async fn get_banners(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<feature_banners::Model>>>, ApiError> {
    let banners = state
        .store()
        .list_banners()
        .await
        .map_err(|e| ApiError::database(format!("Failed to fetch banners: {e}")))?;

    Ok(Json(ApiResponse::success(banners)))
}

/// POST /settings/update-featured-products
/// Replaces the featured set wholesale. Over-cap requests are rejected
/// before any row changes.
pub async fn update_featured_products(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<FeaturedProductsRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    validation::validate_featured_ids(&payload.product_ids)?;

    state
        .store()
        .set_featured_products(&payload.product_ids)
        .await
        .map_err(|e| ApiError::database(format!("Failed to update featured products: {e}")))?;

    Ok(Json(ApiResponse::success(())))
}

/// GET /settings/fetch-featured-products
pub async fn fetch_featured_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ProductDto>>>, ApiError> {
    let products = state
        .store()
        .list_featured_products()
        .await
        .map_err(|e| ApiError::database(format!("Failed to fetch featured products: {e}")))?;

    Ok(Json(ApiResponse::success(
        products.into_iter().map(ProductDto::from).collect(),
    )))
}
