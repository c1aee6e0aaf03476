use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, auth::AdminUser, validation};
use crate::db::CouponInput;
use crate::entities::coupons;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCouponRequest {
    pub code: String,
    pub discount_percent: i32,
    pub start_date: String,
    pub end_date: String,
    pub usage_limit: i32,
}

/// POST /coupon/create-coupon
pub async fn create_coupon(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<CreateCouponRequest>,
) -> Result<Json<ApiResponse<coupons::Model>>, ApiError> {
    validation::validate_required(&payload.code, "Code")?;

    if !(0..=100).contains(&payload.discount_percent) {
        return Err(ApiError::validation(
            "Discount percent must be between 0 and 100",
        ));
    }
    if payload.usage_limit < 0 {
        return Err(ApiError::validation("Usage limit must not be negative"));
    }

    let start = parse_date(&payload.start_date, "startDate")?;
    let end = parse_date(&payload.end_date, "endDate")?;
    if start >= end {
        return Err(ApiError::validation("startDate must be before endDate"));
    }

    let coupon = state
        .store()
        .create_coupon(CouponInput {
            code: payload.code.trim().to_string(),
            discount_percent: payload.discount_percent,
            start_date: start.to_rfc3339(),
            end_date: end.to_rfc3339(),
            usage_limit: payload.usage_limit,
        })
        .await
        .map_err(|e| ApiError::database(format!("Failed to create coupon: {e}")))?
        .ok_or_else(|| ApiError::conflict("Coupon code already exists"))?;

    tracing::info!(coupon_id = coupon.id, "Coupon created");

    Ok(Json(ApiResponse::success(coupon)))
}

/// GET /coupon/fetch-all-coupon
pub async fn fetch_all_coupons(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<coupons::Model>>>, ApiError> {
    let coupons = state
        .store()
        .list_coupons()
        .await
        .map_err(|e| ApiError::database(format!("Failed to fetch coupons: {e}")))?;

    Ok(Json(ApiResponse::success(coupons)))
}

/// DELETE /coupon/{id}
pub async fn delete_coupon(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    validation::validate_id(id)?;

    let deleted = state
        .store()
        .delete_coupon(id)
        .await
        .map_err(|e| ApiError::database(format!("Failed to delete coupon: {e}")))?;

    if !deleted {
        return Err(ApiError::not_found("Coupon", &id.to_string()));
    }

    Ok(Json(ApiResponse::success(())))
}

fn parse_date(raw: &str, field: &str) -> Result<chrono::DateTime<chrono::FixedOffset>, ApiError> {
    chrono::DateTime::parse_from_rfc3339(raw.trim())
        .map_err(|_| ApiError::validation(format!("{field} must be an RFC 3339 timestamp")))
}
