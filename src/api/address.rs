use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, auth::CurrentUser, validation};
use crate::db::AddressInput;
use crate::entities::addresses;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    pub phone: String,
    #[serde(default)]
    pub is_default: bool,
}

impl AddressRequest {
    fn validate(&self) -> Result<AddressInput, ApiError> {
        validation::validate_required(&self.name, "Name")?;
        validation::validate_required(&self.address, "Address")?;
        validation::validate_required(&self.city, "City")?;
        validation::validate_required(&self.country, "Country")?;
        validation::validate_required(&self.postal_code, "Postal code")?;
        validation::validate_required(&self.phone, "Phone")?;

        Ok(AddressInput {
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            country: self.country.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            phone: self.phone.trim().to_string(),
            is_default: self.is_default,
        })
    }
}

/// POST /address/add
pub async fn create_address(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<AddressRequest>,
) -> Result<Json<ApiResponse<addresses::Model>>, ApiError> {
    let input = payload.validate()?;

    let address = state
        .store()
        .create_address(user.user_id, input)
        .await
        .map_err(|e| ApiError::database(format!("Failed to create address: {e}")))?;

    Ok(Json(ApiResponse::success(address)))
}

/// GET /address/list
pub async fn list_addresses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<addresses::Model>>>, ApiError> {
    let addresses = state
        .store()
        .list_addresses(user.user_id)
        .await
        .map_err(|e| ApiError::database(format!("Failed to fetch addresses: {e}")))?;

    Ok(Json(ApiResponse::success(addresses)))
}

/// PUT /address/update/{id}
pub async fn update_address(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<AddressRequest>,
) -> Result<Json<ApiResponse<addresses::Model>>, ApiError> {
    validation::validate_id(id)?;
    let input = payload.validate()?;

    let address = state
        .store()
        .update_address(id, user.user_id, input)
        .await
        .map_err(|e| ApiError::database(format!("Failed to update address: {e}")))?
        .ok_or_else(|| ApiError::not_found("Address", &id.to_string()))?;

    Ok(Json(ApiResponse::success(address)))
}

/// DELETE /address/delete/{id}
pub async fn delete_address(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    validation::validate_id(id)?;

    let deleted = state
        .store()
        .delete_address(id, user.user_id)
        .await
        .map_err(|e| ApiError::database(format!("Failed to delete address: {e}")))?;

    if !deleted {
        return Err(ApiError::not_found("Address", &id.to_string()));
    }

    Ok(Json(ApiResponse::success(())))
}
