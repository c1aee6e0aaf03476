use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{
    ApiError, ApiResponse, AppState,
    auth::AdminUser,
    types::{ProductDto, ProductPageDto, to_json_list},
    validation,
};
use crate::db::{ProductFilter, ProductInput, SortKey};

pub const MAX_PRODUCT_IMAGES: usize = 5;

const DEFAULT_PAGE_SIZE: u64 = 10;
const MAX_PAGE_SIZE: u64 = 100;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: String,
    pub brand: String,
    pub description: String,
    pub category: String,
    pub gender: String,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub price: f64,
    pub stock: i32,
    #[serde(default)]
    pub rating: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProductQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub categories: Option<String>,
    pub sizes: Option<String>,
    pub colors: Option<String>,
    pub brands: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// POST /products/create-new-product (multipart)
/// Text fields describe the product; up to five `images` file parts are
/// uploaded to object storage before the row is written.
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<ProductDto>>, ApiError> {
    let mut fields = ProductFormFields::default();
    let mut uploads: Vec<(String, Vec<u8>)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Invalid multipart payload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "images" {
            if uploads.len() >= MAX_PRODUCT_IMAGES {
                return Err(ApiError::validation(format!(
                    "At most {MAX_PRODUCT_IMAGES} images are allowed"
                )));
            }
            let filename = field.file_name().unwrap_or("image").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::validation(format!("Failed to read image: {e}")))?;
            uploads.push((filename, bytes.to_vec()));
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::validation(format!("Invalid field {name}: {e}")))?;
            fields.set(&name, value);
        }
    }

    let input = fields.into_input()?;

    if uploads.is_empty() {
        return Err(ApiError::validation("At least one image is required"));
    }

    let image_urls = upload_all(&state, uploads).await?;

    let product = state
        .store()
        .create_product(input, to_json_list(&image_urls))
        .await
        .map_err(|e| ApiError::database(format!("Failed to create product: {e}")))?;

    tracing::info!(product_id = product.id, "Product created");

    Ok(Json(ApiResponse::success(ProductDto::from(product))))
}

/// PUT /products/{id}
/// Scalar fields only; stored images are left untouched.
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse<ProductDto>>, ApiError> {
    validation::validate_id(id)?;
    let input = payload.into_input()?;

    let product = state
        .store()
        .update_product(id, input)
        .await
        .map_err(|e| ApiError::database(format!("Failed to update product: {e}")))?
        .ok_or_else(|| ApiError::not_found("Product", &id.to_string()))?;

    Ok(Json(ApiResponse::success(ProductDto::from(product))))
}

/// DELETE /products/{id}
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    validation::validate_id(id)?;

    let deleted = state
        .store()
        .delete_product(id)
        .await
        .map_err(|e| ApiError::database(format!("Failed to delete product: {e}")))?;

    if !deleted {
        return Err(ApiError::not_found("Product", &id.to_string()));
    }

    tracing::info!(product_id = id, "Product deleted");

    Ok(Json(ApiResponse::success(())))
}

/// GET /products/{id}
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ProductDto>>, ApiError> {
    validation::validate_id(id)?;

    let product = state
        .store()
        .get_product(id)
        .await
        .map_err(|e| ApiError::database(format!("Failed to fetch product: {e}")))?
        .ok_or_else(|| ApiError::not_found("Product", &id.to_string()))?;

    Ok(Json(ApiResponse::success(ProductDto::from(product))))
}

/// GET /products/fetch-admin-products
pub async fn fetch_admin_products(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<Json<ApiResponse<Vec<ProductDto>>>, ApiError> {
    let products = state
        .store()
        .list_products()
        .await
        .map_err(|e| ApiError::database(format!("Failed to fetch products: {e}")))?;

    Ok(Json(ApiResponse::success(
        products.into_iter().map(ProductDto::from).collect(),
    )))
}

/// GET /products/fetch-client-products
/// Filter lists arrive comma separated; unknown sort keys fall back to
/// creation date.
pub async fn fetch_client_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ClientProductQuery>,
) -> Result<Json<ApiResponse<ProductPageDto>>, ApiError> {
    let filter = query.into_filter();

    let page = state
        .store()
        .list_products_filtered(filter)
        .await
        .map_err(|e| ApiError::database(format!("Failed to fetch products: {e}")))?;

    Ok(Json(ApiResponse::success(ProductPageDto {
        products: page.products.into_iter().map(ProductDto::from).collect(),
        total_products: page.total_products,
        total_pages: page.total_pages,
        current_page: page.current_page,
    })))
}

// ============================================================================
// Helpers
// ============================================================================

impl ClientProductQuery {
    fn into_filter(self) -> ProductFilter {
        let sort_by = match self.sort_by.as_deref() {
            Some("price") => SortKey::Price,
            _ => SortKey::CreatedAt,
        };

        ProductFilter {
            categories: split_csv(self.categories),
            sizes: split_csv(self.sizes),
            colors: split_csv(self.colors),
            brands: split_csv(self.brands),
            min_price: self.min_price,
            max_price: self.max_price,
            sort_by,
            sort_asc: self.sort_order.as_deref() == Some("asc"),
            page: self.page.unwrap_or(1).max(1),
            limit: self
                .limit
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }
}

impl UpdateProductRequest {
    fn into_input(self) -> Result<ProductInput, ApiError> {
        validation::validate_required(&self.name, "Name")?;
        validation::validate_required(&self.brand, "Brand")?;
        validation::validate_required(&self.category, "Category")?;
        if self.price < 0.0 {
            return Err(ApiError::validation("Price must not be negative"));
        }
        if self.stock < 0 {
            return Err(ApiError::validation("Stock must not be negative"));
        }

        Ok(ProductInput {
            name: self.name,
            brand: self.brand,
            description: self.description,
            category: self.category,
            gender: self.gender,
            sizes: to_json_list(&self.sizes),
            colors: to_json_list(&self.colors),
            price: self.price,
            stock: self.stock,
            rating: self.rating,
        })
    }
}

/// Collects the text parts of the create-product multipart form
#[derive(Default)]
struct ProductFormFields {
    name: String,
    brand: String,
    description: String,
    category: String,
    gender: String,
    sizes: Vec<String>,
    colors: Vec<String>,
    price: Option<f64>,
    stock: Option<i32>,
}

impl ProductFormFields {
    fn set(&mut self, name: &str, value: String) {
        match name {
            "name" => self.name = value,
            "brand" => self.brand = value,
            "description" => self.description = value,
            "category" => self.category = value,
            "gender" => self.gender = value,
            "sizes" => self.sizes = split_csv(Some(value)),
            "colors" => self.colors = split_csv(Some(value)),
            "price" => self.price = value.trim().parse().ok(),
            "stock" => self.stock = value.trim().parse().ok(),
            _ => {}
        }
    }

    fn into_input(self) -> Result<ProductInput, ApiError> {
        let price = self
            .price
            .ok_or_else(|| ApiError::validation("Price must be a number"))?;
        let stock = self
            .stock
            .ok_or_else(|| ApiError::validation("Stock must be a whole number"))?;

        UpdateProductRequest {
            name: self.name,
            brand: self.brand,
            description: self.description,
            category: self.category,
            gender: self.gender,
            sizes: self.sizes,
            colors: self.colors,
            price,
            stock,
            rating: 0.0,
        }
        .into_input()
    }
}

pub(super) async fn upload_all(
    state: &Arc<AppState>,
    uploads: Vec<(String, Vec<u8>)>,
) -> Result<Vec<String>, ApiError> {
    let storage = state.storage();
    if !storage.is_configured() {
        return Err(ApiError::storage_error("Image storage is not configured"));
    }

    let futures = uploads
        .iter()
        .map(|(filename, bytes)| storage.upload_image(filename, bytes.clone()));

    futures::future::try_join_all(futures)
        .await
        .map_err(|e| ApiError::storage_error(format!("Image upload failed: {e}")))
}

fn split_csv(raw: Option<String>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
