use serde::Serialize;

use crate::entities::{cart_items, products};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i32,
    pub name: String,
    pub brand: String,
    pub description: String,
    pub category: String,
    pub gender: String,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub price: f64,
    pub stock: i32,
    pub sold_count: i32,
    pub rating: f64,
    pub images: Vec<String>,
    pub is_featured: bool,
    pub created_at: String,
}

impl From<products::Model> for ProductDto {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            brand: model.brand,
            description: model.description,
            category: model.category,
            gender: model.gender,
            sizes: parse_json_list(&model.sizes),
            colors: parse_json_list(&model.colors),
            price: model.price,
            stock: model.stock,
            sold_count: model.sold_count,
            rating: model.rating,
            images: parse_json_list(&model.images),
            is_featured: model.is_featured,
            created_at: model.created_at,
        }
    }
}

/// A cart line item joined with the current product data. `name`, `price`
/// and `image` are absent when the product no longer exists.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDto {
    pub id: i32,
    pub product_id: i32,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub size: String,
    pub color: String,
    pub quantity: i32,
}

impl CartItemDto {
    /// Product fields are flattened in when the joined row is available.
    /// If the product has no images the image stays `None`.
    pub fn from_item(item: cart_items::Model, product: Option<products::Model>) -> Self {
        let (name, price, image) = product.map_or((None, None, None), |p| {
            let image = parse_json_list(&p.images).into_iter().next();
            (Some(p.name), Some(p.price), image)
        });

        Self {
            id: item.id,
            product_id: item.product_id,
            name,
            price,
            image,
            size: item.size,
            color: item.color,
            quantity: item.quantity,
        }
    }
}

/// Shopper listing page envelope
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPageDto {
    pub products: Vec<ProductDto>,
    pub total_products: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

pub(crate) fn parse_json_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

pub(crate) fn to_json_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}
