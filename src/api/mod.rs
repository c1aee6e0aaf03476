use axum::{
    Router, http,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::clients::ObjectStorageClient;
use crate::config::Config;
use crate::state::SharedState;

mod address;
pub mod auth;
mod cart;
mod coupons;
mod error;
mod products;
mod settings;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn tokens(&self) -> &crate::services::TokenService {
        &self.shared.tokens
    }

    #[must_use]
    pub fn storage(&self) -> &Arc<ObjectStorageClient> {
        &self.shared.storage
    }
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(Arc::new(AppState { shared }))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let cors_origins = {
        let config = state.config().read().await;
        config.server.cors_allowed_origins.clone()
    };

    let api_router = Router::new()
        .merge(protected_routes(state.clone()))
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh-token", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
        .with_state(state);

    // Credentials (cookies) cannot be combined with wildcards, so the "*"
    // branch gets an anonymous-friendly layer instead.
    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                http::Method::GET,
                http::Method::POST,
                http::Method::PUT,
                http::Method::DELETE,
            ])
            .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
            .allow_credentials(true)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
}

async fn health(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> Result<axum::Json<ApiResponse<&'static str>>, ApiError> {
    state
        .store()
        .ping()
        .await
        .map_err(|e| ApiError::database(format!("Health check failed: {e}")))?;

    Ok(axum::Json(ApiResponse::success("ok")))
}

/// Everything behind the `authenticate` middleware. Admin-only handlers
/// additionally take the `AdminUser` extractor, which rejects non-admin
/// callers with 403.
fn protected_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/address/add", post(address::create_address))
        .route("/address/list", get(address::list_addresses))
        .route("/address/update/{id}", put(address::update_address))
        .route("/address/delete/{id}", delete(address::delete_address))
        .route("/cart/add-to-cart", post(cart::add_to_cart))
        .route("/cart/fetch-cart", get(cart::fetch_cart))
        .route("/cart/update/{id}", put(cart::update_cart_item_quantity))
        .route("/cart/remove/{id}", delete(cart::remove_from_cart))
        .route("/cart/clear-cart", post(cart::clear_cart))
        .route(
            "/products/create-new-product",
            post(products::create_product),
        )
        .route(
            "/products/fetch-admin-products",
            get(products::fetch_admin_products),
        )
        .route(
            "/products/fetch-client-products",
            get(products::fetch_client_products),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/settings/banners", post(settings::add_banners))
        .route("/settings/get-banners", get(settings::get_banners))
        .route(
            "/settings/update-featured-products",
            post(settings::update_featured_products),
        )
        .route(
            "/settings/fetch-featured-products",
            get(settings::fetch_featured_products),
        )
        .route("/coupon/create-coupon", post(coupons::create_coupon))
        .route("/coupon/fetch-all-coupon", get(coupons::fetch_all_coupons))
        .route("/coupon/{id}", delete(coupons::delete_coupon))
        .route_layer(middleware::from_fn_with_state(state, auth::authenticate))
}
