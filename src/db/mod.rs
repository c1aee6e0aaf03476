use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{addresses, cart_items, coupons, feature_banners, products};

pub mod migrator;
pub mod repositories;

pub use repositories::address::AddressInput;
pub use repositories::coupon::CouponInput;
pub use repositories::product::{ProductFilter, ProductInput, ProductPage, SortKey};
pub use repositories::user::User;

/// Facade over the relational store; every component talks to the database
/// through this type.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn address_repo(&self) -> repositories::address::AddressRepository {
        repositories::address::AddressRepository::new(self.conn.clone())
    }

    fn cart_repo(&self) -> repositories::cart::CartRepository {
        repositories::cart::CartRepository::new(self.conn.clone())
    }

    fn product_repo(&self) -> repositories::product::ProductRepository {
        repositories::product::ProductRepository::new(self.conn.clone())
    }

    fn banner_repo(&self) -> repositories::banner::BannerRepository {
        repositories::banner::BannerRepository::new(self.conn.clone())
    }

    fn coupon_repo(&self) -> repositories::coupon::CouponRepository {
        repositories::coupon::CouponRepository::new(self.conn.clone())
    }

    // Users

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<User>> {
        self.user_repo().create(name, email, password).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_credentials(email, password).await
    }

    pub async fn set_refresh_token(&self, user_id: i32, token: Option<&str>) -> Result<()> {
        self.user_repo().set_refresh_token(user_id, token).await
    }

    pub async fn get_user_by_refresh_token(&self, token: &str) -> Result<Option<User>> {
        self.user_repo().get_by_refresh_token(token).await
    }

    // Addresses

    pub async fn create_address(
        &self,
        user_id: i32,
        input: AddressInput,
    ) -> Result<addresses::Model> {
        self.address_repo().create(user_id, input).await
    }

    pub async fn list_addresses(&self, user_id: i32) -> Result<Vec<addresses::Model>> {
        self.address_repo().list(user_id).await
    }

    pub async fn update_address(
        &self,
        id: i32,
        user_id: i32,
        input: AddressInput,
    ) -> Result<Option<addresses::Model>> {
        self.address_repo().update(id, user_id, input).await
    }

    pub async fn delete_address(&self, id: i32, user_id: i32) -> Result<bool> {
        self.address_repo().delete(id, user_id).await
    }

    // Cart

    pub async fn add_cart_item(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
        size: &str,
        color: &str,
    ) -> Result<cart_items::Model> {
        self.cart_repo()
            .add_item(user_id, product_id, quantity, size, color)
            .await
    }

    pub async fn list_cart_items(
        &self,
        user_id: i32,
    ) -> Result<Vec<(cart_items::Model, Option<products::Model>)>> {
        self.cart_repo().list_items(user_id).await
    }

    pub async fn update_cart_item_quantity(
        &self,
        item_id: i32,
        user_id: i32,
        quantity: i32,
    ) -> Result<Option<cart_items::Model>> {
        self.cart_repo()
            .update_quantity(item_id, user_id, quantity)
            .await
    }

    pub async fn remove_cart_item(&self, item_id: i32, user_id: i32) -> Result<bool> {
        self.cart_repo().remove_item(item_id, user_id).await
    }

    pub async fn clear_cart(&self, user_id: i32) -> Result<u64> {
        self.cart_repo().clear(user_id).await
    }

    // Catalog

    pub async fn create_product(
        &self,
        input: ProductInput,
        images: String,
    ) -> Result<products::Model> {
        self.product_repo().create(input, images).await
    }

    pub async fn update_product(
        &self,
        id: i32,
        input: ProductInput,
    ) -> Result<Option<products::Model>> {
        self.product_repo().update(id, input).await
    }

    pub async fn delete_product(&self, id: i32) -> Result<bool> {
        self.product_repo().delete(id).await
    }

    pub async fn get_product(&self, id: i32) -> Result<Option<products::Model>> {
        self.product_repo().get(id).await
    }

    pub async fn list_products(&self) -> Result<Vec<products::Model>> {
        self.product_repo().list_all().await
    }

    pub async fn list_products_filtered(&self, filter: ProductFilter) -> Result<ProductPage> {
        self.product_repo().list_filtered(filter).await
    }

    pub async fn set_featured_products(&self, ids: &[i32]) -> Result<()> {
        self.product_repo().set_featured(ids).await
    }

    pub async fn list_featured_products(&self) -> Result<Vec<products::Model>> {
        self.product_repo().list_featured().await
    }

    // Settings

    pub async fn add_banners(&self, image_urls: Vec<String>) -> Result<Vec<feature_banners::Model>> {
        self.banner_repo().add_many(image_urls).await
    }

    pub async fn list_banners(&self) -> Result<Vec<feature_banners::Model>> {
        self.banner_repo().list().await
    }

    // Coupons

    pub async fn create_coupon(&self, input: CouponInput) -> Result<Option<coupons::Model>> {
        self.coupon_repo().create(input).await
    }

    pub async fn list_coupons(&self) -> Result<Vec<coupons::Model>> {
        self.coupon_repo().list().await
    }

    pub async fn delete_coupon(&self, id: i32) -> Result<bool> {
        self.coupon_repo().delete(id).await
    }
}
