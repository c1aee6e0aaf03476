use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::entities::{cart_items, prelude::*, products};

/// Scalar fields for create/update. List-valued fields arrive as the JSON
/// text the entity stores.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub brand: String,
    pub description: String,
    pub category: String,
    pub gender: String,
    pub sizes: String,
    pub colors: String,
    pub price: f64,
    pub stock: i32,
    pub rating: f64,
}

/// Shopper-facing listing filters; empty vectors mean "no constraint"
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub categories: Vec<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub brands: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort_by: SortKey,
    pub sort_asc: bool,
    pub page: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    CreatedAt,
    Price,
}

/// One page of the shopper listing plus the totals the storefront paginates
/// with.
#[derive(Debug)]
pub struct ProductPage {
    pub products: Vec<products::Model>,
    pub total_products: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

pub struct ProductRepository {
    conn: DatabaseConnection,
}

impl ProductRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, input: ProductInput, images: String) -> Result<products::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = products::ActiveModel {
            name: Set(input.name),
            brand: Set(input.brand),
            description: Set(input.description),
            category: Set(input.category),
            gender: Set(input.gender),
            sizes: Set(input.sizes),
            colors: Set(input.colors),
            price: Set(input.price),
            stock: Set(input.stock),
            sold_count: Set(0),
            rating: Set(0.0),
            images: Set(images),
            is_featured: Set(false),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert product")?;

        Ok(model)
    }

    /// Scalar update; images are intentionally left untouched on edit
    pub async fn update(&self, id: i32, input: ProductInput) -> Result<Option<products::Model>> {
        let Some(existing) = Products::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query product for update")?
        else {
            return Ok(None);
        };

        let mut active: products::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.brand = Set(input.brand);
        active.description = Set(input.description);
        active.category = Set(input.category);
        active.gender = Set(input.gender);
        active.sizes = Set(input.sizes);
        active.colors = Set(input.colors);
        active.price = Set(input.price);
        active.stock = Set(input.stock);
        active.rating = Set(input.rating);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update product")?;

        Ok(Some(model))
    }

    /// Hard delete. Cart rows referencing the product go with it, in the
    /// same transaction, so no cart ever points at a missing product.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        CartItems::delete_many()
            .filter(cart_items::Column::ProductId.eq(id))
            .exec(&txn)
            .await
            .context("Failed to delete cart items for product")?;

        let result = Products::delete_by_id(id)
            .exec(&txn)
            .await
            .context("Failed to delete product")?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn get(&self, id: i32) -> Result<Option<products::Model>> {
        let product = Products::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query product")?;

        Ok(product)
    }

    pub async fn list_all(&self) -> Result<Vec<products::Model>> {
        let rows = Products::find()
            .all(&self.conn)
            .await
            .context("Failed to list products")?;

        Ok(rows)
    }

    /// Filtered, sorted, paginated shopper listing. `sizes`/`colors` are
    /// JSON array text, so membership is a `LIKE '%"value"%'` match; the
    /// quotes keep `"S"` from matching `"XS"`.
    pub async fn list_filtered(&self, filter: ProductFilter) -> Result<ProductPage> {
        let mut query = Products::find();

        if !filter.categories.is_empty() {
            query = query.filter(products::Column::Category.is_in(filter.categories));
        }
        if !filter.brands.is_empty() {
            query = query.filter(products::Column::Brand.is_in(filter.brands));
        }
        if !filter.sizes.is_empty() {
            let mut any = Condition::any();
            for size in &filter.sizes {
                any = any.add(products::Column::Sizes.contains(format!("\"{size}\"")));
            }
            query = query.filter(any);
        }
        if !filter.colors.is_empty() {
            let mut any = Condition::any();
            for color in &filter.colors {
                any = any.add(products::Column::Colors.contains(format!("\"{color}\"")));
            }
            query = query.filter(any);
        }
        if let Some(min) = filter.min_price {
            query = query.filter(products::Column::Price.gte(min));
        }
        if let Some(max) = filter.max_price {
            query = query.filter(products::Column::Price.lte(max));
        }

        let column = match filter.sort_by {
            SortKey::CreatedAt => products::Column::CreatedAt,
            SortKey::Price => products::Column::Price,
        };
        query = if filter.sort_asc {
            query.order_by_asc(column)
        } else {
            query.order_by_desc(column)
        };

        let page = filter.page.max(1);
        let limit = filter.limit.max(1);

        let paginator = query.paginate(&self.conn, limit);
        let totals = paginator
            .num_items_and_pages()
            .await
            .context("Failed to count products")?;
        let products = paginator
            .fetch_page(page - 1)
            .await
            .context("Failed to fetch product page")?;

        Ok(ProductPage {
            products,
            total_products: totals.number_of_items,
            total_pages: totals.number_of_pages,
            current_page: page,
        })
    }

    /// Replace the featured set: everything cleared, then exactly `ids`
    /// flagged, in one transaction so readers never interleave between the
    /// two bulk updates. The ≤8 cap is checked at the api boundary.
    pub async fn set_featured(&self, ids: &[i32]) -> Result<()> {
        let txn = self.conn.begin().await?;

        Products::update_many()
            .col_expr(products::Column::IsFeatured, Expr::value(false))
            .exec(&txn)
            .await
            .context("Failed to clear featured flags")?;

        if !ids.is_empty() {
            Products::update_many()
                .col_expr(products::Column::IsFeatured, Expr::value(true))
                .filter(products::Column::Id.is_in(ids.to_vec()))
                .exec(&txn)
                .await
                .context("Failed to set featured flags")?;
        }

        txn.commit().await?;
        Ok(())
    }

    pub async fn list_featured(&self) -> Result<Vec<products::Model>> {
        let rows = Products::find()
            .filter(products::Column::IsFeatured.eq(true))
            .all(&self.conn)
            .await
            .context("Failed to list featured products")?;

        Ok(rows)
    }
}
