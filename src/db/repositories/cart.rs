use anyhow::{Context, Result};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::entities::{cart_items, carts, prelude::*, products};

pub struct CartRepository {
    conn: DatabaseConnection,
}

impl CartRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Fetch the user's cart, creating it on first use. The insert races
    /// against concurrent adds from the same user, so it lands on the unique
    /// `user_id` constraint and re-reads.
    async fn ensure_cart(&self, user_id: i32) -> Result<carts::Model> {
        if let Some(cart) = Carts::find()
            .filter(carts::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("Failed to query cart")?
        {
            return Ok(cart);
        }

        Carts::insert(carts::ActiveModel {
            user_id: Set(user_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(carts::Column::UserId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.conn)
        .await
        .context("Failed to create cart")?;

        Carts::find()
            .filter(carts::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("Failed to re-query cart after insert")?
            .ok_or_else(|| anyhow::anyhow!("Cart missing after upsert for user {user_id}"))
    }

    /// Upsert a line item on the (cart, product, size, color) key. The
    /// quantity merge is a single `ON CONFLICT ... quantity = quantity + n`
    /// statement, so its atomicity comes from the unique index rather than
    /// an explicit transaction.
    pub async fn add_item(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
        size: &str,
        color: &str,
    ) -> Result<cart_items::Model> {
        let cart = self.ensure_cart(user_id).await?;

        CartItems::insert(cart_items::ActiveModel {
            cart_id: Set(cart.id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            size: Set(size.to_string()),
            color: Set(color.to_string()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([
                cart_items::Column::CartId,
                cart_items::Column::ProductId,
                cart_items::Column::Size,
                cart_items::Column::Color,
            ])
            .value(
                cart_items::Column::Quantity,
                Expr::col(cart_items::Column::Quantity).add(quantity),
            )
            .to_owned(),
        )
        .exec_without_returning(&self.conn)
        .await
        .context("Failed to upsert cart item")?;

        CartItems::find()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .filter(cart_items::Column::ProductId.eq(product_id))
            .filter(cart_items::Column::Size.eq(size))
            .filter(cart_items::Column::Color.eq(color))
            .one(&self.conn)
            .await
            .context("Failed to re-query cart item after upsert")?
            .ok_or_else(|| anyhow::anyhow!("Cart item missing after upsert"))
    }

    /// All items in the user's cart, each joined with its product when the
    /// product still exists.
    pub async fn list_items(
        &self,
        user_id: i32,
    ) -> Result<Vec<(cart_items::Model, Option<products::Model>)>> {
        let Some(cart) = Carts::find()
            .filter(carts::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("Failed to query cart")?
        else {
            return Ok(Vec::new());
        };

        let items = CartItems::find()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .find_also_related(Products)
            .all(&self.conn)
            .await
            .context("Failed to list cart items")?;

        Ok(items)
    }

    /// Overwrite an item's quantity; `None` when the item is not in the
    /// caller's cart.
    pub async fn update_quantity(
        &self,
        item_id: i32,
        user_id: i32,
        quantity: i32,
    ) -> Result<Option<cart_items::Model>> {
        let Some(item) = self.owned_item(item_id, user_id).await? else {
            return Ok(None);
        };

        let mut active: cart_items::ActiveModel = item.into();
        active.quantity = Set(quantity);
        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update cart item quantity")?;

        Ok(Some(model))
    }

    pub async fn remove_item(&self, item_id: i32, user_id: i32) -> Result<bool> {
        let Some(item) = self.owned_item(item_id, user_id).await? else {
            return Ok(false);
        };

        CartItems::delete_by_id(item.id)
            .exec(&self.conn)
            .await
            .context("Failed to delete cart item")?;

        Ok(true)
    }

    pub async fn clear(&self, user_id: i32) -> Result<u64> {
        let Some(cart) = Carts::find()
            .filter(carts::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("Failed to query cart")?
        else {
            return Ok(0);
        };

        let result = CartItems::delete_many()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .exec(&self.conn)
            .await
            .context("Failed to clear cart")?;

        Ok(result.rows_affected)
    }

    /// Ownership check: the item must belong to the caller's cart
    async fn owned_item(&self, item_id: i32, user_id: i32) -> Result<Option<cart_items::Model>> {
        let Some(cart) = Carts::find()
            .filter(carts::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("Failed to query cart")?
        else {
            return Ok(None);
        };

        let item = CartItems::find_by_id(item_id)
            .filter(cart_items::Column::CartId.eq(cart.id))
            .one(&self.conn)
            .await
            .context("Failed to query cart item")?;

        Ok(item)
    }
}
