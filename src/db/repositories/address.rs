use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::entities::{addresses, prelude::*};

/// Caller-supplied address fields; ownership comes from the session, never
/// the payload.
#[derive(Debug, Clone)]
pub struct AddressInput {
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    pub phone: String,
    pub is_default: bool,
}

pub struct AddressRepository {
    conn: DatabaseConnection,
}

impl AddressRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, user_id: i32) -> Result<Vec<addresses::Model>> {
        let rows = Addresses::find()
            .filter(addresses::Column::UserId.eq(user_id))
            .order_by_desc(addresses::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list addresses")?;

        Ok(rows)
    }

    /// Insert an address. When the new row is the default, the user's other
    /// defaults are cleared in the same transaction so that at most one row
    /// per user carries the flag.
    pub async fn create(&self, user_id: i32, input: AddressInput) -> Result<addresses::Model> {
        let txn = self.conn.begin().await?;

        if input.is_default {
            Addresses::update_many()
                .col_expr(addresses::Column::IsDefault, Expr::value(false))
                .filter(addresses::Column::UserId.eq(user_id))
                .exec(&txn)
                .await
                .context("Failed to clear existing default addresses")?;
        }

        let model = addresses::ActiveModel {
            user_id: Set(user_id),
            name: Set(input.name),
            address: Set(input.address),
            city: Set(input.city),
            country: Set(input.country),
            postal_code: Set(input.postal_code),
            phone: Set(input.phone),
            is_default: Set(input.is_default),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to insert address")?;

        txn.commit().await?;
        Ok(model)
    }

    /// Update an address owned by `user_id`; `None` when no such row exists.
    /// Same transactional default-clearing protocol as `create`.
    pub async fn update(
        &self,
        id: i32,
        user_id: i32,
        input: AddressInput,
    ) -> Result<Option<addresses::Model>> {
        let txn = self.conn.begin().await?;

        let existing = Addresses::find_by_id(id)
            .filter(addresses::Column::UserId.eq(user_id))
            .one(&txn)
            .await
            .context("Failed to query address for update")?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        if input.is_default {
            Addresses::update_many()
                .col_expr(addresses::Column::IsDefault, Expr::value(false))
                .filter(addresses::Column::UserId.eq(user_id))
                .exec(&txn)
                .await
                .context("Failed to clear existing default addresses")?;
        }

        let mut active: addresses::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.address = Set(input.address);
        active.city = Set(input.city);
        active.country = Set(input.country);
        active.postal_code = Set(input.postal_code);
        active.phone = Set(input.phone);
        active.is_default = Set(input.is_default);

        let model = active
            .update(&txn)
            .await
            .context("Failed to update address")?;

        txn.commit().await?;
        Ok(Some(model))
    }

    /// Delete an address owned by `user_id`; returns whether a row went away.
    /// Deleting the current default leaves the user with no default address;
    /// that matches the observed behavior and is deliberately not "fixed".
    pub async fn delete(&self, id: i32, user_id: i32) -> Result<bool> {
        let result = Addresses::delete_many()
            .filter(addresses::Column::Id.eq(id))
            .filter(addresses::Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete address")?;

        Ok(result.rows_affected > 0)
    }
}
