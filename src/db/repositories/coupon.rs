use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::entities::{coupons, prelude::*};

#[derive(Debug, Clone)]
pub struct CouponInput {
    pub code: String,
    pub discount_percent: i32,
    pub start_date: String,
    pub end_date: String,
    pub usage_limit: i32,
}

pub struct CouponRepository {
    conn: DatabaseConnection,
}

impl CouponRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert a coupon with a fresh usage count. Returns `None` when the
    /// code is already taken.
    pub async fn create(&self, input: CouponInput) -> Result<Option<coupons::Model>> {
        let existing = Coupons::find()
            .filter(coupons::Column::Code.eq(&input.code))
            .one(&self.conn)
            .await
            .context("Failed to check for existing coupon code")?;

        if existing.is_some() {
            return Ok(None);
        }

        let model = coupons::ActiveModel {
            code: Set(input.code),
            discount_percent: Set(input.discount_percent),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            usage_limit: Set(input.usage_limit),
            usage_count: Set(0),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert coupon")?;

        Ok(Some(model))
    }

    pub async fn list(&self) -> Result<Vec<coupons::Model>> {
        let rows = Coupons::find()
            .all(&self.conn)
            .await
            .context("Failed to list coupons")?;

        Ok(rows)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Coupons::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete coupon")?;

        Ok(result.rows_affected > 0)
    }
}
