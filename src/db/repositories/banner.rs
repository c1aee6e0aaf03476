use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, QueryOrder, Set};
use sea_orm::EntityTrait;

use crate::entities::{feature_banners, prelude::*};

pub struct BannerRepository {
    conn: DatabaseConnection,
}

impl BannerRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add_many(&self, image_urls: Vec<String>) -> Result<Vec<feature_banners::Model>> {
        let now = chrono::Utc::now().to_rfc3339();
        let mut created = Vec::with_capacity(image_urls.len());

        for url in image_urls {
            let model = feature_banners::ActiveModel {
                image_url: Set(url),
                created_at: Set(now.clone()),
                ..Default::default()
            }
            .insert(&self.conn)
            .await
            .context("Failed to insert feature banner")?;

            created.push(model);
        }

        Ok(created)
    }

    pub async fn list(&self) -> Result<Vec<feature_banners::Model>> {
        let rows = FeatureBanners::find()
            .order_by_desc(feature_banners::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list feature banners")?;

        Ok(rows)
    }
}
