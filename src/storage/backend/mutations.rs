//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::{model_to_mapping, new_mapping_active_model};
use crate::errors::{Result, ShortpathError};
use crate::storage::UrlMapping;

use migration::entities::url_mapping;

impl SeaOrmStorage {
    pub async fn insert_mapping(
        &self,
        short_path: &str,
        long_url: &str,
        created_at: DateTime<Utc>,
    ) -> Result<UrlMapping> {
        let model = new_mapping_active_model(short_path, long_url, created_at)
            .insert(&self.db)
            .await
            .map_err(|e| match ShortpathError::from(e) {
                ShortpathError::PathTaken(_) => {
                    ShortpathError::path_taken(format!("short path already taken: {}", short_path))
                }
                other => other,
            })?;

        info!("Short path created: {} -> {}", model.short_path, model.long_url);
        Ok(model_to_mapping(model))
    }

    pub async fn remove(&self, id: i32) -> Result<()> {
        let result = url_mapping::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(ShortpathError::not_found("link not found"));
        }

        info!("Short link deleted: id={}", id);
        Ok(())
    }
}
