//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::{debug, error};

use super::SeaOrmStorage;
use super::converters::model_to_mapping;
use crate::errors::Result;
use crate::storage::{LinkPage, UrlMapping};

use migration::entities::url_mapping;

impl SeaOrmStorage {
    pub async fn get_by_short_path(&self, short_path: &str) -> Result<Option<UrlMapping>> {
        let model = url_mapping::Entity::find()
            .filter(url_mapping::Column::ShortPath.eq(short_path))
            .one(&self.db)
            .await
            .inspect_err(|e| error!("查询短路径失败 {}: {}", short_path, e))?;

        Ok(model.map(model_to_mapping))
    }

    pub async fn get_by_long_url(&self, long_url: &str) -> Result<Option<UrlMapping>> {
        let model = url_mapping::Entity::find()
            .filter(url_mapping::Column::LongUrl.eq(long_url))
            .order_by_asc(url_mapping::Column::Id)
            .one(&self.db)
            .await
            .inspect_err(|e| error!("按长链接查询失败: {}", e))?;

        Ok(model.map(model_to_mapping))
    }

    /// 按创建时间倒序分页加载，search 模糊匹配 short_path 或 long_url
    pub async fn load_page(
        &self,
        offset: u64,
        limit: u64,
        search: Option<&str>,
    ) -> Result<LinkPage> {
        let mut condition = Condition::all();
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            condition = condition.add(
                Condition::any()
                    .add(url_mapping::Column::ShortPath.contains(search))
                    .add(url_mapping::Column::LongUrl.contains(search)),
            );
        }

        let total = url_mapping::Entity::find()
            .filter(condition.clone())
            .count(&self.db)
            .await?;

        // sqlx 以 i64 绑定 LIMIT/OFFSET，超出范围会 panic
        let offset = offset.min(i64::MAX as u64);
        let limit = limit.min(i64::MAX as u64);
        if offset >= total {
            return Ok(LinkPage {
                items: Vec::new(),
                total,
            });
        }

        let models = url_mapping::Entity::find()
            .filter(condition)
            .order_by_desc(url_mapping::Column::CreatedAt)
            .order_by_desc(url_mapping::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;

        debug!(
            "Loaded {} mappings (offset={}, limit={}, total={})",
            models.len(),
            offset,
            limit,
            total
        );

        Ok(LinkPage {
            items: models.into_iter().map(model_to_mapping).collect(),
            total,
        })
    }

    pub async fn exists_by_id(&self, id: i32) -> Result<bool> {
        let count = url_mapping::Entity::find_by_id(id).count(&self.db).await?;
        Ok(count > 0)
    }
}
