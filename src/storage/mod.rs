use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod memory;
pub mod models;

pub use backend::SeaOrmStorage;
pub use memory::MemoryStorage;
pub use models::{LinkPage, UrlMapping};

/// 短路径映射的持久化接口
///
/// 唯一性约束：`short_path` 冲突时 `insert` 返回 `ShortpathError::PathTaken`，
/// 调用方可以换一个路径重试。
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// 后端名称（sqlite / mysql / postgres / memory）
    fn backend_name(&self) -> &str;

    async fn insert(
        &self,
        short_path: &str,
        long_url: &str,
        created_at: DateTime<Utc>,
    ) -> Result<UrlMapping>;

    async fn find_by_short_path(&self, short_path: &str) -> Result<Option<UrlMapping>>;

    /// 按长链接查找；存在多条时返回最早创建的一条
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlMapping>>;

    /// 按创建时间倒序分页，`search` 对 short_path 和 long_url 做子串匹配
    async fn list(&self, offset: u64, limit: u64, search: Option<&str>) -> Result<LinkPage>;

    async fn exists(&self, id: i32) -> Result<bool>;

    /// 删除指定 id，不存在时返回 `NotFound`
    async fn delete(&self, id: i32) -> Result<()>;
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<dyn LinkStore>> {
        let database_url = &config.database_url;

        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(database_url)?;

        if backend_type == "memory" {
            info!("Using in-memory storage, mappings will not survive a restart");
            return Ok(Arc::new(MemoryStorage::new()));
        }

        let storage = SeaOrmStorage::new(database_url, &backend_type, config.pool_size).await?;
        Ok(Arc::new(storage))
    }
}
