use chrono::{DateTime, Utc};

use crate::storage::UrlMapping;
use migration::entities::url_mapping;

/// 将 Sea-ORM Model 转换为 UrlMapping
pub fn model_to_mapping(model: url_mapping::Model) -> UrlMapping {
    UrlMapping {
        id: model.id,
        short_path: model.short_path,
        long_url: model.long_url,
        created_at: model.created_at,
    }
}

/// 构建新映射的 ActiveModel，id 交给数据库分配
pub fn new_mapping_active_model(
    short_path: &str,
    long_url: &str,
    created_at: DateTime<Utc>,
) -> url_mapping::ActiveModel {
    use sea_orm::ActiveValue::*;

    url_mapping::ActiveModel {
        id: NotSet,
        short_path: Set(short_path.to_string()),
        long_url: Set(long_url.to_string()),
        created_at: Set(created_at),
    }
}
