use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 一条短路径映射
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlMapping {
    pub id: i32,
    pub short_path: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
}

/// 分页查询结果
#[derive(Debug, Clone, Default)]
pub struct LinkPage {
    pub items: Vec<UrlMapping>,
    /// 满足过滤条件的总条数（不受 offset/limit 影响）
    pub total: u64,
}
