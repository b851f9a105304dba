//! Admin API 类型定义

use serde::{Deserialize, Serialize};

use crate::services::LinkListing;
use crate::storage::UrlMapping;

/// `POST /api/shorten` 请求体
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    #[serde(default)]
    pub long_url: Option<String>,
    #[serde(default)]
    pub custom_path: Option<String>,
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `GET /api/links` 查询参数
///
/// 数字参数按字符串接收，无法解析时使用默认值。
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GetLinksQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub search: Option<String>,
}

fn parse_number(raw: Option<&str>) -> Option<u64> {
    raw?.trim().parse::<i64>().ok().map(|n| n.max(0) as u64)
}

impl GetLinksQuery {
    pub fn page(&self) -> Option<u64> {
        parse_number(self.page.as_deref())
    }

    pub fn page_size(&self) -> Option<u64> {
        parse_number(self.page_size.as_deref())
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LinkItem {
    pub id: i32,
    pub short_url: String,
    pub short_path: String,
    pub long_url: String,
    pub created_at: String,
}

impl LinkItem {
    pub fn from_mapping(mapping: UrlMapping, origin: &str) -> Self {
        Self {
            id: mapping.id,
            short_url: format!("{}/{}", origin, mapping.short_path),
            short_path: mapping.short_path,
            long_url: mapping.long_url,
            created_at: mapping.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

#[derive(Serialize, Clone, Debug)]
pub struct LinksResponse {
    pub links: Vec<LinkItem>,
    pub pagination: PaginationInfo,
}

impl LinksResponse {
    pub fn from_listing(listing: LinkListing, origin: &str) -> Self {
        Self {
            pagination: PaginationInfo {
                page: listing.page,
                page_size: listing.page_size,
                total_items: listing.total_items,
                total_pages: listing.total_pages,
            },
            links: listing
                .items
                .into_iter()
                .map(|m| LinkItem::from_mapping(m, origin))
                .collect(),
        }
    }
}

/// `DELETE /api/links` 请求体
#[derive(Deserialize, Clone, Debug, Default)]
pub struct DeleteLinkRequest {
    #[serde(default)]
    pub id: Option<i64>,
}

#[derive(Serialize, Clone, Debug)]
pub struct DeleteLinkResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ErrorResponse {
    pub error: String,
}
