//! Link management service
//!
//! Business logic shared between the HTTP admin API and the CLI.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::StaticConfig;
use crate::errors::{Result, ShortpathError};
use crate::services::PathAllocator;
use crate::storage::{LinkStore, UrlMapping};
use crate::utils::url_validator::UrlValidator;

/// 分页参数上限
pub const MAX_PAGE_SIZE: u64 = 100;
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// 数据库驱动以 i64 绑定 OFFSET
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Result of a shorten request
#[derive(Debug, Clone)]
pub struct ShortenOutcome {
    pub mapping: UrlMapping,
    /// The long URL already had a mapping; nothing was written
    pub existing: bool,
}

/// One page of links plus pagination metadata
#[derive(Debug, Clone)]
pub struct LinkListing {
    pub items: Vec<UrlMapping>,
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

pub struct LinkService {
    store: Arc<dyn LinkStore>,
    validator: UrlValidator,
    allocator: PathAllocator,
}

impl LinkService {
    pub fn new(store: Arc<dyn LinkStore>, validator: UrlValidator, allocator: PathAllocator) -> Self {
        Self {
            store,
            validator,
            allocator,
        }
    }

    pub fn from_config(store: Arc<dyn LinkStore>, config: &StaticConfig) -> Self {
        Self::new(
            store,
            UrlValidator::new(&config.validation),
            PathAllocator::new(&config.allocator),
        )
    }

    /// 缩短长链接
    ///
    /// 已存在映射时直接返回（`existing = true`），否则分配新路径并写入。
    pub async fn shorten(&self, long_url: &str, custom_path: Option<&str>) -> Result<ShortenOutcome> {
        if long_url.trim().is_empty() {
            return Err(ShortpathError::validation("longUrl is required"));
        }

        self.validator
            .validate(long_url)
            .map_err(|e| ShortpathError::validation(e.to_string()))?;

        if let Some(mapping) = self.store.find_by_long_url(long_url).await? {
            debug!("Long URL already mapped to {}", mapping.short_path);
            return Ok(ShortenOutcome {
                mapping,
                existing: true,
            });
        }

        let mapping = self
            .allocator
            .allocate(self.store.as_ref(), long_url, custom_path)
            .await?;
        info!("Shortened {} -> /{}", mapping.long_url, mapping.short_path);

        Ok(ShortenOutcome {
            mapping,
            existing: false,
        })
    }

    /// 分页列出链接；page 从 1 开始，page_size 限制在 1..=100
    pub async fn list_links(
        &self,
        page: Option<u64>,
        page_size: Option<u64>,
        search: Option<&str>,
    ) -> Result<LinkListing> {
        let page_size = page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        // offset = (page - 1) * page_size 必须落在 i64 范围内
        let page = page
            .unwrap_or(1)
            .clamp(1, MAX_OFFSET / page_size + 1);
        let offset = (page - 1) * page_size;

        let result = self.store.list(offset, page_size, search).await?;

        Ok(LinkListing {
            total_pages: result.total.div_ceil(page_size),
            total_items: result.total,
            items: result.items,
            page,
            page_size,
        })
    }

    pub async fn delete_link(&self, id: i32) -> Result<()> {
        if id <= 0 {
            return Err(ShortpathError::validation("missing link id"));
        }
        if !self.store.exists(id).await? {
            return Err(ShortpathError::not_found("link not found"));
        }
        self.store.delete(id).await?;
        info!("Deleted link id={}", id);
        Ok(())
    }

    /// 重定向查找
    pub async fn resolve(&self, short_path: &str) -> Result<Option<UrlMapping>> {
        self.store.find_by_short_path(short_path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn service() -> LinkService {
        LinkService::from_config(Arc::new(MemoryStorage::new()), &StaticConfig::default())
    }

    #[tokio::test]
    async fn test_shorten_is_idempotent_per_long_url() {
        let service = service();
        let first = service
            .shorten("https://example.com/docs/guide.html", None)
            .await
            .unwrap();
        let second = service
            .shorten("https://example.com/docs/guide.html", None)
            .await
            .unwrap();

        assert!(!first.existing);
        assert!(second.existing);
        assert_eq!(first.mapping.short_path, "guide");
        assert_eq!(second.mapping.short_path, "guide");
    }

    #[tokio::test]
    async fn test_shorten_rejects_invalid_url_without_writing() {
        let service = service();
        let err = service.shorten("ftp://example.com", None).await.unwrap_err();
        assert_eq!(err.message(), "only HTTP/HTTPS protocols allowed");

        let err = service.shorten("   ", None).await.unwrap_err();
        assert_eq!(err.message(), "longUrl is required");

        let listing = service.list_links(None, None, None).await.unwrap();
        assert_eq!(listing.total_items, 0);
    }

    #[tokio::test]
    async fn test_list_links_clamps_paging() {
        let service = service();
        for i in 0..3 {
            service
                .shorten(&format!("https://example.com/p{}", i), None)
                .await
                .unwrap();
        }

        let listing = service.list_links(Some(0), Some(0), None).await.unwrap();
        assert_eq!(listing.page, 1);
        assert_eq!(listing.page_size, 1);
        assert_eq!(listing.total_pages, 3);
        assert_eq!(listing.items.len(), 1);

        let listing = service.list_links(Some(1), Some(500), None).await.unwrap();
        assert_eq!(listing.page_size, MAX_PAGE_SIZE);
        assert_eq!(listing.total_pages, 1);

        let listing = service.list_links(Some(9), None, None).await.unwrap();
        assert!(listing.items.is_empty());
        assert_eq!(listing.total_items, 3);
    }

    #[tokio::test]
    async fn test_list_links_caps_huge_page() {
        let service = service();
        service.shorten("https://example.com/a", None).await.unwrap();

        let listing = service
            .list_links(Some(u64::MAX), Some(MAX_PAGE_SIZE), None)
            .await
            .unwrap();
        assert!(listing.items.is_empty());
        assert_eq!(listing.total_items, 1);
        assert_eq!(listing.page, MAX_OFFSET / MAX_PAGE_SIZE + 1);
        assert!((listing.page - 1) * listing.page_size <= MAX_OFFSET);

        let listing = service
            .list_links(Some(i64::MAX as u64), Some(1), None)
            .await
            .unwrap();
        assert_eq!(listing.page, i64::MAX as u64);
        assert!(listing.items.is_empty());
    }

    #[tokio::test]
    async fn test_delete_link() {
        let service = service();
        let outcome = service.shorten("https://example.com/x", None).await.unwrap();

        assert!(matches!(
            service.delete_link(0).await,
            Err(ShortpathError::Validation(_))
        ));
        assert!(matches!(
            service.delete_link(outcome.mapping.id + 100).await,
            Err(ShortpathError::NotFound(_))
        ));

        service.delete_link(outcome.mapping.id).await.unwrap();
        assert!(service.resolve("x").await.unwrap().is_none());
    }
}
