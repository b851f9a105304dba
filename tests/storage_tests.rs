//! SeaORM storage tests (SQLite)
//!
//! Each test gets its own database file in a temp directory.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tempfile::TempDir;

use shortpath::config::StaticConfig;
use shortpath::errors::ShortpathError;
use shortpath::services::LinkService;
use shortpath::storage::{LinkStore, SeaOrmStorage};

// =============================================================================
// Test Setup
// =============================================================================

async fn sqlite_store() -> (SeaOrmStorage, TempDir) {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("links.db").display());
    let store = SeaOrmStorage::new(&url, "sqlite", 1).await.unwrap();
    (store, dir)
}

// =============================================================================
// Insert / Lookup
// =============================================================================

#[tokio::test]
async fn test_insert_and_find() {
    let (store, _dir) = sqlite_store().await;
    let now = Utc::now();

    let mapping = store
        .insert("docs", "https://docs.rs/actix-web", now)
        .await
        .unwrap();
    assert!(mapping.id > 0);
    assert_eq!(mapping.short_path, "docs");

    let found = store.find_by_short_path("docs").await.unwrap().unwrap();
    assert_eq!(found.id, mapping.id);
    assert_eq!(found.long_url, "https://docs.rs/actix-web");

    let by_url = store
        .find_by_long_url("https://docs.rs/actix-web")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_url.short_path, "docs");

    assert!(store.find_by_short_path("missing").await.unwrap().is_none());
    assert!(store.exists(mapping.id).await.unwrap());
}

#[tokio::test]
async fn test_duplicate_short_path_is_path_taken() {
    let (store, _dir) = sqlite_store().await;

    store
        .insert("dup", "https://a.example", Utc::now())
        .await
        .unwrap();
    let err = store
        .insert("dup", "https://b.example", Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, ShortpathError::PathTaken(_)), "{:?}", err);

    // 短路径区分大小写
    assert!(store.insert("DUP", "https://c.example", Utc::now()).await.is_ok());
}

#[tokio::test]
async fn test_find_by_long_url_returns_oldest() {
    let (store, _dir) = sqlite_store().await;
    let base = Utc::now();

    store
        .insert("first", "https://same.example", base)
        .await
        .unwrap();
    store
        .insert("second", "https://same.example", base + Duration::seconds(5))
        .await
        .unwrap();

    let found = store
        .find_by_long_url("https://same.example")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.short_path, "first");
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_list_newest_first_with_search() {
    let (store, _dir) = sqlite_store().await;
    let base = Utc::now();

    for i in 0..5 {
        store
            .insert(
                &format!("item{}", i),
                &format!("https://example.com/{}", i),
                base + Duration::seconds(i),
            )
            .await
            .unwrap();
    }
    store
        .insert("crab", "https://www.rust-lang.org", base)
        .await
        .unwrap();

    let page = store.list(0, 3, None).await.unwrap();
    assert_eq!(page.total, 6);
    let paths: Vec<_> = page.items.iter().map(|m| m.short_path.as_str()).collect();
    assert_eq!(paths, vec!["item4", "item3", "item2"]);

    let page = store.list(3, 3, None).await.unwrap();
    assert_eq!(page.items.len(), 3);

    let page = store.list(0, 10, Some("rust-lang")).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].short_path, "crab");

    let page = store.list(0, 10, Some("item")).await.unwrap();
    assert_eq!(page.total, 5);

    let page = store.list(100, 10, None).await.unwrap();
    assert_eq!(page.total, 6);
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn test_list_with_offset_beyond_i64_returns_empty_page() {
    let (store, _dir) = sqlite_store().await;
    store
        .insert("only", "https://example.com/only", Utc::now())
        .await
        .unwrap();

    let page = store.list(u64::MAX, u64::MAX, None).await.unwrap();
    assert_eq!(page.total, 1);
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn test_service_huge_page_against_sqlite() {
    let (store, _dir) = sqlite_store().await;
    let store: Arc<dyn LinkStore> = Arc::new(store);
    let links = LinkService::from_config(store.clone(), &StaticConfig::default());
    links
        .shorten("https://example.com/page", None)
        .await
        .unwrap();

    for page in [i64::MAX as u64, u64::MAX] {
        let listing = links.list_links(Some(page), Some(100), None).await.unwrap();
        assert!(listing.items.is_empty());
        assert_eq!(listing.total_items, 1);
        assert_eq!(listing.total_pages, 1);
    }
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_missing_is_not_found() {
    let (store, _dir) = sqlite_store().await;
    let mapping = store
        .insert("bye", "https://example.com/bye", Utc::now())
        .await
        .unwrap();

    store.delete(mapping.id).await.unwrap();
    assert!(!store.exists(mapping.id).await.unwrap());
    assert!(store.find_by_short_path("bye").await.unwrap().is_none());

    let err = store.delete(mapping.id).await.unwrap_err();
    assert!(matches!(err, ShortpathError::NotFound(_)), "{:?}", err);
}

// =============================================================================
// Link Service over SQLite
// =============================================================================

#[tokio::test]
async fn test_service_shortens_against_sqlite() {
    let (store, _dir) = sqlite_store().await;
    let store: Arc<dyn LinkStore> = Arc::new(store);
    let links = LinkService::from_config(store.clone(), &StaticConfig::default());

    let first = links
        .shorten("https://example.com/guide.html", None)
        .await
        .unwrap();
    assert_eq!(first.mapping.short_path, "guide");
    assert!(!first.existing);

    let second = links
        .shorten("https://other.example/guide", None)
        .await
        .unwrap();
    assert_eq!(second.mapping.short_path, "guide-1");

    let again = links
        .shorten("https://example.com/guide.html", None)
        .await
        .unwrap();
    assert!(again.existing);
    assert_eq!(again.mapping.id, first.mapping.id);

    let resolved = links.resolve("guide-1").await.unwrap().unwrap();
    assert_eq!(resolved.long_url, "https://other.example/guide");

    let listing = links.list_links(None, None, None).await.unwrap();
    assert_eq!(listing.total_items, 2);
    assert_eq!(listing.page, 1);
    assert_eq!(listing.page_size, 10);
    assert_eq!(listing.total_pages, 1);
}
