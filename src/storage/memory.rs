//! In-memory storage backend
//!
//! Selected with `database_url = "memory://"`. Holds the same contract as the
//! SeaORM backend (unique short paths, id assignment, newest-first listing)
//! but nothing survives a restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::errors::{Result, ShortpathError};
use crate::storage::{LinkPage, LinkStore, UrlMapping};

#[derive(Default)]
struct MemoryState {
    next_id: i32,
    rows: BTreeMap<i32, UrlMapping>,
}

#[derive(Default)]
pub struct MemoryStorage {
    state: RwLock<MemoryState>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.state.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 与 SQLite 默认 LIKE 一致：ASCII 大小写不敏感
fn matches_search(mapping: &UrlMapping, needle: &str) -> bool {
    let needle = needle.to_ascii_lowercase();
    mapping.short_path.to_ascii_lowercase().contains(&needle)
        || mapping.long_url.to_ascii_lowercase().contains(&needle)
}

#[async_trait]
impl LinkStore for MemoryStorage {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn insert(
        &self,
        short_path: &str,
        long_url: &str,
        created_at: DateTime<Utc>,
    ) -> Result<UrlMapping> {
        let mut state = self.state.write();
        if state.rows.values().any(|m| m.short_path == short_path) {
            return Err(ShortpathError::path_taken(format!(
                "short path already taken: {}",
                short_path
            )));
        }

        state.next_id += 1;
        let mapping = UrlMapping {
            id: state.next_id,
            short_path: short_path.to_string(),
            long_url: long_url.to_string(),
            created_at,
        };
        state.rows.insert(mapping.id, mapping.clone());
        Ok(mapping)
    }

    async fn find_by_short_path(&self, short_path: &str) -> Result<Option<UrlMapping>> {
        let state = self.state.read();
        Ok(state
            .rows
            .values()
            .find(|m| m.short_path == short_path)
            .cloned())
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlMapping>> {
        // BTreeMap 按 id 升序，first match 即最早的一条
        let state = self.state.read();
        Ok(state.rows.values().find(|m| m.long_url == long_url).cloned())
    }

    async fn list(&self, offset: u64, limit: u64, search: Option<&str>) -> Result<LinkPage> {
        let state = self.state.read();
        let search = search.filter(|s| !s.is_empty());

        let mut matched: Vec<&UrlMapping> = state
            .rows
            .values()
            .filter(|m| search.is_none_or(|needle| matches_search(m, needle)))
            .collect();
        matched.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(LinkPage { items, total })
    }

    async fn exists(&self, id: i32) -> Result<bool> {
        Ok(self.state.read().rows.contains_key(&id))
    }

    async fn delete(&self, id: i32) -> Result<()> {
        match self.state.write().rows.remove(&id) {
            Some(_) => Ok(()),
            None => Err(ShortpathError::not_found("link not found")),
        }
    }
}
