//! Short path allocation
//!
//! A candidate comes either from the caller or from the long URL itself
//! (last path segment without its extension, or the first host label).
//! Candidates are sanitized to `[A-Za-z0-9_-]`, validated, and then made
//! unique against the store by appending `-1`, `-2`, ... up to a fixed cap.

use chrono::Utc;
use tracing::{debug, warn};
use url::Url;

use crate::config::AllocatorConfig;
use crate::errors::{Result, ShortpathError};
use crate::storage::{LinkStore, UrlMapping};

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// 只保留 `[A-Za-z0-9_-]`，再截断到 `max_len`
pub fn sanitize_path(raw: &str, max_len: usize) -> String {
    raw.chars().filter(|c| is_path_char(*c)).take(max_len).collect()
}

/// 从长链接推导未清洗的候选路径
///
/// `https://example.com/path/to/file.tar.gz` → `file.tar`，
/// `https://docs.example.com/` → `docs`
pub fn raw_candidate(url: &Url) -> String {
    let last_segment = url
        .path()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .next_back();

    match last_segment {
        Some(segment) => match segment.rfind('.') {
            // 只去掉最后一个扩展名；以 '.' 开头的段保持原样
            Some(idx) if idx > 0 => segment[..idx].to_string(),
            _ => segment.to_string(),
        },
        None => url
            .host_str()
            .and_then(|host| host.split('.').next())
            .unwrap_or_default()
            .to_string(),
    }
}

/// 推导并清洗候选路径；结果为空或清洗后超长时改用整个主机名
pub fn derive_candidate(long_url: &str, max_len: usize) -> Result<String> {
    let url = Url::parse(long_url)
        .map_err(|_| ShortpathError::validation("invalid URL format"))?;

    let cleaned: String = raw_candidate(&url)
        .chars()
        .filter(|c| is_path_char(*c))
        .collect();

    if cleaned.is_empty() || cleaned.chars().count() > max_len {
        let host = url.host_str().unwrap_or_default();
        debug!(
            "Candidate from {} unusable ({:?}), falling back to host",
            long_url, cleaned
        );
        return Ok(sanitize_path(host, max_len));
    }

    Ok(cleaned)
}

/// 校验最终路径（自定义路径和推导路径走同一套规则）
pub fn validate_short_path(path: &str, max_len: usize) -> Result<()> {
    if path.is_empty() || !path.chars().all(is_path_char) {
        return Err(ShortpathError::validation(
            "path may only contain letters, digits, underscore, hyphen",
        ));
    }
    if path.chars().count() > max_len {
        return Err(ShortpathError::validation(format!(
            "path length exceeds {} characters",
            max_len
        )));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct PathAllocator {
    max_path_length: usize,
    max_collision_attempts: u32,
}

impl PathAllocator {
    pub fn new(config: &AllocatorConfig) -> Self {
        Self {
            max_path_length: config.max_path_length,
            max_collision_attempts: config.max_collision_attempts,
        }
    }

    pub fn max_path_length(&self) -> usize {
        self.max_path_length
    }

    /// 确定候选路径：非空自定义路径原样使用，否则从长链接推导
    pub fn candidate(&self, long_url: &str, custom_path: Option<&str>) -> Result<String> {
        let candidate = match custom_path.filter(|p| !p.is_empty()) {
            Some(custom) => custom.to_string(),
            None => derive_candidate(long_url, self.max_path_length)?,
        };
        validate_short_path(&candidate, self.max_path_length)?;
        Ok(candidate)
    }

    /// 第 `attempt` 个后缀候选，保证总长度不超过上限
    fn suffixed(&self, base: &str, attempt: u32) -> String {
        let suffix = format!("-{}", attempt);
        let keep = self.max_path_length.saturating_sub(suffix.len());
        // base 已通过校验，全部是 ASCII
        let base = &base[..base.len().min(keep)];
        format!("{}{}", base, suffix)
    }

    /// 分配并写入一个唯一的短路径
    ///
    /// 调用方负责在此之前校验长链接，并确认它尚无映射。
    pub async fn allocate(
        &self,
        store: &dyn LinkStore,
        long_url: &str,
        custom_path: Option<&str>,
    ) -> Result<UrlMapping> {
        let base = self.candidate(long_url, custom_path)?;

        for attempt in 0..=self.max_collision_attempts {
            let path = if attempt == 0 {
                base.clone()
            } else {
                self.suffixed(&base, attempt)
            };

            if store.find_by_short_path(&path).await?.is_some() {
                continue;
            }

            match store.insert(&path, long_url, Utc::now()).await {
                Ok(mapping) => {
                    if attempt > 0 {
                        debug!("Short path {} taken, allocated {}", base, path);
                    }
                    return Ok(mapping);
                }
                // 预检查之后被并发请求抢先写入
                Err(ShortpathError::PathTaken(_)) => {
                    debug!("Short path {} taken concurrently, retrying", path);
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            "Gave up allocating a path for {} after {} attempts",
            base, self.max_collision_attempts
        );
        Err(ShortpathError::conflict(
            "unable to generate a unique short path",
        ))
    }
}

impl Default for PathAllocator {
    fn default() -> Self {
        Self::new(&AllocatorConfig::default())
    }
}
