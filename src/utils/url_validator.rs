//! URL 验证模块
//!
//! 对待缩短的长链接做格式与策略检查。只是尽力而为的启发式过滤，
//! 不能当作安全边界。

use url::Url;

use crate::config::ValidationConfig;

/// URL 验证错误，Display 即返回给调用方的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlValidationError {
    InvalidFormat,
    InvalidProtocol,
    MaliciousSite(String),
    TooLong(usize),
    SuspiciousKeyword(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFormat => write!(f, "invalid URL format"),
            Self::InvalidProtocol => write!(f, "only HTTP/HTTPS protocols allowed"),
            Self::MaliciousSite(_) => write!(f, "malicious site detected"),
            Self::TooLong(_) => write!(f, "URL length exceeds limit"),
            Self::SuspiciousKeyword(_) => write!(f, "suspicious keyword detected"),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 长链接校验器
#[derive(Debug, Clone)]
pub struct UrlValidator {
    blacklisted_domains: Vec<String>,
    dangerous_keywords: Vec<String>,
    max_url_length: usize,
}

impl UrlValidator {
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            blacklisted_domains: config
                .blacklisted_domains
                .iter()
                .filter(|d| !d.is_empty())
                .map(|d| d.to_lowercase())
                .collect(),
            dangerous_keywords: config
                .dangerous_keywords
                .iter()
                .filter(|k| !k.is_empty())
                .map(|k| k.to_lowercase())
                .collect(),
            max_url_length: config.max_url_length,
        }
    }

    /// 按顺序检查，返回第一个失败原因：
    /// 1. 能解析为绝对 URL
    /// 2. 字面量以 `http://` 或 `https://` 开头（大小写敏感）
    /// 3. 主机名不含黑名单片段
    /// 4. 长度不超过上限（按字符数）
    /// 5. 小写后不含危险关键词
    pub fn validate(&self, long_url: &str) -> Result<(), UrlValidationError> {
        let parsed = Url::parse(long_url).map_err(|_| UrlValidationError::InvalidFormat)?;

        if !long_url.starts_with("http://") && !long_url.starts_with("https://") {
            return Err(UrlValidationError::InvalidProtocol);
        }

        // url 解析时已将主机名小写
        let host = parsed.host_str().unwrap_or_default();
        if let Some(fragment) = self
            .blacklisted_domains
            .iter()
            .find(|fragment| host.contains(fragment.as_str()))
        {
            return Err(UrlValidationError::MaliciousSite(fragment.clone()));
        }

        let length = long_url.chars().count();
        if length > self.max_url_length {
            return Err(UrlValidationError::TooLong(length));
        }

        let lowered = long_url.to_lowercase();
        if let Some(keyword) = self
            .dangerous_keywords
            .iter()
            .find(|keyword| lowered.contains(keyword.as_str()))
        {
            return Err(UrlValidationError::SuspiciousKeyword(keyword.clone()));
        }

        Ok(())
    }
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self::new(&ValidationConfig::default())
    }
}
