use serde::{Deserialize, Serialize};

/// 静态配置（从 TOML + 环境变量加载，启动时使用）
///
/// 包含：
/// - server: 监听地址、端口、worker 数量、对外访问地址
/// - database: 存储后端连接
/// - logging: 日志输出
/// - admin: 管理接口 Basic 认证凭据
/// - rate_limit: 按客户端 IP 的固定窗口限流
/// - validation: 长链接校验策略
/// - allocator: 短路径分配
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub allocator: AllocatorConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
    /// 生成 shortUrl 时使用的 origin（如 `https://s.example.com`），未设置则取请求的 scheme + host
    #[serde(default)]
    pub public_url: Option<String>,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// 管理接口凭据
///
/// password 为空时管理接口整体关闭（返回 404）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_username")]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// 限流配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_rate_limit_enabled")]
    pub enabled: bool,
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    #[serde(default = "default_window_size_seconds")]
    pub window_size_seconds: u64,
    /// 清理触发阈值：达到该数量后，新客户端会触发过期窗口清理（每个窗口长度最多一次），
    /// 未过期的窗口不会被淘汰
    #[serde(default = "default_max_tracked_clients")]
    pub max_tracked_clients: usize,
    /// 携带真实客户端 IP 的请求头（如 CDN 注入的 CF-Connecting-IP）
    #[serde(default = "default_client_ip_header")]
    pub client_ip_header: Option<String>,
    /// 允许设置 client_ip_header 的代理（IP 或 CIDR）。为空表示信任所有来源，
    /// 直连的客户端可以伪造该请求头绕过限流，仅适用于所有流量都经过 CDN 的部署
    #[serde(default)]
    pub trusted_proxies: Vec<String>,
}

/// 长链接校验配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_blacklisted_domains")]
    pub blacklisted_domains: Vec<String>,
    #[serde(default = "default_dangerous_keywords")]
    pub dangerous_keywords: Vec<String>,
    #[serde(default = "default_max_url_length")]
    pub max_url_length: usize,
}

/// 短路径分配配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocatorConfig {
    /// 不能超过 `MAX_SHORT_PATH_LENGTH`（数据库列宽）
    #[serde(default = "default_max_path_length")]
    pub max_path_length: usize,
    #[serde(default = "default_max_collision_attempts")]
    pub max_collision_attempts: u32,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "sqlite://shortpath.db?mode=rwc".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_rate_limit_enabled() -> bool {
    true
}

fn default_max_requests() -> u32 {
    10
}

fn default_window_size_seconds() -> u64 {
    60
}

fn default_max_tracked_clients() -> usize {
    100_000
}

fn default_client_ip_header() -> Option<String> {
    Some("CF-Connecting-IP".to_string())
}

fn default_blacklisted_domains() -> Vec<String> {
    ["malware.com", "phishing.example", "suspicious.site"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_dangerous_keywords() -> Vec<String> {
    ["malware", "phishing", "hack", "crack", "warez"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_max_url_length() -> usize {
    2000
}

fn default_max_path_length() -> usize {
    50
}

fn default_max_collision_attempts() -> u32 {
    100
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
            public_url: None,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: default_admin_username(),
            password: String::new(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_rate_limit_enabled(),
            max_requests: default_max_requests(),
            window_size_seconds: default_window_size_seconds(),
            max_tracked_clients: default_max_tracked_clients(),
            client_ip_header: default_client_ip_header(),
            trusted_proxies: Vec::new(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            blacklisted_domains: default_blacklisted_domains(),
            dangerous_keywords: default_dangerous_keywords(),
            max_url_length: default_max_url_length(),
        }
    }
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            max_path_length: default_max_path_length(),
            max_collision_attempts: default_max_collision_attempts(),
        }
    }
}
