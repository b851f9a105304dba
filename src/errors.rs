use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum ShortpathError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    /// 写入时 short_path 已被占用（唯一索引冲突），分配器会换下一个后缀重试
    PathTaken(String),
    Serialization(String),
    Config(String),
}

impl ShortpathError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortpathError::DatabaseConfig(_) => "E001",
            ShortpathError::DatabaseConnection(_) => "E002",
            ShortpathError::DatabaseOperation(_) => "E003",
            ShortpathError::FileOperation(_) => "E004",
            ShortpathError::Validation(_) => "E005",
            ShortpathError::NotFound(_) => "E006",
            ShortpathError::Conflict(_) => "E007",
            ShortpathError::PathTaken(_) => "E008",
            ShortpathError::Serialization(_) => "E009",
            ShortpathError::Config(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortpathError::DatabaseConfig(_) => "Database Configuration Error",
            ShortpathError::DatabaseConnection(_) => "Database Connection Error",
            ShortpathError::DatabaseOperation(_) => "Database Operation Error",
            ShortpathError::FileOperation(_) => "File Operation Error",
            ShortpathError::Validation(_) => "Validation Error",
            ShortpathError::NotFound(_) => "Resource Not Found",
            ShortpathError::Conflict(_) => "Conflict",
            ShortpathError::PathTaken(_) => "Short Path Taken",
            ShortpathError::Serialization(_) => "Serialization Error",
            ShortpathError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortpathError::DatabaseConfig(msg) => msg,
            ShortpathError::DatabaseConnection(msg) => msg,
            ShortpathError::DatabaseOperation(msg) => msg,
            ShortpathError::FileOperation(msg) => msg,
            ShortpathError::Validation(msg) => msg,
            ShortpathError::NotFound(msg) => msg,
            ShortpathError::Conflict(msg) => msg,
            ShortpathError::PathTaken(msg) => msg,
            ShortpathError::Serialization(msg) => msg,
            ShortpathError::Config(msg) => msg,
        }
    }

    /// HTTP 状态码映射
    pub fn http_status(&self) -> StatusCode {
        match self {
            ShortpathError::Validation(_) => StatusCode::BAD_REQUEST,
            ShortpathError::NotFound(_) => StatusCode::NOT_FOUND,
            ShortpathError::Conflict(_) | ShortpathError::PathTaken(_) => StatusCode::CONFLICT,
            ShortpathError::DatabaseConfig(_)
            | ShortpathError::DatabaseConnection(_)
            | ShortpathError::DatabaseOperation(_)
            | ShortpathError::FileOperation(_)
            | ShortpathError::Serialization(_)
            | ShortpathError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 对外可见的消息；服务端错误不暴露内部细节
    pub fn public_message(&self) -> &str {
        if self.http_status().is_server_error() {
            "internal storage error"
        } else {
            self.message()
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortpathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortpathError {}

// 便捷的构造函数
impl ShortpathError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        ShortpathError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        ShortpathError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        ShortpathError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        ShortpathError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ShortpathError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShortpathError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        ShortpathError::Conflict(msg.into())
    }

    pub fn path_taken<T: Into<String>>(msg: T) -> Self {
        ShortpathError::PathTaken(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ShortpathError::Serialization(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ShortpathError::Config(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for ShortpathError {
    fn from(err: sea_orm::DbErr) -> Self {
        if let Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            return ShortpathError::PathTaken(detail);
        }
        ShortpathError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for ShortpathError {
    fn from(err: std::io::Error) -> Self {
        ShortpathError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ShortpathError {
    fn from(err: serde_json::Error) -> Self {
        ShortpathError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for ShortpathError {
    fn from(err: config::ConfigError) -> Self {
        ShortpathError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortpathError>;
