//! Admin API 帮助函数

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use tracing::error;

use crate::errors::ShortpathError;

use super::types::ErrorResponse;

/// 生成 shortUrl 使用的 origin；未配置时取请求的 scheme + host
#[derive(Debug, Clone, Default)]
pub struct PublicOrigin(pub Option<String>);

impl PublicOrigin {
    pub fn new(public_url: Option<&str>) -> Self {
        Self(
            public_url
                .map(|u| u.trim().trim_end_matches('/').to_string())
                .filter(|u| !u.is_empty()),
        )
    }

    pub fn resolve(&self, req: &HttpRequest) -> String {
        match &self.0 {
            Some(origin) => origin.clone(),
            None => {
                let info = req.connection_info();
                format!("{}://{}", info.scheme(), info.host())
            }
        }
    }
}

/// 从 app data 中取 origin（测试中可能未注册）
pub fn request_origin(req: &HttpRequest) -> String {
    req.app_data::<web::Data<PublicOrigin>>()
        .map(|o| o.resolve(req))
        .unwrap_or_else(|| PublicOrigin::default().resolve(req))
}

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(body)
}

/// 构建 `{error}` 错误响应
pub fn error_response(status: StatusCode, message: &str) -> HttpResponse {
    json_response(
        status,
        &ErrorResponse {
            error: message.to_string(),
        },
    )
}

/// 从 ShortpathError 构建错误响应，服务端错误只记录日志不外泄
pub fn error_from_shortpath(err: &ShortpathError) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        error!("Admin API error: {}", err);
    }
    error_response(status, err.public_message())
}
