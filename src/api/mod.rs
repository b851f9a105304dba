//! HTTP surface
//!
//! Route table:
//! - `/` → 404
//! - `/translate` → admin page (Basic auth)
//! - `/api/*` → admin API (Basic auth)
//! - `/{short_path}` → 301 redirect
//!
//! Rate limiting and timing are applied around the whole app by the server
//! runtime, before route matching.

pub mod middleware;
pub mod services;

use std::sync::Arc;

use actix_web::{HttpRequest, error, http::StatusCode, web};

use crate::services::LinkService;
use middleware::{AdminCredentials, BasicAuth};
use services::admin::error_response;
use services::{PublicOrigin, RedirectService, admin_routes, frontend_routes, redirect_routes};

/// 请求体 JSON 解析失败时返回 400 `{error}`
fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> error::Error {
    let response = error_response(StatusCode::BAD_REQUEST, &err.to_string());
    error::InternalError::from_response(err, response).into()
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .content_type_required(false)
        .error_handler(json_error_handler)
}

/// 注册所有路由及其依赖
pub fn configure_routes(
    cfg: &mut web::ServiceConfig,
    links: Arc<LinkService>,
    credentials: AdminCredentials,
    public_origin: PublicOrigin,
) {
    let auth = BasicAuth::new(credentials);

    cfg.app_data(web::Data::from(links))
        .app_data(web::Data::new(public_origin))
        .app_data(json_config())
        .service(web::resource("/").to(RedirectService::handle_root))
        .service(frontend_routes().wrap(auth.clone()))
        .service(admin_routes().wrap(auth))
        .service(redirect_routes());
}
