//! Admin API 路由配置

use actix_web::web;

use super::link_crud::{api_not_found, delete_link, list_links, shorten_link};

/// 管理接口路由 `/api`
///
/// 包含：
/// - POST /api/shorten - 缩短链接
/// - GET/HEAD /api/links - 分页列出链接
/// - DELETE /api/links - 删除链接
///
/// 其余路径和方法一律 404。认证中间件由调用方包裹。
pub fn admin_routes() -> actix_web::Scope {
    web::scope("/api")
        .service(
            web::resource("/shorten")
                .route(web::post().to(shorten_link))
                .default_service(web::to(api_not_found)),
        )
        .service(
            web::resource("/links")
                .route(web::get().to(list_links))
                .route(web::head().to(list_links))
                .route(web::delete().to(delete_link))
                .default_service(web::to(api_not_found)),
        )
        .default_service(web::to(api_not_found))
}
