//! Admin API 链接操作

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, Result as ActixResult, web};
use tracing::{info, trace};

use crate::errors::ShortpathError;
use crate::services::LinkService;

use super::helpers::{error_from_shortpath, json_response, request_origin};
use super::types::{
    DeleteLinkRequest, DeleteLinkResponse, GetLinksQuery, LinksResponse, ShortenRequest,
    ShortenResponse,
};

/// 已存在映射时返回的提示
pub const EXISTING_LINK_MESSAGE: &str = "short link already exists for this URL";

/// 缩短链接 `POST /api/shorten`
pub async fn shorten_link(
    req: HttpRequest,
    body: web::Json<ShortenRequest>,
    links: web::Data<LinkService>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    trace!("Admin API: shorten request {:?}", body);

    let long_url = body.long_url.unwrap_or_default();
    let outcome = match links
        .shorten(&long_url, body.custom_path.as_deref())
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => return Ok(error_from_shortpath(&e)),
    };

    let short_url = format!("{}/{}", request_origin(&req), outcome.mapping.short_path);
    let message = outcome
        .existing
        .then(|| EXISTING_LINK_MESSAGE.to_string());

    Ok(json_response(
        StatusCode::OK,
        &ShortenResponse { short_url, message },
    ))
}

/// 分页列出链接 `GET /api/links`
pub async fn list_links(
    req: HttpRequest,
    query: web::Query<GetLinksQuery>,
    links: web::Data<LinkService>,
) -> ActixResult<impl Responder> {
    trace!("Admin API: list links {:?}", query);

    let listing = match links
        .list_links(query.page(), query.page_size(), query.search())
        .await
    {
        Ok(listing) => listing,
        Err(e) => return Ok(error_from_shortpath(&e)),
    };

    info!(
        "Admin API: returning {} links (page {} of {}, total: {})",
        listing.items.len(),
        listing.page,
        listing.total_pages,
        listing.total_items
    );

    let origin = request_origin(&req);
    Ok(json_response(
        StatusCode::OK,
        &LinksResponse::from_listing(listing, &origin),
    ))
}

/// 删除链接 `DELETE /api/links`
pub async fn delete_link(
    body: web::Json<DeleteLinkRequest>,
    links: web::Data<LinkService>,
) -> ActixResult<impl Responder> {
    let id = match body.id {
        Some(id) if id > 0 => id,
        _ => return Ok(error_from_shortpath(&ShortpathError::validation("missing link id"))),
    };

    // 超出 i32 范围的 id 不可能存在
    let Ok(id) = i32::try_from(id) else {
        return Ok(error_from_shortpath(&ShortpathError::not_found("link not found")));
    };

    if let Err(e) = links.delete_link(id).await {
        return Ok(error_from_shortpath(&e));
    }

    Ok(json_response(
        StatusCode::OK,
        &DeleteLinkResponse {
            success: true,
            message: "link deleted".to_string(),
        },
    ))
}

/// `/api` 下未匹配的路径
pub async fn api_not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .insert_header(("Content-Type", "text/plain; charset=utf-8"))
        .body("Not Found")
}
