use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderValue, LOCATION};
use actix_web::{HttpResponse, web};
use tracing::{debug, error, trace};

use crate::services::LinkService;

pub struct RedirectService;

impl RedirectService {
    /// `/` 没有内容
    pub async fn handle_root() -> HttpResponse {
        Self::not_found_response()
    }

    pub async fn handle_redirect(
        path: web::Path<String>,
        links: web::Data<LinkService>,
    ) -> HttpResponse {
        let short_path = path.into_inner();
        if short_path.is_empty() {
            return Self::not_found_response();
        }

        match links.resolve(&short_path).await {
            Ok(Some(mapping)) => {
                trace!("Redirecting /{} -> {}", short_path, mapping.long_url);
                match HeaderValue::from_str(&mapping.long_url) {
                    Ok(location) => HttpResponse::MovedPermanently()
                        .insert_header((LOCATION, location))
                        .finish(),
                    Err(e) => {
                        error!(
                            "Stored URL for /{} is not a valid Location header: {}",
                            short_path, e
                        );
                        Self::error_response()
                    }
                }
            }
            Ok(None) => {
                debug!("Redirect link not found: {}", short_path);
                Self::not_found_response()
            }
            Err(e) => {
                error!("Database error during redirect lookup: {}", e);
                Self::error_response()
            }
        }
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .body("404 Not Found")
    }

    #[inline]
    fn error_response() -> HttpResponse {
        HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .body("Internal Server Error")
    }
}

/// 短链接重定向路由，必须最后注册
pub fn redirect_routes() -> actix_web::Resource {
    web::resource("/{short_path:.*}")
        .route(web::get().to(RedirectService::handle_redirect))
        .route(web::head().to(RedirectService::handle_redirect))
}
