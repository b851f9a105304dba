use actix_web::{HttpResponse, web};
use rust_embed::Embed;
use tracing::{error, trace};

// 管理页面随二进制一起嵌入
#[derive(Embed)]
#[folder = "assets/"]
struct FrontendAssets;

const TRANSLATE_PAGE: &str = "translate.html";

pub struct FrontendService;

impl FrontendService {
    /// 管理页面 `GET /translate`
    pub async fn handle_translate() -> HttpResponse {
        trace!("Serving admin page");

        match FrontendAssets::get(TRANSLATE_PAGE) {
            Some(content) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .insert_header(("Cache-Control", "no-store"))
                .body(content.data.into_owned()),
            None => {
                error!("Embedded asset {} is missing", TRANSLATE_PAGE);
                HttpResponse::InternalServerError()
                    .content_type("text/plain; charset=utf-8")
                    .body("Internal Server Error")
            }
        }
    }
}

/// 管理页面资源，认证中间件由调用方包裹
pub fn frontend_routes() -> actix_web::Resource {
    web::resource("/translate")
        .route(web::get().to(FrontendService::handle_translate))
        .route(web::head().to(FrontendService::handle_translate))
}
