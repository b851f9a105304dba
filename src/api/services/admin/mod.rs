//! Admin API 服务模块
//!
//! Basic 认证保护的链接管理接口：缩短、分页列出、删除。

mod helpers;
mod link_crud;
pub mod routes;
mod types;

// 重新导出类型
pub use types::*;

// 重新导出帮助函数
pub use helpers::{PublicOrigin, error_from_shortpath, error_response, request_origin};

// 重新导出端点
pub use link_crud::{EXISTING_LINK_MESSAGE, api_not_found, delete_link, list_links, shorten_link};

pub use routes::admin_routes;
