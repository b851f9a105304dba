pub mod admin;
pub mod frontend;
pub mod redirect;

pub use admin::{PublicOrigin, admin_routes};
pub use frontend::{FrontendService, frontend_routes};
pub use redirect::{RedirectService, redirect_routes};
