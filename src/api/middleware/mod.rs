pub mod basic_auth;
pub mod rate_limit;
pub mod timing;

pub use basic_auth::{AdminCredentials, BasicAuth};
pub use rate_limit::RateLimit;
pub use timing::TimingMiddleware;
