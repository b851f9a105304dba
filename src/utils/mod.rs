pub mod ip;
pub mod url_validator;

pub use ip::ClientIpResolver;
pub use url_validator::{UrlValidationError, UrlValidator};
