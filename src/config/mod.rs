mod r#impl;
mod structs;

pub use r#impl::{DEFAULT_CONFIG_PATH, MAX_SHORT_PATH_LENGTH};
pub use structs::*;
