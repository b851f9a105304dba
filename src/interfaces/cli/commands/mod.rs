mod add;
mod config_gen;
mod list;
mod remove;

pub use add::add_link;
pub use config_gen::generate_config;
pub use list::list_links;
pub use remove::remove_link;
