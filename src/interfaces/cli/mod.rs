//! CLI interface module
//!
//! Link management straight against the configured store, without going
//! through the HTTP server.

pub mod commands;

use std::fmt;
use std::sync::Arc;

use crate::cli::Commands;
use crate::config::StaticConfig;
use crate::runtime::lifetime::startup::prepare_services;
use crate::services::LinkService;
use commands::{add_link, generate_config, list_links, remove_link};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::ShortpathError> for CliError {
    fn from(err: crate::errors::ShortpathError) -> Self {
        CliError::CommandError(err.message().to_string())
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands, config: &StaticConfig) -> Result<(), CliError> {
    match cmd {
        // Generate doesn't need a store
        Commands::GenerateConfig { path, force } => generate_config(path, force),
        Commands::Add { long_url, path } => {
            let links = open_links(config).await?;
            add_link(&links, &long_url, path.as_deref(), config.server.public_url.as_deref()).await
        }
        Commands::List {
            page,
            page_size,
            search,
        } => {
            let links = open_links(config).await?;
            list_links(&links, page, page_size, search.as_deref()).await
        }
        Commands::Remove { id } => {
            let links = open_links(config).await?;
            remove_link(&links, id).await
        }
        Commands::Serve => Err(CliError::CommandError(
            "serve is not a CLI command".to_string(),
        )),
    }
}

async fn open_links(config: &StaticConfig) -> Result<Arc<LinkService>, CliError> {
    prepare_services(config)
        .await
        .map_err(|e| CliError::StorageError(format!("{:#}", e)))
}
