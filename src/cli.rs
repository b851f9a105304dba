//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

/// Shortpath - a small URL shortener
#[derive(Parser, Debug)]
#[command(name = "shortpath")]
#[command(version)]
#[command(about = "A small URL shortener with a Basic-auth admin API", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, short = 'c', global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Write a sample configuration file with all defaults
    GenerateConfig {
        /// Output path (default: config.example.toml)
        path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Shorten a URL directly against the configured store
    Add {
        /// Long URL to shorten
        long_url: String,

        /// Custom short path
        #[arg(long)]
        path: Option<String>,
    },

    /// List short links, newest first
    List {
        #[arg(long, default_value_t = 1)]
        page: u64,

        #[arg(long, default_value_t = 20)]
        page_size: u64,

        /// Substring match on short path or long URL
        #[arg(long)]
        search: Option<String>,
    },

    /// Remove a short link by id
    Remove {
        id: i32,
    },
}

impl Cli {
    /// Subcommand to run; no subcommand means serve
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}
