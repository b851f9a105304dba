use clap::Parser;
use colored::Colorize;

use shortpath::cli::{Cli, Commands};
use shortpath::config::StaticConfig;
use shortpath::runtime::modes;
use shortpath::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.command();

    // 生成配置不依赖现有配置文件
    if let Commands::GenerateConfig { .. } = command {
        return run_cli_or_exit(command, &StaticConfig::default()).await;
    }

    let config = match StaticConfig::load(Some(&cli.config)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    let _guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    match command {
        Commands::Serve => modes::run_server(&config).await,
        cmd => run_cli_or_exit(cmd, &config).await,
    }
}

async fn run_cli_or_exit(cmd: Commands, config: &StaticConfig) -> anyhow::Result<()> {
    if let Err(e) = modes::run_cli(cmd, config).await {
        eprintln!("{}", e.format_colored());
        if matches!(e, shortpath::interfaces::cli::CliError::StorageError(_)) {
            eprintln!("{}", "Check database.database_url in your configuration".dimmed());
        }
        std::process::exit(1);
    }
    Ok(())
}
