//! Add link command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::LinkService;

pub async fn add_link(
    links: &LinkService,
    long_url: &str,
    custom_path: Option<&str>,
    public_url: Option<&str>,
) -> Result<(), CliError> {
    let outcome = links.shorten(long_url, custom_path).await?;
    let mapping = &outcome.mapping;

    let display = match public_url {
        Some(origin) => format!("{}/{}", origin.trim_end_matches('/'), mapping.short_path),
        None => format!("/{}", mapping.short_path),
    };

    if outcome.existing {
        println!(
            "{} Already shortened: {} -> {}",
            "ℹ".bold().blue(),
            display.cyan(),
            mapping.long_url.blue().underline()
        );
    } else {
        println!(
            "{} Added short link: {} -> {} (id: {})",
            "✓".bold().green(),
            display.cyan(),
            mapping.long_url.blue().underline(),
            mapping.id.to_string().magenta()
        );
    }

    Ok(())
}
