//! Remove link command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::LinkService;

pub async fn remove_link(links: &LinkService, id: i32) -> Result<(), CliError> {
    links.delete_link(id).await?;
    println!(
        "{} Deleted short link id {}",
        "✓".bold().green(),
        id.to_string().cyan()
    );
    Ok(())
}
