//! List links command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::LinkService;

pub async fn list_links(
    links: &LinkService,
    page: u64,
    page_size: u64,
    search: Option<&str>,
) -> Result<(), CliError> {
    let listing = links
        .list_links(Some(page), Some(page_size), search)
        .await
        .map_err(|e| CliError::StorageError(format!("Failed to load links: {}", e.message())))?;

    if listing.items.is_empty() {
        println!("{} No short links found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Short link list:".bold().green());
    println!();
    for mapping in &listing.items {
        println!(
            "  {} {} -> {} {}",
            format!("#{}", mapping.id).dimmed(),
            mapping.short_path.cyan(),
            mapping.long_url.blue().underline(),
            mapping
                .created_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string()
                .dimmed()
        );
    }
    println!();
    println!(
        "{} Page {} of {}, total {} short links",
        "ℹ".bold().blue(),
        listing.page,
        listing.total_pages,
        listing.total_items.to_string().green()
    );
    Ok(())
}
