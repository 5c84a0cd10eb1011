//! Catalog listing, genres and deletion

use anyhow::{bail, Result};
use diglib_client::RemoteClient;
use diglib_core::{BookId, BookQuery};

/// Print one page of the catalog
pub async fn list(client: &RemoteClient, query: &BookQuery, json: bool) -> Result<()> {
    let listing = client.list_books(query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if listing.content.is_empty() {
        println!("No books found");
        return Ok(());
    }

    for book in &listing.content {
        println!(
            "{:>6}  {:<40}  {:<25}  {:>5}  {}",
            book.id, book.title, book.author, book.year, book.genre
        );
    }
    println!(
        "Page {} of {} ({} books)",
        listing.number + 1,
        listing.total_pages.max(1),
        listing.total_elements
    );

    Ok(())
}

/// Print the genres the catalog accepts
pub async fn genres(client: &RemoteClient) -> Result<()> {
    for genre in client.genres().await? {
        println!("{}", genre);
    }
    Ok(())
}

/// Delete a book
pub async fn delete(client: &RemoteClient, id: &BookId) -> Result<()> {
    if !client.delete_book(id).await? {
        bail!("Book {} not found", id);
    }
    println!("Deleted book {}", id);
    Ok(())
}
