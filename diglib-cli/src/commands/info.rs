//! Info command implementation

use anyhow::{Context, Result};
use diglib_client::RemoteClient;
use diglib_core::BookId;

/// Display a book's catalog entry
pub async fn info(client: &RemoteClient, id: &BookId, json: bool) -> Result<()> {
    let book = client
        .get_book(id)
        .await?
        .with_context(|| format!("Book {} not found", id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&book)?);
    } else {
        println!("{}", book.metadata());
    }

    Ok(())
}
