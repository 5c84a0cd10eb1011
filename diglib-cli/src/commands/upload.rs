//! Upload command implementation

use anyhow::{Context, Result};
use diglib_client::RemoteClient;
use diglib_core::NewBook;
use std::path::Path;

/// Add a book to the catalog from a text file
pub async fn upload(client: &RemoteClient, file: &Path, book: NewBook) -> Result<()> {
    book.validate().context("Invalid book details")?;

    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {:?}", file))?;
    let file_name = file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("book.txt");

    let id = client
        .upload_book(&book, content, file_name)
        .await
        .with_context(|| format!("Failed to upload '{}'", book.title))?;

    println!("Uploaded '{}' as book {}", book.title, id);
    Ok(())
}
