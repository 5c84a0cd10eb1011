//! Read command implementation

use anyhow::{Context, Result};
use diglib_client::RemoteClient;
use diglib_core::BookId;
use std::num::NonZeroU32;

/// Print one page of a book, with the page position on stderr
pub async fn read(
    client: &RemoteClient,
    id: &BookId,
    page: u32,
    page_size: NonZeroU32,
) -> Result<()> {
    let content = client
        .read_page(id, page, page_size)
        .await
        .with_context(|| format!("Failed to read page {} of book {}", page, id))?;

    println!("{}", content.content);

    let mut footer = format!("Page {} of {}", page + 1, content.total_pages);
    if let Some(reading_time) = &content.reading_time {
        footer.push_str(&format!(" | Reading time: {}", reading_time));
    }
    eprintln!("{}", footer);

    Ok(())
}
