//! Paged book content: fetching single pages and rebuilding whole books

mod memory;
pub mod pagination;
mod reconstruct;

pub use memory::MemoryPageFetcher;
pub use reconstruct::{
    reconstruct_document, CancellationToken, DocumentReconstructor, ReconstructedDocument,
    ReconstructionState,
};

use crate::error::PageFetchFailure;
use crate::types::{BookId, Page};
use async_trait::async_trait;
use std::num::NonZeroU32;
use std::sync::Arc;

/// Page size used when reading a book one screen at a time
pub const READ_PAGE_SIZE: NonZeroU32 = match NonZeroU32::new(1_000) {
    Some(size) => size,
    None => unreachable!(),
};

/// Page size used when downloading a whole book
pub const EXPORT_PAGE_SIZE: NonZeroU32 = match NonZeroU32::new(1_000_000) {
    Some(size) => size,
    None => unreachable!(),
};

/// Source of single pages of a book.
///
/// Implementations must be idempotent: asking twice for the same page with
/// nothing changed in between returns the same content. Every kind of
/// failure is reported as a [`PageFetchFailure`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch page `page_index` (zero-based) of a book cut into pages of
    /// `page_size` characters
    async fn fetch_page(
        &self,
        book_id: &BookId,
        page_index: u32,
        page_size: NonZeroU32,
    ) -> Result<Page, PageFetchFailure>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch_page(
        &self,
        book_id: &BookId,
        page_index: u32,
        page_size: NonZeroU32,
    ) -> Result<Page, PageFetchFailure> {
        (**self).fetch_page(book_id, page_index, page_size).await
    }
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Box<T> {
    async fn fetch_page(
        &self,
        book_id: &BookId,
        page_index: u32,
        page_size: NonZeroU32,
    ) -> Result<Page, PageFetchFailure> {
        (**self).fetch_page(book_id, page_index, page_size).await
    }
}
