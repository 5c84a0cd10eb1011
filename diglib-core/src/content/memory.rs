//! In-process page fetcher (for testing)

use super::pagination;
use super::PageFetcher;
use crate::error::{FailureReason, PageFetchFailure};
use crate::types::{BookId, Page, PageKey};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroU32;
use std::sync::{Mutex, PoisonError};

/// Serves pages of in-memory texts with the same arithmetic as the server
/// and records every request it receives
#[derive(Default)]
pub struct MemoryPageFetcher {
    books: HashMap<BookId, String>,
    failing_pages: HashSet<u32>,
    requests: Mutex<Vec<PageKey>>,
}

impl MemoryPageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a book's text
    pub fn with_book(mut self, id: impl Into<BookId>, text: impl Into<String>) -> Self {
        self.books.insert(id.into(), text.into());
        self
    }

    /// Make every request for `page_index` fail
    pub fn with_failing_page(mut self, page_index: u32) -> Self {
        self.failing_pages.insert(page_index);
        self
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<PageKey> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl PageFetcher for MemoryPageFetcher {
    async fn fetch_page(
        &self,
        book_id: &BookId,
        page_index: u32,
        page_size: NonZeroU32,
    ) -> Result<Page, PageFetchFailure> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(PageKey::new(book_id.clone(), page_index, page_size));

        let fail = |reason| PageFetchFailure::new(book_id, page_index, page_size.get(), reason);

        if self.failing_pages.contains(&page_index) {
            return Err(fail(FailureReason::Transport("connection reset".to_string())));
        }

        let text = self
            .books
            .get(book_id)
            .ok_or_else(|| fail(FailureReason::NotFound))?;

        pagination::read_page(text, page_index, page_size)
            .map(Page::from)
            .map_err(|_| fail(FailureReason::OutOfRange))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_fetcher() {
        let fetcher = MemoryPageFetcher::new().with_book(1u64, "hello world");
        let size = NonZeroU32::new(5).unwrap();
        let id = BookId::Numeric(1);

        let page = fetcher.fetch_page(&id, 1, size).await.unwrap();
        assert_eq!(page.content, " worl");
        assert_eq!(page.total_pages, 3);

        let missing = fetcher.fetch_page(&BookId::Numeric(2), 0, size).await;
        assert_eq!(missing.unwrap_err().reason, FailureReason::NotFound);

        let past_end = fetcher.fetch_page(&id, 3, size).await;
        assert_eq!(past_end.unwrap_err().reason, FailureReason::OutOfRange);

        assert_eq!(fetcher.request_count(), 3);
    }
}
