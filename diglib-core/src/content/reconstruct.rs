//! Rebuilding a whole book from sequential page requests
//!
//! Pages are requested strictly one at a time in increasing order. The
//! first failure ends the session and discards everything fetched so far;
//! there is no partial result and no retry.

use super::PageFetcher;
use crate::error::ReconstructionError;
use crate::types::{BookId, ReadingTime};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Upper bound on pages preallocated from a server-reported count
const MAX_PREALLOCATED_PAGES: usize = 1024;

/// Shared flag that stops a reconstruction before its next page request
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Where a reconstruction session is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconstructionState {
    Idle,
    FetchingFirstPage,
    /// `fetched` pages are in hand and page `fetched` is being requested
    FetchingRemainingPages {
        fetched: u32,
        total_pages: u32,
    },
    Failed,
    Complete {
        total_pages: u32,
    },
}

impl ReconstructionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReconstructionState::Failed | ReconstructionState::Complete { .. }
        )
    }
}

/// Every page of a book, in order
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructedDocument {
    pages: Vec<String>,
    total_pages: u32,
    reading_time: Option<ReadingTime>,
}

impl ReconstructedDocument {
    /// Page contents, index 0 first
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// Page count reported with the first page
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Reading time reported with the first page
    pub fn reading_time(&self) -> Option<&ReadingTime> {
        self.reading_time.as_ref()
    }

    pub fn into_pages(self) -> Vec<String> {
        self.pages
    }

    /// The full text: all pages joined with nothing in between
    pub fn text(&self) -> String {
        self.pages.concat()
    }
}

type StateObserver<'a> = Box<dyn Fn(&ReconstructionState) + Send + Sync + 'a>;

/// Fetches every page of a book through a [`PageFetcher`]
pub struct DocumentReconstructor<'a, F: ?Sized> {
    fetcher: &'a F,
    cancellation: Option<CancellationToken>,
    observer: Option<StateObserver<'a>>,
}

impl<'a, F: PageFetcher + ?Sized> DocumentReconstructor<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self {
            fetcher,
            cancellation: None,
            observer: None,
        }
    }

    /// Check `token` before every page request
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Call `observer` on every state transition
    pub fn on_state_change(
        mut self,
        observer: impl Fn(&ReconstructionState) + Send + Sync + 'a,
    ) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Fetch pages `0..total_pages` and collect their contents.
    ///
    /// `total_pages` is read from page 0 only; what later pages report is
    /// ignored.
    pub async fn reconstruct(
        &self,
        book_id: &BookId,
        page_size: NonZeroU32,
    ) -> Result<ReconstructedDocument, ReconstructionError> {
        let result = self.fetch_all(book_id, page_size).await;

        match &result {
            Ok(document) => {
                self.enter(ReconstructionState::Complete {
                    total_pages: document.total_pages,
                });
                tracing::info!(
                    %book_id,
                    page_size = page_size.get(),
                    pages = document.pages.len(),
                    "Reconstructed book"
                );
            }
            Err(e) => {
                self.enter(ReconstructionState::Failed);
                tracing::warn!(
                    %book_id,
                    page_size = page_size.get(),
                    "Reconstruction failed: {}",
                    e
                );
            }
        }

        result
    }

    async fn fetch_all(
        &self,
        book_id: &BookId,
        page_size: NonZeroU32,
    ) -> Result<ReconstructedDocument, ReconstructionError> {
        self.check_cancelled(0)?;
        self.enter(ReconstructionState::FetchingFirstPage);

        let first = self.fetcher.fetch_page(book_id, 0, page_size).await?;
        let total_pages = first.total_pages;

        let mut pages =
            Vec::with_capacity((total_pages as usize).clamp(1, MAX_PREALLOCATED_PAGES));
        pages.push(first.content);

        for page_index in 1..total_pages {
            self.enter(ReconstructionState::FetchingRemainingPages {
                fetched: page_index,
                total_pages,
            });
            self.check_cancelled(page_index)?;

            let page = self.fetcher.fetch_page(book_id, page_index, page_size).await?;
            pages.push(page.content);
        }

        Ok(ReconstructedDocument {
            pages,
            total_pages,
            reading_time: first.reading_time,
        })
    }

    fn enter(&self, state: ReconstructionState) {
        tracing::debug!(?state, "Reconstruction state");
        if let Some(observer) = &self.observer {
            observer(&state);
        }
    }

    fn check_cancelled(&self, next_page: u32) -> Result<(), ReconstructionError> {
        match &self.cancellation {
            Some(token) if token.is_cancelled() => {
                Err(ReconstructionError::Cancelled { next_page })
            }
            _ => Ok(()),
        }
    }
}

/// Fetch every page of a book.
///
/// Returns the page contents in order, or an empty vector if any request
/// failed. An empty vector always means failure, never an empty book.
pub async fn reconstruct_document<F: PageFetcher + ?Sized>(
    fetcher: &F,
    book_id: &BookId,
    page_size: NonZeroU32,
) -> Vec<String> {
    DocumentReconstructor::new(fetcher)
        .reconstruct(book_id, page_size)
        .await
        .map(ReconstructedDocument::into_pages)
        .unwrap_or_default()
}
