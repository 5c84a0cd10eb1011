//! DigLib Core Library
//!
//! Types and logic shared by the DigLib client, server and CLI. Book text
//! is too large to move in one request, so it travels as pages; this crate
//! defines the page contract ([`content::PageFetcher`]), rebuilds whole
//! books from their pages ([`content::DocumentReconstructor`]) and writes
//! the plain-text export.

pub mod content;
pub mod error;
pub mod export;
pub mod storage;
pub mod types;

pub use content::{
    reconstruct_document, CancellationToken, DocumentReconstructor, MemoryPageFetcher,
    PageFetcher, ReconstructedDocument, ReconstructionState, EXPORT_PAGE_SIZE, READ_PAGE_SIZE,
};
pub use error::{
    DiglibError, FailureReason, PageFetchFailure, PaginationError, ReconstructionError, Result,
    StorageError, ValidationError,
};
pub use types::{
    Book, BookId, BookListing, BookQuery, NewBook, Page, PageKey, PagedContent, ReadingTime,
    SortDirection,
};
