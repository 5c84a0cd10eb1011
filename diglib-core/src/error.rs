//! Error types for DigLib Core

use crate::types::BookId;
use thiserror::Error;

/// Result type alias using DiglibError
pub type Result<T> = std::result::Result<T, DiglibError>;

/// Errors from serving stored book content
#[derive(Debug, Error)]
pub enum DiglibError {
    #[error("Pagination error: {0}")]
    Pagination(#[from] PaginationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// The single failure signal of a page request.
///
/// The reason is kept for logs and diagnostics only. Callers must treat
/// every reason the same way.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("page {page_index} of book {book_id} (page size {page_size}): {reason}")]
pub struct PageFetchFailure {
    pub book_id: BookId,
    pub page_index: u32,
    pub page_size: u32,
    pub reason: FailureReason,
}

impl PageFetchFailure {
    pub fn new(book_id: &BookId, page_index: u32, page_size: u32, reason: FailureReason) -> Self {
        Self {
            book_id: book_id.clone(),
            page_index,
            page_size,
            reason,
        }
    }
}

/// Why a page request failed
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FailureReason {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("book not found")]
    NotFound,

    #[error("page out of range")]
    OutOfRange,

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("malformed page: {0}")]
    Decode(String),
}

/// Errors that end a reconstruction session
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReconstructionError {
    #[error("{0}")]
    PageFetch(#[from] PageFetchFailure),

    #[error("Cancelled before page {next_page}")]
    Cancelled { next_page: u32 },
}

/// Errors from slicing a text into pages
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("Invalid page number {page_number} (document has {total_pages} pages)")]
    OutOfRange { page_number: u32, total_pages: u32 },
}

/// Rejected book fields
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Title must be less than {max} characters")]
    TitleTooLong { max: usize },

    #[error("Author cannot be empty")]
    EmptyAuthor,

    #[error("Author must be less than {max} characters")]
    AuthorTooLong { max: usize },

    #[error("ISBN must be 13 digits")]
    InvalidIsbn,

    #[error("Year must be between 0 and {max}")]
    YearOutOfRange { max: i32 },

    #[error("Year is not a number: {0}")]
    InvalidYear(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Book content cannot be empty")]
    EmptyContent,
}

/// Errors that occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Content is not valid UTF-8: {0}")]
    InvalidText(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}
