//! Page records exchanged with the content endpoint

use super::BookId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// Average word length used for reading-time estimates
const CHARS_PER_WORD: u64 = 5;

/// Average reading speed used for reading-time estimates
const WORDS_PER_MINUTE: u64 = 183;

/// Estimated reading time of a whole book.
///
/// Servers report it either as a number of minutes or as preformatted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadingTime {
    Minutes(f64),
    Text(String),
}

impl ReadingTime {
    /// Estimate from the character count of the full text
    pub fn estimate(total_chars: u64) -> Self {
        let minutes = total_chars / CHARS_PER_WORD / WORDS_PER_MINUTE;
        ReadingTime::Text(format!("{} hours, {} minutes", minutes / 60, minutes % 60))
    }
}

impl fmt::Display for ReadingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingTime::Minutes(m) => write!(f, "{} minutes", m),
            ReadingTime::Text(s) => f.write_str(s),
        }
    }
}

/// One page of a book as seen by a reader.
///
/// `total_pages` and `reading_time` describe the whole book at the
/// requested page size, not this page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub content: String,
    pub total_pages: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<ReadingTime>,
}

/// Full page record served by the content endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedContent {
    /// Text of this page
    pub content: String,

    /// Zero-based index of this page
    pub page_number: u32,

    /// Pages in the book at this page size
    pub total_pages: u32,

    /// Characters in this page
    pub page_size: u32,

    /// Characters in the whole book
    pub total_size: u64,

    pub reading_time: String,
}

impl PagedContent {
    pub fn new(
        content: String,
        page_number: u32,
        total_pages: u32,
        page_size: u32,
        total_size: u64,
    ) -> Self {
        Self {
            content,
            page_number,
            total_pages,
            page_size,
            total_size,
            reading_time: ReadingTime::estimate(total_size).to_string(),
        }
    }
}

impl From<PagedContent> for Page {
    fn from(paged: PagedContent) -> Self {
        Self {
            content: paged.content,
            total_pages: paged.total_pages,
            reading_time: Some(ReadingTime::Text(paged.reading_time)),
        }
    }
}

/// The only address a page has
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub book_id: BookId,
    pub page_index: u32,
    pub page_size: NonZeroU32,
}

impl PageKey {
    pub fn new(book_id: BookId, page_index: u32, page_size: NonZeroU32) -> Self {
        Self {
            book_id,
            page_index,
            page_size,
        }
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}@{}]",
            self.book_id, self.page_index, self.page_size
        )
    }
}
