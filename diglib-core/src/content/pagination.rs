//! Character-based paging of a book's text
//!
//! Pages are counted in Unicode scalar values, so a page never splits a
//! character and joining every page in order gives back the exact input.

use crate::error::PaginationError;
use crate::types::PagedContent;
use std::num::NonZeroU32;

/// Number of pages needed for `total_chars` characters
pub fn page_count(total_chars: usize, page_size: NonZeroU32) -> u32 {
    let pages = total_chars.div_ceil(page_size.get() as usize);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Slice one page out of `text`
pub fn read_page(
    text: &str,
    page_number: u32,
    page_size: NonZeroU32,
) -> Result<PagedContent, PaginationError> {
    let total_chars = text.chars().count();
    let total_pages = page_count(total_chars, page_size);

    if page_number >= total_pages {
        return Err(PaginationError::OutOfRange {
            page_number,
            total_pages,
        });
    }

    let size = page_size.get() as usize;
    let start = page_number as usize * size;
    let content: String = text.chars().skip(start).take(size).collect();
    let len = content.chars().count() as u32;

    Ok(PagedContent::new(
        content,
        page_number,
        total_pages,
        len,
        total_chars as u64,
    ))
}
