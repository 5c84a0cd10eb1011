//! Core types shared by the client, the server and the CLI

mod book;
mod catalog;
mod page;

pub use book::{Book, BookId, NewBook, ISBN_LEN, MAX_FIELD_LEN};
pub use catalog::{BookListing, BookQuery, FilterField, SortDirection};
pub use page::{Page, PageKey, PagedContent, ReadingTime};
