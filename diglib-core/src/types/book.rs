//! Catalog entries and the upload payload

use crate::error::ValidationError;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest accepted title or author, in characters
pub const MAX_FIELD_LEN: usize = 100;

/// Length of a valid ISBN
pub const ISBN_LEN: usize = 13;

/// Opaque book identifier.
///
/// The catalog hands out integers, but any string id is accepted so the
/// client can talk to stores that use other schemes. A string holding an
/// integer is read as that integer, on the wire as well as through `From`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum BookId {
    Numeric(u64),
    Named(String),
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookId::Numeric(n) => write!(f, "{}", n),
            BookId::Named(s) => f.write_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for BookId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Numeric(u64),
            Named(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Numeric(id) => BookId::Numeric(id),
            Raw::Named(id) => BookId::from(id),
        })
    }
}

impl From<u64> for BookId {
    fn from(id: u64) -> Self {
        BookId::Numeric(id)
    }
}

impl From<&str> for BookId {
    fn from(id: &str) -> Self {
        id.parse::<u64>()
            .map(BookId::Numeric)
            .unwrap_or_else(|_| BookId::Named(id.to_string()))
    }
}

impl From<String> for BookId {
    fn from(id: String) -> Self {
        BookId::from(id.as_str())
    }
}

impl std::str::FromStr for BookId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(BookId::from(s))
    }
}

/// A catalogued book as returned by the REST API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    pub isbn: String,

    /// Name of the stored content file, if the server exposes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl Book {
    /// Metadata block shown next to the reader
    pub fn metadata(&self) -> String {
        format!(
            "Title: {}\nAuthor: {}\nGenre: {}\nISBN: {}\nYear: {}",
            self.title, self.author, self.genre, self.isbn, self.year
        )
    }
}

/// Fields submitted when adding a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub isbn: String,
    pub year: i32,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        isbn: impl Into<String>,
        year: i32,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            isbn: isbn.into(),
            year,
        }
    }

    /// Check every field, reporting the first violation
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.title.chars().count() > MAX_FIELD_LEN {
            return Err(ValidationError::TitleTooLong { max: MAX_FIELD_LEN });
        }
        if self.author.is_empty() {
            return Err(ValidationError::EmptyAuthor);
        }
        if self.author.chars().count() > MAX_FIELD_LEN {
            return Err(ValidationError::AuthorTooLong { max: MAX_FIELD_LEN });
        }
        if self.isbn.len() != ISBN_LEN || !self.isbn.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidIsbn);
        }
        let max_year = chrono::Utc::now().year();
        if !(0..=max_year).contains(&self.year) {
            return Err(ValidationError::YearOutOfRange { max: max_year });
        }
        Ok(())
    }

    /// Attach an id once the catalog has accepted the book
    pub fn into_book(self, id: BookId, file_name: Option<String>) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            year: self.year,
            genre: self.genre,
            isbn: self.isbn,
            file_name,
        }
    }
}
