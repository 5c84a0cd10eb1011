//! Catalog listing request and response

use super::Book;
use serde::{Deserialize, Serialize};

/// Sort direction for catalog listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Query parameters of `GET /books`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookQuery {
    /// Zero-based listing page
    #[serde(default)]
    pub page: u32,

    /// Books per listing page
    #[serde(default = "default_size")]
    pub size: u32,

    #[serde(default = "default_sort_by")]
    pub sort_by: String,

    #[serde(default)]
    pub sort_dir: SortDirection,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

fn default_size() -> u32 {
    10
}

fn default_sort_by() -> String {
    "title".to_string()
}

impl Default for BookQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: default_size(),
            sort_by: default_sort_by(),
            sort_dir: SortDirection::Asc,
            title: None,
            author: None,
            genre: None,
        }
    }
}

/// Field a listing is filtered on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Title,
    Author,
    Genre,
}

impl BookQuery {
    /// The filter in effect: title, then author, then genre
    pub fn filter(&self) -> Option<(FilterField, &str)> {
        if let Some(title) = &self.title {
            Some((FilterField::Title, title))
        } else if let Some(author) = &self.author {
            Some((FilterField::Author, author))
        } else {
            self.genre.as_deref().map(|g| (FilterField::Genre, g))
        }
    }

    /// Case-insensitive substring match against the active filter
    pub fn matches(&self, book: &Book) -> bool {
        let Some((field, needle)) = self.filter() else {
            return true;
        };
        let haystack = match field {
            FilterField::Title => &book.title,
            FilterField::Author => &book.author,
            FilterField::Genre => &book.genre,
        };
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// One page of the catalog listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookListing {
    pub content: Vec<Book>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BookId;

    fn book(title: &str, author: &str, genre: &str) -> Book {
        Book {
            id: BookId::Numeric(1),
            title: title.to_string(),
            author: author.to_string(),
            year: 2000,
            genre: genre.to_string(),
            isbn: "1234567890123".to_string(),
            file_name: None,
        }
    }

    #[test]
    fn test_filter_precedence() {
        let query = BookQuery {
            author: Some("austen".to_string()),
            genre: Some("horror".to_string()),
            ..Default::default()
        };
        assert_eq!(query.filter(), Some((FilterField::Author, "austen")));
        assert!(query.matches(&book("Emma", "Jane Austen", "Romance")));
        assert!(!query.matches(&book("Dracula", "Bram Stoker", "Horror")));
    }

    #[test]
    fn test_query_serializes_camel_case() {
        let query = BookQuery {
            sort_dir: SortDirection::Desc,
            title: Some("dune".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["sortBy"], "title");
        assert_eq!(json["sortDir"], "desc");
        assert!(json.get("author").is_none());
    }
}
