//! Catalog and content handlers

use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use diglib_core::storage;
use diglib_core::{
    Book, BookId, BookListing, BookQuery, DiglibError, NewBook, PagedContent, SortDirection,
    ValidationError,
};
use serde::Deserialize;
use std::cmp::Ordering;
use std::num::NonZeroU32;

/// Field names accepted by `sortBy`
const SORT_FIELDS: &[&str] = &["id", "title", "author", "genre", "isbn", "year"];

/// List one page of the catalog, filtered and sorted
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> Result<Json<BookListing>, (StatusCode, String)> {
    if query.size == 0 {
        return Err((StatusCode::BAD_REQUEST, "Page size must be positive".to_string()));
    }
    if !SORT_FIELDS.contains(&query.sort_by.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Cannot sort by {}", query.sort_by),
        ));
    }
    tracing::info!("Listing books: {:?}", query);

    let catalog = state.catalog.read().await;
    let mut books: Vec<Book> = catalog
        .books
        .values()
        .filter(|book| query.matches(book))
        .cloned()
        .collect();

    books.sort_by(|a, b| {
        let ordering = compare_by(&query.sort_by, a, b);
        match query.sort_dir {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    let total_elements = books.len() as u64;
    let total_pages = total_elements.div_ceil(query.size as u64) as u32;
    let start = query.page as usize * query.size as usize;
    let content = books
        .into_iter()
        .skip(start)
        .take(query.size as usize)
        .collect();

    Ok(Json(BookListing {
        content,
        total_elements,
        total_pages,
        number: query.page,
        size: query.size,
    }))
}

fn compare_by(field: &str, a: &Book, b: &Book) -> Ordering {
    match field {
        "id" => a.id.cmp(&b.id),
        "author" => a.author.cmp(&b.author),
        "genre" => a.genre.cmp(&b.genre),
        "isbn" => a.isbn.cmp(&b.isbn),
        "year" => a.year.cmp(&b.year),
        _ => a.title.cmp(&b.title),
    }
}

/// Get one book's catalog entry
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Book>, StatusCode> {
    tracing::info!("Fetching book {}", id);

    let catalog = state.catalog.read().await;
    catalog
        .get(id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Query parameters of the content endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentQuery {
    #[serde(default)]
    pub page: u32,

    /// Characters per page; the configured default when absent
    pub page_size: Option<u32>,
}

/// Serve one page of a book's text
pub async fn get_book_content(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<ContentQuery>,
) -> Result<Json<PagedContent>, (StatusCode, String)> {
    let page_size = match query.page_size {
        Some(size) => NonZeroU32::new(size)
            .ok_or((StatusCode::BAD_REQUEST, "Page size must be positive".to_string()))?,
        None => state.config.page_size,
    };
    tracing::debug!("Content of book {}: page {} size {}", id, query.page, page_size);

    let file_name = {
        let catalog = state.catalog.read().await;
        let book = catalog
            .get(id)
            .ok_or((StatusCode::NOT_FOUND, format!("Book {} not found", id)))?;
        book.file_name.clone().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Book {} has no content", id),
        ))?
    };

    storage::read_stored_page(state.storage.as_ref(), &file_name, query.page, page_size)
        .await
        .map(Json)
        .map_err(|e| match e {
            DiglibError::Pagination(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            DiglibError::Storage(e) => {
                tracing::error!("Failed to read content of book {}: {}", id, e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        })
}

/// Fields collected from an upload form
#[derive(Debug, Default)]
struct UploadForm {
    title: Option<String>,
    author: Option<String>,
    genre: Option<String>,
    isbn: Option<String>,
    year: Option<String>,
    content: Option<String>,
}

impl UploadForm {
    fn into_parts(self) -> Result<(NewBook, String), ValidationError> {
        fn required(value: Option<String>, name: &str) -> Result<String, ValidationError> {
            value.ok_or_else(|| ValidationError::MissingField(name.to_string()))
        }

        let year = required(self.year, "year")?;
        let year = year
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidYear(year.clone()))?;
        let book = NewBook::new(
            required(self.title, "title")?,
            required(self.author, "author")?,
            required(self.genre, "genre")?,
            required(self.isbn, "isbn")?,
            year,
        );
        book.validate()?;

        let content = required(self.content, "content")?;
        if content.is_empty() {
            return Err(ValidationError::EmptyContent);
        }

        Ok((book, content))
    }
}

fn illegal_values(reason: impl std::fmt::Display) -> (StatusCode, String) {
    (
        StatusCode::BAD_REQUEST,
        format!("Illegal values provided: {}", reason),
    )
}

/// Add a book from a multipart form, answering `ID:<id>`
pub async fn upload_book(
    State(state): State<AppState>,
    mut multipart: axum_extra::extract::Multipart,
) -> Result<String, (StatusCode, String)> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(illegal_values)? {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await.map_err(illegal_values)?;

        match name.as_str() {
            "title" => form.title = Some(value),
            "author" => form.author = Some(value),
            "genre" => form.genre = Some(value),
            "isbn" => form.isbn = Some(value),
            "year" => form.year = Some(value),
            "content" => form.content = Some(value),
            other => tracing::debug!("Ignoring upload field {}", other),
        }
    }

    let (book, content) = form.into_parts().map_err(|e| {
        tracing::warn!("Rejected upload: {}", e);
        illegal_values(e)
    })?;

    let key = AppState::new_content_key();
    state
        .storage
        .put_text(&key, &content)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let book = state.catalog.write().await.insert(book, key.clone());

    if let Err(e) = state.save_catalog().await {
        if let BookId::Numeric(id) = book.id {
            state.catalog.write().await.books.remove(&id);
        }
        if let Err(e) = state.storage.remove(&key).await {
            tracing::warn!("Failed to remove content {} after failed upload: {}", key, e);
        }
        tracing::error!("Failed to save catalog after upload: {}", e);
        return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
    }

    tracing::info!("Added book {} \"{}\"", book.id, book.title);
    Ok(format!("ID:{}", book.id))
}

/// Delete a book and its content
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<(StatusCode, &'static str), (StatusCode, &'static str)> {
    let removed = state.catalog.write().await.books.remove(&id);
    let book = removed.ok_or((StatusCode::NOT_FOUND, "Book not found"))?;

    // Save the catalog before touching content; restore the entry if that fails
    if let Err(e) = state.save_catalog().await {
        state.catalog.write().await.books.insert(id, book);
        tracing::error!("Failed to save catalog after delete: {}", e);
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete book"));
    }

    if let Some(file_name) = &book.file_name {
        if let Err(e) = state.storage.remove(file_name).await {
            tracing::warn!("Failed to remove content of book {}: {}", id, e);
        }
    }

    tracing::info!("Deleted book {}", id);
    Ok((StatusCode::OK, "Book deleted successfully"))
}

/// Genres the catalog accepts
pub async fn list_genres(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.genres.as_ref().clone())
}
