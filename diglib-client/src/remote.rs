//! REST client for the DigLib API

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use diglib_core::{
    Book, BookId, BookListing, BookQuery, FailureReason, NewBook, Page, PageFetchFailure,
    PageFetcher,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode, Url};
use std::num::NonZeroU32;

/// Prefix of the body returned by a successful upload
const UPLOAD_ID_PREFIX: &str = "ID:";

/// Client for the catalog and paging endpoints.
///
/// Every call is a single request; nothing is retried or cached. The client
/// also serves as the remote [`PageFetcher`] for document reconstruction.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RemoteClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.parsed_base_url()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Client for `base_url` with default settings
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(&ClientConfig::new(base_url))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL by appending path segments to the base URL
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("cannot append to {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// List one page of the catalog
    pub async fn list_books(&self, query: &BookQuery) -> Result<BookListing> {
        let url = self.endpoint(&["books"])?;
        tracing::debug!("GET {} {:?}", url, query);

        let response = self.http.get(url).query(query).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    /// Fetch one book's catalog entry, `None` if it does not exist
    pub async fn get_book(&self, id: &BookId) -> Result<Option<Book>> {
        let url = self.endpoint(&["books", &id.to_string()])?;
        tracing::debug!("GET {}", url);

        let response = self.http.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(check_status(response).await?.json().await?))
    }

    /// Delete a book, `false` if it did not exist
    pub async fn delete_book(&self, id: &BookId) -> Result<bool> {
        let url = self.endpoint(&["books", &id.to_string()])?;
        tracing::debug!("DELETE {}", url);

        let response = self.http.delete(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        check_status(response).await?;

        tracing::info!("Deleted book {}", id);
        Ok(true)
    }

    /// Upload a new book with its text, returning the id the catalog assigned
    pub async fn upload_book(
        &self,
        book: &NewBook,
        content: impl Into<String>,
        file_name: &str,
    ) -> Result<BookId> {
        book.validate()?;

        let content_part = Part::text(content.into())
            .file_name(file_name.to_string())
            .mime_str(diglib_core::export::EXPORT_MIME_TYPE)?;
        let form = Form::new()
            .text("title", book.title.clone())
            .text("author", book.author.clone())
            .text("genre", book.genre.clone())
            .text("isbn", book.isbn.clone())
            .text("year", book.year.to_string())
            .part("content", content_part);

        let url = self.endpoint(&["books"])?;
        tracing::debug!("POST {} ({})", url, file_name);

        let response = self.http.post(url).multipart(form).send().await?;
        let body = check_status(response).await?.text().await?;
        let id = parse_upload_id(&body)?;

        tracing::info!("Uploaded \"{}\" as book {}", book.title, id);
        Ok(id)
    }

    /// Genres the catalog accepts
    pub async fn genres(&self) -> Result<Vec<String>> {
        let url = self.endpoint(&["genres"])?;
        tracing::debug!("GET {}", url);

        let response = self.http.get(url).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    /// Fetch one page of a book's text
    pub async fn read_page(
        &self,
        id: &BookId,
        page_index: u32,
        page_size: NonZeroU32,
    ) -> Result<Page> {
        let url = self.endpoint(&["books", &id.to_string(), "content"])?;
        tracing::debug!("GET {} page={} pageSize={}", url, page_index, page_size);

        let response = self
            .http
            .get(url)
            .query(&[("page", page_index), ("pageSize", page_size.get())])
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }
}

#[async_trait]
impl PageFetcher for RemoteClient {
    async fn fetch_page(
        &self,
        book_id: &BookId,
        page_index: u32,
        page_size: NonZeroU32,
    ) -> std::result::Result<Page, PageFetchFailure> {
        self.read_page(book_id, page_index, page_size)
            .await
            .map_err(|e| {
                PageFetchFailure::new(book_id, page_index, page_size.get(), failure_reason(&e))
            })
    }
}

/// Turn a non-success response into [`ClientError::Status`]
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!("Request failed with {}: {}", status, body);
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

fn failure_reason(error: &ClientError) -> FailureReason {
    match error {
        ClientError::Status { status: 404, .. } => FailureReason::NotFound,
        ClientError::Status { status: 400, .. } => FailureReason::OutOfRange,
        ClientError::Status { status, .. } => FailureReason::Status(*status),
        ClientError::Http(e) if e.is_decode() => FailureReason::Decode(e.to_string()),
        other => FailureReason::Transport(other.to_string()),
    }
}

fn parse_upload_id(body: &str) -> Result<BookId> {
    body.trim()
        .strip_prefix(UPLOAD_ID_PREFIX)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(BookId::from)
        .ok_or_else(|| ClientError::UnexpectedResponse(format!("upload returned {:?}", body)))
}
