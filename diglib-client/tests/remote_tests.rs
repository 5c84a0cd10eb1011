//! HTTP tests for the DigLib client against a mock server

use anyhow::Result;
use diglib_client::{ClientError, RemoteClient};
use diglib_core::{
    reconstruct_document, BookId, BookQuery, DocumentReconstructor, FailureReason, NewBook,
    PageFetcher, ReadingTime, SortDirection,
};
use httpmock::prelude::*;
use serde_json::json;
use std::num::NonZeroU32;

fn page_size(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
}

fn client(server: &MockServer) -> RemoteClient {
    RemoteClient::with_base_url(server.base_url()).unwrap()
}

// =============================================================================
// Paging
// =============================================================================

#[tokio::test]
async fn test_reconstruct_two_pages() -> Result<()> {
    let server = MockServer::start_async().await;
    let page0 = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/books/1/content")
                .query_param("page", "0")
                .query_param("pageSize", "1000000");
            then.status(200)
                .json_body(json!({"content": "Hello, ", "totalPages": 2, "readingTime": 5}));
        })
        .await;
    let page1 = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/books/1/content")
                .query_param("page", "1")
                .query_param("pageSize", "1000000");
            then.status(200)
                .json_body(json!({"content": "world!", "totalPages": 2, "readingTime": 5}));
        })
        .await;

    let client = client(&server);
    let document = DocumentReconstructor::new(&client)
        .reconstruct(&BookId::Numeric(1), page_size(1_000_000))
        .await?;

    assert_eq!(document.pages(), ["Hello, ", "world!"]);
    assert_eq!(document.text(), "Hello, world!");
    assert_eq!(document.reading_time(), Some(&ReadingTime::Minutes(5.0)));
    page0.assert_hits_async(1).await;
    page1.assert_hits_async(1).await;
    Ok(())
}

#[tokio::test]
async fn test_first_page_failure_makes_one_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/books/9/content");
            then.status(404);
        })
        .await;

    let pages = reconstruct_document(&client(&server), &BookId::Numeric(9), page_size(1000)).await;

    assert!(pages.is_empty());
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_later_page_failure_discards_progress() {
    let server = MockServer::start_async().await;
    let page0 = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/books/3/content")
                .query_param("page", "0");
            then.status(200)
                .json_body(json!({"content": "A", "totalPages": 3, "readingTime": 1}));
        })
        .await;
    let page1 = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/books/3/content")
                .query_param("page", "1");
            then.status(500).body("boom");
        })
        .await;
    let page2 = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/books/3/content")
                .query_param("page", "2");
            then.status(200)
                .json_body(json!({"content": "C", "totalPages": 3, "readingTime": 1}));
        })
        .await;

    let pages = reconstruct_document(&client(&server), &BookId::Numeric(3), page_size(1)).await;

    assert!(pages.is_empty());
    page0.assert_hits_async(1).await;
    page1.assert_hits_async(1).await;
    page2.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_fetch_page_failure_reasons() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/books/5/content");
            then.status(400).body("page out of range");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/books/6/content");
            then.status(200).body("not json");
        })
        .await;

    let client = client(&server);

    let out_of_range = client
        .fetch_page(&BookId::Numeric(5), 10, page_size(1000))
        .await
        .unwrap_err();
    assert_eq!(out_of_range.reason, FailureReason::OutOfRange);
    assert_eq!(out_of_range.page_index, 10);

    let garbled = client
        .fetch_page(&BookId::Numeric(6), 0, page_size(1000))
        .await
        .unwrap_err();
    assert!(matches!(garbled.reason, FailureReason::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_failure() {
    let client = RemoteClient::with_base_url("http://127.0.0.1:1").unwrap();

    let failure = client
        .fetch_page(&BookId::Numeric(1), 0, page_size(10))
        .await
        .unwrap_err();

    assert!(matches!(failure.reason, FailureReason::Transport(_)));
}

#[tokio::test]
async fn test_read_page_accepts_server_record() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/books/2/content");
            then.status(200).json_body(json!({
                "content": "abc",
                "pageNumber": 0,
                "totalPages": 4,
                "pageSize": 3,
                "totalSize": 10,
                "readingTime": "0 hours, 0 minutes"
            }));
        })
        .await;

    let page = client(&server)
        .read_page(&BookId::Numeric(2), 0, page_size(3))
        .await?;

    assert_eq!(page.content, "abc");
    assert_eq!(page.total_pages, 4);
    assert_eq!(
        page.reading_time,
        Some(ReadingTime::Text("0 hours, 0 minutes".to_string()))
    );
    Ok(())
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_list_books_sends_query() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/books")
                .query_param("page", "1")
                .query_param("size", "5")
                .query_param("sortBy", "year")
                .query_param("sortDir", "desc")
                .query_param("author", "austen");
            then.status(200).json_body(json!({
                "content": [{
                    "id": 4,
                    "title": "Emma",
                    "author": "Jane Austen",
                    "year": 1815,
                    "genre": "Romance",
                    "isbn": "9780141439587"
                }],
                "totalElements": 6,
                "totalPages": 2,
                "number": 1,
                "size": 5,
                "pageable": {"pageNumber": 1}
            }));
        })
        .await;

    let query = BookQuery {
        page: 1,
        size: 5,
        sort_by: "year".to_string(),
        sort_dir: SortDirection::Desc,
        author: Some("austen".to_string()),
        ..Default::default()
    };
    let listing = client(&server).list_books(&query).await?;

    mock.assert_async().await;
    assert_eq!(listing.total_elements, 6);
    assert_eq!(listing.content.len(), 1);
    assert_eq!(listing.content[0].id, BookId::Numeric(4));
    Ok(())
}

#[tokio::test]
async fn test_get_book() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/books/4");
            then.status(200).json_body(json!({
                "id": 4,
                "title": "Emma",
                "author": "Jane Austen",
                "year": 1815,
                "genre": "Romance",
                "isbn": "9780141439587"
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/books/5");
            then.status(404);
        })
        .await;

    let client = client(&server);
    let book = client.get_book(&BookId::Numeric(4)).await?;
    assert_eq!(book.map(|b| b.title), Some("Emma".to_string()));
    assert!(client.get_book(&BookId::Numeric(5)).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_delete_book() -> Result<()> {
    let server = MockServer::start_async().await;
    let deleted = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/books/4");
            then.status(200).body("Book deleted successfully");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/books/5");
            then.status(404).body("Book not found");
        })
        .await;

    let client = client(&server);
    assert!(client.delete_book(&BookId::Numeric(4)).await?);
    assert!(!client.delete_book(&BookId::Numeric(5)).await?);
    deleted.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_upload_book() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/books")
                .body_contains("name=\"title\"")
                .body_contains("Dune")
                .body_contains("name=\"content\"; filename=\"dune.txt\"")
                .body_contains("A beginning is the time");
            then.status(200).body("ID:12");
        })
        .await;

    let book = NewBook::new("Dune", "Frank Herbert", "Science Fiction", "9780441013593", 1965);
    let id = client(&server)
        .upload_book(&book, "A beginning is the time", "dune.txt")
        .await?;

    assert_eq!(id, BookId::Numeric(12));
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_upload_rejects_invalid_book_locally() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/books");
            then.status(200).body("ID:1");
        })
        .await;

    let book = NewBook::new("", "Nobody", "Poetry", "123", 1900);
    let result = client(&server).upload_book(&book, "text", "a.txt").await;

    assert!(matches!(result, Err(ClientError::Validation(_))));
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_upload_rejected_by_server() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/books");
            then.status(400).body("Illegal values for fields");
        })
        .await;

    let book = NewBook::new("Dune", "Frank Herbert", "Science Fiction", "9780441013593", 1965);
    let err = client(&server)
        .upload_book(&book, "text", "dune.txt")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_genres() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/genres");
            then.status(200).json_body(json!(["Fantasy", "Horror"]));
        })
        .await;

    let genres = client(&server).genres().await?;
    assert_eq!(genres, vec!["Fantasy", "Horror"]);
    Ok(())
}
