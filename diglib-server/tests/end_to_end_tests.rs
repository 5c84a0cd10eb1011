//! Client and server talking over a real socket

use diglib_client::RemoteClient;
use diglib_core::{
    reconstruct_document, BookId, BookQuery, DocumentReconstructor, NewBook, ReconstructionState,
};
use diglib_server::config::ServerConfig;
use diglib_server::routes::create_router;
use diglib_server::state::AppState;
use std::num::NonZeroU32;
use std::sync::Mutex;
use tempfile::TempDir;

/// Serve the API on an ephemeral port and return a client for it
async fn spawn_server() -> (RemoteClient, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let state = AppState::new(ServerConfig::with_storage_path(temp_dir.path()))
        .await
        .expect("Failed to create state");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });

    let client = RemoteClient::with_base_url(format!("http://{}", addr)).unwrap();
    (client, temp_dir)
}

fn page_size(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
}

fn new_book(title: &str) -> NewBook {
    NewBook::new(title, "Herman Melville", "Classic", "9780142437247", 1851)
}

#[tokio::test]
async fn test_upload_then_reconstruct() {
    let (client, _temp_dir) = spawn_server().await;
    let text = "Call me Ishmael. Some years ago, never mind how long precisely, \
                having little or no money in my purse, and nothing particular \
                to interest me on shore, I thought I would sail about a little.";

    let id = client
        .upload_book(&new_book("Moby-Dick"), text, "moby.txt")
        .await
        .unwrap();
    assert_eq!(id, BookId::Numeric(1));

    let states = Mutex::new(Vec::new());
    let document = DocumentReconstructor::new(&client)
        .on_state_change(|state| states.lock().unwrap().push(*state))
        .reconstruct(&id, page_size(16))
        .await
        .unwrap();

    assert_eq!(document.text(), text);
    assert_eq!(
        document.total_pages() as usize,
        text.chars().count().div_ceil(16)
    );
    assert!(matches!(
        states.lock().unwrap().last(),
        Some(ReconstructionState::Complete { .. })
    ));
}

#[tokio::test]
async fn test_multibyte_text_survives_paging() {
    let (client, _temp_dir) = spawn_server().await;
    let text = "Ærøskøbing – 東京 – Zürich 🚲 naïve café";

    let id = client
        .upload_book(&new_book("Postcards"), text, "postcards.txt")
        .await
        .unwrap();

    for size in [1, 3, 7, 1_000_000] {
        let pages = reconstruct_document(&client, &id, page_size(size)).await;
        assert_eq!(pages.concat(), text, "page size {}", size);
    }
}

#[tokio::test]
async fn test_deleted_book_cannot_be_reconstructed() {
    let (client, _temp_dir) = spawn_server().await;
    let id = client
        .upload_book(&new_book("Bartleby"), "I would prefer not to.", "bartleby.txt")
        .await
        .unwrap();

    assert!(client.delete_book(&id).await.unwrap());

    let pages = reconstruct_document(&client, &id, page_size(5)).await;
    assert!(pages.is_empty());
    assert!(client.get_book(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_catalog_round_trip() {
    let (client, _temp_dir) = spawn_server().await;
    client
        .upload_book(&new_book("Typee"), "Six months at sea!", "typee.txt")
        .await
        .unwrap();
    client
        .upload_book(&new_book("Omoo"), "It was the middle of a bright", "omoo.txt")
        .await
        .unwrap();

    let listing = client.list_books(&BookQuery::default()).await.unwrap();
    let titles: Vec<&str> = listing.content.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Omoo", "Typee"]);

    let genres = client.genres().await.unwrap();
    assert!(genres.contains(&"Classic".to_string()));
}
