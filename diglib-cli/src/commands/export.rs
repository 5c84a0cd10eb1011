//! Export command implementation

use anyhow::{bail, Context, Result};
use diglib_client::RemoteClient;
use diglib_core::export::create_book_file;
use diglib_core::{BookId, DocumentReconstructor, ReconstructionState};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::num::NonZeroU32;
use std::path::Path;

/// Download every page of a book and write it to `{title}.txt`.
///
/// Ctrl-C drops the download, including a page request in flight; nothing
/// is written unless every page arrived.
pub async fn export(
    client: &RemoteClient,
    id: &BookId,
    output_dir: &Path,
    page_size: NonZeroU32,
) -> Result<()> {
    export_until(client, id, output_dir, page_size, ctrl_c()).await
}

/// Resolves on Ctrl-C; never, if the signal cannot be watched
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn export_until(
    client: &RemoteClient,
    id: &BookId,
    output_dir: &Path,
    page_size: NonZeroU32,
    interrupt: impl Future<Output = ()>,
) -> Result<()> {
    let book = client
        .get_book(id)
        .await?
        .with_context(|| format!("Book {} not found", id))?;

    let pb = ProgressBar::new(1);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>5}/{len:5} {msg}")?
            .progress_chars("##-"),
    );
    pb.set_message(book.title.clone());

    let progress = pb.clone();
    let reconstructor = DocumentReconstructor::new(client).on_state_change(move |state| {
        match *state {
            ReconstructionState::FetchingRemainingPages {
                fetched,
                total_pages,
            } => {
                progress.set_length(u64::from(total_pages));
                progress.set_position(u64::from(fetched));
            }
            ReconstructionState::Complete { total_pages } => {
                progress.set_length(u64::from(total_pages.max(1)));
                progress.set_position(u64::from(total_pages.max(1)));
            }
            _ => {}
        }
    });

    let document = tokio::select! {
        document = reconstructor.reconstruct(id, page_size) => document,
        _ = interrupt => {
            pb.abandon_with_message("export cancelled");
            bail!("Export of book {} cancelled", id);
        }
    };

    let document = match document {
        Ok(document) => document,
        Err(e) => {
            pb.abandon_with_message("export failed");
            return Err(e).with_context(|| format!("Failed to export book {}", id));
        }
    };

    let path = create_book_file(output_dir, &book.title, document.pages())
        .with_context(|| format!("Failed to write export to {:?}", output_dir))?;

    pb.finish_with_message(format!("saved {}", path.display()));
    tracing::info!("Exported '{}' to {:?}", book.title, path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn test_interrupt_stops_request_in_flight() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/books/3");
                then.status(200).json_body(json!({
                    "id": 3,
                    "title": "Slow",
                    "author": "Nobody",
                    "year": 2001,
                    "genre": "Fiction",
                    "isbn": "9780000000003"
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/books/3/content");
                then.status(200)
                    .delay(Duration::from_secs(20))
                    .json_body(json!({"content": "late", "totalPages": 1, "readingTime": 1}));
            })
            .await;

        let temp_dir = tempfile::TempDir::new().unwrap();
        let client = RemoteClient::with_base_url(server.base_url()).unwrap();
        let page_size = NonZeroU32::new(1_000_000).unwrap();

        let started = Instant::now();
        let result = export_until(
            &client,
            &BookId::Numeric(3),
            temp_dir.path(),
            page_size,
            tokio::time::sleep(Duration::from_millis(200)),
        )
        .await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("cancelled"));
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(!temp_dir.path().join("Slow.txt").exists());
    }
}
