//! DigLib CLI - Command-line client for the digital library

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use diglib_core::{BookId, BookQuery, NewBook, SortDirection};
use std::num::NonZeroU32;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "diglib")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the DigLib API (defaults to DIGLIB_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List books in the catalog
    List {
        /// Only books whose title contains this text
        #[arg(long)]
        title: Option<String>,

        /// Only books whose author contains this text
        #[arg(long)]
        author: Option<String>,

        /// Only books whose genre contains this text
        #[arg(long)]
        genre: Option<String>,

        /// Listing page, starting at 0
        #[arg(long, default_value = "0")]
        page: u32,

        /// Books per listing page
        #[arg(long, default_value = "10")]
        size: u32,

        /// Field to sort by (title, author, genre, isbn, year, id)
        #[arg(long, default_value = "title")]
        sort_by: String,

        /// Sort in descending order
        #[arg(long)]
        desc: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display information about a book
    Info {
        /// Book id
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the genres the catalog accepts
    Genres,

    /// Print one page of a book's text
    Read {
        /// Book id
        id: String,

        /// Page to print, starting at 0
        #[arg(short, long, default_value = "0")]
        page: u32,

        /// Characters per page
        #[arg(long, default_value_t = diglib_core::READ_PAGE_SIZE)]
        page_size: NonZeroU32,
    },

    /// Download a whole book as a plain-text file
    Export {
        /// Book id
        id: String,

        /// Directory to write the file into
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Characters requested per page
        #[arg(long, default_value_t = diglib_core::EXPORT_PAGE_SIZE)]
        page_size: NonZeroU32,
    },

    /// Delete a book from the catalog
    Delete {
        /// Book id
        id: String,
    },

    /// Add a book from a plain-text file
    Upload {
        /// Text file with the book's content
        file: PathBuf,

        #[arg(long)]
        title: String,

        #[arg(long)]
        author: String,

        #[arg(long)]
        genre: String,

        /// 13-digit ISBN
        #[arg(long)]
        isbn: String,

        /// Publication year
        #[arg(long, allow_hyphen_values = true)]
        year: i32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "diglib_cli=debug,diglib_client=debug,diglib_core=debug"
    } else {
        "diglib_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let client = commands::connect(cli.api_url.as_deref())?;

    match cli.command {
        Commands::List {
            title,
            author,
            genre,
            page,
            size,
            sort_by,
            desc,
            json,
        } => {
            let query = BookQuery {
                page,
                size,
                sort_by,
                sort_dir: if desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                },
                title,
                author,
                genre,
            };
            commands::list(&client, &query, json).await
        }

        Commands::Info { id, json } => commands::info(&client, &BookId::from(id), json).await,

        Commands::Genres => commands::genres(&client).await,

        Commands::Read {
            id,
            page,
            page_size,
        } => commands::read(&client, &BookId::from(id), page, page_size).await,

        Commands::Export {
            id,
            output_dir,
            page_size,
        } => commands::export(&client, &BookId::from(id), &output_dir, page_size).await,

        Commands::Delete { id } => commands::delete(&client, &BookId::from(id)).await,

        Commands::Upload {
            file,
            title,
            author,
            genre,
            isbn,
            year,
        } => {
            let book = NewBook::new(title, author, genre, isbn, year);
            commands::upload(&client, &file, book).await
        }
    }
}
