//! Plain-text export of a reconstructed book

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// File extension of the export artifact
pub const EXPORT_EXTENSION: &str = "txt";

/// MIME type of the export artifact
pub const EXPORT_MIME_TYPE: &str = "text/plain";

/// `"{title}.txt"`, with path separators in the title replaced by `_`
pub fn export_file_name(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{}.{}", stem, EXPORT_EXTENSION)
}

/// Write the pages back to back with no separator
pub fn write_pages<S: AsRef<str>>(writer: &mut dyn Write, pages: &[S]) -> io::Result<()> {
    for page in pages {
        writer.write_all(page.as_ref().as_bytes())?;
    }
    writer.flush()
}

/// Create `dir` if needed and write the book into `dir/{title}.txt`
pub fn create_book_file<S: AsRef<str>>(
    dir: &Path,
    title: &str,
    pages: &[S],
) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let path = dir.join(export_file_name(title));
    let mut file = io::BufWriter::new(fs::File::create(&path)?);
    write_pages(&mut file, pages)?;

    tracing::info!("Wrote {} pages to {:?}", pages.len(), path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("Pride and Prejudice"), "Pride and Prejudice.txt");
        assert_eq!(export_file_name("AC/DC: a story"), "AC_DC: a story.txt");
    }

    #[test]
    fn test_pages_joined_without_separator() {
        let mut out = Vec::new();
        write_pages(&mut out, &["First page content", "Second page content"]).unwrap();
        assert_eq!(out, b"First page contentSecond page content");
    }

    #[test]
    fn test_create_book_file_makes_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("downloads").join("books");
        let pages = vec!["line one\n".to_string(), "line two".to_string()];

        let path = create_book_file(&dir, "Notes", &pages).unwrap();

        assert_eq!(path, dir.join("Notes.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "line one\nline two");
    }
}
