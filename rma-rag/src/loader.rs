//! Policy document loading.
//!
//! Loads `.pdf`, `.txt`, and `.md` files from a flat directory. Other
//! extensions are skipped without comment; files that fail to load are
//! logged at `warn` and reported back to the caller instead of aborting
//! the run. Loading is synchronous (`std::fs` and the `lopdf` parser);
//! the ingestion pipeline runs it on a blocking task to keep it off the
//! async workers.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::document::{Document, DocumentMetadata};
use crate::error::{RagError, Result};

/// Every document the loader produces carries this type tag.
const DOCUMENT_TYPE: &str = "policy_document";

/// The outcome of loading a directory: what loaded and what did not.
#[derive(Debug)]
pub struct DirectoryLoad {
    /// Successfully loaded documents, ordered by file name.
    pub documents: Vec<Document>,
    /// Supported files that failed to load, with the reason.
    pub skipped: Vec<SkippedFile>,
}

/// A supported file that could not be loaded.
#[derive(Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Load all supported documents from a directory (non-recursive).
///
/// Files are visited in file-name order so repeated runs over the same
/// directory produce documents in the same order. A missing directory is
/// treated as empty.
///
/// # Errors
///
/// Returns [`RagError::Ingestion`] if the directory cannot be read for a
/// reason other than not existing. Individual unreadable files do not
/// error; they appear in [`DirectoryLoad::skipped`].
pub fn load_directory(dir: &Path) -> Result<DirectoryLoad> {
    info!(directory = %dir.display(), "loading policy documents");

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(directory = %dir.display(), "document directory does not exist");
            return Ok(DirectoryLoad { documents: Vec::new(), skipped: Vec::new() });
        }
        Err(e) => {
            return Err(RagError::Ingestion(format!(
                "failed to read directory '{}': {e}",
                dir.display()
            )));
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_supported(path))
        .collect();
    paths.sort_by_key(|path| path.file_name().map(|name| name.to_owned()));

    let mut documents = Vec::new();
    let mut skipped = Vec::new();
    for path in paths {
        match load_file(&path) {
            Ok(document) => {
                info!(file = %document.metadata.filename, "loaded document");
                documents.push(document);
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping unreadable document");
                skipped.push(SkippedFile { path, reason: e.to_string() });
            }
        }
    }

    info!(loaded = documents.len(), skipped = skipped.len(), "finished loading documents");
    Ok(DirectoryLoad { documents, skipped })
}

/// Load a single supported file as a [`Document`].
///
/// The document id and the `filename` metadata field are the file name;
/// `source_path` keeps the full path.
///
/// # Errors
///
/// Returns [`RagError::DocumentLoad`] if the file cannot be read or its
/// extension is unsupported.
pub fn load_file(path: &Path) -> Result<Document> {
    let text = match extension(path).as_deref() {
        Some("pdf") => extract_pdf_text(path)?,
        Some("txt") | Some("md") => std::fs::read_to_string(path).map_err(|e| {
            RagError::DocumentLoad { path: path.to_path_buf(), message: e.to_string() }
        })?,
        _ => {
            return Err(RagError::DocumentLoad {
                path: path.to_path_buf(),
                message: "unsupported file extension".to_string(),
            });
        }
    };

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(Document::new(
        filename.clone(),
        text,
        DocumentMetadata {
            source_path: path.to_path_buf(),
            filename,
            document_type: DOCUMENT_TYPE.to_string(),
        },
    ))
}

fn is_supported(path: &Path) -> bool {
    matches!(extension(path).as_deref(), Some("pdf") | Some("txt") | Some("md"))
}

fn extension(path: &Path) -> Option<String> {
    path.extension().map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Extract text from a PDF page by page. Pages with no text are dropped;
/// the rest are joined with a blank line.
fn extract_pdf_text(path: &Path) -> Result<String> {
    let doc = lopdf::Document::load(path).map_err(|e| RagError::DocumentLoad {
        path: path.to_path_buf(),
        message: format!("failed to parse PDF: {e}"),
    })?;

    let mut pages_text = Vec::new();
    for page_number in doc.get_pages().keys() {
        let text = doc.extract_text(&[*page_number]).map_err(|e| RagError::DocumentLoad {
            path: path.to_path_buf(),
            message: format!("failed to extract text from page {page_number}: {e}"),
        })?;
        if !text.trim().is_empty() {
            pages_text.push(text);
        }
    }

    debug!(file = %path.display(), pages = pages_text.len(), "extracted PDF text");
    Ok(pages_text.join("\n\n"))
}
