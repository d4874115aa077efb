//! Persistence writer: one Markdown file per document plus a single manifest per run.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, error, info};

use crate::config::MANIFEST_FILE_NAME;
use crate::contract::{DocumentRecord, ManifestEntry, Metadata};
use crate::error::{PaperError, Result};

pub const FRONT_MATTER_DELIMITER: &str = "---";

/// Header block written at the top of every document: pretty JSON metadata between delimiters.
pub fn front_matter(metadata: &Metadata) -> Result<String> {
    let json = serde_json::to_string_pretty(metadata).map_err(|source| PaperError::Serialize {
        what: "document metadata",
        source,
    })?;
    Ok(format!(
        "{FRONT_MATTER_DELIMITER}\n{json}\n{FRONT_MATTER_DELIMITER}\n"
    ))
}

/// Full file contents for a document.
pub fn render_document(doc: &DocumentRecord) -> Result<String> {
    Ok(format!("{}{}", front_matter(&doc.metadata)?, doc.content))
}

/// Write every document to its location, creating section directories as needed.
///
/// Writes happen in order; on failure, files written so far stay on disk.
pub async fn write_documents(docs: &[DocumentRecord]) -> Result<()> {
    for doc in docs {
        fs::create_dir_all(&doc.directory).await.map_err(|e| {
            error!(error = ?e, path = %doc.directory.display(), "Failed to create section directory");
            PaperError::io(&doc.directory, e)
        })?;
        let contents = render_document(doc)?;
        fs::write(&doc.location, contents).await.map_err(|e| {
            error!(error = ?e, doc_id = %doc.id, path = %doc.location.display(), "Failed to write document");
            PaperError::io(&doc.location, e)
        })?;
        debug!(doc_id = %doc.id, path = %doc.location.display(), "Wrote document");
    }
    info!(count = docs.len(), "Wrote documents");
    Ok(())
}

pub fn manifest_entries(docs: &[DocumentRecord]) -> Vec<ManifestEntry<'_>> {
    docs.iter().map(ManifestEntry::from).collect()
}

/// Write `meta-tree.json` under `content_dir`, once, listing every document.
pub async fn write_manifest(docs: &[DocumentRecord], content_dir: &Path) -> Result<PathBuf> {
    let path = content_dir.join(MANIFEST_FILE_NAME);
    let json = serde_json::to_string(&manifest_entries(docs)).map_err(|source| {
        PaperError::Serialize {
            what: "manifest",
            source,
        }
    })?;
    fs::create_dir_all(content_dir)
        .await
        .map_err(|e| PaperError::io(content_dir, e))?;
    fs::write(&path, json).await.map_err(|e| {
        error!(error = ?e, path = %path.display(), "Failed to write manifest");
        PaperError::io(&path, e)
    })?;
    info!(path = %path.display(), entries = docs.len(), "Wrote manifest");
    Ok(path)
}
