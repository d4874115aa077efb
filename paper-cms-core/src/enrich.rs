//! Enrichment: attach folder info, then metadata, content and file locations to bare document ids.
//!
//! Both fetch stages fan out one request (or request group) per document and
//! join with all-or-nothing semantics: results come back in input order and the
//! first failure aborts the whole stage.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use futures::future::try_join_all;
use tracing::{debug, error, info};

use crate::contract::{DocumentId, DocumentRecord, Folder, FolderInfo, Metadata, PaperApi};
use crate::error::{PaperError, Result};
use crate::resolve::{resolve_directory, resolve_location};

/// A document id paired with its folder placement.
#[derive(Debug, Clone, PartialEq)]
pub struct DocWithFolderInfo {
    pub id: DocumentId,
    pub folder_info: FolderInfo,
}

/// A document with everything but its file location.
#[derive(Debug, Clone, PartialEq)]
pub struct DocWithContent {
    pub id: DocumentId,
    pub folders: Vec<Folder>,
    pub directory: PathBuf,
    pub metadata: Metadata,
    pub content: String,
}

/// Fetch the folder info of every document.
pub async fn attach_folder_info<A>(api: &A, ids: Vec<DocumentId>) -> Result<Vec<DocWithFolderInfo>>
where
    A: PaperApi + ?Sized,
{
    info!(count = ids.len(), "Fetching folder info");
    let fetches = ids.into_iter().map(|id| async move {
        let folder_info = api.get_folder_info(&id).await.map_err(|e| {
            error!(doc_id = %id, error = %e, "Failed to fetch folder info");
            e
        })?;
        debug!(doc_id = %id, depth = folder_info.folders().len(), "Fetched folder info");
        Ok::<_, PaperError>(DocWithFolderInfo { id, folder_info })
    });
    try_join_all(fetches).await
}

/// Resolve the directory and fetch metadata and Markdown content of every document.
///
/// Metadata and content of a single document are fetched concurrently, and
/// documents are processed concurrently with each other.
pub async fn attach_content<A>(
    api: &A,
    docs: Vec<DocWithFolderInfo>,
    base_dir: &Path,
) -> Result<Vec<DocWithContent>>
where
    A: PaperApi + ?Sized,
{
    info!(count = docs.len(), "Fetching metadata and content");
    let fetches = docs.into_iter().map(|doc| async move {
        let DocWithFolderInfo { id, folder_info } = doc;
        let folders = folder_info.folders.unwrap_or_default();
        let directory = resolve_directory(base_dir, &folders)?;

        let (metadata, content) =
            futures::try_join!(api.get_metadata(&id), api.download_markdown(&id)).map_err(|e| {
                error!(doc_id = %id, error = %e, "Failed to fetch document metadata or content");
                e
            })?;
        debug!(
            doc_id = %id,
            title = %metadata.title,
            bytes = content.len(),
            "Fetched document"
        );

        Ok::<_, PaperError>(DocWithContent {
            id,
            folders,
            directory,
            metadata,
            content,
        })
    });
    try_join_all(fetches).await
}

/// Attach the file location of every document.
pub fn attach_locations(docs: Vec<DocWithContent>) -> Result<Vec<DocumentRecord>> {
    docs.into_iter()
        .map(|doc| {
            let location = resolve_location(&doc.directory, &doc.metadata).map_err(|e| {
                error!(doc_id = %doc.id, title = %doc.metadata.title, "Document title yields no file name");
                e
            })?;
            Ok(DocumentRecord {
                id: doc.id,
                folders: doc.folders,
                directory: doc.directory,
                metadata: doc.metadata,
                content: doc.content,
                location,
            })
        })
        .collect()
}

/// Refuse a set of records in which two documents would be written to the same file.
pub fn check_slug_collisions(docs: &[DocumentRecord]) -> Result<()> {
    let mut seen: HashMap<&Path, &str> = HashMap::with_capacity(docs.len());
    for doc in docs {
        if let Some(first) = seen.insert(doc.location.as_path(), doc.id.as_str()) {
            error!(
                location = %doc.location.display(),
                first = %first,
                second = %doc.id,
                "Two documents resolve to the same file"
            );
            return Err(PaperError::SlugCollision {
                location: doc.location.clone(),
                first: first.to_string(),
                second: doc.id.clone(),
            });
        }
    }
    Ok(())
}
