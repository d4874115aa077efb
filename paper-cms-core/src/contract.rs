//! # contract: data model and the remote API seam
//!
//! This module defines the shapes that flow through the document pipeline and the
//! single trait (`PaperApi`) through which every network call is made.
//!
//! ## Data model
//! - [`FolderInfo`] / [`Folder`]: the folder hierarchy of a document, root first.
//!   The first folder is the implicit parent and is ignored; the second is the
//!   document's *section*.
//! - [`Metadata`]: opaque document metadata. Only `title` is interpreted; every
//!   other field is carried through untouched.
//! - [`DocumentRecord`]: a fully assembled document, ready to be written.
//! - [`ManifestEntry`]: the per-document shape of the manifest file.
//!
//! ## Mocking & Testing
//! - `PaperApi` is annotated for `mockall`; with the default `test-export-mocks`
//!   feature, `MockPaperApi` is available to integration tests and dependents.

use std::path::PathBuf;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PaperError;

/// Opaque identifier of a remote document.
pub type DocumentId = String;

/// One entry of a document's folder path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    #[serde(default)]
    pub id: String,
    pub name: String,
}

impl Folder {
    pub fn named(name: impl Into<String>) -> Self {
        Folder {
            id: String::new(),
            name: name.into(),
        }
    }
}

/// Folder placement of a document as reported by `docs/get_folder_info`.
///
/// Documents living at the top level come back without `folders` at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FolderInfo {
    #[serde(default)]
    pub folders: Option<Vec<Folder>>,
}

impl FolderInfo {
    pub fn new(folders: Vec<Folder>) -> Self {
        FolderInfo {
            folders: Some(folders),
        }
    }

    /// The folder path, empty when the API reported none.
    pub fn folders(&self) -> &[Folder] {
        self.folders.as_deref().unwrap_or(&[])
    }

    /// The second-level folder name, if the document has one.
    pub fn section(&self) -> Option<&str> {
        self.folders().get(1).map(|f| f.name.as_str())
    }
}

/// Document metadata as returned by `docs/get_metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Metadata {
    pub fn titled(title: impl Into<String>) -> Self {
        Metadata {
            title: title.into(),
            extra: Map::new(),
        }
    }
}

/// Response of `docs/list`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DocList {
    pub doc_ids: Vec<DocumentId>,
    #[serde(default)]
    pub has_more: bool,
}

/// A fully assembled document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub folders: Vec<Folder>,
    pub directory: PathBuf,
    #[serde(rename = "metaData")]
    pub metadata: Metadata,
    pub content: String,
    pub location: PathBuf,
}

impl DocumentRecord {
    /// Section name (`folders[1].name`).
    pub fn section(&self) -> &str {
        self.folders.get(1).map_or("", |f| f.name.as_str())
    }

    /// File stem of `location`, i.e. the page slug.
    pub fn slug(&self) -> String {
        self.location
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Per-document entry of the manifest file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestEntry<'a> {
    pub id: &'a str,
    pub folders: &'a [Folder],
    pub content: ManifestContent<'a>,
    pub location: &'a std::path::Path,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestContent<'a> {
    #[serde(rename = "metaData")]
    pub metadata: &'a Metadata,
}

impl<'a> From<&'a DocumentRecord> for ManifestEntry<'a> {
    fn from(doc: &'a DocumentRecord) -> Self {
        ManifestEntry {
            id: &doc.id,
            folders: &doc.folders,
            content: ManifestContent {
                metadata: &doc.metadata,
            },
            location: &doc.location,
        }
    }
}

/// Trait for talking to the Paper API.
///
/// Implemented by [`crate::paper_api::PaperClient`] for real use and by
/// `MockPaperApi` in tests. Implementors own the credential; callers never see it.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait PaperApi: Send + Sync {
    /// List the ids of every document visible to the credential.
    async fn list_docs(&self) -> Result<DocList, PaperError>;

    /// Fetch the folder hierarchy of a document.
    async fn get_folder_info(&self, doc_id: &str) -> Result<FolderInfo, PaperError>;

    /// Fetch the metadata (title, owner, dates, ...) of a document.
    async fn get_metadata(&self, doc_id: &str) -> Result<Metadata, PaperError>;

    /// Export a document as Markdown text.
    async fn download_markdown(&self, doc_id: &str) -> Result<String, PaperError>;
}
