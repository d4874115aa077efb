//! High-level pipeline: orchestrates list → folder info → filter → content → locations → write.
//!
//! This module provides the top-level orchestration for "synchronising" a
//! Dropbox Paper workspace into a static site content directory:
//!   - Lists every document visible to the API credential
//!   - Attaches folder info and drops documents outside the allowed sections
//!   - Attaches metadata, Markdown content and the target file location
//!   - Writes one file per document, then the manifest, then the site config
//!
//! # Major Entry Points
//! - [`fetch_paper_docs`]: fetch and assemble only, no side effects
//! - [`synchronise`]: the full run
//!
//! # Responsibilities
//! - Fail-fast orchestration: the first failed request or write ends the run
//! - All configuration arrives as arguments; nothing is kept between runs
//! - Logging throughout for traceability (see tracing events)
//!
//! # Error Handling
//! Every failure surfaces as a [`PaperError`]. Files written before a failure
//! stay on disk; the manifest is only written once every document has been.

use std::path::Path;

use tracing::{error, info};

use crate::config::SyncConfig;
use crate::contract::{DocumentRecord, PaperApi};
use crate::enrich::{attach_content, attach_folder_info, attach_locations, check_slug_collisions};
use crate::error::{PaperError, Result};
use crate::filter::{filter_empty, filter_sections};
use crate::persist::{write_documents, write_manifest};
use crate::sidebar::{update_sidebar, validate_site_config, write_site_config};

/// Fetch every document in `sections` and assemble it into a [`DocumentRecord`].
///
/// Nothing is written. Records come back in the order the API listed them.
pub async fn fetch_paper_docs<A>(
    api: &A,
    content_dir: &Path,
    sections: &[String],
) -> Result<Vec<DocumentRecord>>
where
    A: PaperApi + ?Sized,
{
    info!(content_dir = %content_dir.display(), ?sections, "[SYNC] Fetching Paper documents");

    let listed = api.list_docs().await.map_err(|e| {
        error!(error = %e, "[SYNC][ERROR] Listing documents failed");
        e
    })?;
    let docs = attach_folder_info(api, listed.doc_ids).await?;
    let docs = filter_empty(docs);
    let docs = filter_sections(docs, sections);
    let docs = attach_content(api, docs, content_dir).await?;
    let docs = attach_locations(docs)?;
    check_slug_collisions(&docs)?;

    info!(count = docs.len(), "[SYNC] Assembled documents");
    Ok(docs)
}

/// Run the full pipeline: fetch, write documents, write the manifest, regenerate the sidebar.
///
/// Returns the records that were written.
pub async fn synchronise<A>(api: &A, config: &SyncConfig) -> Result<Vec<DocumentRecord>>
where
    A: PaperApi + ?Sized,
{
    info!("[SYNC] Starting full synchronisation pipeline");
    config.trace_loaded();

    let mut site_config = match &config.site_config {
        Some(site_config) => site_config.clone(),
        None => {
            error!("[SYNC][ERROR] No site config supplied");
            return Err(PaperError::Config(
                "a static site generator config must be provided".into(),
            ));
        }
    };
    validate_site_config(&site_config).map_err(|e| {
        error!(error = %e, "[SYNC][ERROR] Site config cannot take a sidebar");
        e
    })?;
    if config.sections.is_empty() {
        error!("[SYNC][ERROR] No sections configured");
        return Err(PaperError::Config(
            "at least one section must be allowed".into(),
        ));
    }

    let docs = fetch_paper_docs(api, &config.content_dir, &config.sections).await?;

    write_documents(&docs).await?;
    write_manifest(&docs, &config.content_dir).await?;

    update_sidebar(&mut site_config, &docs)?;
    write_site_config(&config.site_config_path, &site_config).await?;

    info!(count = docs.len(), "[SYNC] Synchronisation complete");
    Ok(docs)
}
