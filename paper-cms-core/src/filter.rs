//! Filter stage: drop documents without a section, and documents outside the allowed sections.
//!
//! The credential may see far more documents than the site is meant to
//! publish, so the section allow-list is the only thing keeping unrelated
//! documents out of the output.

use tracing::{debug, info};

use crate::enrich::DocWithFolderInfo;

/// Keep documents whose folder path goes deeper than the root folder.
pub fn filter_empty(docs: Vec<DocWithFolderInfo>) -> Vec<DocWithFolderInfo> {
    let before = docs.len();
    let kept: Vec<_> = docs
        .into_iter()
        .filter(|doc| {
            let keep = doc.folder_info.folders().len() > 1;
            if !keep {
                debug!(doc_id = %doc.id, "Dropping document without a section folder");
            }
            keep
        })
        .collect();
    info!(kept = kept.len(), dropped = before - kept.len(), "Filtered documents without a section");
    kept
}

/// Keep documents whose section appears in `sections`.
pub fn filter_sections(docs: Vec<DocWithFolderInfo>, sections: &[String]) -> Vec<DocWithFolderInfo> {
    let before = docs.len();
    let kept: Vec<_> = docs
        .into_iter()
        .filter(|doc| {
            let keep = doc
                .folder_info
                .section()
                .is_some_and(|section| sections.iter().any(|allowed| allowed == section));
            if !keep {
                debug!(
                    doc_id = %doc.id,
                    section = doc.folder_info.section().unwrap_or_default(),
                    "Dropping document outside the allowed sections"
                );
            }
            keep
        })
        .collect();
    info!(kept = kept.len(), dropped = before - kept.len(), "Filtered documents by section");
    kept
}
