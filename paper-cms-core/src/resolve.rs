//! Derives local directories, file names and page slugs from Paper folder paths and titles.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use tracing::error;

use crate::contract::{Folder, Metadata};
use crate::error::{PaperError, Result};

pub const DOCUMENT_EXTENSION: &str = "md";

/// Kebab-case a title: lowercase words joined by `-`.
///
/// Words are runs of ASCII alphanumerics; every other character separates
/// words and never reaches the slug, so the result only holds `[a-z0-9-]`. A lowercase
/// letter followed by an uppercase one starts a new word ("camelCase"). An
/// uppercase run followed by a lowercase letter splits before its last capital
/// ("HTMLParser" -> "html-parser").
pub fn slugify(title: &str) -> String {
    let chars: Vec<char> = title.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_ascii_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            if prev.is_ascii_lowercase() || (prev.is_ascii_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c.to_ascii_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }

    words.join("-")
}

/// Directory for a document: `base_dir` joined with the section folder name.
///
/// The first folder is the implicit parent and is skipped. Callers are expected
/// to have dropped documents without a section already; this refuses them anyway.
pub fn resolve_directory(base_dir: &Path, folders: &[Folder]) -> Result<PathBuf> {
    let section = match folders.get(1) {
        Some(folder) => folder.name.as_str(),
        None => {
            error!(depth = folders.len(), "Folder path has no section folder");
            return Err(PaperError::NoSection {
                depth: folders.len(),
            });
        }
    };
    if !is_plain_component(section) {
        error!(section = %section, "Section name is not a plain directory name");
        return Err(PaperError::InvalidSection {
            section: section.to_string(),
        });
    }
    Ok(base_dir.join(section))
}

/// File location for a document: `directory/<slug(title)>.md`.
pub fn resolve_location(directory: &Path, metadata: &Metadata) -> Result<PathBuf> {
    let slug = slugify(&metadata.title);
    if slug.is_empty() {
        return Err(PaperError::MissingTitle {
            title: metadata.title.clone(),
        });
    }
    Ok(directory.join(format!("{slug}.{DOCUMENT_EXTENSION}")))
}

fn is_plain_component(name: &str) -> bool {
    if name.contains(&['/', '\\'][..]) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(c)), None) if c == OsStr::new(name)
    )
}
