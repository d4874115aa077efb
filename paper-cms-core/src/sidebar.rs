//! Sidebar generator for VuePress-style site configs.
//!
//! Each section present in the output becomes a sidebar entry keyed `/<section>/`
//! listing the section's page slugs, sorted, after an empty entry for the
//! section's index page. The config is written back as a `module.exports = ...`
//! source file.

use std::path::Path;

use regex::Regex;
use serde_json::{Map, Value};
use tokio::fs;
use tracing::{debug, error, info};

use crate::contract::DocumentRecord;
use crate::error::{PaperError, Result};
use crate::resolve::slugify;

const MODULE_EXPORT_PREFIX: &str = "module.exports = ";

/// Sidebar entry for one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionPages {
    /// Sidebar key, `/<section>/`.
    pub tab: String,
    pub pages: Vec<String>,
}

/// Group page slugs by section, sections in order of first appearance.
pub fn section_pages(docs: &[DocumentRecord]) -> Vec<SectionPages> {
    let mut sections: Vec<&str> = Vec::new();
    for doc in docs {
        let section = doc.section();
        if !sections.contains(&section) {
            sections.push(section);
        }
    }

    sections
        .into_iter()
        .map(|section| {
            let mut pages = vec![String::new()];
            pages.extend(
                docs.iter()
                    .filter(|doc| doc.section() == section)
                    .map(|doc| slugify(&doc.metadata.title)),
            );
            pages.sort();
            SectionPages {
                tab: format!("/{section}/"),
                pages,
            }
        })
        .collect()
}

/// Set `themeConfig.sidebar[/<section>/]` for every section in `docs`.
///
/// Missing `themeConfig` or `sidebar` objects are created; other sidebar
/// entries are left as they are.
pub fn update_sidebar(config: &mut Value, docs: &[DocumentRecord]) -> Result<()> {
    let root = config
        .as_object_mut()
        .ok_or_else(|| PaperError::Config("site config must be a JSON object".into()))?;
    let theme = root
        .entry("themeConfig")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| PaperError::Config("site config `themeConfig` must be an object".into()))?;
    let sidebar = theme
        .entry("sidebar")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| {
            PaperError::Config("site config `themeConfig.sidebar` must be an object".into())
        })?;

    for section in section_pages(docs) {
        debug!(tab = %section.tab, pages = section.pages.len(), "Updating sidebar section");
        sidebar.insert(section.tab, Value::from(section.pages));
    }
    Ok(())
}

/// Check that `config` can take a sidebar: an object whose `themeConfig` and
/// `themeConfig.sidebar`, where present, are objects too.
pub fn validate_site_config(config: &Value) -> Result<()> {
    update_sidebar(&mut config.clone(), &[])
}

/// Serialize a config as a CommonJS module.
pub fn render_config_module(config: &Value) -> Result<String> {
    let json = serde_json::to_string_pretty(config).map_err(|source| PaperError::Serialize {
        what: "site config",
        source,
    })?;
    Ok(format!("{MODULE_EXPORT_PREFIX}{json}\n"))
}

/// Read a config back from either plain JSON or a `module.exports = <json>` module.
pub fn parse_config_module(source: &str) -> Result<Value> {
    let prefix = Regex::new(r"^\s*module\.exports\s*=\s*")
        .map_err(|e| PaperError::Config(format!("invalid module prefix pattern: {e}")))?;
    let body = prefix.replace(source, "");
    let body = body.trim_end().trim_end_matches(';');
    serde_json::from_str(body).map_err(|e| {
        error!(error = ?e, "Site config is not JSON");
        PaperError::Config(format!("site config must be JSON or `module.exports = <JSON>`: {e}"))
    })
}

/// Write the config module to `path`, creating parent directories.
pub async fn write_site_config(path: &Path, config: &Value) -> Result<()> {
    let contents = render_config_module(config)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| PaperError::io(parent, e))?;
    }
    fs::write(path, contents).await.map_err(|e| {
        error!(error = ?e, path = %path.display(), "Failed to write site config");
        PaperError::io(path, e)
    })?;
    info!(path = %path.display(), "Wrote site config");
    Ok(())
}
