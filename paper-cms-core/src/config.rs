use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

pub const DEFAULT_API_BASE_URL: &str = "https://api.dropboxapi.com/2/paper";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const MANIFEST_FILE_NAME: &str = "meta-tree.json";

/// Connection settings for the Paper API.
#[derive(Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(token: impl Into<String>) -> Self {
        ApiConfig {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Everything a single synchronisation run needs besides the API client.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Root directory the section folders are created under.
    pub content_dir: PathBuf,
    /// Sections (second-level folder names) allowed into the output.
    pub sections: Vec<String>,
    /// Site generator config the sidebar is merged into. Required for a full run.
    pub site_config: Option<Value>,
    /// Where the regenerated site config module is written.
    pub site_config_path: PathBuf,
}

impl SyncConfig {
    pub fn new(content_dir: impl Into<PathBuf>, sections: Vec<String>) -> Self {
        let content_dir = content_dir.into();
        let site_config_path = content_dir.join(".vuepress").join("config.js");
        SyncConfig {
            content_dir,
            sections,
            site_config: None,
            site_config_path,
        }
    }

    pub fn with_site_config(mut self, site_config: Value) -> Self {
        self.site_config = Some(site_config);
        self
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.content_dir.join(MANIFEST_FILE_NAME)
    }

    pub fn trace_loaded(&self) {
        info!(
            content_dir = %self.content_dir.display(),
            sections = ?self.sections,
            site_config_path = %self.site_config_path.display(),
            "Loaded SyncConfig"
        );
        debug!(?self, "SyncConfig loaded (full debug)");
    }
}
