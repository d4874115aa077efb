//! `load_config` module: Loads a static YAML config and injects the API secret from the environment.
//!
//! This module is the only place where user-supplied YAML is parsed and mapped to
//! the strongly-typed configuration of `paper-cms-core`.
//!
//! # Responsibilities
//! - Parse the YAML configuration file into [`CliConfig`]
//! - Inject secrets from the environment (`DROPBOX_API_TOKEN`) and the optional
//!   `DROPBOX_API_BASE_URL` override
//! - Read the site generator config the sidebar is merged into
//!
//! # Errors
//! All errors in this module use `anyhow::Error` and are surfaced at the CLI boundary.
//!
//! Accepted YAML:
//!
//! ```yaml
//! content_dir: ./content
//! sections: [players, adventures, items]
//! api:
//!   base_url: https://api.dropboxapi.com/2/paper
//!   timeout_secs: 30
//! site:
//!   template: ./content/.vuepress/config.js
//!   output: ./content/.vuepress/config.js
//! ```

use anyhow::{Context, Result};
use paper_cms_core::config::{ApiConfig, SyncConfig};
use paper_cms_core::sidebar::{parse_config_module, validate_site_config};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};

pub const TOKEN_ENV: &str = "DROPBOX_API_TOKEN";
pub const BASE_URL_ENV: &str = "DROPBOX_API_BASE_URL";

#[derive(Debug, Deserialize)]
pub struct CliConfig {
    pub content_dir: PathBuf,
    #[serde(default)]
    pub sections: Vec<String>,
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub site: Option<SiteSection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiSection {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct SiteSection {
    /// Existing site config, as JSON or a `module.exports = <json>` module.
    pub template: PathBuf,
    /// Output path; defaults to `<content_dir>/.vuepress/config.js`.
    pub output: Option<PathBuf>,
}

/// Loads a static YAML config file (no secrets).
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let config: CliConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if config.sections.is_empty() {
        error!(config_path = ?path_ref, "No sections configured");
        anyhow::bail!("Config must list at least one section under `sections`");
    }

    Ok(config)
}

/// Builds the API connection settings, taking the token from the environment.
pub fn api_config(config: &CliConfig) -> Result<ApiConfig> {
    let token = match std::env::var(TOKEN_ENV) {
        Ok(token) if !token.trim().is_empty() => {
            info!("{TOKEN_ENV} found in env");
            token
        }
        Ok(_) => {
            error!("{TOKEN_ENV} is empty");
            anyhow::bail!("{TOKEN_ENV} environment variable is empty");
        }
        Err(e) => {
            error!(error = ?e, "{TOKEN_ENV} environment variable not set");
            return Err(anyhow::anyhow!("{TOKEN_ENV} environment variable not set: {e}"));
        }
    };

    let mut api = ApiConfig::new(token);
    if let Some(base_url) = &config.api.base_url {
        api.base_url = base_url.clone();
    }
    if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
        info!(base_url = %base_url, "Using {BASE_URL_ENV} from env");
        api.base_url = base_url;
    }
    if let Some(secs) = config.api.timeout_secs {
        api.timeout = Duration::from_secs(secs);
    }
    Ok(api)
}

/// Builds the run configuration, reading the site config template from disk.
pub fn sync_config(config: &CliConfig) -> Result<SyncConfig> {
    let site = config.site.as_ref().ok_or_else(|| {
        error!("No `site` section in config");
        anyhow::anyhow!("Config must provide a `site.template` static site generator config")
    })?;

    let template = fs::read_to_string(&site.template)
        .with_context(|| format!("Failed to read site config template {:?}", site.template))?;
    let site_config = parse_config_module(&template)
        .with_context(|| format!("Failed to parse site config template {:?}", site.template))?;
    validate_site_config(&site_config)
        .with_context(|| format!("Site config template {:?} cannot take a sidebar", site.template))?;

    let mut sync = SyncConfig::new(&config.content_dir, config.sections.clone())
        .with_site_config(site_config);
    if let Some(output) = &site.output {
        sync.site_config_path = output.clone();
    }
    info!(
        content_dir = %sync.content_dir.display(),
        template = %site.template.display(),
        "Run configuration assembled"
    );
    Ok(sync)
}
