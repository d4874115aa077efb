use paper_cms::load_config::{api_config, load_config, sync_config, BASE_URL_ENV, TOKEN_ENV};
use paper_cms_core::config::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT};
use serial_test::serial;
use std::env;
use std::fs::write;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::{NamedTempFile, TempDir};

fn config_file(yaml: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), yaml).unwrap();
    file
}

#[test]
#[serial]
fn test_load_config_parses_sections_and_api() {
    let file = config_file(
        r#"
content_dir: ./content
sections: [players, adventures]
api:
  base_url: http://localhost:8080/2/paper
  timeout_secs: 5
"#,
    );

    let config = load_config(file.path()).expect("Config should load");

    assert_eq!(config.content_dir, PathBuf::from("./content"));
    assert_eq!(config.sections, vec!["players", "adventures"]);
    assert_eq!(
        config.api.base_url.as_deref(),
        Some("http://localhost:8080/2/paper")
    );
    assert_eq!(config.api.timeout_secs, Some(5));
    assert!(config.site.is_none());
}

#[test]
#[serial]
fn test_api_config_reads_token_and_defaults() {
    let file = config_file("content_dir: ./content\nsections: [players]\n");
    env::set_var(TOKEN_ENV, "secret");
    env::remove_var(BASE_URL_ENV);

    let config = load_config(file.path()).unwrap();
    let api = api_config(&config).expect("api config");

    assert_eq!(api.token, "secret");
    assert_eq!(api.base_url, DEFAULT_API_BASE_URL);
    assert_eq!(api.timeout, DEFAULT_TIMEOUT);
    // The token never shows up in debug output.
    assert!(!format!("{api:?}").contains("secret"));
}

#[test]
#[serial]
fn test_api_config_env_base_url_overrides_file() {
    let file = config_file(
        "content_dir: ./content\nsections: [players]\napi:\n  base_url: http://from-file\n  timeout_secs: 7\n",
    );
    env::set_var(TOKEN_ENV, "secret");
    env::set_var(BASE_URL_ENV, "http://from-env");

    let config = load_config(file.path()).unwrap();
    let api = api_config(&config).unwrap();
    env::remove_var(BASE_URL_ENV);

    assert_eq!(api.base_url, "http://from-env");
    assert_eq!(api.timeout, Duration::from_secs(7));
}

#[test]
#[serial]
fn test_api_config_requires_token() {
    let file = config_file("content_dir: ./content\nsections: [players]\n");
    let config = load_config(file.path()).unwrap();

    env::remove_var(TOKEN_ENV);
    let err = api_config(&config).unwrap_err();
    assert!(err.to_string().contains(TOKEN_ENV), "{err}");

    env::set_var(TOKEN_ENV, "  ");
    let err = api_config(&config).unwrap_err();
    assert!(err.to_string().contains("empty"), "{err}");
    env::remove_var(TOKEN_ENV);
}

#[test]
#[serial]
fn test_sync_config_reads_module_exports_template() {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join("config.js");
    write(
        &template,
        "module.exports = {\n  \"title\": \"Wiki\",\n  \"themeConfig\": { \"nav\": [] }\n};\n",
    )
    .unwrap();
    let file = config_file(&format!(
        "content_dir: {}\nsections: [players]\nsite:\n  template: {}\n",
        dir.path().join("content").display(),
        template.display()
    ));

    let config = load_config(file.path()).unwrap();
    let sync = sync_config(&config).expect("sync config");

    assert_eq!(sync.sections, vec!["players"]);
    let site = sync.site_config.expect("site config loaded");
    assert_eq!(site["title"], "Wiki");
    assert!(site["themeConfig"]["nav"].is_array());
    assert_eq!(
        sync.site_config_path,
        dir.path().join("content").join(".vuepress").join("config.js")
    );
}

#[test]
#[serial]
fn test_sync_config_accepts_plain_json_and_output_override() {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join("site.json");
    write(&template, r#"{"title": "Wiki"}"#).unwrap();
    let output = dir.path().join("vuepress").join("config.js");
    let file = config_file(&format!(
        "content_dir: ./content\nsections: [players]\nsite:\n  template: {}\n  output: {}\n",
        template.display(),
        output.display()
    ));

    let config = load_config(file.path()).unwrap();
    let sync = sync_config(&config).unwrap();

    assert_eq!(sync.site_config.unwrap()["title"], "Wiki");
    assert_eq!(sync.site_config_path, output);
}

#[test]
#[serial]
fn test_sync_config_requires_site_section() {
    let file = config_file("content_dir: ./content\nsections: [players]\n");
    let config = load_config(file.path()).unwrap();

    let err = sync_config(&config).unwrap_err();
    assert!(err.to_string().contains("site"), "{err}");
}

#[test]
#[serial]
fn test_sync_config_rejects_unparseable_template() {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join("config.js");
    write(&template, "module.exports = require('./base')").unwrap();
    let file = config_file(&format!(
        "content_dir: ./content\nsections: [players]\nsite:\n  template: {}\n",
        template.display()
    ));

    let config = load_config(file.path()).unwrap();
    assert!(sync_config(&config).is_err());
}

#[test]
#[serial]
fn test_sync_config_rejects_template_without_object_shape() {
    let dir = TempDir::new().unwrap();
    for (name, body) in [
        ("array.json", "[]"),
        ("theme.js", "module.exports = {\"themeConfig\": 5};"),
    ] {
        let template = dir.path().join(name);
        write(&template, body).unwrap();
        let file = config_file(&format!(
            "content_dir: ./content\nsections: [players]\nsite:\n  template: {}\n",
            template.display()
        ));

        let config = load_config(file.path()).unwrap();
        let err = sync_config(&config).unwrap_err();
        assert!(err.to_string().contains("cannot take a sidebar"), "{err}");
    }
}

#[test]
#[serial]
fn test_load_config_rejects_empty_sections() {
    let file = config_file("content_dir: ./content\nsections: []\n");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("section"), "{err}");
}

#[test]
#[serial]
fn test_load_config_invalid_yaml() {
    let file = config_file("content_dir: [unclosed\n");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("YAML"), "{err}");
}

#[test]
#[serial]
fn test_load_config_missing_file() {
    let err = load_config("does-not-exist.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"), "{err}");
}
