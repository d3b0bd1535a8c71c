// tests/config_errors.rs

mod common;
use crate::common::builders::ConfigFileBuilder;

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use feedbridge::config::{load_and_validate, load_effective, ConfigFile};
use feedbridge::errors::FeedbridgeError;
use feedbridge::types::LookupSourceKind;

fn load_str(toml: &str) -> Result<ConfigFile, FeedbridgeError> {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", toml).unwrap();
    load_and_validate(file.path())
}

fn expect_config_error(toml: &str, needle: &str) {
    match load_str(toml) {
        Err(FeedbridgeError::ConfigError(msg)) => {
            assert!(msg.contains(needle), "message {:?} should mention {:?}", msg, needle);
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_full_config_loads() {
    let cfg = load_str(
        r#"
[app]
name = "feedreader"

[helper]
name = "html2rss"
query_flag = "-q"
feeds_file = "/tmp/feeds"

[locator]
dev_tree = ["tools/{name}/bin/{name}"]
build_output = "out/{name}"
install_bindir = "/opt/feedreader/bin"
system_dirs = ["/usr/bin"]

[debounce]
delay_ms = 400

[lookup]
source = "http"
url = "https://geo.test/zip/{query}"
timeout_ms = 2500
"#,
    )
    .unwrap();

    assert_eq!(cfg.app.name, "feedreader");
    assert_eq!(cfg.helper.query_flag, "-q");
    assert_eq!(cfg.locator.dev_tree, vec!["tools/{name}/bin/{name}"]);
    assert_eq!(cfg.debounce.delay().as_millis(), 400);
    assert_eq!(cfg.lookup.source, LookupSourceKind::Http);
    assert_eq!(cfg.lookup.timeout().as_millis(), 2500);
}

#[test]
fn test_empty_file_gives_defaults() {
    let cfg = load_str("").unwrap();

    assert_eq!(cfg.app.name, "feedbridge");
    assert_eq!(cfg.helper.name, "html2rss");
    assert_eq!(cfg.helper.query_flag, "--query");
    assert_eq!(cfg.debounce.delay_ms, 250);
    assert_eq!(cfg.lookup.source, LookupSourceKind::Table);
    assert!(cfg.lookup.table.is_empty());
}

#[test]
fn test_lookup_table_section() {
    let cfg = load_str(
        r#"
[lookup.table]
"10115" = "Berlin Mitte"
"#,
    )
    .unwrap();

    assert_eq!(cfg.lookup.table.get("10115").map(String::as_str), Some("Berlin Mitte"));
}

#[test]
fn test_helper_name_must_be_bare() {
    expect_config_error("[helper]\nname = \"bin/html2rss\"\n", "path separators");
    expect_config_error("[helper]\nname = \"  \"\n", "must not be empty");
}

#[test]
fn test_app_name_must_be_bare() {
    expect_config_error("[app]\nname = \"a\\\\b\"\n", "[app].name");
}

#[test]
fn test_empty_query_flag_is_rejected() {
    expect_config_error("[helper]\nquery_flag = \"\"\n", "query_flag");
}

#[test]
fn test_debounce_window_is_bounded() {
    expect_config_error("[debounce]\ndelay_ms = 60000\n", "delay_ms");
}

#[test]
fn test_http_lookup_needs_url_with_placeholder() {
    expect_config_error("[lookup]\nsource = \"http\"\n", "url is required");
    expect_config_error(
        "[lookup]\nsource = \"http\"\nurl = \"https://geo.test/zip\"\n",
        "{query}",
    );
}

#[test]
fn test_zero_timeout_is_rejected() {
    expect_config_error("[lookup]\ntimeout_ms = 0\n", "timeout_ms");
}

#[test]
fn test_invalid_toml_is_a_toml_error() {
    match load_str("[helper\nname = 1") {
        Err(FeedbridgeError::TomlError(_)) => {}
        other => panic!("Expected TomlError, got: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_unknown_lookup_source_is_a_toml_error() {
    assert!(matches!(
        load_str("[lookup]\nsource = \"ldap\"\n"),
        Err(FeedbridgeError::TomlError(_))
    ));
}

#[test]
fn test_explicit_missing_path_is_an_io_error() {
    let result = load_effective(Some(Path::new("/definitely/not/here/feedbridge.toml")));
    assert!(matches!(result, Err(FeedbridgeError::IoError(_))));
}

#[test]
fn test_builder_http_lookup_is_valid() {
    let cfg = ConfigFileBuilder::new()
        .helper_name("helper")
        .http_lookup("https://geo.test/{query}")
        .build();
    assert_eq!(cfg.lookup.url.as_deref(), Some("https://geo.test/{query}"));
}
