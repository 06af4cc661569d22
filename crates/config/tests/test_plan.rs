//! Loader tests for the `roster-config` crate: defaults, file discovery,
//! environment overrides, and validation.

use std::fs;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;

use roster_config::{load, AppConfig, HttpConfig, PaginationConfig, StoreBackend};

const ENV_VARS_TO_RESET: &[&str] = &[
    "ROSTER_CONFIG",
    "ROSTER__DATABASE__MAX_CONNECTIONS",
    "ROSTER__DATABASE__URL",
    "ROSTER__HTTP__ADDRESS",
    "ROSTER__HTTP__PORT",
    "ROSTER__PAGINATION__DEFAULT_LIMIT",
    "ROSTER__PAGINATION__QUERY_DEFAULT_LIMIT",
    "ROSTER__PAGINATION__SORTED_DEFAULT_LIMIT",
    "ROSTER__STORE__BACKEND",
];

struct TestContext {
    vars: Vec<(String, Option<String>)>,
    original_dir: Option<PathBuf>,
}

impl TestContext {
    fn new() -> Self {
        Self {
            vars: Vec::new(),
            original_dir: None,
        }
    }

    fn reset_environment(&mut self) {
        for key in ENV_VARS_TO_RESET {
            self.remove_var(key);
        }
    }

    fn set_var(&mut self, key: &str, value: impl AsRef<str>) {
        let previous = std::env::var(key).ok();
        std::env::set_var(key, value.as_ref());
        self.vars.push((key.to_string(), previous));
    }

    fn remove_var(&mut self, key: &str) {
        let previous = std::env::var(key).ok();
        std::env::remove_var(key);
        self.vars.push((key.to_string(), previous));
    }

    fn set_current_dir(&mut self, dir: &Path) {
        if self.original_dir.is_none() {
            self.original_dir =
                Some(std::env::current_dir().expect("failed to capture current directory"));
        }
        std::env::set_current_dir(dir).expect("failed to set current directory");
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        if let Some(original) = self.original_dir.take() {
            let _ = std::env::set_current_dir(original);
        }

        while let Some((key, value)) = self.vars.pop() {
            match value {
                Some(val) => std::env::set_var(&key, val),
                None => std::env::remove_var(&key),
            }
        }
    }
}

fn write_config_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create config directories");
    }
    fs::write(path, contents).expect("failed to write config file");
}

fn isolated() -> (TempDir, TestContext) {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());
    (temp_dir, ctx)
}

#[test]
#[serial]
fn load_uses_default_values_when_no_files_found() {
    let (_temp_dir, _ctx) = isolated();

    let config = load().expect("configuration load should succeed without files");
    let defaults = AppConfig::default();

    assert_eq!(config.http.address, defaults.http.address);
    assert_eq!(config.http.port, defaults.http.port);
    assert_eq!(config.database.url, defaults.database.url);
    assert_eq!(
        config.database.max_connections,
        defaults.database.max_connections
    );
    assert_eq!(config.store.backend, StoreBackend::Sqlite);
    assert_eq!(config.pagination.default_limit, 5);
    assert_eq!(config.pagination.sorted_default_limit, 3);
    assert_eq!(config.pagination.query_default_limit, 5);
}

#[test]
#[serial]
fn load_picks_first_available_file_in_search_order() {
    let (temp_dir, _ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "roster.toml",
        r#"
        [http]
        port = 4242
        "#,
    );
    write_config_file(
        temp_dir.path(),
        "config/roster.toml",
        r#"
        [http]
        port = 5151
        "#,
    );

    let config = load().expect("configuration load should pick the first file");
    assert_eq!(config.http.port, 4242);
}

#[test]
#[serial]
fn load_merges_partial_file_with_defaults() {
    let (temp_dir, _ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "config/roster.toml",
        r#"
        [store]
        backend = "memory"

        [pagination]
        default_limit = 25
        "#,
    );

    let config = load().expect("configuration load should succeed");
    let defaults = AppConfig::default();

    assert_eq!(config.store.backend, StoreBackend::Memory);
    assert_eq!(config.pagination.default_limit, 25);
    assert_eq!(
        config.pagination.sorted_default_limit,
        defaults.pagination.sorted_default_limit
    );
    assert_eq!(config.http.port, defaults.http.port);
    assert_eq!(config.database.url, defaults.database.url);
}

#[test]
#[serial]
fn load_reads_explicit_file_from_environment() {
    let (temp_dir, mut ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "elsewhere/custom.toml",
        r#"
        [database]
        url = "sqlite://custom.db"
        max_connections = 3
        "#,
    );
    ctx.set_var(
        "ROSTER_CONFIG",
        temp_dir.path().join("elsewhere/custom.toml").display().to_string(),
    );

    let config = load().expect("configuration load should follow ROSTER_CONFIG");
    assert_eq!(config.database.url, "sqlite://custom.db");
    assert_eq!(config.database.max_connections, 3);
}

#[test]
#[serial]
fn load_applies_environment_overrides() {
    let (temp_dir, mut ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "roster.toml",
        r#"
        [http]
        port = 3030
        "#,
    );

    ctx.set_var("ROSTER__HTTP__PORT", "8080");
    ctx.set_var("ROSTER__STORE__BACKEND", "memory");

    let config = load().expect("configuration load should honour env overrides");
    assert_eq!(config.http.port, 8080);
    assert_eq!(config.store.backend, StoreBackend::Memory);
}

#[test]
#[serial]
fn load_rejects_zero_page_limit() {
    let (temp_dir, _ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "roster.toml",
        r#"
        [pagination]
        query_default_limit = 0
        "#,
    );

    let error = load().expect_err("zero limit should be rejected");
    assert!(error.to_string().contains("pagination limits"));
}

#[test]
#[serial]
fn load_rejects_unknown_store_backend() {
    let (_temp_dir, mut ctx) = isolated();
    ctx.set_var("ROSTER__STORE__BACKEND", "cassandra");

    let error = load().expect_err("unknown backend should be rejected");
    assert!(error.to_string().contains("invalid configuration"));
}

#[test]
#[serial]
fn load_errors_on_invalid_toml_contents() {
    let (temp_dir, _ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "roster.toml",
        r#"
        [http]
        port = "not-a-number
        "#,
    );

    let error = load().expect_err("invalid TOML should cause load to fail");
    let message = error.to_string();
    assert!(
        message.contains("invalid configuration")
            || message.contains("unable to build configuration"),
        "unexpected error message: {message}"
    );
}

#[test]
fn http_config_defaults_match_expected_host_and_port() {
    let defaults = HttpConfig::default();
    assert_eq!(defaults.address, "127.0.0.1");
    assert_eq!(defaults.port, 7070);
}

#[test]
fn pagination_defaults_follow_handler_contract() {
    let defaults = PaginationConfig::default();
    assert_eq!(defaults.default_limit, 5);
    assert_eq!(defaults.sorted_default_limit, 3);
    assert_eq!(defaults.query_default_limit, 5);
}
