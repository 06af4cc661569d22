use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "roster.toml",
    "config/roster.toml",
    "crates/config/roster.toml",
    "../roster.toml",
    "../config/roster.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub store: StoreConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 7070,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://roster.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Which record store implementation backs the handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Sqlite => "sqlite",
            StoreBackend::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
}

/// Page sizes used when a request carries no usable `limit`.
///
/// ```
/// use roster_config::PaginationConfig;
///
/// let pagination = PaginationConfig::default();
/// assert_eq!(pagination.default_limit, 5);
/// assert_eq!(pagination.sorted_default_limit, 3);
/// assert_eq!(pagination.query_default_limit, 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "PaginationConfig::default_limit")]
    pub default_limit: u32,
    #[serde(default = "PaginationConfig::default_sorted_limit")]
    pub sorted_default_limit: u32,
    #[serde(default = "PaginationConfig::default_limit")]
    pub query_default_limit: u32,
}

impl PaginationConfig {
    const fn default_limit() -> u32 {
        5
    }

    const fn default_sorted_limit() -> u32 {
        3
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: Self::default_limit(),
            sorted_default_limit: Self::default_sorted_limit(),
            query_default_limit: Self::default_limit(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use roster_config::load;
///
/// std::env::remove_var("ROSTER_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default("database.url", defaults.database.url.clone())?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )?
        .set_default("store.backend", defaults.store.backend.as_str())?
        .set_default(
            "pagination.default_limit",
            i64::from(defaults.pagination.default_limit),
        )?
        .set_default(
            "pagination.sorted_default_limit",
            i64::from(defaults.pagination.sorted_default_limit),
        )?
        .set_default(
            "pagination.query_default_limit",
            i64::from(defaults.pagination.query_default_limit),
        )?;

    let environment_overrides = config::Environment::with_prefix("ROSTER").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("ROSTER_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via ROSTER_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    validate(&config)?;

    debug!(?config, "loaded roster configuration");
    Ok(config)
}

fn validate(config: &AppConfig) -> anyhow::Result<()> {
    ensure!(
        config.database.max_connections > 0,
        "database.max_connections must be greater than zero"
    );
    let pagination = &config.pagination;
    ensure!(
        pagination.default_limit > 0
            && pagination.sorted_default_limit > 0
            && pagination.query_default_limit > 0,
        "pagination limits must be greater than zero"
    );
    Ok(())
}
