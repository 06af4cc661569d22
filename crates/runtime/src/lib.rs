use std::sync::Arc;

use anyhow::Result;
use roster_backend_api::AppState;
use roster_config::{AppConfig, PaginationConfig, StoreBackend};
use roster_database::{
    prepare_database, run_migrations, MemoryUserRepository, UserRepository, UserStore,
};
use sqlx::SqlitePool;
use tracing::info;

pub mod telemetry {
    use anyhow::Result;
    use tracing::Level;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    /// Logs go to stderr; stdout is reserved for command output.
    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_max_level(Level::TRACE)
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

#[derive(Clone)]
pub struct BackendServices {
    pub store: Arc<dyn UserStore>,
    /// Present only for the SQLite backend.
    pub db_pool: Option<SqlitePool>,
    pub pagination: PaginationConfig,
}

impl BackendServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let (store, db_pool): (Arc<dyn UserStore>, _) = match config.store.backend {
            StoreBackend::Sqlite => {
                let pool = prepare_database(&config.database).await?;
                run_migrations(&pool).await?;
                info!(url = %config.database.url, "sqlite store ready");
                (Arc::new(UserRepository::new(pool.clone())), Some(pool))
            }
            StoreBackend::Memory => {
                info!("in-memory store ready; records are lost on exit");
                (Arc::new(MemoryUserRepository::new()), None)
            }
        };

        Ok(Self {
            store,
            db_pool,
            pagination: config.pagination.clone(),
        })
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(self.store.clone(), self.pagination.clone())
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
