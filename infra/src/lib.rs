//! # Infrastructure Layer
//!
//! Concrete implementations behind the `sy_core` repository traits, and the
//! wiring that turns an [`AppConfig`] into ready-to-use services.
//!
//! - **Database**: MySQL connection pool, embedded migrations and the
//!   `MySqlUserRepository` / `MySqlTokenRepository` implementations
//! - **Services**: [`ShipyardServices`], built by [`initialize`]
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

use std::sync::Arc;

use sy_core::services::{
    TokenCleanupConfig, TokenCleanupService, TokenService, TokenServiceConfig, UserService,
    UserServiceConfig,
};
use sy_shared::{AppConfig, ConfigError};
use tokio::task::JoinHandle;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

#[cfg(feature = "mysql")]
use database::{DatabasePool, MySqlTokenRepository, MySqlUserRepository};

/// Services backed by MySQL, sharing one connection pool
#[cfg(feature = "mysql")]
pub struct ShipyardServices {
    pub pool: DatabasePool,
    pub tokens: Arc<TokenService<MySqlTokenRepository>>,
    pub users: Arc<UserService<MySqlUserRepository>>,
    pub cleanup: Arc<TokenCleanupService<MySqlTokenRepository>>,
    cleanup_task: Option<JoinHandle<()>>,
}

#[cfg(feature = "mysql")]
impl ShipyardServices {
    /// Build the services on top of an existing pool
    ///
    /// No background task is started; see [`ShipyardServices::start_cleanup`].
    pub fn new(pool: DatabasePool, config: &AppConfig) -> Self {
        let token_repository = MySqlTokenRepository::new(pool.get_pool().clone());
        let user_repository = MySqlUserRepository::new(pool.get_pool().clone());

        let tokens = TokenService::new(
            token_repository.clone(),
            TokenServiceConfig::from(&config.auth.token),
        );
        let users = UserService::new(user_repository, UserServiceConfig::from(&config.auth));
        let cleanup = TokenCleanupService::new(
            Arc::new(token_repository),
            TokenCleanupConfig::from(&config.auth.cleanup),
        );

        Self {
            pool,
            tokens: Arc::new(tokens),
            users: Arc::new(users),
            cleanup: Arc::new(cleanup),
            cleanup_task: None,
        }
    }

    /// Start the periodic expired-token sweep if enabled and not yet running
    pub fn start_cleanup(&mut self) -> bool {
        if self.cleanup_task.is_none() {
            self.cleanup_task = self.cleanup.clone().start_background_task();
        }
        self.cleanup_task.is_some()
    }

    /// Stop background work and close the pool
    pub async fn shutdown(mut self) {
        if let Some(task) = self.cleanup_task.take() {
            task.abort();
        }
        self.pool.close().await;
    }
}

/// Initialize infrastructure services
///
/// Loads configuration (see [`load_config`]), connects to MySQL, applies
/// migrations when `database.run_migrations` is set and starts the token
/// cleanup task.
#[cfg(feature = "mysql")]
pub async fn initialize() -> Result<ShipyardServices, InfrastructureError> {
    let config = load_config()?;
    initialize_with(&config).await
}

/// Initialize infrastructure services from an already loaded configuration
#[cfg(feature = "mysql")]
pub async fn initialize_with(config: &AppConfig) -> Result<ShipyardServices, InfrastructureError> {
    tracing::info!(environment = %config.environment, "Initializing infrastructure services...");

    let pool = DatabasePool::new(config.database.clone()).await?;
    if config.database.run_migrations {
        pool.run_migrations().await?;
    }

    let mut services = ShipyardServices::new(pool, config);
    let cleanup_running = services.start_cleanup();

    tracing::info!(cleanup_running, "Infrastructure services initialized successfully");
    Ok(services)
}

/// Load application configuration
///
/// Reads `.env`, optional `config/*.toml` files and `SHIPYARD__*` variables.
pub fn load_config() -> Result<AppConfig, InfrastructureError> {
    Ok(AppConfig::load()?)
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failure
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration could not be loaded or validated
    #[error(transparent)]
    Settings(#[from] ConfigError),
}
