use std::time::Duration;

use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tokio::sync::OnceCell;

use crate::config::APP_CONFIG;

pub static DATABASE_CONNECTION: OnceCell<DatabaseConnection> = OnceCell::const_new();

async fn connect() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(APP_CONFIG.database_url.clone());
    options
        .max_connections(APP_CONFIG.db_max_connections)
        .acquire_timeout(Duration::from_secs(APP_CONFIG.db_acquire_timeout_secs))
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .context("Failed to connect to database")?;

    if APP_CONFIG.run_migrations {
        tracing::info!("Running pending migrations...");
        Migrator::up(&db, None)
            .await
            .context("Failed to run migrations")?;
    }

    Ok(db)
}

/// Opens the process-wide connection on first use.
pub async fn init_database_connection() -> Result<&'static DatabaseConnection> {
    DATABASE_CONNECTION.get_or_try_init(connect).await
}

pub fn get_database_connection() -> &'static DatabaseConnection {
    DATABASE_CONNECTION
        .get()
        .expect("DATABASE_CONNECTION not set")
}
