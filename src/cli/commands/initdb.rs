use std::path::Path;

use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tracing::{info, debug, trace, error};

pub async fn init_database(database_url: &str) -> Result<()> {
    trace!("Entering init_database function");
    info!("Initializing database");
    debug!("Database URL: {}", database_url);

    prepare_sqlite_path(database_url)?;

    trace!("Attempting to connect to database");
    let db: DatabaseConnection = match Database::connect(database_url).await {
        Ok(connection) => {
            info!("Successfully connected to database");
            connection
        }
        Err(e) => {
            error!("Failed to connect to database '{}': {}", database_url, e);
            return Err(e.into());
        }
    };

    info!("Running database migrations");
    match Migrator::up(&db, None).await {
        Ok(_) => {
            info!("Database migrations completed successfully");
        }
        Err(e) => {
            error!("Failed to run database migrations: {}", e);
            return Err(e.into());
        }
    }

    info!("Database initialization completed successfully!");
    trace!("init_database function completed");

    Ok(())
}

/// Creates the parent directory of a SQLite database file so a fresh
/// checkout can initialize into a path like `data/gatevas.db`.
fn prepare_sqlite_path(database_url: &str) -> Result<()> {
    let Some(raw_path) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let file_path = raw_path.split('?').next().unwrap_or(raw_path);

    if let Some(parent) = Path::new(file_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            debug!("Created database directory {}", parent.display());
        }
    }

    Ok(())
}
