use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use tracing::info;

pub async fn init_database(database_url: &str) -> Result<()> {
    info!("Initializing database at {}", database_url);

    let db = Database::connect(database_url).await?;

    info!("Running database migrations");
    Migrator::up(&db, None).await?;

    info!("Database initialization completed successfully");
    Ok(())
}
