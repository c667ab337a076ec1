use anyhow::Result;
use sea_orm::Database;
use std::path::PathBuf;

use crate::schemas::AppState;

/// Process-level configuration threaded through `AppState` instead of
/// living in process-wide globals.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Secret used to sign password-reset tokens.
    pub secret: String,
    /// Directory where uploaded profile pictures land.
    pub upload_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        // A freshly generated secret invalidates outstanding reset tokens
        // on restart; set TRAVELBOOK_SECRET to keep them alive.
        let secret = std::env::var("TRAVELBOOK_SECRET")
            .unwrap_or_else(|_| uuid::Uuid::new_v4().simple().to_string());
        let upload_dir = std::env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| "uploads/profile_pics".to_string());

        Self {
            secret,
            upload_dir: PathBuf::from(upload_dir),
        }
    }
}

/// Initialize application state for the given database URL
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Connect to database
    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    Ok(AppState {
        db,
        config: AppConfig::from_env(),
    })
}
