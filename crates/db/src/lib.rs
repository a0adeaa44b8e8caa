pub mod indexes;
pub mod models;

use mongodb::{Client, Database};
use registrovivo_config::DatabaseSettings;
use tracing::info;

/// Connects to MongoDB and returns a handle to the configured database.
pub async fn connect(settings: &DatabaseSettings) -> mongodb::error::Result<Database> {
    let client = Client::with_uri_str(&settings.uri).await?;
    let db = client.database(&settings.name);
    info!(db = %settings.name, "Connected to MongoDB");
    Ok(db)
}
