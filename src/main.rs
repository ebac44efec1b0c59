use std::sync::Arc;

use bookit_api::config::{ApiConfig, StorageBackend};
use bookit_db::{MemoryStore, PgStore, Store, create_pool, schema::initialize_database, seed};
use color_eyre::eyre::{Result, eyre};
use dotenv::dotenv;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;
    bookit_api::init_tracing(config.log_level)?;

    let store: Arc<dyn Store> = match config.storage {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| eyre!("DATABASE_URL environment variable must be set"))?;

            // Create database connection pool and make sure the schema exists
            let db_pool = create_pool(database_url).await?;
            initialize_database(&db_pool).await?;

            Arc::new(PgStore::new(db_pool))
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage, data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    if config.seed_data {
        seed::seed_demo_data(store.as_ref()).await?;
    }

    // Start API server
    bookit_api::start_server(config, store).await?;

    Ok(())
}
