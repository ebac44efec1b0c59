use bookit_db::{PgStore, create_pool, schema::initialize_database, seed::seed_demo_data};
use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Creates the schema; `--seed` also loads the demo catalog.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let seed = std::env::args().skip(1).any(|arg| arg == "--seed");

    let database_url = std::env::var("DATABASE_URL")
        .wrap_err("DATABASE_URL environment variable must be set")?;

    info!("Connecting to database...");
    let db_pool = create_pool(&database_url).await?;

    initialize_database(&db_pool).await?;

    if seed {
        let summary = seed_demo_data(&PgStore::new(db_pool)).await?;
        info!(
            "Demo data loaded: {} experiences, {} promo codes",
            summary.experiences, summary.promos
        );
    }

    Ok(())
}
