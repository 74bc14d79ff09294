#![allow(clippy::result_large_err)]

use download_desk::{
    bot, config,
    core::store::ListingStore,
    errors::Result,
};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the configuration; a fresh or placeholder config stops here
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;

    // 4. Open the listings store
    let store = ListingStore::open(&app_config.listings_path)
        .await
        .inspect(|_| info!("Listings store opened successfully."))
        .inspect_err(|e| error!("Failed to open listings store: {}", e))?;

    // 5. Run the bot
    bot::run_bot(app_config, store).await
}
