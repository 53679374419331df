//! refind server binary: HTTP trigger surface for the lost-and-found
//! matching engine.

use refind::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up a local .env before reading configuration
    let _ = dotenvy::dotenv();

    // Load configuration
    let config = ServerConfig::load()?;

    // Start server
    refind::start_server(config).await?;

    Ok(())
}
