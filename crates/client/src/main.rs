//! `bot` binary entry point.
//!
//! Reads configuration from the environment (and `.env`), logs to the
//! per-session cache directory and plays games in a simulated world until the
//! game limit is reached or Ctrl-C is pressed.
//!
//! ```bash
//! BOT_SCENARIO=crates/client/scenarios/cellar.ron BOT_MAX_GAMES=5 cargo run -p bot-client
//! ```
use anyhow::Result;
use bot_client::{Client, ClientConfig, logging, runs, world};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let (session_id, _guard) = logging::setup_logging(config.session_id.as_deref())?;

    tracing::info!("Starting bot session {}", session_id);
    let world = world::load_world(config.scenario.as_deref())?;

    let client = Client::builder()
        .config(ClientConfig {
            session_id: Some(session_id),
            ..config
        })
        .world(world)
        .runs(runs::default_runs())
        .build()?;

    let report = client.run().await?;
    tracing::info!(games = report.games, failed = report.failed, "session finished");
    Ok(())
}
