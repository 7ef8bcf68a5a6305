//! Duologue HTTP server.
//!
//! Reads `.env` (if present) and the process environment, then serves `/chat`, `/debate`,
//! `/health` and `/personas` on `DUOLOGUE_BIND` (default `127.0.0.1:8000`).
//!
//! ```bash
//! export OPENAI_API_KEY=...
//! export DEEPSEEK_API_KEY=...
//! RUST_LOG=info cargo run --bin duologue
//! ```

use std::error::Error;

use duologue::server::{start_server, AppState};
use duologue::DuologueConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            return Err(err.into());
        }
    }
    duologue::init_logger();

    let config = DuologueConfig::from_env();
    log::info!(
        "OPENAI key …{}",
        config.openai_key_suffix().as_deref().unwrap_or("MISSING")
    );
    log::info!(
        "DEEPSEEK key …{}",
        config.deepseek_key_suffix().as_deref().unwrap_or("MISSING")
    );
    if let Some(path) = &config.interaction_log {
        log::info!("recording interactions to {}", path.display());
    }

    let addr = config.bind_addr;
    start_server(AppState::from_config(config), addr).await?;
    Ok(())
}
