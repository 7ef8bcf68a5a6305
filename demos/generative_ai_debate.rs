//! Generative AI Debate Example
//!
//! Peach (OpenAI, punk riot grrrl) and Dragon (DeepSeek, philosophical trickster) argue
//! whether generative AI is good for artists, then each delivers a closing line.
//!
//! Run with:
//! ```bash
//! export OPENAI_API_KEY=your_key
//! export DEEPSEEK_API_KEY=your_key
//! cargo run --example generative_ai_debate
//! ```
//!
//! A missing key does not stop the example: that agent's turns show the configuration
//! error and the other agent rebuts it.

use duologue::clients::deepseek::DeepSeekClient;
use duologue::clients::openai::OpenAIClient;
use duologue::event::LoggingEventHandler;
use duologue::persona::{DEFAULT_PERSONA_A, DEFAULT_PERSONA_B, DRAGON_NAME, PEACH_NAME};
use duologue::{Agent, Debate, DuologueConfig};
use std::error::Error as StdError;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn StdError>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            return Err(err.into());
        }
    }

    let config = DuologueConfig::from_env();
    let peach = Agent::new(PEACH_NAME, Arc::new(OpenAIClient::from_config(&config)))
        .with_persona(DEFAULT_PERSONA_A)
        .with_temperature(0.8);
    let dragon = Agent::new(DRAGON_NAME, Arc::new(DeepSeekClient::from_config(&config)))
        .with_persona(DEFAULT_PERSONA_B)
        .with_temperature(0.8);

    println!("\n{}", "=".repeat(80));
    println!("  PEACH x DRAGON: Is generative AI good for artists?");
    println!("{}\n", "=".repeat(80));

    let transcript = Debate::new(peach, dragon)
        .with_max_rounds(config.max_debate_rounds)
        .with_closing(true)
        .with_event_handler(Arc::new(LoggingEventHandler))
        .run("Is generative AI good for artists?", 2)
        .await?;

    for turn in &transcript.turns {
        println!("[Round {}] {}:\n{}\n", turn.round, turn.agent, turn.content);
    }
    if let Some(closing) = &transcript.closing {
        println!("CLOSING");
        println!("{}: {}", PEACH_NAME, closing.agent_a);
        println!("{}: {}", DRAGON_NAME, closing.agent_b);
    }
    println!("\n{}", serde_json::to_string_pretty(&transcript)?);
    Ok(())
}
