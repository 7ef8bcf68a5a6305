//! # Duologue
//!
//! Duologue puts two language-model personas side by side. Each persona ("agent") is bound
//! to its own chat-completion provider, model and behavioural prompt, and the crate offers
//! two ways of talking to them:
//!
//! * **Dual chat**: the same incoming conversation is sent to both agents at once and both
//!   replies come back together ([`dual_chat::dual_chat`]).
//! * **Debate**: the agents argue a topic over several rounds, each one rebutting the
//!   other's latest statement ([`debate::Debate`]).
//!
//! Providers sit behind the [`ClientWrapper`] trait. [`clients::openai::OpenAIClient`]
//! speaks the OpenAI chat-completions wire format and [`clients::deepseek::DeepSeekClient`]
//! reuses it against DeepSeek's endpoint.
//!
//! A provider failure never aborts an operation: the failing agent's slot carries a
//! [`TurnOutcome::Failure`](agent::TurnOutcome) that renders as a short diagnostic line,
//! while the other agent keeps talking.
//!
//! ## Getting Started
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use duologue::agent::Agent;
//! use duologue::clients::deepseek::DeepSeekClient;
//! use duologue::clients::openai::OpenAIClient;
//! use duologue::debate::Debate;
//! use duologue::DuologueConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     duologue::init_logger();
//!
//!     let config = DuologueConfig::from_env();
//!     let peach = Agent::new("Peach", Arc::new(OpenAIClient::from_config(&config)))
//!         .with_persona("Punk Riot Grrrl");
//!     let dragon = Agent::new("Dragon", Arc::new(DeepSeekClient::from_config(&config)))
//!         .with_persona("Philosophical Trickster");
//!
//!     let transcript = Debate::new(peach, dragon)
//!         .run("Is generative AI good for artists?", 2)
//!         .await?;
//!
//!     for turn in &transcript.turns {
//!         println!("[{} / round {}] {}", turn.agent, turn.round, turn.content);
//!     }
//!     Ok(())
//! }
//! ```

use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialise the global [`env_logger`] subscriber exactly once.
///
/// Diagnostics are driven by `RUST_LOG`; calling this more than once is harmless.
///
/// ```rust
/// duologue::init_logger();
/// log::info!("Logger is ready");
/// ```
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        env_logger::init();
    });
}

pub mod duologue;

pub use duologue::agent;
pub use duologue::agent::{Agent, TurnOutcome};
pub use duologue::client_wrapper;
pub use duologue::client_wrapper::{ClientWrapper, CompletionRequest, Message, ProviderError, Role};
pub use duologue::clients;
pub use duologue::config::DuologueConfig;
pub use duologue::debate;
pub use duologue::debate::{Debate, Transcript, Turn};
pub use duologue::dual_chat;
pub use duologue::event;
pub use duologue::event::{DebateEvent, EventHandler};
pub use duologue::interaction_log;
pub use duologue::language;
pub use duologue::persona;
pub use duologue::request;
#[cfg(feature = "server")]
pub use duologue::server;
pub use duologue::validation;
pub use duologue::validation::ValidationError;
