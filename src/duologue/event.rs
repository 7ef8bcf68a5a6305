//! Debate event system.
//!
//! Implement [`EventHandler`] to be told what a [`Debate`](crate::debate::Debate) is doing
//! while it runs:
//!
//! - **Debate lifecycle**: start with the clamped round count, completion with the number
//!   of recorded turns
//! - **Turns**: each agent's call to its provider, and whether it succeeded or failed
//!
//! The handler method has a default no-op implementation and is shared as
//! `Arc<dyn EventHandler>`, attached with
//! [`Debate::with_event_handler`](crate::debate::Debate::with_event_handler).
//!
//! # Example
//!
//! ```rust,no_run
//! use duologue::event::{DebateEvent, EventHandler};
//! use async_trait::async_trait;
//!
//! struct Printer;
//!
//! #[async_trait]
//! impl EventHandler for Printer {
//!     async fn on_debate_event(&self, event: &DebateEvent) {
//!         if let DebateEvent::TurnCompleted { agent_name, round, response_length, .. } = event {
//!             println!("{} finished round {} ({} chars)", agent_name, round, response_length);
//!         }
//!     }
//! }
//! ```

use async_trait::async_trait;

/// Events emitted by [`Debate::run`](crate::debate::Debate::run).
///
/// Every variant carries the `debate_id` of the transcript being built, so a handler
/// shared between concurrent debates can tell them apart.
///
/// # Event Flow
///
/// ```text
/// DebateStarted
///   └─ per round, for Agent A then Agent B:
///       ├─ TurnStarted
///       └─ TurnCompleted | TurnFailed
/// DebateCompleted
/// ```
#[derive(Debug, Clone)]
pub enum DebateEvent {
    /// The debate has seeded both histories and is about to run round 1.
    DebateStarted {
        debate_id: String,
        topic: String,
        /// Round count after clamping.
        rounds: usize,
    },
    /// An agent is about to call its provider.
    TurnStarted {
        debate_id: String,
        agent_name: String,
        round: usize,
    },
    /// The provider answered.
    TurnCompleted {
        debate_id: String,
        agent_name: String,
        round: usize,
        /// Character length of the reply.
        response_length: usize,
    },
    /// The provider call failed; the turn carries the rendered error text instead.
    TurnFailed {
        debate_id: String,
        agent_name: String,
        round: usize,
        error: String,
    },
    /// All rounds (and closing statements, if requested) are done.
    DebateCompleted {
        debate_id: String,
        turns: usize,
        failed_turns: usize,
    },
}

/// Receives [`DebateEvent`]s.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Called for every debate event. The default implementation is a no-op.
    async fn on_debate_event(&self, _event: &DebateEvent) {}
}

/// Forwards every event to the `log` facade.
///
/// Lifecycle events go to `info!`, turn starts to `debug!`, failures to `warn!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingEventHandler;

#[async_trait]
impl EventHandler for LoggingEventHandler {
    async fn on_debate_event(&self, event: &DebateEvent) {
        match event {
            DebateEvent::DebateStarted {
                debate_id,
                topic,
                rounds,
            } => log::info!(
                "debate {} started: {} round(s) on {:?}",
                debate_id,
                rounds,
                topic
            ),
            DebateEvent::TurnStarted {
                debate_id,
                agent_name,
                round,
            } => log::debug!("debate {} round {}: {} speaking", debate_id, round, agent_name),
            DebateEvent::TurnCompleted {
                debate_id,
                agent_name,
                round,
                response_length,
            } => log::debug!(
                "debate {} round {}: {} replied ({} chars)",
                debate_id,
                round,
                agent_name,
                response_length
            ),
            DebateEvent::TurnFailed {
                debate_id,
                agent_name,
                round,
                error,
            } => log::warn!(
                "debate {} round {}: {} failed: {}",
                debate_id,
                round,
                agent_name,
                error
            ),
            DebateEvent::DebateCompleted {
                debate_id,
                turns,
                failed_turns,
            } => log::info!(
                "debate {} completed: {} turn(s), {} failed",
                debate_id,
                turns,
                failed_turns
            ),
        }
    }
}
