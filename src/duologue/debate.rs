//! Two-agent debates.
//!
//! A [`Debate`] makes Agent A and Agent B argue a topic over a number of rounds. Each
//! round is exactly one turn from A followed by one turn from B:
//!
//! ```text
//! round 1:  A opens on the topic        B rebuts A's opening
//! round i:  A rebuts B's round i-1      B rebuts A's round i
//! ```
//!
//! Each agent keeps its own history, seeded with its own system prompt. An agent only ever
//! sees the other's *rendered output text*, quoted inside a user turn, never the other's
//! history or system prompt. A failed provider call becomes that turn's content
//! (`"<Agent> error: ..."`) and the debate carries on; the opponent rebuts the error text.
//!
//! # Example
//!
//! ```rust,no_run
//! use duologue::{Agent, Debate};
//! use duologue::clients::deepseek::DeepSeekClient;
//! use duologue::clients::openai::OpenAIClient;
//! use std::sync::Arc;
//!
//! # async {
//! let peach = Agent::new("Peach", Arc::new(OpenAIClient::new_with_model_string("sk-...", "gpt-4.1")));
//! let dragon = Agent::new("Dragon", Arc::new(DeepSeekClient::new_with_model_str("sk-...", "deepseek-chat")));
//!
//! let transcript = Debate::new(peach, dragon)
//!     .with_max_rounds(4)
//!     .with_closing(true)
//!     .run("Should museums return colonial-era artifacts?", 3)
//!     .await
//!     .unwrap();
//! assert_eq!(transcript.turns.len(), 6);
//! # };
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::join;
use serde::Serialize;
use uuid::Uuid;

use crate::client_wrapper::Message;
use crate::duologue::agent::{Agent, TurnOutcome};
use crate::duologue::config::DEFAULT_MAX_DEBATE_ROUNDS;
use crate::duologue::event::{DebateEvent, EventHandler};
use crate::duologue::validation::{validate_topic, ValidationError};

/// User turn asking each agent for its closing line.
pub const CLOSING_PROMPT: &str = "Now deliver a 1-sentence closing line.";

/// One utterance of one agent in one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    /// Display name of the speaking agent.
    pub agent: String,
    /// 1-based round number.
    pub round: usize,
    /// Reply text, or the rendered error when the call failed.
    pub content: String,
}

/// Closing lines, asked for after the last round when enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosingStatements {
    pub agent_a: String,
    pub agent_b: String,
}

/// Result of [`Debate::run`].
///
/// `turns` always holds `2 * rounds` entries, alternating A, B with round numbers
/// `1, 1, 2, 2, ..., rounds, rounds`. Closing statements live outside that list.
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub id: Uuid,
    pub topic: String,
    /// Round count actually run, after clamping.
    pub rounds: usize,
    pub timestamp: DateTime<Utc>,
    pub turns: Vec<Turn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing: Option<ClosingStatements>,
}

impl Transcript {
    /// Turns spoken by `agent`, in order.
    pub fn turns_by<'a>(&'a self, agent: &'a str) -> impl Iterator<Item = &'a Turn> + 'a {
        self.turns.iter().filter(move |turn| turn.agent == agent)
    }
}

/// Clamp a requested round count into `[1, max_rounds]`.
///
/// Zero and negative requests run a single round. A `max_rounds` of zero is treated as one.
///
/// ```rust
/// use duologue::debate::clamp_rounds;
///
/// assert_eq!(clamp_rounds(-3, 6), 1);
/// assert_eq!(clamp_rounds(0, 6), 1);
/// assert_eq!(clamp_rounds(4, 6), 4);
/// assert_eq!(clamp_rounds(40, 6), 6);
/// ```
pub fn clamp_rounds(requested: i64, max_rounds: u32) -> usize {
    let ceiling = max_rounds.max(1) as i64;
    requested.clamp(1, ceiling) as usize
}

/// User turn for Agent A in round 1.
pub fn opening_prompt(topic: &str, rounds: usize) -> String {
    format!(
        "Round 1/{}. Topic: {}\nPlease lead the debate with a strong opening on: {}",
        rounds, topic, topic
    )
}

/// User turn for Agent A from round 2 on: rebut B's latest output and add a new angle.
pub fn rebuttal_prompt(
    opponent: &str,
    opponent_text: &str,
    topic: &str,
    round: usize,
    rounds: usize,
) -> String {
    format!(
        "Round {}/{}. Topic: {}\n{} argued:\n\"\"\"\n{}\n\"\"\"\nRebut it and add one new angle.",
        round, rounds, topic, opponent, opponent_text
    )
}

/// User turn for Agent B in every round: answer A's output of the same round.
pub fn counter_prompt(
    opponent: &str,
    opponent_text: &str,
    topic: &str,
    round: usize,
    rounds: usize,
) -> String {
    format!(
        "Round {}/{}. Topic: {}\n{} argued:\n\"\"\"\n{}\n\"\"\"\nDirectly rebut the key claims and add one original point.",
        round, rounds, topic, opponent, opponent_text
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Side {
    A,
    B,
}

/// Everything one debate run owns. Dropped when `run` returns.
struct DebateState {
    history_a: Vec<Message>,
    history_b: Vec<Message>,
    // Keyed by side so two agents with the same display name never collide.
    last_output: HashMap<Side, String>,
    failed_turns: usize,
}

impl DebateState {
    fn history_mut(&mut self, side: Side) -> &mut Vec<Message> {
        match side {
            Side::A => &mut self.history_a,
            Side::B => &mut self.history_b,
        }
    }
}

/// Debate between two agents. See the [module documentation](self).
pub struct Debate {
    agent_a: Agent,
    agent_b: Agent,
    max_rounds: u32,
    closing: bool,
    event_handler: Option<Arc<dyn EventHandler>>,
}

impl Debate {
    pub fn new(agent_a: Agent, agent_b: Agent) -> Self {
        Debate {
            agent_a,
            agent_b,
            max_rounds: DEFAULT_MAX_DEBATE_ROUNDS,
            closing: false,
            event_handler: None,
        }
    }

    /// Upper bound applied to the requested round count.
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    /// Ask both agents for a one-sentence closing line after the last round.
    pub fn with_closing(mut self, closing: bool) -> Self {
        self.closing = closing;
        self
    }

    pub fn with_event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    pub fn agent_a(&self) -> &Agent {
        &self.agent_a
    }

    pub fn agent_b(&self) -> &Agent {
        &self.agent_b
    }

    async fn emit(&self, event: DebateEvent) {
        if let Some(handler) = &self.event_handler {
            handler.on_debate_event(&event).await;
        }
    }

    fn agent(&self, side: Side) -> &Agent {
        match side {
            Side::A => &self.agent_a,
            Side::B => &self.agent_b,
        }
    }

    /// Run the debate on `topic`.
    ///
    /// `rounds` is clamped with [`clamp_rounds`]. The returned transcript always has
    /// `2 * rounds` turns, whatever the providers do. A topic shorter than
    /// [`MIN_TOPIC_CHARS`](crate::duologue::validation::MIN_TOPIC_CHARS) is rejected before
    /// any provider is called.
    pub async fn run(&self, topic: &str, rounds: i64) -> Result<Transcript, ValidationError> {
        let topic = validate_topic(topic)?;
        let rounds = clamp_rounds(rounds, self.max_rounds);
        let id = Uuid::new_v4();
        let debate_id = id.to_string();

        let mut state = DebateState {
            history_a: vec![Message::system(self.agent_a.debate_system_prompt())],
            history_b: vec![Message::system(self.agent_b.debate_system_prompt())],
            last_output: HashMap::new(),
            failed_turns: 0,
        };
        let mut turns = Vec::with_capacity(rounds * 2);

        self.emit(DebateEvent::DebateStarted {
            debate_id: debate_id.clone(),
            topic: topic.to_string(),
            rounds,
        })
        .await;

        for round in 1..=rounds {
            // B has spoken iff this is not round 1.
            let prompt_a = match state.last_output.get(&Side::B) {
                Some(text) => rebuttal_prompt(&self.agent_b.name, text, topic, round, rounds),
                None => opening_prompt(topic, rounds),
            };
            let content_a = self
                .take_turn(&mut state, Side::A, prompt_a, round, &debate_id)
                .await;
            turns.push(Turn {
                agent: self.agent_a.name.clone(),
                round,
                content: content_a.clone(),
            });

            let prompt_b = counter_prompt(&self.agent_a.name, &content_a, topic, round, rounds);
            let content_b = self
                .take_turn(&mut state, Side::B, prompt_b, round, &debate_id)
                .await;
            turns.push(Turn {
                agent: self.agent_b.name.clone(),
                round,
                content: content_b,
            });
        }

        let closing = if self.closing {
            Some(self.closing_statements(&state).await)
        } else {
            None
        };

        self.emit(DebateEvent::DebateCompleted {
            debate_id,
            turns: turns.len(),
            failed_turns: state.failed_turns,
        })
        .await;

        Ok(Transcript {
            id,
            topic: topic.to_string(),
            rounds,
            timestamp: Utc::now(),
            turns,
            closing,
        })
    }

    /// One agent speaks. Returns the rendered content of the turn.
    ///
    /// On success the user turn and the reply are appended to the speaker's history. On
    /// failure the history is left as it was, so the next prompt is not built on an error.
    async fn take_turn(
        &self,
        state: &mut DebateState,
        side: Side,
        prompt: String,
        round: usize,
        debate_id: &str,
    ) -> String {
        let agent = self.agent(side);
        self.emit(DebateEvent::TurnStarted {
            debate_id: debate_id.to_string(),
            agent_name: agent.name.clone(),
            round,
        })
        .await;

        let history = state.history_mut(side);
        history.push(Message::user(prompt));
        let outcome = agent.respond(history).await;
        let content = outcome.render(&agent.name);

        match &outcome {
            TurnOutcome::Success(text) => {
                history.push(Message::assistant(text.clone()));
                self.emit(DebateEvent::TurnCompleted {
                    debate_id: debate_id.to_string(),
                    agent_name: agent.name.clone(),
                    round,
                    response_length: text.chars().count(),
                })
                .await;
            }
            TurnOutcome::Failure(err) => {
                history.pop();
                state.failed_turns += 1;
                self.emit(DebateEvent::TurnFailed {
                    debate_id: debate_id.to_string(),
                    agent_name: agent.name.clone(),
                    round,
                    error: err.to_string(),
                })
                .await;
            }
        }

        state.last_output.insert(side, content.clone());
        content
    }

    async fn closing_statements(&self, state: &DebateState) -> ClosingStatements {
        let mut history_a = state.history_a.clone();
        history_a.push(Message::user(CLOSING_PROMPT));
        let mut history_b = state.history_b.clone();
        history_b.push(Message::user(CLOSING_PROMPT));

        let (closing_a, closing_b) = join(
            self.agent_a.respond(&history_a),
            self.agent_b.respond(&history_b),
        )
        .await;

        ClosingStatements {
            agent_a: closing_a.render(&self.agent_a.name),
            agent_b: closing_b.render(&self.agent_b.name),
        }
    }
}
