//! Single-shot fan-out of one conversation to both agents.
//!
//! Both agents get the caller's history with their own system prompt in front of it and
//! are called concurrently. One side failing never fails the other.

use futures_util::future::join;

use crate::client_wrapper::{Message, Role};
use crate::duologue::agent::{Agent, TurnOutcome};
use crate::duologue::language::{detect_language, Language};
use crate::duologue::validation::{validate_history, ValidationError};

/// Both agents' answers to the same history.
#[derive(Debug, Clone, PartialEq)]
pub struct DualReply {
    pub agent_a: TurnOutcome,
    pub agent_b: TurnOutcome,
    /// Language the replies were asked for.
    pub language: Language,
}

/// Language of the caller's most recent user message, English when there is none.
pub fn reply_language(history: &[Message]) -> Language {
    history
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| detect_language(&m.content))
        .unwrap_or(Language::En)
}

/// Build the history one agent is called with: its system prompt, then the caller's
/// messages unchanged.
pub fn seeded_history(agent: &Agent, history: &[Message], language: Language) -> Vec<Message> {
    let mut seeded = Vec::with_capacity(history.len() + 1);
    seeded.push(Message::system(agent.chat_system_prompt(language)));
    seeded.extend_from_slice(history);
    seeded
}

/// Send `history` to both agents at once.
///
/// An empty `history` is rejected before either provider is called.
///
/// ```rust,no_run
/// use duologue::{Agent, Message};
/// use duologue::clients::deepseek::DeepSeekClient;
/// use duologue::clients::openai::OpenAIClient;
/// use duologue::dual_chat::dual_chat;
/// use std::sync::Arc;
///
/// # async {
/// let peach = Agent::new("Peach", Arc::new(OpenAIClient::new_with_model_string("sk-...", "gpt-4.1")));
/// let dragon = Agent::new("Dragon", Arc::new(DeepSeekClient::new_with_model_str("", "deepseek-chat")));
///
/// let reply = dual_chat(&[Message::user("hello")], &peach, &dragon).await.unwrap();
/// println!("{}", reply.agent_a.render(&peach.name));
/// // "Dragon error: DEEPSEEK_API_KEY missing on server."
/// println!("{}", reply.agent_b.render(&dragon.name));
/// # };
/// ```
pub async fn dual_chat(
    history: &[Message],
    agent_a: &Agent,
    agent_b: &Agent,
) -> Result<DualReply, ValidationError> {
    validate_history(history)?;
    let language = reply_language(history);
    let history_a = seeded_history(agent_a, history, language);
    let history_b = seeded_history(agent_b, history, language);

    log::debug!(
        "dual_chat(...): {} message(s), reply language {}",
        history.len(),
        language.code()
    );

    let (agent_a_outcome, agent_b_outcome) =
        join(agent_a.respond(&history_a), agent_b.respond(&history_b)).await;

    Ok(DualReply {
        agent_a: agent_a_outcome,
        agent_b: agent_b_outcome,
        language,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_follows_last_user_message() {
        let history = vec![
            Message::user("What is this?"),
            Message::assistant("Eso es arte."),
            Message::user("¿Y qué es el arte para ti?"),
        ];
        assert_eq!(reply_language(&history), Language::Es);
        assert_eq!(reply_language(&[Message::system("hola y que")]), Language::En);
    }
}
