use async_trait::async_trait;
use duologue::client_wrapper::{ClientWrapper, CompletionRequest, Message, ProviderError, Role};
use duologue::debate::{Debate, CLOSING_PROMPT};
use duologue::event::{DebateEvent, EventHandler};
use duologue::validation::ValidationError;
use duologue::Agent;
use std::sync::Arc;
use tokio::sync::Mutex;

type Calls = Arc<Mutex<Vec<(Vec<Message>, CompletionRequest)>>>;

/// Replies with "ECHO:" followed by the last user message, and records every call.
struct EchoClient {
    calls: Calls,
}

impl EchoClient {
    fn new() -> (Self, Calls) {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        (
            EchoClient {
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait]
impl ClientWrapper for EchoClient {
    fn provider_name(&self) -> &str {
        "echo"
    }

    fn default_model(&self) -> &str {
        "echo-1"
    }

    async fn send_message(
        &self,
        messages: &[Message],
        request: &CompletionRequest,
    ) -> Result<Message, ProviderError> {
        self.calls
            .lock()
            .await
            .push((messages.to_vec(), request.clone()));
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        Ok(Message::assistant(format!("ECHO:{}", last_user)))
    }
}

/// Always answers HTTP 500, and records every call.
struct FailingClient {
    calls: Calls,
}

#[async_trait]
impl ClientWrapper for FailingClient {
    fn provider_name(&self) -> &str {
        "failing"
    }

    fn default_model(&self) -> &str {
        "failing-1"
    }

    async fn send_message(
        &self,
        messages: &[Message],
        request: &CompletionRequest,
    ) -> Result<Message, ProviderError> {
        self.calls
            .lock()
            .await
            .push((messages.to_vec(), request.clone()));
        Err(ProviderError::Status {
            provider: "failing".to_string(),
            status: 500,
            detail: "boom".to_string(),
        })
    }
}

fn last_user(messages: &[Message]) -> &str {
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .unwrap_or("")
}

fn echo_pair() -> (Agent, Calls, Agent, Calls) {
    let (client_a, calls_a) = EchoClient::new();
    let (client_b, calls_b) = EchoClient::new();
    (
        Agent::new("Peach", Arc::new(client_a)).with_persona("Punk Riot Grrrl"),
        calls_a,
        Agent::new("Dragon", Arc::new(client_b)).with_persona("Philosophical Trickster"),
        calls_b,
    )
}

#[tokio::test]
async fn test_turns_alternate_with_round_numbers() {
    let (peach, _, dragon, _) = echo_pair();
    let transcript = Debate::new(peach, dragon).run("Who owns a remix?", 3).await.unwrap();

    assert_eq!(transcript.rounds, 3);
    assert_eq!(transcript.turns.len(), 6);
    let agents: Vec<&str> = transcript.turns.iter().map(|t| t.agent.as_str()).collect();
    assert_eq!(agents, ["Peach", "Dragon", "Peach", "Dragon", "Peach", "Dragon"]);
    let rounds: Vec<usize> = transcript.turns.iter().map(|t| t.round).collect();
    assert_eq!(rounds, [1, 1, 2, 2, 3, 3]);
    assert!(transcript.closing.is_none());
    assert_eq!(transcript.turns_by("Dragon").count(), 3);
}

#[tokio::test]
async fn test_generative_ai_echo_scenario() {
    let (peach, _, dragon, _) = echo_pair();
    let transcript = Debate::new(peach, dragon)
        .run("Is generative AI good for artists?", 2)
        .await.unwrap();

    let turns = &transcript.turns;
    assert_eq!(transcript.topic, "Is generative AI good for artists?");
    assert_eq!(turns.len(), 4);

    assert_eq!((turns[0].agent.as_str(), turns[0].round), ("Peach", 1));
    assert!(turns[0].content.starts_with("ECHO:"));
    assert!(turns[0].content.contains("lead the debate"));
    assert!(turns[0].content.contains("Is generative AI good for artists?"));

    assert_eq!((turns[1].agent.as_str(), turns[1].round), ("Dragon", 1));
    assert!(turns[1].content.starts_with("ECHO:"));
    assert!(turns[1].content.contains(&turns[0].content));

    assert_eq!((turns[2].agent.as_str(), turns[2].round), ("Peach", 2));
    assert!(turns[2].content.starts_with("ECHO:"));
    assert!(turns[2].content.contains(&turns[1].content));

    assert_eq!((turns[3].agent.as_str(), turns[3].round), ("Dragon", 2));
    assert!(turns[3].content.starts_with("ECHO:"));
    assert!(turns[3].content.contains(&turns[2].content));
}

#[tokio::test]
async fn test_prompts_quote_the_opponent_verbatim() {
    let (peach, calls_a, dragon, calls_b) = echo_pair();
    let transcript = Debate::new(peach, dragon).run("Is art labour?", 3).await.unwrap();
    let calls_a = calls_a.lock().await;
    let calls_b = calls_b.lock().await;
    assert_eq!(calls_a.len(), 3);
    assert_eq!(calls_b.len(), 3);

    let opening = last_user(&calls_a[0].0);
    assert!(opening.contains("lead the debate with a strong opening on: Is art labour?"));
    assert!(!opening.contains("argued"));

    for round in 1..=3usize {
        let i = round - 1;
        let a_text = &transcript.turns[2 * i].content;
        let b_prompt = last_user(&calls_b[i].0);
        assert!(b_prompt.contains(a_text.as_str()));
        assert!(b_prompt.contains(&format!("Round {}/3", round)));

        if round > 1 {
            let previous_b_text = &transcript.turns[2 * i - 1].content;
            let a_prompt = last_user(&calls_a[i].0);
            assert!(a_prompt.contains(previous_b_text.as_str()));
            assert!(a_prompt.contains(&format!("Round {}/3", round)));
            assert!(a_prompt.contains("Rebut it and add one new angle."));
        }
    }
}

#[tokio::test]
async fn test_histories_stay_independent() {
    let (peach, calls_a, dragon, calls_b) = echo_pair();
    Debate::new(peach, dragon).run("Is art labour?", 3).await.unwrap();
    let calls_a = calls_a.lock().await;
    let calls_b = calls_b.lock().await;

    for (round, (history, _)) in calls_a.iter().enumerate() {
        // system + (user, assistant) per earlier round + this round's user turn
        assert_eq!(history.len(), 2 + 2 * round);
        assert_eq!(history[0].role, Role::System);
        assert!(history[0].content.starts_with("You are Peach, a sharp feminist debater."));
        assert!(history[0].content.contains("I am the Punk Riot Grrrl"));
        assert_eq!(
            history.iter().filter(|m| m.role == Role::System).count(),
            1
        );
    }
    for (history, _) in calls_b.iter() {
        assert!(history[0].content.starts_with("You are Dragon, a sharp feminist debater."));
        assert!(history.iter().all(|m| !m.content.contains("You are Peach")));
    }
}

#[tokio::test]
async fn test_provider_failure_is_contained() {
    let failing_calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let peach = Agent::new(
        "Peach",
        Arc::new(FailingClient {
            calls: failing_calls.clone(),
        }),
    );
    let (client_b, calls_b) = EchoClient::new();
    let dragon = Agent::new("Dragon", Arc::new(client_b));

    let transcript = Debate::new(peach, dragon).run("Is art labour?", 2).await.unwrap();
    assert_eq!(transcript.turns.len(), 4);

    let expected = "Peach error: ProviderError: failing returned HTTP 500: boom";
    assert_eq!(transcript.turns[0].content, expected);
    assert_eq!(transcript.turns[2].content, expected);

    // Dragon still speaks, rebutting the error text.
    assert!(transcript.turns[1].content.starts_with("ECHO:"));
    assert!(last_user(&calls_b.lock().await[0].0).contains(expected));

    // Failed turns are not added to Peach's history.
    let failing_calls = failing_calls.lock().await;
    assert_eq!(failing_calls.len(), 2);
    assert_eq!(failing_calls[1].0.len(), 2);
}

#[tokio::test]
async fn test_blank_topic_is_rejected_before_any_call() {
    for topic in ["", "   ", " a? "] {
        let (peach, calls_a, dragon, calls_b) = echo_pair();
        let handler = Arc::new(RecordingHandler::default());
        let err = Debate::new(peach, dragon)
            .with_event_handler(handler.clone())
            .run(topic, 2)
            .await
            .unwrap_err();

        assert!(
            matches!(err, ValidationError::TopicTooShort { min: 3, .. }),
            "topic {:?} gave {:?}",
            topic,
            err
        );
        assert!(calls_a.lock().await.is_empty());
        assert!(calls_b.lock().await.is_empty());
        assert!(handler.events.lock().await.is_empty());
    }
}

#[tokio::test]
async fn test_rounds_are_clamped() {
    for (requested, expected) in [(0i64, 1usize), (-5, 1), (1, 1), (100, 3)] {
        let (peach, _, dragon, _) = echo_pair();
        let transcript = Debate::new(peach, dragon)
            .with_max_rounds(3)
            .run("Is art labour?", requested)
            .await.unwrap();
        assert_eq!(transcript.rounds, expected, "requested {}", requested);
        assert_eq!(transcript.turns.len(), 2 * expected);
    }
}

#[tokio::test]
async fn test_temperature_and_model_reach_the_provider() {
    let (client_a, calls_a) = EchoClient::new();
    let (client_b, calls_b) = EchoClient::new();
    let peach = Agent::new("Peach", Arc::new(client_a)).with_temperature(10.0);
    let dragon = Agent::new("Dragon", Arc::new(client_b))
        .with_temperature(-1.0)
        .with_model("deepseek-reasoner");

    Debate::new(peach, dragon).run("Is art labour?", 1).await.unwrap();

    let calls_a = calls_a.lock().await;
    let request_a = &calls_a[0].1;
    assert_eq!(request_a.temperature, 1.5);
    assert_eq!(request_a.model, "echo-1");
    let calls_b = calls_b.lock().await;
    let request_b = &calls_b[0].1;
    assert_eq!(request_b.temperature, 0.0);
    assert_eq!(request_b.model, "deepseek-reasoner");
}

#[tokio::test]
async fn test_closing_statements_sit_outside_the_turns() {
    let (peach, calls_a, dragon, _) = echo_pair();
    let transcript = Debate::new(peach, dragon)
        .with_closing(true)
        .run("Is art labour?", 2)
        .await.unwrap();

    assert_eq!(transcript.turns.len(), 4);
    let closing = transcript.closing.expect("closing statements");
    assert_eq!(closing.agent_a, format!("ECHO:{}", CLOSING_PROMPT));
    assert_eq!(closing.agent_b, format!("ECHO:{}", CLOSING_PROMPT));

    // The closing prompt comes after Peach's own argument chain.
    let calls_a = calls_a.lock().await;
    assert_eq!(calls_a.len(), 3);
    assert_eq!(calls_a[2].0.len(), 6);
}

#[derive(Default)]
struct RecordingHandler {
    events: Mutex<Vec<DebateEvent>>,
}

#[async_trait]
impl EventHandler for RecordingHandler {
    async fn on_debate_event(&self, event: &DebateEvent) {
        self.events.lock().await.push(event.clone());
    }
}

#[tokio::test]
async fn test_events_follow_the_debate() {
    let failing_calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let peach = Agent::new(
        "Peach",
        Arc::new(FailingClient {
            calls: failing_calls,
        }),
    );
    let (client_b, _) = EchoClient::new();
    let dragon = Agent::new("Dragon", Arc::new(client_b));
    let handler = Arc::new(RecordingHandler::default());

    let transcript = Debate::new(peach, dragon)
        .with_event_handler(handler.clone())
        .run("Is art labour?", 2)
        .await.unwrap();

    let events = handler.events.lock().await;
    assert_eq!(events.len(), 1 + 2 * 4 + 1);
    match &events[0] {
        DebateEvent::DebateStarted {
            debate_id, rounds, ..
        } => {
            assert_eq!(*rounds, 2);
            assert_eq!(debate_id, &transcript.id.to_string());
        }
        other => panic!("unexpected first event {:?}", other),
    }
    assert!(matches!(
        &events[2],
        DebateEvent::TurnFailed { agent_name, round: 1, .. } if agent_name == "Peach"
    ));
    assert!(matches!(
        &events[4],
        DebateEvent::TurnCompleted { agent_name, round: 1, .. } if agent_name == "Dragon"
    ));
    match events.last() {
        Some(DebateEvent::DebateCompleted {
            turns,
            failed_turns,
            ..
        }) => {
            assert_eq!(*turns, 4);
            assert_eq!(*failed_turns, 2);
        }
        other => panic!("unexpected last event {:?}", other),
    }
}
