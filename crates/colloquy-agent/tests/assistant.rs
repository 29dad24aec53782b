//! Assistant flow integration tests.

use colloquy_agent::{
    AgentError, Assistant, CompletionClient, CompletionStrategy, LlmCompletionClient,
};
use colloquy_history::{
    CompletionTurn, ConversationStore, HistoryError, HistorySettings, RESET_CONFIRMATION, Role,
};
use colloquy_store::InMemoryStore;
use colloquy_test_utils::{FailingClient, FixedLLM, ScriptedClient, UnavailableStore};
use pretty_assertions::assert_eq;
use std::sync::Arc;

const PERSONA: &str = "You are a helpful football agent.";

fn history() -> ConversationStore {
    ConversationStore::new(Arc::new(InMemoryStore::new()), HistorySettings::new(PERSONA))
}

/// Asking stores the question and the reply and returns the reply.
#[tokio::test]
async fn ask_appends_question_and_reply() {
    let client = Arc::new(ScriptedClient::with_replies(["France"]));
    let assistant = Assistant::new(
        history().conversation("default", 10).expect("open"),
        client.clone(),
    );

    let reply = assistant
        .ask("Who won the 2018 World Cup?")
        .await
        .expect("ask");
    assert_eq!(reply, "France");

    let all = assistant.history().expect("history");
    let roles: Vec<Role> = all.iter().map(|record| record.role()).collect();
    assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
    assert_eq!(all[1].content(), "Who won the 2018 World Cup?");
    assert_eq!(all[2].content(), "France");

    assert_eq!(
        client.last_request().expect("request"),
        vec![
            CompletionTurn::new(Role::System, PERSONA),
            CompletionTurn::new(Role::User, "Who won the 2018 World Cup?"),
        ]
    );
}

/// The client receives the bounded projection, not the full history.
#[tokio::test]
async fn ask_sends_bounded_context() {
    let client = Arc::new(ScriptedClient::with_replies(["France", "Argentina"]));
    let assistant = Assistant::new(
        history().conversation("bounded", 3).expect("open"),
        client.clone(),
    );

    assistant
        .ask("Who won the 2018 World Cup?")
        .await
        .expect("first");
    assistant.ask("And 2022?").await.expect("second");

    assert_eq!(
        client.last_request().expect("request"),
        vec![
            CompletionTurn::new(Role::System, PERSONA),
            CompletionTurn::new(Role::Assistant, "France"),
            CompletionTurn::new(Role::User, "And 2022?"),
        ]
    );
    assert_eq!(assistant.history().expect("history").len(), 5);
}

/// A failed completion keeps the question and surfaces the error.
#[tokio::test]
async fn failed_completion_keeps_user_turn() {
    let assistant = Assistant::new(
        history().conversation("failing", 10).expect("open"),
        Arc::new(FailingClient::new("provider down")),
    );

    let err = assistant.ask("Anyone there?").await.expect_err("failure");
    assert!(matches!(err, AgentError::Completion(message) if message == "provider down"));

    let all = assistant.history().expect("history");
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].role(), Role::User);
    assert_eq!(all[1].content(), "Anyone there?");
}

#[tokio::test]
async fn reset_returns_confirmation_and_clears_history() {
    let assistant = Assistant::new(
        history().conversation("reset", 10).expect("open"),
        Arc::new(ScriptedClient::new("ok")),
    );
    assistant.ask("hello").await.expect("ask");

    assert_eq!(assistant.reset().expect("reset"), RESET_CONFIRMATION);
    let all = assistant.history().expect("history");
    assert_eq!(all.len(), 1);
    assert!(all[0].is_system());
}

/// Store failures surface as history errors.
#[test]
fn unavailable_store_is_reported() {
    let broken = ConversationStore::new(
        Arc::new(UnavailableStore::new()),
        HistorySettings::new(PERSONA),
    );
    let err = broken.conversation("default", 10).expect_err("unavailable");
    assert!(matches!(err, HistoryError::StoreUnavailable(_)));
    let err = AgentError::from(err);
    assert!(err.to_string().starts_with("history error: store unavailable"));
}

/// Provider-backed clients plug into the same flow for both strategies.
#[tokio::test]
async fn llm_client_strategies_share_the_flow() {
    for strategy in [CompletionStrategy::Direct, CompletionStrategy::WebSearch] {
        let client: Arc<dyn CompletionClient> = Arc::new(LlmCompletionClient::new(
            Arc::new(FixedLLM::new("Lionel Messi")),
            strategy,
        ));
        let assistant = Assistant::new(
            history()
                .conversation(strategy.as_str(), 10)
                .expect("open"),
            client,
        );
        let reply = assistant
            .ask("Who captained Argentina in 2022?")
            .await
            .expect("ask");
        assert_eq!(reply, "Lionel Messi");
        assert_eq!(assistant.history().expect("history").len(), 3);
    }
}
