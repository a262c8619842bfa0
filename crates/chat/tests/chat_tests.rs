//! Session and HTTP agent tests.

use async_trait::async_trait;
use pdftab_chat::{
    Agent, AgentConfig, ChatCompletionsAgent, ChatError, Dataset, Message, Role, Session, APOLOGY,
};
use pdftab_sheet::Sheet;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use wiremock::matchers::{bearer_token, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Replays canned answers and records the history length of every call.
struct ScriptedAgent {
    answers: Mutex<VecDeque<Result<String, ChatError>>>,
    history_lens: Mutex<Vec<usize>>,
}

impl ScriptedAgent {
    fn new(answers: Vec<Result<String, ChatError>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            history_lens: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Agent for ScriptedAgent {
    async fn chat(
        &self,
        _datasets: &[Dataset],
        history: &[Message],
        _prompt: &str,
    ) -> Result<String, ChatError> {
        self.history_lens.lock().unwrap().push(history.len());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ChatError::EmptyResponse))
    }
}

fn dataset() -> Dataset {
    let mut sheet = Sheet::from_data(vec![vec!["Prefecture", "Total"], vec!["Hokkaido", "10"]]);
    sheet.name_columns_by_row(0).unwrap();
    Dataset {
        name: "2022-all-prefectures".to_string(),
        description: "Licence holders".to_string(),
        sheet,
    }
}

// ============================================================================
// Session
// ============================================================================

#[tokio::test]
async fn test_follow_up_carries_history() {
    let agent = ScriptedAgent::new(vec![Ok("Hokkaido".to_string()), Ok("10".to_string())]);
    let mut session = Session::new(agent, vec![dataset()]);

    let first = session.ask("Which prefecture has most holders?").await;
    assert!(!first.failed);
    assert_eq!(first.text, "Hokkaido");

    let second = session.ask("How many?").await;
    assert_eq!(second.text, "10");
    assert_eq!(session.history().len(), 4);
    assert_eq!(session.history()[0].role, Role::User);
    assert_eq!(session.history()[3].content, "10");
}

#[tokio::test]
async fn test_failure_apologizes_and_resets() {
    let agent = ScriptedAgent::new(vec![
        Ok("first".to_string()),
        Err(ChatError::Http("connection reset".to_string())),
        Ok("fresh start".to_string()),
    ]);
    let mut session = Session::new(agent, vec![dataset()]);

    session.ask("q1").await;
    let failed = session.ask("q2").await;
    assert!(failed.failed);
    assert_eq!(failed.text, APOLOGY);
    assert!(session.history().is_empty());

    let recovered = session.ask("q3").await;
    assert!(!recovered.failed);
    assert_eq!(session.history().len(), 2);
}

#[tokio::test]
async fn test_reset_starts_a_new_conversation() {
    let agent = ScriptedAgent::new(vec![Ok("a".to_string()), Ok("b".to_string())]);
    let mut session = Session::new(agent, vec![dataset()]);

    session.ask("q1").await;
    session.reset();
    session.ask("q2").await;
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.history()[0].content, "q2");
}

#[tokio::test]
async fn test_history_lengths_seen_by_agent() {
    let agent = ScriptedAgent::new(vec![Ok("a".to_string()), Ok("b".to_string())]);
    let mut session = Session::new(agent, Vec::new());
    session.ask("q1").await;
    session.ask("q2").await;
    assert_eq!(*session.agent().history_lens.lock().unwrap(), vec![0, 2]);
    assert!(session.datasets().is_empty());
}

// ============================================================================
// ChatCompletionsAgent
// ============================================================================

fn agent_for(server: &MockServer) -> ChatCompletionsAgent {
    ChatCompletionsAgent::new(
        AgentConfig {
            base_url: server.uri(),
            ..AgentConfig::default()
        },
        "test-key",
    )
    .unwrap()
}

#[tokio::test]
async fn test_chat_completions_request_and_answer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(bearer_token("test-key"))
        .and(body_partial_json(json!({
            "model": "llama-3.1-sonar-large-128k-online",
            "temperature": 0.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Hokkaido has 10."}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let history = vec![Message::user("hi"), Message::assistant("hello")];
    let answer = agent_for(&server)
        .chat(&[dataset()], &history, "How many in Hokkaido?")
        .await
        .unwrap();
    assert_eq!(answer, "Hokkaido has 10.");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0]["role"], "system");
    assert!(messages[0]["content"]
        .as_str()
        .unwrap()
        .contains("Dataset: 2022-all-prefectures"));
    assert_eq!(messages[3]["content"], "How many in Hokkaido?");
}

#[tokio::test]
async fn test_chat_completions_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&server)
        .await;

    let err = agent_for(&server).chat(&[], &[], "q").await.unwrap_err();
    assert!(matches!(
        err,
        ChatError::Status { status: 401, body } if body == "invalid key"
    ));
}

#[tokio::test]
async fn test_chat_completions_empty_choices() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = agent_for(&server).chat(&[], &[], "q").await.unwrap_err();
    assert!(matches!(err, ChatError::EmptyResponse));
}

#[tokio::test]
async fn test_session_survives_http_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut session = Session::new(agent_for(&server), vec![dataset()]);
    let reply = session.ask("q").await;
    assert!(reply.failed);
    assert_eq!(reply.text, APOLOGY);
}
