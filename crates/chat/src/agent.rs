//! The question-answering seam and its OpenAI-compatible HTTP implementation.

use crate::dataset::Dataset;
use crate::error::{ChatError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the chat service credential.
pub const API_KEY_ENV: &str = "PPLX_API_KEY";

/// Rows of each dataset included in the system prompt.
const SUMMARY_ROWS: usize = 20;

/// Who sent a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Answers questions about a set of datasets.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Answer `prompt`, given the earlier turns in `history`.
    async fn chat(&self, datasets: &[Dataset], history: &[Message], prompt: &str)
        -> Result<String>;
}

/// Settings for [`ChatCompletionsAgent`]
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.perplexity.ai".to_string(),
            model: "llama-3.1-sonar-large-128k-online".to_string(),
            temperature: 0.0,
            timeout_secs: 60,
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Agent backed by a `POST {base_url}/chat/completions` endpoint.
pub struct ChatCompletionsAgent {
    client: Client,
    config: AgentConfig,
    api_key: String,
}

impl ChatCompletionsAgent {
    /// Build an agent with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Http` if the HTTP client cannot be built.
    pub fn new(config: AgentConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            config,
            api_key: api_key.into(),
        })
    }

    /// Build an agent with the key from `PPLX_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::MissingApiKey` if the variable is unset or empty.
    pub fn from_env(config: AgentConfig) -> Result<Self> {
        let key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ChatError::MissingApiKey(API_KEY_ENV))?;
        Self::new(config, key)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

/// Build the system prompt describing every dataset.
pub fn system_prompt(datasets: &[Dataset]) -> Result<String> {
    let mut prompt = String::from(
        "You answer questions about the tabular datasets below. \
         Base every answer on their contents and say so when they do not contain the answer.",
    );
    for dataset in datasets {
        prompt.push_str("\n\n");
        prompt.push_str(&dataset.summary(SUMMARY_ROWS)?);
    }
    Ok(prompt)
}

#[async_trait]
impl Agent for ChatCompletionsAgent {
    async fn chat(
        &self,
        datasets: &[Dataset],
        history: &[Message],
        prompt: &str,
    ) -> Result<String> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(system_prompt(datasets)?));
        messages.extend_from_slice(history);
        messages.push(Message::user(prompt));

        let body = CompletionRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            messages,
        };

        tracing::debug!(url = %self.endpoint(), turns = history.len(), "Sending chat request");
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Http(format!("Failed to parse JSON: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(ChatError::EmptyResponse)
    }
}
