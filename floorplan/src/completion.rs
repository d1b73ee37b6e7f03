//! Completion service boundary.
//!
//! The pipeline only needs "prompt in, text out". [`CompletionClient`] is
//! that seam; [`OpenAiCompatibleClient`] talks to any server exposing
//! `/chat/completions`, and plain closures can stand in for scripted replies.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{config::CompletionConfig, error::CompletionError};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Creates a user-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A request for one completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl CompletionRequest {
    /// A request holding exactly one user message with the rendered prompt.
    pub fn user_prompt(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(prompt)],
        }
    }
}

/// Produces the assistant's reply text for a request.
///
/// Implementations make a single attempt; retries, if any, belong to the
/// caller.
pub trait CompletionClient {
    /// Sends `request` and returns the reply content.
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

impl<F> CompletionClient for F
where
    F: Fn(&CompletionRequest) -> Result<String, CompletionError>,
{
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self(request)
    }
}

/// Blocking client for OpenAI-compatible chat completion endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    base_url: String,
    api_key: String,
    agent: ureq::Agent,
}

impl OpenAiCompatibleClient {
    /// Creates a client for `config.base_url`, with its timeouts applied.
    pub fn new(config: &CompletionConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .build();

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            agent,
        }
    }

    /// Full URL of the chat completions endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl CompletionClient for OpenAiCompatibleClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let url = self.endpoint();
        let body = serde_json::json!({
            "model": request.model,
            "messages": request.messages,
            "stream": false,
        });

        debug!(%url, model = %request.model, "sending completion request");

        let response = self
            .agent
            .post(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Content-Type", "application/json")
            .send_string(&body.to_string());

        let body = response
            .map_err(status_or_transport)?
            .into_string()
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        reply_content(&body)
    }
}

/// Maps a failed request to a status error (server answered) or a
/// transport error (it did not).
fn status_or_transport(err: ureq::Error) -> CompletionError {
    match err {
        ureq::Error::Status(status, response) => CompletionError::Status {
            status,
            body: response.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(transport) => CompletionError::Transport(transport.to_string()),
    }
}

/// Response body from `/chat/completions`
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Pulls `choices[0].message.content` out of a chat completion body.
fn reply_content(body: &str) -> Result<String, CompletionError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(CompletionError::EmptyContent)
}
