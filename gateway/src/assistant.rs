//! Chat assistant proxy client
//!
//! Forwards a traveller's question to one chat-completion provider:
//! OpenAI when `OPENAI_API_KEY` is set, otherwise xAI when `XAI_API_KEY`
//! is set. With neither key the assistant answers with a canned reply.
//!
//! Upstream failures surface as [`AssistantError`]; the route turns them
//! into a fixed apology and never echoes the upstream error.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SYSTEM_PROMPT: &str =
    "You are AJ, a helpful assistant. Provide concise, helpful responses.";

pub const APOLOGY: &str =
    "I'm sorry, I'm having trouble processing your request right now. Please try again later.";

const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.7;

/// Reply used when no provider key is configured.
pub fn fallback_reply(message: &str) -> String {
    format!(
        "I understand you're asking about: \"{}\". As a helpful assistant, I recommend checking official sources for the most current information.",
        message
    )
}

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("{provider} API error: {status}")]
    Upstream {
        provider: &'static str,
        status: reqwest::StatusCode,
    },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("{0} returned no choices")]
    EmptyResponse(&'static str),
}

/// Supported chat-completion providers
#[derive(Debug, Clone)]
pub enum AssistantProvider {
    OpenAi { api_key: String },
    Xai { api_key: String },
}

impl AssistantProvider {
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenAi { .. } => "OpenAI",
            Self::Xai { .. } => "X.AI",
        }
    }

    fn endpoint(&self) -> &'static str {
        match self {
            Self::OpenAi { .. } => "https://api.openai.com/v1/chat/completions",
            Self::Xai { .. } => "https://api.x.ai/v1/chat/completions",
        }
    }

    fn model(&self) -> &'static str {
        match self {
            Self::OpenAi { .. } => "gpt-3.5-turbo",
            Self::Xai { .. } => "grok-beta",
        }
    }

    fn api_key(&self) -> &str {
        match self {
            Self::OpenAi { api_key } | Self::Xai { api_key } => api_key,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// `None` means fallback replies only
    pub provider: Option<AssistantProvider>,
    /// Request timeout in seconds
    pub timeout_sec: u64,
    /// Overrides the provider endpoint (local mocks)
    pub endpoint_override: Option<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            provider: None,
            timeout_sec: 30,
            endpoint_override: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// System prompt, optional prior assistant context, then the user message.
pub fn build_messages(message: &str, context: Option<&str>) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::new("system", SYSTEM_PROMPT)];
    if let Some(context) = context.filter(|c| !c.is_empty()) {
        messages.push(ChatMessage::new("assistant", context));
    }
    messages.push(ChatMessage::new("user", message));
    messages
}

pub struct AssistantClient {
    config: AssistantConfig,
    client: reqwest::Client,
}

impl AssistantClient {
    pub fn new(config: AssistantConfig) -> Result<Self, AssistantError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_sec))
            .build()
            .map_err(|e| AssistantError::RequestFailed(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn provider(&self) -> Option<&AssistantProvider> {
        self.config.provider.as_ref()
    }

    /// Answer `message`, falling back to a canned reply when unconfigured.
    pub async fn reply(&self, message: &str, context: Option<&str>) -> Result<String, AssistantError> {
        let Some(provider) = &self.config.provider else {
            return Ok(fallback_reply(message));
        };

        let url = self
            .config
            .endpoint_override
            .as_deref()
            .unwrap_or(provider.endpoint());

        let body = ChatCompletionRequest {
            model: provider.model(),
            messages: build_messages(message, context),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(provider.api_key())
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistantError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AssistantError::Upstream {
                provider: provider.name(),
                status: response.status(),
            });
        }

        let data: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Parse(e.to_string()))?;

        data.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(AssistantError::EmptyResponse(provider.name()))
    }
}
