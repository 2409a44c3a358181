use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{CompletionError, ConfigError};
use crate::model::advice::{Advice, CompletionResult};

pub const MAX_TOKENS: u32 = 200;
pub const TEMPERATURE: f64 = 0.7;
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const READ_TIMEOUT: Duration = Duration::from_secs(30);

pub const SYSTEM_MESSAGE: &str =
    "You are an expert Slay the Spire coach. Provide concise, actionable advice in 2-3 sentences.";

pub const NOT_CONFIGURED_MESSAGE: &str = "Error: OpenAI API key not configured. \
Please set OPENAI_API_KEY environment variable or add it to stshelp_config.json";

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatCompletionRequest {
    pub fn for_prompt(model: &str, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: SYSTEM_MESSAGE.into(),
                },
                ChatMessage {
                    role: "user".into(),
                    content: prompt.to_string(),
                },
            ],
        }
    }
}

// Everything optional so a wrong shape becomes a diagnostic, not a decode
// failure with a serde path in it.
#[derive(Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Option<Vec<Choice>>,
}

#[derive(Deserialize)]
pub struct Choice {
    pub message: Option<ChatMessageResponse>,
}

#[derive(Deserialize)]
pub struct ChatMessageResponse {
    pub content: Option<String>,
}

/// Anything that can turn a prompt into advice. The coordinator only sees
/// this, so tests can swap the network out.
pub trait CompletionBackend: Send + 'static {
    fn get_advice(&self, prompt: &str) -> CompletionResult;
}

/// Blocking client for an OpenAI-compatible chat completions endpoint.
/// Meant to run on the advice worker thread, never on the render loop.
pub struct CompletionClient {
    config: ClientConfig,
    http: Client,
}

impl CompletionClient {
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        Self::with_timeouts(config, CONNECT_TIMEOUT, READ_TIMEOUT)
    }

    /// Like `new`, with explicit limits. A request that outlives `read` is
    /// reported as a transport error.
    pub fn with_timeouts(
        config: ClientConfig,
        connect: Duration,
        read: Duration,
    ) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .connect_timeout(connect)
            .timeout(read)
            .build()?;

        info!(
            endpoint = config.endpoint(),
            model = config.model(),
            has_api_key = config.has_api_key(),
            "Created completion client"
        );

        Ok(Self { config, http })
    }

    #[instrument(
        skip(self, prompt),
        fields(model = %self.config.model(), prompt_len = prompt.len())
    )]
    pub fn get_advice(&self, prompt: &str) -> CompletionResult {
        let Some(api_key) = self.config.api_key() else {
            warn!("API key not configured, skipping LLM call");
            return Ok(Advice::Advisory(NOT_CONFIGURED_MESSAGE.to_string()));
        };

        let request = ChatCompletionRequest::for_prompt(self.config.model(), prompt);

        debug!(endpoint = self.config.endpoint(), "Sending completion request");
        let response = self
            .http
            .post(self.config.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .map_err(|e| {
                error!(error = %e, "Completion request failed");
                CompletionError::transport(e)
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| {
            error!(status = status.as_u16(), error = %e, "Failed to read completion response");
            CompletionError::transport(e)
        })?;

        let result = classify_response(status, &body);
        match &result {
            Ok(_) => info!(status = status.as_u16(), "Advice received"),
            Err(err) => error!(status = status.as_u16(), error = %err, "Completion failed"),
        }
        result
    }
}

impl CompletionBackend for CompletionClient {
    fn get_advice(&self, prompt: &str) -> CompletionResult {
        CompletionClient::get_advice(self, prompt)
    }
}

/// Turns a status and body into a result. Only 200 counts as success.
pub fn classify_response(status: StatusCode, body: &str) -> CompletionResult {
    if status != StatusCode::OK {
        return Err(CompletionError::Http {
            status: status.as_u16(),
            body: body.trim().to_string(),
        });
    }

    parse_advice(body).map(Advice::Completion)
}

/// Pulls the first choice's message content out of a completion body.
pub fn parse_advice(body: &str) -> Result<String, CompletionError> {
    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

    response
        .choices
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| {
            CompletionError::MalformedResponse("response has no choices[0].message.content".into())
        })
}
