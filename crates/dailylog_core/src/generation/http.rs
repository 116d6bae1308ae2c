//! OpenAI-compatible chat-completions backend.
//!
//! # Invariants
//! - Every request carries the configured client timeout.
//! - API keys and prompt text never reach log output.

use super::{GenerationService, ServiceError, ServiceResult};
use crate::config::GenerationConfig;
use log::{info, warn};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// System message sent ahead of every prompt.
pub const SYSTEM_PROMPT: &str =
    "你是一个资深的日报优化助手，帮助用户润色日报内容，使其更加专业清晰。";

const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Blocking HTTP client for one configured backend.
#[derive(Debug)]
pub struct HttpGenerationService {
    config: GenerationConfig,
    client: Client,
}

impl HttpGenerationService {
    /// Builds a client with the configured timeout.
    ///
    /// # Errors
    /// - `Transport` when the HTTP client cannot be constructed.
    pub fn new(config: GenerationConfig) -> ServiceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| ServiceError::Transport(err.to_string()))?;
        Ok(Self { config, client })
    }
}

impl GenerationService for HttpGenerationService {
    fn complete(&self, prompt: &str) -> ServiceResult<String> {
        let started_at = Instant::now();
        let payload = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
        };

        let result = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .map_err(|err| ServiceError::Transport(err.to_string()))
            .and_then(read_completion);

        match &result {
            Ok(text) => info!(
                "event=generation_call module=generation status=ok provider={} prompt_chars={} output_chars={} duration_ms={}",
                self.config.provider.as_str(),
                prompt.chars().count(),
                text.chars().count(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=generation_call module=generation status=error provider={} error_code={} duration_ms={}",
                self.config.provider.as_str(),
                err.code(),
                started_at.elapsed().as_millis()
            ),
        }

        result
    }
}

fn read_completion(response: reqwest::blocking::Response) -> ServiceResult<String> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(ServiceError::Status {
            status: status.as_u16(),
            body: truncate_chars(body.trim(), MAX_ERROR_BODY_CHARS),
        });
    }

    let body: ChatResponse = response
        .json()
        .map_err(|err| ServiceError::MalformedResponse(err.to_string()))?;
    extract_text(body)
}

fn extract_text(body: ChatResponse) -> ServiceResult<String> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| ServiceError::MalformedResponse("missing choices[0].message.content".into()))
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut truncated = value.chars().take(max_chars).collect::<String>();
    if value.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}
