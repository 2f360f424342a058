//! Talks to the Gemini `streamGenerateContent` endpoint.
//!
//! Everything above this module sees a [`Generator`]: ordered turns in, a lazy
//! stream of text fragments out. Tests swap in fakes at that seam.

pub mod parse;

use async_stream::try_stream;
use futures::{Stream, StreamExt};
use serde::Serialize;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Credentials;
use crate::error::PromptError;
use crate::util::log_preview;
use parse::{block_reason, chunk_error, chunk_text, SseDecoder};

fn transport(msg: impl Into<String>) -> PromptError {
    PromptError::Transport(msg.into())
}

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

// Only the connect phase is bounded; a long generation is a normal stream.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Harassment, hate speech, sexual content and dangerous content are all set
/// to `BLOCK_NONE`. The contrarian, controversial, devil's advocate and
/// satirical modes come back as refusals under stricter settings.
pub const SAFETY_SETTINGS: [(&str, &str); 4] = [
    ("HARM_CATEGORY_HARASSMENT", "BLOCK_NONE"),
    ("HARM_CATEGORY_HATE_SPEECH", "BLOCK_NONE"),
    ("HARM_CATEGORY_SEXUALLY_EXPLICIT", "BLOCK_NONE"),
    ("HARM_CATEGORY_DANGEROUS_CONTENT", "BLOCK_NONE"),
];

#[derive(Clone)]
pub struct AiConfig {
    pub base_url: String,
    pub model: String,
    pub client: reqwest::Client,
}

impl AiConfig {
    pub fn new(base_url: &str, model: &str) -> Result<Self, PromptError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| PromptError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
        })
    }

    /// `PROMPTCRAFT_LLM_URL` and `PROMPTCRAFT_MODEL`, both optional.
    pub fn from_env() -> Result<Self, PromptError> {
        let base_url =
            std::env::var("PROMPTCRAFT_LLM_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let model = std::env::var("PROMPTCRAFT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Self::new(&base_url, &model)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One role-tagged message of a conversation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    role: Role,
    text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self { role: Role::Model, text: text.into() }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Lazy, ordered, non-restartable sequence of reply fragments. An `Err` item
/// is always the last one.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, PromptError>> + Send>>;

pub trait Generator: Send + Sync {
    /// Model identifier, recorded alongside logged prompts.
    fn model(&self) -> &str;

    fn generate_stream(&self, turns: Vec<Turn>) -> TextStream;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: Role,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

impl<'a> GenerateRequest<'a> {
    fn new(turns: &'a [Turn]) -> Self {
        Self {
            contents: turns
                .iter()
                .map(|t| Content { role: t.role, parts: vec![Part { text: &t.text }] })
                .collect(),
            safety_settings: SAFETY_SETTINGS
                .iter()
                .map(|&(category, threshold)| SafetySetting { category, threshold })
                .collect(),
        }
    }
}

pub struct GeminiClient {
    cfg: AiConfig,
    api_key: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.cfg.base_url)
            .field("model", &self.cfg.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Fails with `MissingCredential` when no provider key is registered.
    /// Never touches the network.
    pub fn from_credentials(creds: &Credentials, cfg: &AiConfig) -> Result<Self, PromptError> {
        let api_key = creds
            .google_api_key
            .clone()
            .ok_or(PromptError::MissingCredential("google api key"))?;
        Ok(Self { cfg: cfg.clone(), api_key })
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.cfg.base_url, self.cfg.model
        )
    }
}

impl Generator for GeminiClient {
    fn model(&self) -> &str {
        &self.cfg.model
    }

    fn generate_stream(&self, turns: Vec<Turn>) -> TextStream {
        let req = self
            .cfg
            .client
            .post(self.stream_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateRequest::new(&turns));
        let model = self.cfg.model.clone();

        // Nothing is sent until the first poll; dropping the stream drops the
        // response and with it the connection.
        let stream = try_stream! {
            let resp = req
                .send()
                .await
                .map_err(|e| transport(format!("LLM request failed: {e}")))?;
            let resp = ensure_success(resp).await?;

            let mut bytes = resp.bytes_stream();
            let mut decoder = SseDecoder::new();
            let mut fragments = 0usize;
            while let Some(chunk) = bytes.next().await {
                let chunk = chunk.map_err(|e| transport(format!("stream interrupted: {e}")))?;
                for data in decoder.push(&chunk) {
                    if let Some(text) = decode_event(&data)? {
                        fragments += 1;
                        yield text;
                    }
                }
            }
            if let Some(data) = decoder.finish() {
                if let Some(text) = decode_event(&data)? {
                    fragments += 1;
                    yield text;
                }
            }
            debug!(model = %model, fragments, "generation stream finished");
        };
        boxed(stream)
    }
}

fn boxed<S>(stream: S) -> TextStream
where
    S: Stream<Item = Result<String, PromptError>> + Send + 'static,
{
    Box::pin(stream)
}

async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, PromptError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(transport(format!("LLM returned {status}: {}", log_preview(&body, 500))))
}

/// Turn one SSE payload into a fragment. Empty fragments are dropped.
fn decode_event(data: &str) -> Result<Option<String>, PromptError> {
    let v: serde_json::Value = serde_json::from_str(data).map_err(|e| {
        warn!("undecodable stream event: {e}");
        transport(format!("undecodable stream event: {e}"))
    })?;
    if let Some(msg) = chunk_error(&v) {
        return Err(transport(msg));
    }
    match chunk_text(&v) {
        Some(text) if !text.is_empty() => Ok(Some(text)),
        Some(_) => Ok(None),
        None => match block_reason(&v) {
            Some(reason) => Err(transport(format!("prompt blocked: {reason}"))),
            None => Ok(None),
        },
    }
}

#[cfg(test)]
#[path = "ai_tests.rs"]
mod tests;
