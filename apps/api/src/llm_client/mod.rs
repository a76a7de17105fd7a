/// LLM Client: the single point of entry for all generative-AI calls.
///
/// No other module talks to the Gemini API directly. Callers depend on the
/// `TextGenerator` trait so they can be driven by scripted replies in tests.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("AI service is not configured")]
    NotConfigured,

    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("AI service returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// True when no API key is set, as opposed to the service failing at runtime.
    pub fn is_unconfigured(&self) -> bool {
        matches!(self, LlmError::NotConfigured)
    }
}

/// Opaque text-completion service. Returns the provider's completion verbatim.
///
/// Malformed-but-received text is never an error here; validating it is the caller's job.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, model_id: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate that has any.
    fn into_text(self) -> Option<String> {
        self.candidates
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .find(|text| !text.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Gemini `generateContent` client shared by every service through `AppState`.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
}

impl GeminiClient {
    /// `timeout: None` leaves the transport default (no deadline) in place.
    pub fn new(api_key: Option<String>, timeout: Option<Duration>) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            api_key,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    /// Auth and quota rejections (other 4xx) fail immediately.
    async fn generate(&self, prompt: &str, model_id: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::NotConfigured)?;
        if prompt.trim().is_empty() {
            return Err(LlmError::EmptyPrompt);
        }

        let url = format!("{GEMINI_API_BASE}/{model_id}:generateContent");
        let request_body = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [Part { text: prompt }],
            }],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "AI call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("AI API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<GeminiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body: GenerateContentResponse = response.json().await?;
            let text = body.into_text().ok_or(LlmError::EmptyContent)?;

            debug!(model = model_id, chars = text.len(), "AI call succeeded");
            return Ok(text);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

/// Outcome of checking AI output against an expected shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Validated<T> {
    Valid(T),
    Invalid(String),
}

impl<T> Validated<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validated::Valid(_))
    }

    /// Resolves to the valid value or the result of `fallback`, which receives the reason.
    pub fn or_fallback(self, fallback: impl FnOnce(String) -> T) -> T {
        match self {
            Validated::Valid(value) => value,
            Validated::Invalid(reason) => fallback(reason),
        }
    }
}

/// Removes every ```` ``` ```` fence marker (optionally tagged `json`) and trims.
///
/// Models wrap JSON in fences even when told not to, sometimes mid-text.
pub fn strip_code_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find("```") {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 3..];
        rest = rest.strip_prefix("json").unwrap_or(rest);
        rest = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .unwrap_or(rest);
    }
    out.push_str(rest);
    out.trim().to_string()
}
