//! General-purpose AI endpoint. Always answers with content: canned advice
//! stands in when the AI service is off or fails.

pub mod handlers;
pub mod prompts;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::assist::prompts::canned_response;
use crate::errors::AppError;
use crate::llm_client::TextGenerator;

pub const ERROR_NOTE: &str = " [Note: AI service encountered an error]";

/// Request category; selects the prompt preamble and the canned fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistKind {
    Resume,
    CoverLetter,
    Interview,
    IndustryInsights,
    General,
}

impl AssistKind {
    /// Unknown or missing types are treated as general requests.
    pub fn from_type(kind: Option<&str>) -> Self {
        match kind {
            Some("resume") => AssistKind::Resume,
            Some("cover-letter") => AssistKind::CoverLetter,
            Some("interview") => AssistKind::Interview,
            Some("industry-insights") => AssistKind::IndustryInsights,
            _ => AssistKind::General,
        }
    }

    pub fn enhance(self, prompt: &str) -> String {
        match self {
            AssistKind::Resume => format!(
                "As a professional resume writer, {prompt}.\n\
                 Please provide actionable, specific advice with quantifiable metrics where possible.\n\
                 Keep the response concise and professional."
            ),
            AssistKind::CoverLetter => format!(
                "As a professional writing expert specializing in cover letters, {prompt}.\n\
                 Create compelling, personalized content that highlights relevant skills and experiences.\n\
                 Maintain a professional yet engaging tone."
            ),
            AssistKind::Interview => format!(
                "As a career coach specializing in interview preparation, {prompt}.\n\
                 Provide practical, actionable advice with specific examples.\n\
                 Focus on helping the candidate showcase their best qualities."
            ),
            AssistKind::IndustryInsights => format!(
                "As an industry analyst, {prompt}.\n\
                 Provide current, accurate data and insights.\n\
                 Focus on practical information that can help with career decisions."
            ),
            AssistKind::General => prompt.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistContent {
    pub content: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Answers one request. Only an empty prompt is an error.
pub async fn assist(
    ai: &dyn TextGenerator,
    default_model: &str,
    req: &AssistRequest,
    now: DateTime<Utc>,
) -> Result<AssistContent, AppError> {
    if req.prompt.trim().is_empty() {
        return Err(AppError::Validation("Prompt is required".to_string()));
    }

    let kind = AssistKind::from_type(req.kind.as_deref());
    let model = req.model.as_deref().unwrap_or(default_model);

    let content = match ai.generate(&kind.enhance(&req.prompt), model).await {
        Ok(text) => {
            let preview: String = req.prompt.chars().take(50).collect();
            info!(
                "AI request: {} - {preview}...",
                req.kind.as_deref().unwrap_or("general")
            );
            text
        }
        Err(e) if e.is_unconfigured() => {
            warn!("AI API key not configured, returning fallback response");
            canned_response(kind).to_string()
        }
        Err(e) => {
            warn!("AI generation error: {e}; falling back to default response");
            format!("{}{ERROR_NOTE}", canned_response(kind))
        }
    };

    Ok(AssistContent {
        content,
        kind: req.kind.clone(),
        timestamp: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{Reply, ScriptedGenerator};

    fn request(prompt: &str, kind: Option<&str>) -> AssistRequest {
        AssistRequest {
            prompt: prompt.to_string(),
            kind: kind.map(str::to_string),
            model: None,
        }
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(AssistKind::from_type(Some("cover-letter")), AssistKind::CoverLetter);
        assert_eq!(AssistKind::from_type(Some("poetry")), AssistKind::General);
        assert_eq!(AssistKind::from_type(None), AssistKind::General);
    }

    #[test]
    fn test_general_prompt_is_sent_verbatim() {
        assert_eq!(AssistKind::General.enhance("hello"), "hello");
        assert!(AssistKind::Resume
            .enhance("review my summary")
            .starts_with("As a professional resume writer, review my summary."));
    }

    #[tokio::test]
    async fn test_success_returns_ai_text() {
        let ai = ScriptedGenerator::text("Use the STAR method.");
        let out = assist(&ai, "m", &request("prep me", Some("interview")), Utc::now())
            .await
            .unwrap();
        assert_eq!(out.content, "Use the STAR method.");
        assert_eq!(out.kind.as_deref(), Some("interview"));
        assert!(ai.prompts()[0].starts_with("As a career coach"));
    }

    #[tokio::test]
    async fn test_unconfigured_returns_canned_text() {
        let ai = ScriptedGenerator::unconfigured();
        let out = assist(&ai, "m", &request("help", Some("resume")), Utc::now())
            .await
            .unwrap();
        assert_eq!(out.content, canned_response(AssistKind::Resume));
    }

    #[tokio::test]
    async fn test_runtime_failure_appends_note() {
        let ai = ScriptedGenerator::new(vec![Reply::Unavailable]);
        let out = assist(&ai, "m", &request("help", None), Utc::now())
            .await
            .unwrap();
        assert!(out.content.starts_with(canned_response(AssistKind::General)));
        assert!(out.content.ends_with("[Note: AI service encountered an error]"));
    }

    #[tokio::test]
    async fn test_empty_prompt_is_rejected() {
        let ai = ScriptedGenerator::default();
        let err = assist(&ai, "m", &request("   ", None), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(ai.calls(), 0);
    }
}
