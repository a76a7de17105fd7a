//! One markdown resume per user, plus AI rewriting of individual sections.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::models::resume::Resume;
use crate::models::user::User;
use crate::resume::prompts::IMPROVE_PROMPT_TEMPLATE;

#[derive(Debug, Clone, Deserialize)]
pub struct SaveResumeRequest {
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImproveRequest {
    pub content: String,
    /// Section label such as "summary" or "experience".
    #[serde(default = "default_section")]
    pub section: String,
}

fn default_section() -> String {
    "summary".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImproveResponse {
    pub content: String,
    /// False when the input is returned unchanged.
    pub improved: bool,
}

pub async fn get_resume(pool: &PgPool, user_id: Uuid) -> Result<Option<Resume>, AppError> {
    Ok(
        sqlx::query_as::<_, Resume>("SELECT * FROM resumes WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?,
    )
}

/// Creates the user's resume or replaces its content.
pub async fn save_resume(pool: &PgPool, user_id: Uuid, content: &str) -> Result<Resume, AppError> {
    let resume = sqlx::query_as::<_, Resume>(
        r#"
        INSERT INTO resumes (id, user_id, content)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id) DO UPDATE
        SET content = EXCLUDED.content, updated_at = now()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(content)
    .fetch_one(pool)
    .await?;

    info!("Saved resume for user {user_id}");
    Ok(resume)
}

pub fn build_improve_prompt(industry: &str, req: &ImproveRequest) -> String {
    IMPROVE_PROMPT_TEMPLATE
        .replace("{section}", req.section.trim())
        .replace("{industry}", industry)
        .replace("{content}", req.content.trim())
}

/// Rewrites one section. AI failure returns the input untouched.
pub async fn improve_section(
    ai: &dyn TextGenerator,
    model: &str,
    user: &User,
    req: &ImproveRequest,
) -> Result<ImproveResponse, AppError> {
    if req.content.trim().is_empty() {
        return Err(AppError::Validation("Content is required".to_string()));
    }

    let industry = user
        .industry_name
        .as_deref()
        .filter(|i| !i.trim().is_empty())
        .unwrap_or("professional");

    match ai.generate(&build_improve_prompt(industry, req), model).await {
        Ok(text) if !text.trim().is_empty() => Ok(ImproveResponse {
            content: text.trim().to_string(),
            improved: true,
        }),
        Ok(_) => {
            warn!("AI returned empty text for resume {} section", req.section);
            Ok(unchanged(req))
        }
        Err(e) => {
            warn!("Error improving resume {} section: {e}", req.section);
            Ok(unchanged(req))
        }
    }
}

fn unchanged(req: &ImproveRequest) -> ImproveResponse {
    ImproveResponse {
        content: req.content.clone(),
        improved: false,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::llm_client::testing::{Reply, ScriptedGenerator};

    fn user(industry: Option<&str>) -> User {
        User {
            id: Uuid::new_v4(),
            clerk_user_id: "user_1".to_string(),
            email: Some("grace@example.com".to_string()),
            name: Some("Grace Hopper".to_string()),
            image_url: None,
            industry_name: industry.map(str::to_string),
            experience: None,
            bio: None,
            skills: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn request(content: &str) -> ImproveRequest {
        ImproveRequest {
            content: content.to_string(),
            section: "experience".to_string(),
        }
    }

    #[test]
    fn test_section_defaults_to_summary() {
        let req: ImproveRequest = serde_json::from_str(r#"{"content": "Wrote code"}"#).unwrap();
        assert_eq!(req.section, "summary");
    }

    #[tokio::test]
    async fn test_improved_text_is_trimmed() {
        let ai = ScriptedGenerator::text("\nShipped a compiler used by 10k engineers.\n");
        let out = improve_section(&ai, "m", &user(Some("technology")), &request("Wrote a compiler"))
            .await
            .unwrap();
        assert!(out.improved);
        assert_eq!(out.content, "Shipped a compiler used by 10k engineers.");

        let prompt = &ai.prompts()[0];
        assert!(prompt.contains("improve the following experience section for a technology professional"));
        assert!(prompt.contains("Current content: \"Wrote a compiler\""));
    }

    #[tokio::test]
    async fn test_failure_returns_input_unchanged() {
        let ai = ScriptedGenerator::new(vec![Reply::Unavailable]);
        let out = improve_section(&ai, "m", &user(None), &request("Wrote a compiler"))
            .await
            .unwrap();
        assert_eq!(
            out,
            ImproveResponse {
                content: "Wrote a compiler".to_string(),
                improved: false
            }
        );
    }

    #[tokio::test]
    async fn test_empty_content_is_rejected() {
        let ai = ScriptedGenerator::default();
        let err = improve_section(&ai, "m", &user(None), &request("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(ai.calls(), 0);
    }
}
