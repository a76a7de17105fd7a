//! Completed quiz attempts: scoring on submission, history and summary stats.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::quiz::QuizQuestion;
use crate::interview::scoring::{improvement_tip, score};
use crate::interview::store::AssessmentStore;
use crate::llm_client::TextGenerator;
use crate::models::assessment::{Assessment, QuestionResult};
use crate::models::require_owner;

pub const ASSESSMENT_CATEGORY: &str = "Technical";

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitQuizRequest {
    pub questions: Vec<QuizQuestion>,
    /// Aligned with `questions` by index. `null` marks an unanswered question.
    #[serde(default)]
    pub answers: Vec<Option<String>>,
}

/// A scored attempt ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAssessment {
    pub quiz_score: i32,
    pub questions: Vec<QuestionResult>,
    pub category: String,
    pub improvement_tip: Option<String>,
}

/// Scores the submission and asks for an improvement tip.
/// The score is always computed here; a client-supplied score is never trusted.
pub async fn prepare_assessment(
    ai: &dyn TextGenerator,
    model: &str,
    industry: &str,
    req: &SubmitQuizRequest,
) -> Result<NewAssessment, AppError> {
    if req.questions.is_empty() {
        return Err(AppError::Validation("A quiz needs at least one question".to_string()));
    }
    if req.answers.len() > req.questions.len() {
        return Err(AppError::Validation(format!(
            "Got {} answers for {} questions",
            req.answers.len(),
            req.questions.len()
        )));
    }

    let card = score(&req.questions, &req.answers);
    let tip = improvement_tip(ai, model, industry, &card).await;

    Ok(NewAssessment {
        quiz_score: card.percentage,
        questions: card.results,
        category: ASSESSMENT_CATEGORY.to_string(),
        improvement_tip: tip,
    })
}

pub async fn insert_assessment(
    store: &dyn AssessmentStore,
    user_id: Uuid,
    new: NewAssessment,
) -> Result<Assessment, AppError> {
    let assessment = store.insert(user_id, new).await?;
    info!(
        "Saved assessment {} for user {user_id} (score {})",
        assessment.id, assessment.quiz_score
    );
    Ok(assessment)
}

/// The caller's assessments, oldest first.
pub async fn list_assessments(
    store: &dyn AssessmentStore,
    user_id: Uuid,
) -> Result<Vec<Assessment>, AppError> {
    store.list(user_id).await
}

pub async fn get_assessment(
    store: &dyn AssessmentStore,
    user_id: Uuid,
    id: Uuid,
) -> Result<Assessment, AppError> {
    require_owner(store.find(id).await?, user_id, "Assessment")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentStats {
    pub total: usize,
    /// Mean score rounded to one decimal place; 0 with no assessments.
    pub average_score: f64,
    pub best_score: i32,
    /// Attempts taken in the seven days before `now`.
    pub this_week: usize,
}

pub fn compute_stats(assessments: &[Assessment], now: DateTime<Utc>) -> AssessmentStats {
    let total = assessments.len();
    if total == 0 {
        return AssessmentStats {
            total: 0,
            average_score: 0.0,
            best_score: 0,
            this_week: 0,
        };
    }

    let sum: i64 = assessments.iter().map(|a| i64::from(a.quiz_score)).sum();
    let average = sum as f64 / total as f64;
    let week_ago = now - Duration::days(7);

    AssessmentStats {
        total,
        average_score: (average * 10.0).round() / 10.0,
        best_score: assessments.iter().map(|a| a.quiz_score).max().unwrap_or(0),
        this_week: assessments
            .iter()
            .filter(|a| a.created_at >= week_ago && a.created_at <= now)
            .count(),
    }
}
