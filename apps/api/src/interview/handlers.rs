//! Axum route handlers for mock interviews.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::assessments::{
    compute_stats, get_assessment, insert_assessment, list_assessments, prepare_assessment,
    AssessmentStats, SubmitQuizRequest,
};
use crate::interview::quiz::{generate_quiz_with_retry, QuizProfile, QuizQuestion, RetryPolicy};
use crate::models::assessment::Assessment;
use crate::state::AppState;
use crate::users::auth::AuthUser;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResponse {
    pub questions: Vec<QuizQuestion>,
    /// True when the fixed question bank was served instead of a generated quiz.
    pub fallback: bool,
}

/// POST /api/interview/quiz
pub async fn handle_generate_quiz(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Json<QuizResponse> {
    let profile = QuizProfile::from(&user);
    let policy = RetryPolicy::new(state.config.quiz_max_attempts);

    let outcome =
        generate_quiz_with_retry(state.ai.as_ref(), &state.config.gemini_model, &profile, policy)
            .await;
    let fallback = outcome.is_fallback();

    Json(QuizResponse {
        questions: outcome.into_questions(),
        fallback,
    })
}

/// POST /api/interview/assessments
pub async fn handle_submit_quiz(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<SubmitQuizRequest>,
) -> Result<Json<Assessment>, AppError> {
    let profile = QuizProfile::from(&user);
    let new = prepare_assessment(
        state.ai.as_ref(),
        &state.config.gemini_model,
        profile.industry(),
        &req,
    )
    .await?;

    Ok(Json(insert_assessment(state.assessments.as_ref(), user.id, new).await?))
}

/// GET /api/interview/assessments
pub async fn handle_list_assessments(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Assessment>>, AppError> {
    Ok(Json(list_assessments(state.assessments.as_ref(), user.id).await?))
}

/// GET /api/interview/assessments/:id
pub async fn handle_get_assessment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Assessment>, AppError> {
    Ok(Json(get_assessment(state.assessments.as_ref(), user.id, id).await?))
}

/// GET /api/interview/stats
pub async fn handle_assessment_stats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<AssessmentStats>, AppError> {
    let history = list_assessments(state.assessments.as_ref(), user.id).await?;
    Ok(Json(compute_stats(&history, Utc::now())))
}
