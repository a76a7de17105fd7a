use axum::{extract::State, Json};
use chrono::Utc;

use crate::errors::AppError;
use crate::insights::service::get_or_create_insight;
use crate::models::insight::IndustryInsight;
use crate::state::AppState;
use crate::users::auth::AuthUser;

/// GET /api/insights
///
/// Returns the insight for the caller's industry, generating it on first request.
pub async fn handle_get_insights(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<IndustryInsight>, AppError> {
    if !user.is_onboarded() {
        return Err(AppError::Validation("User has not completed onboarding".to_string()));
    }
    let industry = user
        .industry_name
        .as_deref()
        .ok_or_else(|| AppError::Validation("User has not completed onboarding".to_string()))?;

    let insight = get_or_create_insight(
        state.insights.as_ref(),
        state.ai.as_ref(),
        &state.config.gemini_model,
        industry,
        Utc::now(),
    )
    .await?;

    Ok(Json(insight))
}
