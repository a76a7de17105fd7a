use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::models::resume::Resume;
use crate::resume::service::{
    get_resume, improve_section, save_resume, ImproveRequest, ImproveResponse, SaveResumeRequest,
};
use crate::state::AppState;
use crate::users::auth::AuthUser;

/// GET /api/resume
///
/// Returns `null` until the user saves one.
pub async fn handle_get_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Option<Resume>>, AppError> {
    Ok(Json(get_resume(&state.db, user.id).await?))
}

/// PUT /api/resume
pub async fn handle_save_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<SaveResumeRequest>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(save_resume(&state.db, user.id, &req.content).await?))
}

/// POST /api/resume/improve
pub async fn handle_improve_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<ImproveRequest>,
) -> Result<Json<ImproveResponse>, AppError> {
    let out = improve_section(state.ai.as_ref(), &state.config.gemini_model, &user, &req).await?;
    Ok(Json(out))
}
