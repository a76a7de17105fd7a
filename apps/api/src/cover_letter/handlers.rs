//! Axum route handlers for cover letters.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::cover_letter::service::{
    create_cover_letter, delete_cover_letter, generate_cover_letter, get_cover_letter,
    list_cover_letters, update_cover_letter, CoverLetterInput, GenerateCoverLetterRequest,
    GeneratedCoverLetter,
};
use crate::errors::AppError;
use crate::models::cover_letter::CoverLetter;
use crate::state::AppState;
use crate::users::auth::AuthUser;

/// GET /api/cover-letters
pub async fn handle_list_cover_letters(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<CoverLetter>>, AppError> {
    Ok(Json(list_cover_letters(state.cover_letters.as_ref(), user.id).await?))
}

/// POST /api/cover-letters
pub async fn handle_create_cover_letter(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<CoverLetterInput>,
) -> Result<Json<CoverLetter>, AppError> {
    Ok(Json(create_cover_letter(state.cover_letters.as_ref(), user.id, &input).await?))
}

/// GET /api/cover-letters/:id
pub async fn handle_get_cover_letter(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CoverLetter>, AppError> {
    Ok(Json(get_cover_letter(state.cover_letters.as_ref(), user.id, id).await?))
}

/// PUT /api/cover-letters/:id
pub async fn handle_update_cover_letter(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<CoverLetterInput>,
) -> Result<Json<CoverLetter>, AppError> {
    Ok(Json(update_cover_letter(state.cover_letters.as_ref(), user.id, id, &input).await?))
}

/// DELETE /api/cover-letters/:id
pub async fn handle_delete_cover_letter(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    delete_cover_letter(state.cover_letters.as_ref(), user.id, id).await?;
    Ok(Json(json!({ "success": true })))
}

/// POST /api/cover-letters/generate
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<GenerateCoverLetterRequest>,
) -> Result<Json<GeneratedCoverLetter>, AppError> {
    let letter = generate_cover_letter(
        state.cover_letters.as_ref(),
        state.ai.as_ref(),
        &state.config.gemini_model,
        &user,
        &req,
    )
    .await?;
    Ok(Json(letter))
}
