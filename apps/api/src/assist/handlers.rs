use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::assist::{assist, AssistRequest};
use crate::errors::AppError;
use crate::state::AppState;
use crate::users::auth::AuthUser;

/// POST /api/ai/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(req): Json<AssistRequest>,
) -> Result<Json<Value>, AppError> {
    let data = assist(state.ai.as_ref(), &state.config.gemini_model, &req, Utc::now()).await?;
    Ok(Json(json!({ "success": true, "data": data })))
}
