use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::errors::AppError;
use crate::state::AppState;
use crate::users::auth::AuthUser;
use crate::users::catalog::{Industry, INDUSTRIES};
use crate::users::onboarding::{update_user, OnboardRequest};
use crate::users::webhook::{apply_event, verify_signature, SignatureHeaders, WebhookEvent};

/// POST /api/user/onboard
///
/// Every failure, including a missing session, is reported as 400 `{success:false,error}`.
pub async fn handle_onboard(
    State(state): State<AppState>,
    auth: Result<AuthUser, AppError>,
    Json(req): Json<OnboardRequest>,
) -> Response {
    let result = match auth {
        Ok(AuthUser(user)) => update_user(&state, &user, &req).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(user) => Json(json!({ "success": true, "data": user })).into_response(),
        Err(e) => {
            error!("Onboarding API error: {e}");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "error": e.public_message() })),
            )
                .into_response()
        }
    }
}

/// GET /api/user/onboarding-status
pub async fn handle_onboarding_status(AuthUser(user): AuthUser) -> Json<Value> {
    Json(json!({ "isOnboarded": user.is_onboarded() }))
}

/// GET /api/industries
pub async fn handle_list_industries() -> Json<&'static [Industry]> {
    Json(INDUSTRIES)
}

/// POST /api/clerk/webhook
pub async fn handle_identity_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let payload = std::str::from_utf8(&body)
        .map_err(|_| AppError::Validation("Webhook body must be UTF-8".to_string()))?;

    SignatureHeaders::from_headers(&headers)
        .and_then(|sig| {
            verify_signature(
                &state.config.clerk_webhook_secret,
                sig,
                payload,
                chrono::Utc::now().timestamp(),
            )
        })
        .map_err(|e| {
            warn!("Webhook verification failed: {e}");
            AppError::Validation("Invalid signature".to_string())
        })?;

    let event = WebhookEvent::parse(payload)
        .map_err(|e| AppError::Validation(format!("Malformed webhook payload: {e}")))?;

    apply_event(&state.db, event).await?;

    Ok(Json(json!({ "success": true })))
}
