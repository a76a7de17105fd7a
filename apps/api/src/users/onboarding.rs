//! Onboarding: records the user's industry and profile, and makes sure the
//! industry has an insight row before the dashboard asks for it.

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::insights::service::get_or_create_insight;
use crate::models::user::User;
use crate::state::AppState;
use crate::users::accounts::{update_profile, ProfileUpdate};
use crate::users::catalog::industry_key;

const MAX_EXPERIENCE_YEARS: i32 = 50;
const MAX_BIO_CHARS: usize = 2000;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardRequest {
    /// Either a catalog industry id (with `sub_industry`) or an already composed key.
    pub industry: String,
    #[serde(default)]
    pub sub_industry: Option<String>,
    #[serde(default)]
    pub experience: Option<i32>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Validates the request and normalizes it into a profile update.
pub fn validate_onboarding(req: &OnboardRequest) -> Result<ProfileUpdate, AppError> {
    let industry = req.industry.trim();
    if industry.is_empty() {
        return Err(AppError::Validation("Industry is required".to_string()));
    }

    let industry_name = match req.sub_industry.as_deref().map(str::trim) {
        Some(sub) if !sub.is_empty() => industry_key(industry, sub).ok_or_else(|| {
            AppError::Validation(format!("Unknown specialization '{sub}' for industry '{industry}'"))
        })?,
        _ => industry.to_string(),
    };

    if let Some(years) = req.experience {
        if !(0..=MAX_EXPERIENCE_YEARS).contains(&years) {
            return Err(AppError::Validation(format!(
                "Experience must be between 0 and {MAX_EXPERIENCE_YEARS} years"
            )));
        }
    }

    let bio = req
        .bio
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string);
    if bio.as_ref().is_some_and(|b| b.chars().count() > MAX_BIO_CHARS) {
        return Err(AppError::Validation(format!(
            "Bio must be at most {MAX_BIO_CHARS} characters"
        )));
    }

    let skills = req
        .skills
        .iter()
        .flat_map(|s| s.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    Ok(ProfileUpdate {
        industry_name,
        experience: req.experience,
        bio,
        skills,
    })
}

/// Applies onboarding for `user`, creating the industry insight first if needed.
pub async fn update_user(
    state: &AppState,
    user: &User,
    req: &OnboardRequest,
) -> Result<User, AppError> {
    let update = validate_onboarding(req)?;

    get_or_create_insight(
        state.insights.as_ref(),
        state.ai.as_ref(),
        &state.config.gemini_model,
        &update.industry_name,
        Utc::now(),
    )
    .await?;

    let updated = update_profile(&state.db, user.id, &update).await?;
    info!(
        "User {} onboarded into {}",
        updated.clerk_user_id, update.industry_name
    );
    Ok(updated)
}
