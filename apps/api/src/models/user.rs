use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    /// Identity-provider user id (the session token's `sub`).
    pub clerk_user_id: String,
    /// `None` until the identity provider reports one; session tokens may omit it.
    pub email: Option<String>,
    pub name: Option<String>,
    pub image_url: Option<String>,
    /// Composite `{industry}-{sub-industry}` key; `None` until onboarding completes.
    pub industry_name: Option<String>,
    pub experience: Option<i32>,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_onboarded(&self) -> bool {
        self.industry_name
            .as_deref()
            .is_some_and(|industry| !industry.trim().is_empty())
    }
}
