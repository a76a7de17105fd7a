use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Owned;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetter {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub job_description: Option<String>,
    pub company_name: String,
    pub job_title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for CoverLetter {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}
