use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use super::Owned;

/// Per-question outcome stored on an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question: String,
    pub correct_answer: String,
    pub user_answer: Option<String>,
    pub is_correct: bool,
    pub explanation: String,
}

/// One completed quiz attempt. Written once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub quiz_score: i32,
    pub questions: Json<Vec<QuestionResult>>,
    pub category: String,
    pub improvement_tip: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Owned for Assessment {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}
