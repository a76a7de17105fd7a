//! Persistence seam for assessments. Rows are append-only.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::assessments::NewAssessment;
use crate::models::assessment::Assessment;

#[async_trait]
pub trait AssessmentStore: Send + Sync {
    async fn insert(&self, user_id: Uuid, new: NewAssessment) -> Result<Assessment, AppError>;

    /// The user's assessments, oldest first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<Assessment>, AppError>;

    /// Unscoped lookup; callers check ownership.
    async fn find(&self, id: Uuid) -> Result<Option<Assessment>, AppError>;
}

pub struct PgAssessmentStore {
    pool: PgPool,
}

impl PgAssessmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssessmentStore for PgAssessmentStore {
    async fn insert(&self, user_id: Uuid, new: NewAssessment) -> Result<Assessment, AppError> {
        Ok(sqlx::query_as::<_, Assessment>(
            r#"
            INSERT INTO assessments (id, user_id, quiz_score, questions, category, improvement_tip)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(new.quiz_score)
        .bind(Json(new.questions))
        .bind(&new.category)
        .bind(&new.improvement_tip)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<Assessment>, AppError> {
        Ok(sqlx::query_as::<_, Assessment>(
            "SELECT * FROM assessments WHERE user_id = $1 ORDER BY created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Assessment>, AppError> {
        Ok(
            sqlx::query_as::<_, Assessment>("SELECT * FROM assessments WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }
}
