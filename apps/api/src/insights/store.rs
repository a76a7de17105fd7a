//! Persistence seam for industry insights.
//!
//! The refresh job and the dashboard path only need four operations, so they go
//! through `InsightStore` instead of a raw pool. `AppState` carries an
//! `Arc<dyn InsightStore>` backed by Postgres.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::is_unique_violation;
use crate::errors::AppError;
use crate::models::insight::{IndustryInsight, InsightData};

#[async_trait]
pub trait InsightStore: Send + Sync {
    /// Every industry that currently has an insight row.
    async fn list_industries(&self) -> Result<Vec<String>, AppError>;

    async fn find(&self, industry: &str) -> Result<Option<IndustryInsight>, AppError>;

    /// Inserts a new row. A second row for the same industry is a `Conflict`.
    async fn insert(&self, insight: &IndustryInsight) -> Result<IndustryInsight, AppError>;

    /// Overwrites the AI fields and timestamps of `industry`, creating the row if needed.
    async fn upsert(
        &self,
        industry: &str,
        data: &InsightData,
        last_updated: DateTime<Utc>,
        next_update: DateTime<Utc>,
    ) -> Result<IndustryInsight, AppError>;
}

pub struct PgInsightStore {
    pool: PgPool,
}

impl PgInsightStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InsightStore for PgInsightStore {
    async fn list_industries(&self) -> Result<Vec<String>, AppError> {
        Ok(
            sqlx::query_scalar("SELECT industry FROM industry_insights ORDER BY industry")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn find(&self, industry: &str) -> Result<Option<IndustryInsight>, AppError> {
        Ok(sqlx::query_as::<_, IndustryInsight>(
            "SELECT * FROM industry_insights WHERE industry = $1",
        )
        .bind(industry)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert(&self, insight: &IndustryInsight) -> Result<IndustryInsight, AppError> {
        sqlx::query_as::<_, IndustryInsight>(
            r#"
            INSERT INTO industry_insights
                (id, industry, salary_ranges, growth_rate, demand_level, top_skills,
                 market_outlook, key_trends, recommended_skills, last_updated, next_update)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(insight.id)
        .bind(&insight.industry)
        .bind(Json(&insight.salary_ranges.0))
        .bind(insight.growth_rate)
        .bind(insight.demand_level)
        .bind(&insight.top_skills)
        .bind(insight.market_outlook)
        .bind(&insight.key_trends)
        .bind(&insight.recommended_skills)
        .bind(insight.last_updated)
        .bind(insight.next_update)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!(
                    "Insight for industry '{}' already exists",
                    insight.industry
                ))
            } else {
                AppError::Database(e)
            }
        })
    }

    async fn upsert(
        &self,
        industry: &str,
        data: &InsightData,
        last_updated: DateTime<Utc>,
        next_update: DateTime<Utc>,
    ) -> Result<IndustryInsight, AppError> {
        Ok(sqlx::query_as::<_, IndustryInsight>(
            r#"
            INSERT INTO industry_insights
                (id, industry, salary_ranges, growth_rate, demand_level, top_skills,
                 market_outlook, key_trends, recommended_skills, last_updated, next_update)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (industry) DO UPDATE SET
                salary_ranges = EXCLUDED.salary_ranges,
                growth_rate = EXCLUDED.growth_rate,
                demand_level = EXCLUDED.demand_level,
                top_skills = EXCLUDED.top_skills,
                market_outlook = EXCLUDED.market_outlook,
                key_trends = EXCLUDED.key_trends,
                recommended_skills = EXCLUDED.recommended_skills,
                last_updated = EXCLUDED.last_updated,
                next_update = EXCLUDED.next_update
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(industry)
        .bind(Json(&data.salary_ranges))
        .bind(data.growth_rate)
        .bind(data.demand_level)
        .bind(&data.top_skills)
        .bind(data.market_outlook)
        .bind(&data.key_trends)
        .bind(&data.recommended_skills)
        .bind(last_updated)
        .bind(next_update)
        .fetch_one(&self.pool)
        .await?)
    }
}

#[cfg(test)]
pub mod testing {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// In-memory store keyed by industry, with injectable listing failures.
    #[derive(Default)]
    pub struct MemoryInsightStore {
        rows: Mutex<BTreeMap<String, IndustryInsight>>,
        listing_failures: AtomicU32,
        listings: AtomicU32,
    }

    impl MemoryInsightStore {
        pub fn with_rows(rows: Vec<IndustryInsight>) -> Self {
            let store = Self::default();
            {
                let mut map = store.rows.lock().unwrap();
                for row in rows {
                    map.insert(row.industry.clone(), row);
                }
            }
            store
        }

        /// The next `n` calls to `list_industries` fail.
        pub fn fail_next_listings(&self, n: u32) {
            self.listing_failures.store(n, Ordering::SeqCst);
        }

        pub fn listings(&self) -> u32 {
            self.listings.load(Ordering::SeqCst)
        }

        pub fn get(&self, industry: &str) -> Option<IndustryInsight> {
            self.rows.lock().unwrap().get(industry).cloned()
        }
    }

    #[async_trait]
    impl InsightStore for MemoryInsightStore {
        async fn list_industries(&self) -> Result<Vec<String>, AppError> {
            self.listings.fetch_add(1, Ordering::SeqCst);
            let remaining = self.listing_failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.listing_failures.store(remaining - 1, Ordering::SeqCst);
                return Err(AppError::Internal(anyhow::anyhow!("database is down")));
            }
            Ok(self.rows.lock().unwrap().keys().cloned().collect())
        }

        async fn find(&self, industry: &str) -> Result<Option<IndustryInsight>, AppError> {
            Ok(self.get(industry))
        }

        async fn insert(&self, insight: &IndustryInsight) -> Result<IndustryInsight, AppError> {
            let mut rows = self.rows.lock().unwrap();
            if rows.contains_key(&insight.industry) {
                return Err(AppError::Conflict(format!(
                    "Insight for industry '{}' already exists",
                    insight.industry
                )));
            }
            rows.insert(insight.industry.clone(), insight.clone());
            Ok(insight.clone())
        }

        async fn upsert(
            &self,
            industry: &str,
            data: &InsightData,
            last_updated: DateTime<Utc>,
            next_update: DateTime<Utc>,
        ) -> Result<IndustryInsight, AppError> {
            let mut rows = self.rows.lock().unwrap();
            let mut row =
                IndustryInsight::from_data(industry, data.clone(), last_updated, next_update);
            if let Some(existing) = rows.get(industry) {
                row.id = existing.id;
            }
            rows.insert(industry.to_string(), row.clone());
            Ok(row)
        }
    }
}
