//! On-demand insight path: used by the dashboard and by onboarding.

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::insights::fallback::dashboard_fallback;
use crate::insights::parser::parse_insight;
use crate::insights::prompts::build_insight_prompt;
use crate::insights::store::InsightStore;
use crate::llm_client::TextGenerator;
use crate::models::insight::{IndustryInsight, InsightData};

/// Insights are regenerated weekly.
pub const REFRESH_INTERVAL_DAYS: i64 = 7;

pub fn next_update_after(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(REFRESH_INTERVAL_DAYS)
}

/// Asks the AI for an industry snapshot. Never fails: an unconfigured service,
/// a failed call, or an unusable reply all yield the dashboard fallback.
pub async fn generate_ai_insights(
    ai: &dyn TextGenerator,
    model: &str,
    industry: &str,
) -> InsightData {
    match ai.generate(&build_insight_prompt(industry), model).await {
        Ok(text) => parse_insight(&text, || dashboard_fallback(industry)),
        Err(e) if e.is_unconfigured() => {
            warn!("AI service not configured, using fallback insights for {industry}");
            dashboard_fallback(industry)
        }
        Err(e) => {
            warn!("Error generating AI insights for {industry}: {e}; using fallback insights");
            dashboard_fallback(industry)
        }
    }
}

/// Returns the stored insight for `industry`, generating and persisting it on first request.
pub async fn get_or_create_insight(
    store: &dyn InsightStore,
    ai: &dyn TextGenerator,
    model: &str,
    industry: &str,
    now: DateTime<Utc>,
) -> Result<IndustryInsight, AppError> {
    if let Some(existing) = store.find(industry).await? {
        return Ok(existing);
    }

    let data = generate_ai_insights(ai, model, industry).await;
    let insight = IndustryInsight::from_data(industry, data, now, next_update_after(now));
    let created = store.insert(&insight).await?;

    info!("Created industry insight for {industry}");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::insights::fallback::refresh_fallback;
    use crate::insights::store::testing::MemoryInsightStore;
    use crate::llm_client::testing::{Reply, ScriptedGenerator};
    use crate::models::insight::{DemandLevel, MarketOutlook};

    /// Another request inserted the row between our `find` and our `insert`.
    struct LostRaceStore {
        inner: MemoryInsightStore,
    }

    #[async_trait]
    impl InsightStore for LostRaceStore {
        async fn list_industries(&self) -> Result<Vec<String>, AppError> {
            self.inner.list_industries().await
        }

        async fn find(&self, _industry: &str) -> Result<Option<IndustryInsight>, AppError> {
            Ok(None)
        }

        async fn insert(&self, insight: &IndustryInsight) -> Result<IndustryInsight, AppError> {
            self.inner.insert(insight).await
        }

        async fn upsert(
            &self,
            industry: &str,
            data: &InsightData,
            last_updated: DateTime<Utc>,
            next_update: DateTime<Utc>,
        ) -> Result<IndustryInsight, AppError> {
            self.inner.upsert(industry, data, last_updated, next_update).await
        }
    }

    fn now() -> DateTime<Utc> {
        "2026-03-01T12:00:00Z".parse().unwrap()
    }

    #[tokio::test]
    async fn test_missing_insight_without_ai_key_persists_fallback() {
        let store = MemoryInsightStore::default();
        let ai = ScriptedGenerator::unconfigured();

        let insight = get_or_create_insight(&store, &ai, "m", "technology-devops-sre", now())
            .await
            .unwrap();

        assert_eq!(insight.salary_ranges.0.len(), 5);
        assert_eq!(insight.salary_ranges.0[0].role, "technology Analyst");
        assert_eq!(insight.demand_level, DemandLevel::High);
        assert_eq!(insight.market_outlook, MarketOutlook::Positive);
        assert_eq!(insight.next_update, now() + Duration::days(7));
        assert_eq!(insight.last_updated, now());

        let stored = store.get("technology-devops-sre").unwrap();
        assert_eq!(stored.id, insight.id);
    }

    #[tokio::test]
    async fn test_existing_insight_is_returned_without_ai_call() {
        let existing = IndustryInsight::from_data(
            "legal-compliance",
            refresh_fallback(),
            now(),
            next_update_after(now()),
        );
        let store = MemoryInsightStore::with_rows(vec![existing.clone()]);
        let ai = ScriptedGenerator::new(vec![]);

        let insight = get_or_create_insight(&store, &ai, "m", "legal-compliance", now())
            .await
            .unwrap();

        assert_eq!(insight.id, existing.id);
        assert_eq!(ai.calls(), 0);
    }

    #[tokio::test]
    async fn test_ai_reply_is_persisted_when_valid() {
        let reply = serde_json::to_string(&refresh_fallback()).unwrap();
        let ai = ScriptedGenerator::new(vec![Reply::Text(format!("```json\n{reply}\n```"))]);
        let store = MemoryInsightStore::default();

        let insight = get_or_create_insight(&store, &ai, "m", "sales-retail", now())
            .await
            .unwrap();

        assert_eq!(insight.data(), refresh_fallback());
        assert!(ai.prompts()[0].contains("the sales-retail industry"));
    }

    #[tokio::test]
    async fn test_runtime_ai_failure_uses_dashboard_fallback() {
        let ai = ScriptedGenerator::new(vec![Reply::Unavailable]);
        let data = generate_ai_insights(&ai, "m", "education-k12").await;
        assert_eq!(data, dashboard_fallback("education-k12"));
    }

    #[tokio::test]
    async fn test_concurrent_insert_conflict_propagates() {
        let winner = IndustryInsight::from_data(
            "finance-banking",
            refresh_fallback(),
            now(),
            next_update_after(now()),
        );
        let store = LostRaceStore {
            inner: MemoryInsightStore::with_rows(vec![winner.clone()]),
        };
        let ai = ScriptedGenerator::unconfigured();

        let err = get_or_create_insight(&store, &ai, "m", "finance-banking", now())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(ref m) if m.contains("finance-banking")));
        assert_eq!(store.inner.get("finance-banking").unwrap().id, winner.id);
    }
}
