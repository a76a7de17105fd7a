//! Scheduled insight refresh using tokio-cron-scheduler.
//!
//! The job carries its own concurrency ceiling and retry count, so the policy
//! holds even without an external orchestrator:
//!
//! ```text
//! cron tick
//!     └─► RefreshJob::invoke()
//!             ├─ no free permit → skip this tick
//!             └─ run_insight_refresh() ── Err ─► back off, retry (bounded)
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tokio::sync::Semaphore;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use crate::insights::refresh::{run_insight_refresh, RefreshReport};
use crate::insights::store::InsightStore;
use crate::llm_client::TextGenerator;

pub struct RefreshJob {
    store: Arc<dyn InsightStore>,
    ai: Arc<dyn TextGenerator>,
    model: String,
    permits: Arc<Semaphore>,
    retries: u32,
    retry_base_delay: Duration,
}

impl RefreshJob {
    pub fn new(
        store: Arc<dyn InsightStore>,
        ai: Arc<dyn TextGenerator>,
        model: String,
        concurrency: usize,
        retries: u32,
    ) -> Self {
        Self {
            store,
            ai,
            model,
            permits: Arc::new(Semaphore::new(concurrency)),
            retries,
            retry_base_delay: Duration::from_secs(30),
        }
    }

    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Runs one refresh, honouring the concurrency ceiling and retry budget.
    /// Returns `None` when the tick was skipped or every attempt failed.
    pub async fn invoke(&self) -> Option<RefreshReport> {
        let Ok(_permit) = self.permits.try_acquire() else {
            warn!("Insight refresh concurrency limit reached; skipping this invocation");
            return None;
        };

        for attempt in 0..=self.retries {
            if attempt > 0 {
                let delay = self.retry_base_delay * (1 << (attempt - 1).min(16));
                warn!(
                    "Retrying insight refresh (attempt {}/{}) after {}ms",
                    attempt + 1,
                    self.retries + 1,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            match run_insight_refresh(
                self.store.as_ref(),
                self.ai.as_ref(),
                &self.model,
                Utc::now(),
            )
            .await
            {
                Ok(report) => return Some(report),
                Err(e) => error!("Insight refresh attempt {} failed: {e:#}", attempt + 1),
            }
        }

        error!(
            "Insight refresh gave up after {} attempts",
            self.retries + 1
        );
        None
    }
}

/// Registers the refresh job on `cron` and starts the scheduler.
pub async fn start_scheduler(job: Arc<RefreshJob>, cron: &str) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let refresh_job = Job::new_async(cron, move |_uuid, _lock| {
        let job = job.clone();
        Box::pin(async move {
            job.invoke().await;
        })
    })?;

    scheduler.add(refresh_job).await?;
    scheduler.start().await?;

    info!("Scheduled insight refresh started (cron: {cron})");
    Ok(scheduler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::fallback::dashboard_fallback;
    use crate::insights::store::testing::MemoryInsightStore;
    use crate::llm_client::testing::{Reply, ScriptedGenerator};
    use crate::models::insight::IndustryInsight;

    fn store_with(industry: &str) -> Arc<MemoryInsightStore> {
        let now = Utc::now();
        Arc::new(MemoryInsightStore::with_rows(vec![IndustryInsight::from_data(
            industry,
            dashboard_fallback(industry),
            now,
            now,
        )]))
    }

    fn reply() -> Reply {
        Reply::Text(serde_json::to_string(&dashboard_fallback("legal")).unwrap())
    }

    #[tokio::test]
    async fn test_job_level_failure_is_retried() {
        let store = store_with("legal");
        store.fail_next_listings(2);
        let ai = Arc::new(ScriptedGenerator::new(vec![reply()]));
        let job = RefreshJob::new(store.clone(), ai, "m".to_string(), 5, 3)
            .with_retry_base_delay(Duration::ZERO);

        let report = job.invoke().await.unwrap();

        assert_eq!(report.industries_processed, 1);
        assert_eq!(store.listings(), 3);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let store = store_with("legal");
        store.fail_next_listings(10);
        let ai = Arc::new(ScriptedGenerator::new(vec![]));
        let job = RefreshJob::new(store.clone(), ai, "m".to_string(), 5, 3)
            .with_retry_base_delay(Duration::ZERO);

        assert!(job.invoke().await.is_none());
        assert_eq!(store.listings(), 4);
    }

    #[tokio::test]
    async fn test_invocation_is_skipped_without_a_permit() {
        let store = store_with("legal");
        let ai = Arc::new(ScriptedGenerator::new(vec![reply()]));
        let job = RefreshJob::new(store.clone(), ai, "m".to_string(), 0, 3);

        assert!(job.invoke().await.is_none());
        assert_eq!(store.listings(), 0);
    }
}
