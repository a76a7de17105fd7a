//! Weekly insight refresh: regenerates every known industry in sequence.
//!
//! Each industry is isolated: a failed AI call or write is logged and the loop
//! moves on. Completed updates are never rolled back.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::insights::fallback::refresh_fallback;
use crate::insights::parser::parse_insight;
use crate::insights::prompts::build_insight_prompt;
use crate::insights::service::next_update_after;
use crate::insights::store::InsightStore;
use crate::llm_client::TextGenerator;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    /// Industries attempted, including the ones that failed.
    pub industries_processed: usize,
    pub updated: Vec<String>,
    pub failed: Vec<String>,
}

/// Runs one refresh pass. Only a failure to list industries fails the pass.
///
/// Every row written in this pass is stamped with `now`.
pub async fn run_insight_refresh(
    store: &dyn InsightStore,
    ai: &dyn TextGenerator,
    model: &str,
    now: DateTime<Utc>,
) -> Result<RefreshReport> {
    info!("Starting industry insights refresh");

    let industries = store
        .list_industries()
        .await
        .context("Failed to fetch industries")?;

    info!("Found {} industries to process", industries.len());

    let mut updated = Vec::new();
    let mut failed = Vec::new();

    for industry in &industries {
        match refresh_industry(store, ai, model, industry, now).await {
            Ok(()) => {
                info!("Successfully updated insights for {industry}");
                updated.push(industry.clone());
            }
            Err(e) => {
                error!("Failed to process industry {industry}: {e:#}");
                failed.push(industry.clone());
            }
        }
    }

    let report = RefreshReport {
        industries_processed: industries.len(),
        updated,
        failed,
    };
    info!(
        processed = report.industries_processed,
        updated = report.updated.len(),
        failed = report.failed.len(),
        "Industry insights refresh completed"
    );
    Ok(report)
}

async fn refresh_industry(
    store: &dyn InsightStore,
    ai: &dyn TextGenerator,
    model: &str,
    industry: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    let text = ai
        .generate(&build_insight_prompt(industry), model)
        .await
        .with_context(|| format!("AI generation failed for {industry}"))?;

    let data = parse_insight(&text, refresh_fallback);

    store
        .upsert(industry, &data, now, next_update_after(now))
        .await
        .with_context(|| format!("Failed to update insights for {industry}"))?;

    Ok(())
}
