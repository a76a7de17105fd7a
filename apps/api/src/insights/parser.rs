//! Insight Parser: turns raw AI text into a validated `InsightData`.
//!
//! Callers never see a parse failure: anything that does not decode into the
//! seven required fields is replaced by the caller-supplied fallback.

use tracing::warn;

use crate::llm_client::{strip_code_fences, Validated};
use crate::models::insight::InsightData;

/// Strips code fences and checks the reply against the insight schema.
pub fn validate_insight(raw_text: &str) -> Validated<InsightData> {
    let cleaned = strip_code_fences(raw_text);
    if cleaned.is_empty() {
        return Validated::Invalid("empty response".to_string());
    }
    match serde_json::from_str::<InsightData>(&cleaned) {
        Ok(data) => Validated::Valid(data),
        Err(e) => Validated::Invalid(e.to_string()),
    }
}

/// Parses `raw_text`, substituting `fallback()` when it is not a valid insight.
pub fn parse_insight(raw_text: &str, fallback: impl FnOnce() -> InsightData) -> InsightData {
    validate_insight(raw_text).or_fallback(|reason| {
        warn!("AI insight reply rejected ({reason}), using fallback insight");
        fallback()
    })
}
