use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::cover_letter::store::CoverLetterStore;
use crate::insights::store::InsightStore;
use crate::interview::store::AssessmentStore;
use crate::llm_client::TextGenerator;
use crate::users::auth::SessionVerifier;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// The one AI client for the process. Unconfigured when no API key is set.
    pub ai: Arc<dyn TextGenerator>,
    pub insights: Arc<dyn InsightStore>,
    pub assessments: Arc<dyn AssessmentStore>,
    pub cover_letters: Arc<dyn CoverLetterStore>,
    pub sessions: SessionVerifier,
    pub config: Config,
}
