pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assist::handlers as assist;
use crate::cover_letter::handlers as cover_letters;
use crate::insights::handlers as insights;
use crate::interview::handlers as interview;
use crate::resume::handlers as resume;
use crate::state::AppState;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Identity and onboarding
        .route("/api/clerk/webhook", post(users::handle_identity_webhook))
        .route("/api/user/onboard", post(users::handle_onboard))
        .route(
            "/api/user/onboarding-status",
            get(users::handle_onboarding_status),
        )
        .route("/api/industries", get(users::handle_list_industries))
        // Dashboard
        .route("/api/insights", get(insights::handle_get_insights))
        // Mock interviews
        .route("/api/interview/quiz", post(interview::handle_generate_quiz))
        .route(
            "/api/interview/assessments",
            get(interview::handle_list_assessments).post(interview::handle_submit_quiz),
        )
        .route(
            "/api/interview/assessments/:id",
            get(interview::handle_get_assessment),
        )
        .route("/api/interview/stats", get(interview::handle_assessment_stats))
        // Cover letters
        .route(
            "/api/cover-letters",
            get(cover_letters::handle_list_cover_letters)
                .post(cover_letters::handle_create_cover_letter),
        )
        .route(
            "/api/cover-letters/generate",
            post(cover_letters::handle_generate_cover_letter),
        )
        .route(
            "/api/cover-letters/:id",
            get(cover_letters::handle_get_cover_letter)
                .put(cover_letters::handle_update_cover_letter)
                .delete(cover_letters::handle_delete_cover_letter),
        )
        // Resume
        .route(
            "/api/resume",
            get(resume::handle_get_resume).put(resume::handle_save_resume),
        )
        .route("/api/resume/improve", post(resume::handle_improve_resume))
        // General AI assistance
        .route("/api/ai/generate", post(assist::handle_generate))
        .with_state(state)
}
