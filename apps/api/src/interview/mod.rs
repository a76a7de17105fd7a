pub mod assessments;
pub mod fallback;
pub mod handlers;
pub mod prompts;
pub mod quiz;
pub mod scoring;
pub mod store;
