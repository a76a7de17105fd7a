//! Industry insights: AI-generated market snapshots, one row per industry.

pub mod fallback;
pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod refresh;
pub mod scheduler;
pub mod service;
pub mod store;
