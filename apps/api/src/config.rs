use std::time::Duration;

use anyhow::{Context, Result};

/// Placeholder value shipped in the sample `.env`; treated the same as a missing key.
const PLACEHOLDER_AI_KEY: &str = "your_gemini_api_key_here";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// `None` when the AI service is unconfigured. Every AI call site falls back.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    /// No deadline is imposed on AI calls unless this is set.
    pub ai_timeout: Option<Duration>,
    pub auth_jwt_secret: String,
    pub auth_issuer: Option<String>,
    pub clerk_webhook_secret: String,
    pub refresh: RefreshSchedule,
    pub quiz_max_attempts: u32,
    pub port: u16,
    pub rust_log: String,
}

/// Declarative knobs for the weekly industry insight refresh.
#[derive(Debug, Clone)]
pub struct RefreshSchedule {
    pub enabled: bool,
    /// Six-field cron expression (seconds first).
    pub cron: String,
    pub concurrency: usize,
    pub retries: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let gemini_api_key = optional_env("GEMINI_API_KEY")
            .or_else(|| optional_env("GOOGLE_AI_API_KEY"))
            .filter(|key| key != PLACEHOLDER_AI_KEY);

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            gemini_api_key,
            gemini_model: optional_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            ai_timeout: parse_env::<u64>("AI_TIMEOUT_SECS")?.map(Duration::from_secs),
            auth_jwt_secret: require_env("AUTH_JWT_SECRET")?,
            auth_issuer: optional_env("AUTH_ISSUER"),
            clerk_webhook_secret: require_env("CLERK_WEBHOOK_SECRET")?,
            refresh: RefreshSchedule {
                enabled: parse_env::<bool>("ENABLE_SCHEDULER")?.unwrap_or(true),
                cron: optional_env("INSIGHTS_REFRESH_CRON")
                    .unwrap_or_else(|| "0 0 0 * * SUN".to_string()),
                concurrency: refresh_concurrency(parse_env::<usize>("INSIGHTS_REFRESH_CONCURRENCY")?)?,
                retries: parse_env::<u32>("INSIGHTS_REFRESH_RETRIES")?.unwrap_or(3),
            },
            quiz_max_attempts: parse_env::<u32>("QUIZ_MAX_ATTEMPTS")?.unwrap_or(3),
            port: parse_env::<u16>("PORT")?.unwrap_or(8080),
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Returns the variable if set and non-blank.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A zero-permit semaphore would skip every tick.
fn refresh_concurrency(raw: Option<usize>) -> Result<usize> {
    match raw {
        Some(0) => anyhow::bail!("INSIGHTS_REFRESH_CONCURRENCY must be at least 1"),
        Some(n) => Ok(n),
        None => Ok(5),
    }
}

fn parse_env<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    optional_env(key)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}"))
        })
        .transpose()
}
