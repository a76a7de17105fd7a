//! Quiz Generator: asks the AI for a tailored multiple-choice quiz.
//!
//! Generation always succeeds: an unconfigured service, a failed call, or a reply
//! that does not validate all end in the fixed fallback bank.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::interview::fallback::fallback_questions;
use crate::interview::prompts::QUIZ_PROMPT_TEMPLATE;
use crate::llm_client::{strip_code_fences, TextGenerator, Validated};
use crate::models::user::User;

pub const QUIZ_LENGTH: usize = 10;
pub const OPTIONS_PER_QUESTION: usize = 4;
const DEFAULT_INDUSTRY: &str = "Technology";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

impl QuizQuestion {
    /// Exactly four options, and the correct answer is one of them.
    pub fn check(&self) -> Result<(), String> {
        if self.question.trim().is_empty() {
            return Err("question text is empty".to_string());
        }
        if self.options.len() != OPTIONS_PER_QUESTION {
            return Err(format!(
                "expected {OPTIONS_PER_QUESTION} options, got {}",
                self.options.len()
            ));
        }
        if !self.options.contains(&self.correct_answer) {
            return Err(format!(
                "correctAnswer '{}' is not one of the options",
                self.correct_answer
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct QuizReply {
    questions: Vec<QuizQuestion>,
}

/// Profile fields the quiz is tailored to.
#[derive(Debug, Clone, Default)]
pub struct QuizProfile {
    pub industry_name: Option<String>,
    pub skills: Vec<String>,
}

impl From<&User> for QuizProfile {
    fn from(user: &User) -> Self {
        Self {
            industry_name: user.industry_name.clone(),
            skills: user.skills.clone(),
        }
    }
}

impl QuizProfile {
    /// The profile's industry, or "Technology" for users who skipped onboarding.
    pub fn industry(&self) -> &str {
        self.industry_name
            .as_deref()
            .map(str::trim)
            .filter(|i| !i.is_empty())
            .unwrap_or(DEFAULT_INDUSTRY)
    }
}

pub fn build_quiz_prompt(profile: &QuizProfile) -> String {
    let skills_clause = if profile.skills.is_empty() {
        String::new()
    } else {
        format!(" with expertise in {}", profile.skills.join(", "))
    };
    QUIZ_PROMPT_TEMPLATE
        .replace("{industry}", profile.industry())
        .replace("{skills_clause}", &skills_clause)
}

/// Checks a raw reply: `{"questions": [...]}`, non-empty, every question well-formed.
pub fn validate_quiz(raw_text: &str) -> Validated<Vec<QuizQuestion>> {
    let cleaned = strip_code_fences(raw_text);
    let reply = match serde_json::from_str::<QuizReply>(&cleaned) {
        Ok(reply) => reply,
        Err(e) => return Validated::Invalid(e.to_string()),
    };
    if reply.questions.is_empty() {
        return Validated::Invalid("questions array is empty".to_string());
    }
    for (i, q) in reply.questions.iter().enumerate() {
        if let Err(reason) = q.check() {
            return Validated::Invalid(format!("question {}: {reason}", i + 1));
        }
    }
    if reply.questions.len() != QUIZ_LENGTH {
        warn!(
            "AI returned {} quiz questions instead of {QUIZ_LENGTH}",
            reply.questions.len()
        );
    }
    Validated::Valid(reply.questions)
}

/// Bounded retry policy for quiz generation.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::from_secs(1),
        }
    }

    pub fn single() -> Self {
        Self::new(1)
    }

    /// Delay before attempt `attempt` (0-based): 0, base, 2×base, 4×base, …
    fn delay_before(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            Duration::ZERO
        } else {
            self.base_delay * (1 << (attempt - 1).min(16))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuizOutcome {
    Succeeded(Vec<QuizQuestion>),
    ExhaustedFallback(Vec<QuizQuestion>),
}

impl QuizOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, QuizOutcome::ExhaustedFallback(_))
    }

    pub fn into_questions(self) -> Vec<QuizQuestion> {
        match self {
            QuizOutcome::Succeeded(q) | QuizOutcome::ExhaustedFallback(q) => q,
        }
    }
}

/// Tries up to `policy.max_attempts` times, backing off between attempts.
/// An unconfigured AI service goes straight to the fallback bank.
pub async fn generate_quiz_with_retry(
    ai: &dyn TextGenerator,
    model: &str,
    profile: &QuizProfile,
    policy: RetryPolicy,
) -> QuizOutcome {
    let prompt = build_quiz_prompt(profile);

    for attempt in 0..policy.max_attempts {
        let delay = policy.delay_before(attempt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match ai.generate(&prompt, model).await {
            Ok(text) => match validate_quiz(&text) {
                Validated::Valid(questions) => {
                    info!(
                        "Generated {} quiz questions for {}",
                        questions.len(),
                        profile.industry()
                    );
                    return QuizOutcome::Succeeded(questions);
                }
                Validated::Invalid(reason) => warn!(
                    "Quiz attempt {}/{} returned invalid format: {reason}",
                    attempt + 1,
                    policy.max_attempts
                ),
            },
            Err(e) if e.is_unconfigured() => {
                warn!("AI service not configured, using fallback quiz questions");
                return QuizOutcome::ExhaustedFallback(fallback_questions());
            }
            Err(e) => warn!(
                "Quiz attempt {}/{} failed: {e}",
                attempt + 1,
                policy.max_attempts
            ),
        }
    }

    warn!("Falling back to default quiz questions");
    QuizOutcome::ExhaustedFallback(fallback_questions())
}

/// Single-attempt generation. Always returns a non-empty question list.
pub async fn generate_quiz(
    ai: &dyn TextGenerator,
    model: &str,
    profile: &QuizProfile,
) -> Vec<QuizQuestion> {
    generate_quiz_with_retry(ai, model, profile, RetryPolicy::single())
        .await
        .into_questions()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{Reply, ScriptedGenerator};

    fn sample_quiz(n: usize) -> String {
        let questions: Vec<_> = (0..n)
            .map(|i| {
                serde_json::json!({
                    "question": format!("What does HTTP status {} mean?", 200 + i),
                    "options": ["OK", "Created", "Accepted", "Not Found"],
                    "correctAnswer": "OK",
                    "explanation": "Status codes are standardized."
                })
            })
            .collect();
        serde_json::json!({ "questions": questions }).to_string()
    }

    fn zero_delay(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::ZERO,
        }
    }

    #[test]
    fn test_prompt_defaults_industry_and_lists_skills() {
        let prompt = build_quiz_prompt(&QuizProfile {
            industry_name: None,
            skills: vec!["Rust".to_string(), "Postgres".to_string()],
        });
        assert!(prompt.contains("for a Technology professional with expertise in Rust, Postgres."));

        let prompt = build_quiz_prompt(&QuizProfile {
            industry_name: Some("healthcare-nursing".to_string()),
            skills: vec![],
        });
        assert!(prompt.contains("for a healthcare-nursing professional."));
    }

    #[test]
    fn test_validate_accepts_fenced_reply() {
        let reply = format!("```json\n{}\n```", sample_quiz(10));
        match validate_quiz(&reply) {
            Validated::Valid(q) => assert_eq!(q.len(), 10),
            Validated::Invalid(reason) => panic!("unexpected: {reason}"),
        }
    }

    #[test]
    fn test_validate_rejects_bad_shapes() {
        assert!(!validate_quiz(r#"{"questions": []}"#).is_valid());
        assert!(!validate_quiz(r#"{"questions": "none"}"#).is_valid());
        assert!(!validate_quiz(r#"{"items": []}"#).is_valid());
        assert!(!validate_quiz("not json").is_valid());
    }

    #[test]
    fn test_validate_rejects_answer_outside_options() {
        let reply = sample_quiz(10).replace("\"correctAnswer\":\"OK\"", "\"correctAnswer\":\"Teapot\"");
        assert!(matches!(
            validate_quiz(&reply),
            Validated::Invalid(reason) if reason.contains("Teapot")
        ));
    }

    #[test]
    fn test_validate_rejects_wrong_option_count() {
        let reply = serde_json::json!({"questions": [{
            "question": "Pick one",
            "options": ["a", "b", "c"],
            "correctAnswer": "a",
            "explanation": ""
        }]})
        .to_string();
        assert!(!validate_quiz(&reply).is_valid());
    }

    #[tokio::test]
    async fn test_empty_questions_yield_fallback_bank() {
        let ai = ScriptedGenerator::text(r#"{"questions": []}"#);
        let questions = generate_quiz(&ai, "m", &QuizProfile::default()).await;
        assert_eq!(questions, fallback_questions());
        assert_eq!(questions.len(), 10);
    }

    #[tokio::test]
    async fn test_adapter_failure_yields_fallback_bank() {
        let ai = ScriptedGenerator::new(vec![Reply::Unavailable]);
        let questions = generate_quiz(&ai, "m", &QuizProfile::default()).await;
        assert_eq!(questions, fallback_questions());
    }

    #[tokio::test]
    async fn test_valid_reply_is_used() {
        let ai = ScriptedGenerator::text(&sample_quiz(10));
        let questions = generate_quiz(&ai, "m", &QuizProfile::default()).await;
        assert_eq!(questions[0].question, "What does HTTP status 200 mean?");
    }

    #[tokio::test]
    async fn test_retry_recovers_after_invalid_reply() {
        let ai = ScriptedGenerator::new(vec![
            Reply::Text("oops".to_string()),
            Reply::Unavailable,
            Reply::Text(sample_quiz(10)),
        ]);
        let outcome = generate_quiz_with_retry(&ai, "m", &QuizProfile::default(), zero_delay(3)).await;
        assert!(!outcome.is_fallback());
        assert_eq!(ai.calls(), 3);
    }

    #[tokio::test]
    async fn test_retry_is_bounded() {
        let ai = ScriptedGenerator::new(vec![]);
        let outcome = generate_quiz_with_retry(&ai, "m", &QuizProfile::default(), zero_delay(3)).await;
        assert_eq!(outcome, QuizOutcome::ExhaustedFallback(fallback_questions()));
        assert_eq!(ai.calls(), 3);
    }

    #[tokio::test]
    async fn test_unconfigured_service_is_not_retried() {
        let ai = ScriptedGenerator::unconfigured();
        let outcome = generate_quiz_with_retry(&ai, "m", &QuizProfile::default(), zero_delay(3)).await;
        assert!(outcome.is_fallback());
        assert_eq!(ai.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_doubles_between_attempts() {
        let ai = ScriptedGenerator::new(vec![]);
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        };
        let started = tokio::time::Instant::now();
        generate_quiz_with_retry(&ai, "m", &QuizProfile::default(), policy).await;
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }
}
