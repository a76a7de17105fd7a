//! Quiz scoring and the optional improvement tip.

use serde::Serialize;
use tracing::{info, warn};

use crate::interview::prompts::IMPROVEMENT_PROMPT_TEMPLATE;
use crate::interview::quiz::QuizQuestion;
use crate::llm_client::TextGenerator;
use crate::models::assessment::QuestionResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCard {
    /// round(100 × correct / total), always in 0..=100.
    pub percentage: i32,
    pub results: Vec<QuestionResult>,
}

impl ScoreCard {
    pub fn wrong_answers(&self) -> impl Iterator<Item = &QuestionResult> {
        self.results.iter().filter(|r| !r.is_correct)
    }
}

/// Scores answers by exact string equality, index by index.
///
/// Missing or `None` answers never match. Answers beyond the question count are ignored.
pub fn score(questions: &[QuizQuestion], answers: &[Option<String>]) -> ScoreCard {
    let results: Vec<QuestionResult> = questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let user_answer = answers.get(i).cloned().flatten();
            QuestionResult {
                question: q.question.clone(),
                correct_answer: q.correct_answer.clone(),
                is_correct: user_answer.as_deref() == Some(q.correct_answer.as_str()),
                user_answer,
                explanation: q.explanation.clone(),
            }
        })
        .collect();

    let correct = results.iter().filter(|r| r.is_correct).count();
    ScoreCard {
        percentage: rounded_percentage(correct, results.len()),
        results,
    }
}

/// Half-up rounding in integer arithmetic. An empty quiz scores 0.
fn rounded_percentage(correct: usize, total: usize) -> i32 {
    if total == 0 {
        return 0;
    }
    ((200 * correct + total) / (2 * total)) as i32
}

pub fn build_improvement_prompt<'a>(
    industry: &str,
    wrong: impl IntoIterator<Item = &'a QuestionResult>,
) -> String {
    let wrong_answers = wrong
        .into_iter()
        .map(|r| {
            format!(
                "Question: \"{}\"\nCorrect Answer: \"{}\"\nUser Answer: \"{}\"",
                r.question,
                r.correct_answer,
                r.user_answer.as_deref().unwrap_or("(no answer)")
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    IMPROVEMENT_PROMPT_TEMPLATE
        .replace("{industry}", industry)
        .replace("{wrong_answers}", &wrong_answers)
}

/// Asks for a short tip when at least one answer is wrong. Any AI failure yields `None`.
pub async fn improvement_tip(
    ai: &dyn TextGenerator,
    model: &str,
    industry: &str,
    card: &ScoreCard,
) -> Option<String> {
    if card.wrong_answers().next().is_none() {
        return None;
    }

    let prompt = build_improvement_prompt(industry, card.wrong_answers());
    match ai.generate(&prompt, model).await {
        Ok(text) => {
            let tip = text.trim();
            if tip.is_empty() {
                None
            } else {
                info!("Generated improvement tip ({} chars)", tip.len());
                Some(tip.to_string())
            }
        }
        Err(e) => {
            warn!("Error generating improvement tip: {e}");
            None
        }
    }
}
