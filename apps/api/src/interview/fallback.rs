//! Fixed question bank served whenever the AI cannot produce a usable quiz.

use crate::interview::quiz::QuizQuestion;

fn question(question: &str, options: [&str; 4], correct: usize, explanation: &str) -> QuizQuestion {
    QuizQuestion {
        question: question.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer: options[correct].to_string(),
        explanation: explanation.to_string(),
    }
}

/// Ten general professional-skills questions.
pub fn fallback_questions() -> Vec<QuizQuestion> {
    vec![
        question(
            "What is the most important skill for career advancement?",
            [
                "Technical expertise only",
                "Communication and leadership",
                "Working longer hours",
                "Avoiding challenges",
            ],
            1,
            "While technical skills are important, communication and leadership abilities are crucial for career growth and team collaboration.",
        ),
        question(
            "How should you approach learning new technologies?",
            [
                "Wait for formal training",
                "Only learn what's required",
                "Continuously learn and adapt",
                "Avoid new technologies",
            ],
            2,
            "The technology landscape changes rapidly, so continuous learning and adaptation are essential for staying relevant.",
        ),
        question(
            "What's the best approach to problem-solving?",
            [
                "Work alone always",
                "Use only one method",
                "Analyze, collaborate, and iterate",
                "Avoid complex problems",
            ],
            2,
            "Effective problem-solving involves analyzing the issue, collaborating with others for insights, and iterating on solutions.",
        ),
        question(
            "How important is feedback in professional development?",
            [
                "Not important at all",
                "Only negative feedback matters",
                "Essential for growth and improvement",
                "Should be avoided",
            ],
            2,
            "Constructive feedback, both positive and negative, is crucial for identifying areas of improvement and professional growth.",
        ),
        question(
            "What defines effective teamwork?",
            [
                "Working in isolation",
                "Competing with team members",
                "Clear communication and shared goals",
                "Avoiding responsibility",
            ],
            2,
            "Effective teamwork requires clear communication, shared objectives, and mutual support among team members.",
        ),
        question(
            "How should you handle workplace challenges?",
            [
                "Ignore them completely",
                "Blame others for problems",
                "Address them proactively",
                "Wait for someone else to solve them",
            ],
            2,
            "Proactively addressing challenges demonstrates initiative and problem-solving skills that employers value.",
        ),
        question(
            "What's most important for career networking?",
            [
                "Only connect with senior people",
                "Building genuine relationships",
                "Collecting as many contacts as possible",
                "Networking only when job searching",
            ],
            1,
            "Effective networking is about building genuine, mutually beneficial relationships rather than simply collecting contacts.",
        ),
        question(
            "How should you approach work-life balance?",
            [
                "Work should always come first",
                "Personal life should always come first",
                "Find a sustainable balance",
                "Balance is not important",
            ],
            2,
            "A sustainable work-life balance is essential for long-term success, productivity, and personal well-being.",
        ),
        question(
            "What's the best way to handle criticism?",
            [
                "Take it personally",
                "Ignore it completely",
                "Listen, evaluate, and learn",
                "Become defensive immediately",
            ],
            2,
            "Constructive criticism should be listened to, evaluated objectively, and used as a learning opportunity for improvement.",
        ),
        question(
            "How important is continuous improvement?",
            [
                "Not important at all",
                "Only needed when performance is poor",
                "Essential for long-term success",
                "Should be avoided to maintain status quo",
            ],
            2,
            "Continuous improvement is vital for staying competitive, developing skills, and achieving long-term career success.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::quiz::QUIZ_LENGTH;

    #[test]
    fn test_bank_has_ten_well_formed_questions() {
        let bank = fallback_questions();
        assert_eq!(bank.len(), QUIZ_LENGTH);
        for q in &bank {
            assert!(q.check().is_ok(), "malformed fallback question: {}", q.question);
        }
    }
}
