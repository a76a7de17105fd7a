// Prompt constants for mock-interview quizzes.

/// Quiz prompt template. Replace `{industry}` and `{skills_clause}` before sending.
pub const QUIZ_PROMPT_TEMPLATE: &str = r#"Generate 10 technical interview questions for a {industry} professional{skills_clause}.

Each question should be multiple choice with 4 options.
The correctAnswer must be copied exactly from one of the options.

Return the response in this JSON format only, no additional text:
{
  "questions": [
    {
      "question": "string",
      "options": ["string", "string", "string", "string"],
      "correctAnswer": "string",
      "explanation": "string"
    }
  ]
}"#;

/// Improvement-tip prompt template. Replace `{industry}` and `{wrong_answers}`.
pub const IMPROVEMENT_PROMPT_TEMPLATE: &str = r#"The user got the following {industry} technical interview questions wrong:

{wrong_answers}

Based on these mistakes, provide a concise, specific improvement tip.
Focus on the knowledge gaps revealed by these wrong answers.
Keep the response under 2 sentences and make it encouraging.
Don't explicitly mention the mistakes, instead focus on what to learn/practice."#;
