use crate::assist::AssistKind;

/// Advice returned when no AI answer is available.
pub fn canned_response(kind: AssistKind) -> &'static str {
    match kind {
        AssistKind::Resume => "To enhance your resume content, focus on using action verbs, quantifying achievements with specific metrics, and highlighting relevant technical skills. Consider structuring your experience to show progression and impact. For personalized improvements, please configure the AI service.",
        AssistKind::CoverLetter => "For an effective cover letter, personalize the content to the specific role and company, highlight your most relevant achievements, and demonstrate your understanding of the company's needs. Show enthusiasm and explain how you can add value. For AI-generated content, please configure the AI service.",
        AssistKind::Interview => "For interview preparation, research the company thoroughly, practice common behavioral questions using the STAR method, prepare specific examples that demonstrate your skills, and think of thoughtful questions to ask the interviewer. For personalized interview questions, please configure the AI service.",
        AssistKind::IndustryInsights => "Industry trends show continued growth in digital transformation, remote work adoption, and skills-based hiring. Focus on developing both technical and soft skills, stay updated with industry developments, and build a strong professional network. For detailed industry analysis, please configure the AI service.",
        AssistKind::General => "Thank you for your request. For personalized AI-generated content and insights, please configure the AI service with a valid API key. In the meantime, focus on continuous learning, skill development, and professional networking.",
    }
}
