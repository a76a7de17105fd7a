// Prompt constants for cover letter generation.

/// Replace `{job_title}`, `{company_name}`, `{job_description_line}`,
/// `{candidate_background}` and `{additional_information}` before sending.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a professional cover letter for the following position:

Job Title: {job_title}
Company: {company_name}
{job_description_line}

Candidate Background:
{candidate_background}
{additional_information}

Requirements:
1. Write a compelling opening paragraph that captures attention
2. Highlight relevant experience and skills for this specific role
3. Show knowledge of the company (if possible from context)
4. Include specific achievements with quantifiable results when possible
5. End with a strong call to action
6. Keep it concise (3-4 paragraphs)
7. Use professional tone and format
8. Make it ATS-friendly

Format the cover letter with proper structure:
- Date
- Company Address (placeholder)
- Salutation
- Body paragraphs
- Professional closing
- Signature line

Make it personalized and engaging while maintaining professionalism."#;
