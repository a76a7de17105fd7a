//! Cover letters: owner-scoped CRUD plus AI drafting.
//!
//! Drafting never fails on the AI side. When the service is off or errors, a
//! plain template letter built from the same inputs is stored instead.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::cover_letter::prompts::COVER_LETTER_PROMPT_TEMPLATE;
use crate::cover_letter::store::CoverLetterStore;
use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::models::cover_letter::CoverLetter;
use crate::models::require_owner;
use crate::models::user::User;

const RESOURCE: &str = "Cover letter";

/// Body of create and update requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterInput {
    pub content: String,
    #[serde(default)]
    pub job_description: Option<String>,
    pub company_name: String,
    pub job_title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCoverLetterRequest {
    pub job_title: String,
    pub company_name: String,
    #[serde(default)]
    pub job_description: Option<String>,
    /// Free text the user wants woven into the letter.
    #[serde(default)]
    pub personalized_content: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCoverLetter {
    pub id: Uuid,
    pub content: String,
    /// False when the template letter was stored instead of an AI draft.
    pub generated: bool,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn require_field(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

impl CoverLetterInput {
    fn validate(&self) -> Result<(), AppError> {
        require_field(&self.content, "content")?;
        require_field(&self.company_name, "companyName")?;
        require_field(&self.job_title, "jobTitle")
    }
}

impl GenerateCoverLetterRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_field(&self.company_name, "companyName")?;
        require_field(&self.job_title, "jobTitle")
    }
}

pub fn build_cover_letter_prompt(user: &User, req: &GenerateCoverLetterRequest) -> String {
    let experience = user
        .experience
        .map(|years| years.to_string())
        .unwrap_or_else(|| "Professional".to_string());
    let skills = if user.skills.is_empty() {
        "Various professional skills".to_string()
    } else {
        user.skills.join(", ")
    };

    let mut background = vec![
        format!("- Name: {}", user.name.as_deref().unwrap_or("Candidate")),
        format!(
            "- Industry: {}",
            non_blank(user.industry_name.as_deref()).unwrap_or("Professional")
        ),
        format!("- Experience: {experience} years"),
        format!("- Skills: {skills}"),
    ];
    if let Some(bio) = non_blank(user.bio.as_deref()) {
        background.push(format!("- Bio: {bio}"));
    }

    COVER_LETTER_PROMPT_TEMPLATE
        .replace("{job_title}", req.job_title.trim())
        .replace("{company_name}", req.company_name.trim())
        .replace(
            "{job_description_line}",
            &non_blank(req.job_description.as_deref())
                .map(|jd| format!("Job Description: {jd}"))
                .unwrap_or_default(),
        )
        .replace("{candidate_background}", &background.join("\n"))
        .replace(
            "{additional_information}",
            &non_blank(req.personalized_content.as_deref())
                .map(|extra| format!("\nAdditional Information: {extra}"))
                .unwrap_or_default(),
        )
}

/// Plain letter stored when no AI draft is available.
pub fn template_letter(user: &User, req: &GenerateCoverLetterRequest) -> String {
    let name = user.name.as_deref().unwrap_or("Candidate");
    let job_title = req.job_title.trim();
    let company = req.company_name.trim();

    let strengths = if user.skills.is_empty() {
        String::new()
    } else {
        format!(
            " My background in {} has prepared me to contribute from day one.",
            user.skills.join(", ")
        )
    };
    let commitment = match user.experience {
        Some(years) if years > 0 => format!(
            "I bring over {years} years of professional experience and a strong commitment to delivering measurable results."
        ),
        _ => "I bring a strong commitment to delivering measurable results.".to_string(),
    };

    format!(
        "Dear Hiring Manager,\n\n\
         I am writing to express my interest in the {job_title} position at {company}. \
         {commitment}{strengths}\n\n\
         I would welcome the opportunity to discuss how I can support {company}'s goals. \
         Thank you for your time and consideration.\n\n\
         Sincerely,\n{name}"
    )
}

/// Drafts the letter body. Returns the text and whether the AI produced it.
pub async fn compose_letter(
    ai: &dyn TextGenerator,
    model: &str,
    user: &User,
    req: &GenerateCoverLetterRequest,
) -> (String, bool) {
    match ai.generate(&build_cover_letter_prompt(user, req), model).await {
        Ok(text) if !text.trim().is_empty() => (text, true),
        Ok(_) => {
            warn!("AI returned an empty cover letter, using template letter");
            (template_letter(user, req), false)
        }
        Err(e) => {
            warn!("Error generating cover letter: {e}; using template letter");
            (template_letter(user, req), false)
        }
    }
}

fn not_found() -> AppError {
    AppError::NotFound(format!(
        "{RESOURCE} not found or you don't have permission to access it"
    ))
}

/// The caller's cover letters, newest first.
pub async fn list_cover_letters(
    store: &dyn CoverLetterStore,
    user_id: Uuid,
) -> Result<Vec<CoverLetter>, AppError> {
    store.list(user_id).await
}

pub async fn get_cover_letter(
    store: &dyn CoverLetterStore,
    user_id: Uuid,
    id: Uuid,
) -> Result<CoverLetter, AppError> {
    require_owner(store.find(id).await?, user_id, RESOURCE)
}

pub async fn create_cover_letter(
    store: &dyn CoverLetterStore,
    user_id: Uuid,
    input: &CoverLetterInput,
) -> Result<CoverLetter, AppError> {
    input.validate()?;
    store.insert(user_id, input).await
}

pub async fn update_cover_letter(
    store: &dyn CoverLetterStore,
    user_id: Uuid,
    id: Uuid,
    input: &CoverLetterInput,
) -> Result<CoverLetter, AppError> {
    input.validate()?;
    require_owner(store.find(id).await?, user_id, RESOURCE)?;

    // Deleted between the check and the write.
    store.update(user_id, id, input).await?.ok_or_else(not_found)
}

pub async fn delete_cover_letter(
    store: &dyn CoverLetterStore,
    user_id: Uuid,
    id: Uuid,
) -> Result<(), AppError> {
    require_owner(store.find(id).await?, user_id, RESOURCE)?;

    if !store.delete(user_id, id).await? {
        return Err(not_found());
    }
    info!("Deleted cover letter {id}");
    Ok(())
}

/// Drafts a letter for the posting and stores it.
pub async fn generate_cover_letter(
    store: &dyn CoverLetterStore,
    ai: &dyn TextGenerator,
    model: &str,
    user: &User,
    req: &GenerateCoverLetterRequest,
) -> Result<GeneratedCoverLetter, AppError> {
    req.validate()?;

    let (content, generated) = compose_letter(ai, model, user, req).await;
    let fields = CoverLetterInput {
        content: content.clone(),
        job_description: non_blank(req.job_description.as_deref()).map(str::to_string),
        company_name: req.company_name.clone(),
        job_title: req.job_title.clone(),
    };
    let letter = store.insert(user.id, &fields).await?;

    info!(
        "Stored cover letter {} for {} at {} (generated: {generated})",
        letter.id, letter.job_title, letter.company_name
    );
    Ok(GeneratedCoverLetter {
        id: letter.id,
        content,
        generated,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::cover_letter::store::testing::MemoryCoverLetterStore;
    use crate::llm_client::testing::{Reply, ScriptedGenerator};

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            clerk_user_id: "user_123".to_string(),
            email: Some("ada@example.com".to_string()),
            name: Some("Ada Lovelace".to_string()),
            image_url: None,
            industry_name: Some("technology-software-engineering".to_string()),
            experience: Some(6),
            bio: None,
            skills: vec!["Rust".to_string(), "Distributed Systems".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn request() -> GenerateCoverLetterRequest {
        GenerateCoverLetterRequest {
            job_title: "Backend Engineer".to_string(),
            company_name: "Acme".to_string(),
            job_description: None,
            personalized_content: Some("Led a storage migration".to_string()),
        }
    }

    #[test]
    fn test_prompt_carries_profile_and_posting() {
        let prompt = build_cover_letter_prompt(&user(), &request());
        assert!(prompt.contains("Job Title: Backend Engineer"));
        assert!(prompt.contains("Company: Acme"));
        assert!(prompt.contains("- Experience: 6 years"));
        assert!(prompt.contains("- Skills: Rust, Distributed Systems"));
        assert!(prompt.contains("Additional Information: Led a storage migration"));
        assert!(!prompt.contains("Job Description:"));
        assert!(!prompt.contains("- Bio:"));
    }

    #[test]
    fn test_prompt_defaults_for_sparse_profile() {
        let mut sparse = user();
        sparse.industry_name = None;
        sparse.experience = None;
        sparse.skills.clear();
        let prompt = build_cover_letter_prompt(&sparse, &request());
        assert!(prompt.contains("- Industry: Professional"));
        assert!(prompt.contains("- Experience: Professional years"));
        assert!(prompt.contains("- Skills: Various professional skills"));
    }

    #[test]
    fn test_template_letter_uses_inputs() {
        let letter = template_letter(&user(), &request());
        assert!(letter.starts_with("Dear Hiring Manager,"));
        assert!(letter.contains("Backend Engineer position at Acme"));
        assert!(letter.contains("over 6 years"));
        assert!(letter.ends_with("Sincerely,\nAda Lovelace"));
    }

    #[tokio::test]
    async fn test_compose_uses_ai_draft() {
        let ai = ScriptedGenerator::text("Dear Acme team, ...");
        let (content, generated) = compose_letter(&ai, "m", &user(), &request()).await;
        assert!(generated);
        assert_eq!(content, "Dear Acme team, ...");
    }

    #[tokio::test]
    async fn test_compose_falls_back_on_failure() {
        for reply in [Reply::Unavailable, Reply::Unconfigured, Reply::Text("  ".to_string())] {
            let ai = ScriptedGenerator::new(vec![reply]);
            let (content, generated) = compose_letter(&ai, "m", &user(), &request()).await;
            assert!(!generated);
            assert_eq!(content, template_letter(&user(), &request()));
        }
    }

    #[test]
    fn test_input_validation() {
        let input = CoverLetterInput {
            content: "Hello".to_string(),
            job_description: None,
            company_name: " ".to_string(),
            job_title: "Engineer".to_string(),
        };
        assert!(matches!(input.validate(), Err(AppError::Validation(m)) if m.contains("companyName")));
    }

    fn input(content: &str) -> CoverLetterInput {
        CoverLetterInput {
            content: content.to_string(),
            job_description: None,
            company_name: "Acme".to_string(),
            job_title: "Engineer".to_string(),
        }
    }

    #[tokio::test]
    async fn test_foreign_cover_letter_is_not_found() {
        let store = MemoryCoverLetterStore::default();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let letter = create_cover_letter(&store, owner, &input("private")).await.unwrap();

        let err = get_cover_letter(&store, intruder, letter.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(m) if m.starts_with("Cover letter not found")));

        let err = update_cover_letter(&store, intruder, letter.id, &input("hijacked"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = delete_cover_letter(&store, intruder, letter.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let rows = store.all();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].content, "private");
        assert!(list_cover_letters(&store, intruder).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_cover_letter_is_not_found() {
        let store = MemoryCoverLetterStore::default();
        let err = get_cover_letter(&store, Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_owner_can_update_and_delete() {
        let store = MemoryCoverLetterStore::default();
        let owner = Uuid::new_v4();
        let letter = create_cover_letter(&store, owner, &input("draft")).await.unwrap();

        let updated = update_cover_letter(&store, owner, letter.id, &input("final"))
            .await
            .unwrap();
        assert_eq!(updated.content, "final");
        assert_eq!(get_cover_letter(&store, owner, letter.id).await.unwrap().content, "final");

        delete_cover_letter(&store, owner, letter.id).await.unwrap();
        assert!(store.all().is_empty());
    }

    #[tokio::test]
    async fn test_generate_stores_template_when_ai_is_off() {
        let store = MemoryCoverLetterStore::default();
        let ai = ScriptedGenerator::new(vec![Reply::Unconfigured]);
        let author = user();

        let letter = generate_cover_letter(&store, &ai, "m", &author, &request())
            .await
            .unwrap();
        assert!(!letter.generated);

        let stored = get_cover_letter(&store, author.id, letter.id).await.unwrap();
        assert_eq!(stored.content, template_letter(&author, &request()));
        assert_eq!(stored.company_name, "Acme");
        assert_eq!(stored.job_description, None);
    }
}
