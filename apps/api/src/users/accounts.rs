//! Local user rows, keyed by the identity provider's user id.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::User;

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub clerk_user_id: String,
    pub email: Option<String>,
    pub name: String,
    pub image_url: Option<String>,
}

/// Profile fields written by onboarding.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub industry_name: String,
    pub experience: Option<i32>,
    pub bio: Option<String>,
    pub skills: Vec<String>,
}

pub async fn find_by_clerk_id(pool: &PgPool, clerk_user_id: &str) -> Result<Option<User>, AppError> {
    Ok(
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE clerk_user_id = $1")
            .bind(clerk_user_id)
            .fetch_optional(pool)
            .await?,
    )
}

/// Inserts the user unless a row with the same identity already exists.
/// Returns `false` when the row was already there.
pub async fn insert_user(pool: &PgPool, user: &NewUser) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (id, clerk_user_id, email, name, image_url)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (clerk_user_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&user.clerk_user_id)
    .bind(&user.email)
    .bind(&user.name)
    .bind(&user.image_url)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Writes the identity provider's view of a user. An existing row, such as one
/// created lazily from an email-less session, takes the provider's identity fields.
/// Returns `true` when a new row was inserted.
pub async fn upsert_identity(pool: &PgPool, user: &NewUser) -> Result<bool, AppError> {
    let inserted: bool = sqlx::query_scalar(
        r#"
        INSERT INTO users (id, clerk_user_id, email, name, image_url)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (clerk_user_id) DO UPDATE
        SET email = COALESCE(EXCLUDED.email, users.email),
            name = EXCLUDED.name,
            image_url = EXCLUDED.image_url,
            updated_at = now()
        RETURNING (xmax = 0)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&user.clerk_user_id)
    .bind(&user.email)
    .bind(&user.name)
    .bind(&user.image_url)
    .fetch_one(pool)
    .await?;

    Ok(inserted)
}

/// Returns the existing user or creates one from the session profile.
pub async fn find_or_create_user(pool: &PgPool, profile: &NewUser) -> Result<User, AppError> {
    if let Some(user) = find_by_clerk_id(pool, &profile.clerk_user_id).await? {
        return Ok(user);
    }

    if insert_user(pool, profile).await? {
        info!("Created local user for {}", profile.clerk_user_id);
    }

    find_by_clerk_id(pool, &profile.clerk_user_id)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("User row vanished after insert")))
}

/// Syncs identity fields. Returns `false` when no such user exists.
pub async fn update_identity(pool: &PgPool, user: &NewUser) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET email = $2, name = $3, image_url = $4, updated_at = now()
        WHERE clerk_user_id = $1
        "#,
    )
    .bind(&user.clerk_user_id)
    .bind(&user.email)
    .bind(&user.name)
    .bind(&user.image_url)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Deletes the user and, through foreign keys, everything they own.
/// Returns `false` when no such user exists.
pub async fn delete_by_clerk_id(pool: &PgPool, clerk_user_id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM users WHERE clerk_user_id = $1")
        .bind(clerk_user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    update: &ProfileUpdate,
) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET industry_name = $2, experience = $3, bio = $4, skills = $5, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&update.industry_name)
    .bind(update.experience)
    .bind(&update.bio)
    .bind(&update.skills)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}
