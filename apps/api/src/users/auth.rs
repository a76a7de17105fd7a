//! Session authentication.
//!
//! Requests carry the identity provider's session token as `Authorization: Bearer <jwt>`.
//! `AuthUser` verifies it and resolves the local user row, creating it on first sight.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;
use crate::users::accounts::{find_or_create_user, NewUser};

/// Claims read from a session token. `sub` is the identity-provider user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl SessionClaims {
    /// Profile used when the user row does not exist yet.
    pub fn new_user(&self) -> NewUser {
        NewUser {
            clerk_user_id: self.sub.clone(),
            email: self
                .email
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string),
            name: display_name(self.first_name.as_deref(), self.last_name.as_deref()),
            image_url: self.image_url.clone(),
        }
    }
}

/// `"first last"`, trimmed, or `"Unknown User"` when both are blank.
pub fn display_name(first: Option<&str>, last: Option<&str>) -> String {
    let name = format!("{} {}", first.unwrap_or(""), last.unwrap_or(""));
    let name = name.trim();
    if name.is_empty() {
        "Unknown User".to_string()
    } else {
        name.to_string()
    }
}

/// Verifies HS256 session tokens.
#[derive(Clone)]
pub struct SessionVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: &str, issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation).map(|data| data.claims)
    }
}

/// Extracts the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The signed-in user. Rejects with `Unauthorized` when no valid session is present.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let claims = state.sessions.verify(token).map_err(|e| {
            debug!("Rejected session token: {e}");
            AppError::Unauthorized
        })?;

        let user = find_or_create_user(&state.db, &claims.new_user()).await?;
        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};

    use super::*;

    fn sign(secret: &str, claims: &serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(exp_offset: i64) -> serde_json::Value {
        serde_json::json!({
            "sub": "user_2abc",
            "exp": chrono::Utc::now().timestamp() + exp_offset,
            "email": "ada@example.com",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "iss": "https://clerk.example.com"
        })
    }

    #[test]
    fn test_valid_token_yields_claims() {
        let verifier = SessionVerifier::new("s3cret", None);
        let token = sign("s3cret", &claims(3600));
        let claims = verifier.verify(&token).unwrap();
        assert_eq!(claims.sub, "user_2abc");
        assert_eq!(claims.new_user().name, "Ada Lovelace");
        assert_eq!(claims.new_user().email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn test_token_without_email_leaves_email_unset() {
        let verifier = SessionVerifier::new("s3cret", None);
        for email in [serde_json::Value::Null, serde_json::json!("  ")] {
            let mut raw = claims(3600);
            raw["email"] = email;
            let token = sign("s3cret", &raw);
            assert_eq!(verifier.verify(&token).unwrap().new_user().email, None);
        }

        let mut raw = claims(3600);
        raw.as_object_mut().unwrap().remove("email");
        let token = sign("s3cret", &raw);
        assert_eq!(verifier.verify(&token).unwrap().new_user().email, None);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let verifier = SessionVerifier::new("s3cret", None);
        let token = sign("other", &claims(3600));
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let verifier = SessionVerifier::new("s3cret", None);
        let token = sign("s3cret", &claims(-3600));
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_issuer_is_checked_when_configured() {
        let token = sign("s3cret", &claims(3600));
        assert!(SessionVerifier::new("s3cret", Some("https://clerk.example.com"))
            .verify(&token)
            .is_ok());
        assert!(SessionVerifier::new("s3cret", Some("https://evil.example.com"))
            .verify(&token)
            .is_err());
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_display_name_defaults() {
        assert_eq!(display_name(None, None), "Unknown User");
        assert_eq!(display_name(Some(" "), Some("")), "Unknown User");
        assert_eq!(display_name(Some("Grace"), None), "Grace");
    }
}
