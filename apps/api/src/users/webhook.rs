//! Identity-provider webhook: keeps local user rows in sync with `user.*` events.
//!
//! Deliveries are signed svix-style: HMAC-SHA256 over `{id}.{timestamp}.{body}`,
//! keyed with the base64 secret that follows the `whsec_` prefix. The
//! `svix-signature` header lists one or more space-separated `v1,<base64>` entries.

use axum::http::HeaderMap;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::errors::AppError;
use crate::users::accounts::{self, NewUser};
use crate::users::auth::display_name;

type HmacSha256 = Hmac<Sha256>;

/// Deliveries older or newer than this are rejected as replays.
const TIMESTAMP_TOLERANCE_SECS: u64 = 5 * 60;

#[derive(Debug, Error, PartialEq)]
pub enum SignatureError {
    #[error("Missing header: {0}")]
    MissingHeader(&'static str),

    #[error("Webhook secret is not valid base64")]
    InvalidSecret,

    #[error("Invalid timestamp header")]
    InvalidTimestamp,

    #[error("Timestamp outside the tolerance window")]
    TimestampOutOfTolerance,

    #[error("No matching signature")]
    NoMatchingSignature,
}

/// The three svix headers of a delivery.
#[derive(Debug, Clone, Copy)]
pub struct SignatureHeaders<'a> {
    pub id: &'a str,
    pub timestamp: &'a str,
    pub signature: &'a str,
}

impl<'a> SignatureHeaders<'a> {
    pub fn from_headers(headers: &'a HeaderMap) -> Result<Self, SignatureError> {
        let get = |name: &'static str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .ok_or(SignatureError::MissingHeader(name))
        };
        Ok(Self {
            id: get("svix-id")?,
            timestamp: get("svix-timestamp")?,
            signature: get("svix-signature")?,
        })
    }
}

/// Checks the delivery signature and timestamp against `secret` at unix time `now`.
pub fn verify_signature(
    secret: &str,
    headers: SignatureHeaders<'_>,
    payload: &str,
    now: i64,
) -> Result<(), SignatureError> {
    let key = STANDARD
        .decode(secret.strip_prefix("whsec_").unwrap_or(secret))
        .map_err(|_| SignatureError::InvalidSecret)?;

    let timestamp: i64 = headers
        .timestamp
        .trim()
        .parse()
        .map_err(|_| SignatureError::InvalidTimestamp)?;
    if now.abs_diff(timestamp) > TIMESTAMP_TOLERANCE_SECS {
        return Err(SignatureError::TimestampOutOfTolerance);
    }

    let signed_content = format!("{}.{}.{}", headers.id, headers.timestamp, payload);
    let mut mac = HmacSha256::new_from_slice(&key).map_err(|_| SignatureError::InvalidSecret)?;
    mac.update(signed_content.as_bytes());

    let matched = headers
        .signature
        .split_whitespace()
        .filter_map(|entry| entry.split_once(','))
        .filter(|(version, _)| *version == "v1")
        .filter_map(|(_, sig)| STANDARD.decode(sig).ok())
        .any(|sig| mac.clone().verify_slice(&sig).is_ok());

    if matched {
        Ok(())
    } else {
        Err(SignatureError::NoMatchingSignature)
    }
}

#[derive(Debug, Deserialize)]
struct EventEnvelope {
    #[serde(rename = "type")]
    event_type: String,
    data: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailAddress {
    pub email_address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderUser {
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
}

impl ProviderUser {
    pub fn primary_email(&self) -> Option<&str> {
        self.email_addresses
            .first()
            .map(|e| e.email_address.as_str())
            .filter(|e| !e.is_empty())
    }

    /// Row written for `user.created`. The provider must supply an email.
    pub fn new_user(&self) -> Result<NewUser, AppError> {
        let email = self.primary_email().ok_or_else(|| {
            tracing::error!("No email found for user: {}", self.id);
            AppError::Validation("No email found".to_string())
        })?;
        Ok(NewUser {
            clerk_user_id: self.id.clone(),
            email: Some(email.to_string()),
            name: display_name(self.first_name.as_deref(), self.last_name.as_deref()),
            image_url: self.image_url.clone(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeletedUser {
    pub id: String,
}

#[derive(Debug, Clone)]
pub enum WebhookEvent {
    UserCreated(ProviderUser),
    UserUpdated(ProviderUser),
    UserDeleted(DeletedUser),
    Unhandled(String),
}

impl WebhookEvent {
    pub fn parse(payload: &str) -> Result<Self, serde_json::Error> {
        let envelope: EventEnvelope = serde_json::from_str(payload)?;
        Ok(match envelope.event_type.as_str() {
            "user.created" => WebhookEvent::UserCreated(serde_json::from_value(envelope.data)?),
            "user.updated" => WebhookEvent::UserUpdated(serde_json::from_value(envelope.data)?),
            "user.deleted" => WebhookEvent::UserDeleted(serde_json::from_value(envelope.data)?),
            _ => WebhookEvent::Unhandled(envelope.event_type),
        })
    }
}

/// Applies one event. Duplicate creates and updates/deletes of unknown users are no-ops.
pub async fn apply_event(pool: &PgPool, event: WebhookEvent) -> Result<(), AppError> {
    match event {
        WebhookEvent::UserCreated(user) => {
            let new_user = user.new_user()?;
            if accounts::upsert_identity(pool, &new_user).await? {
                info!("User created successfully: {}", user.id);
            } else {
                info!("User already exists, identity synced: {}", user.id);
            }
        }
        WebhookEvent::UserUpdated(user) => {
            let existing = accounts::find_by_clerk_id(pool, &user.id).await?;
            let Some(existing) = existing else {
                info!("User not found for update: {}", user.id);
                return Ok(());
            };
            let updated = NewUser {
                clerk_user_id: user.id.clone(),
                email: user.primary_email().map(str::to_string).or(existing.email),
                name: display_name(user.first_name.as_deref(), user.last_name.as_deref()),
                image_url: user.image_url.clone(),
            };
            accounts::update_identity(pool, &updated).await?;
            info!("User updated successfully: {}", user.id);
        }
        WebhookEvent::UserDeleted(user) => {
            if accounts::delete_by_clerk_id(pool, &user.id).await? {
                info!("User deleted successfully: {}", user.id);
            } else {
                info!("User not found for deletion: {}", user.id);
            }
        }
        WebhookEvent::Unhandled(event_type) => {
            info!("Unhandled webhook event: {event_type}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    const SECRET: &str = "whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw";
    const NOW: i64 = 1_760_000_000;

    fn sign(secret: &str, id: &str, ts: &str, payload: &str) -> String {
        let key = STANDARD.decode(secret.strip_prefix("whsec_").unwrap()).unwrap();
        let mut mac = HmacSha256::new_from_slice(&key).unwrap();
        mac.update(format!("{id}.{ts}.{payload}").as_bytes());
        format!("v1,{}", STANDARD.encode(mac.finalize().into_bytes()))
    }

    fn headers<'a>(id: &'a str, timestamp: &'a str, signature: &'a str) -> SignatureHeaders<'a> {
        SignatureHeaders {
            id,
            timestamp,
            signature,
        }
    }

    #[test]
    fn test_valid_signature_is_accepted() {
        let payload = r#"{"type":"user.deleted","data":{"id":"user_1"}}"#;
        let ts = NOW.to_string();
        let sig = sign(SECRET, "msg_1", &ts, payload);
        assert_eq!(
            verify_signature(SECRET, headers("msg_1", &ts, &sig), payload, NOW),
            Ok(())
        );
    }

    #[test]
    fn test_any_listed_v1_signature_may_match() {
        let payload = "{}";
        let ts = NOW.to_string();
        let good = sign(SECRET, "msg_1", &ts, payload);
        let list = format!("v1,AAAA v2,ignored {good}");
        assert!(verify_signature(SECRET, headers("msg_1", &ts, &list), payload, NOW).is_ok());
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let ts = NOW.to_string();
        let sig = sign(SECRET, "msg_1", &ts, r#"{"a":1}"#);
        assert_eq!(
            verify_signature(SECRET, headers("msg_1", &ts, &sig), r#"{"a":2}"#, NOW),
            Err(SignatureError::NoMatchingSignature)
        );
    }

    #[test]
    fn test_stale_timestamp_is_rejected() {
        let ts = (NOW - 301).to_string();
        let sig = sign(SECRET, "msg_1", &ts, "{}");
        assert_eq!(
            verify_signature(SECRET, headers("msg_1", &ts, &sig), "{}", NOW),
            Err(SignatureError::TimestampOutOfTolerance)
        );
    }

    #[test]
    fn test_extreme_timestamps_are_out_of_tolerance() {
        for ts in [i64::MIN.to_string(), i64::MAX.to_string()] {
            assert_eq!(
                verify_signature(SECRET, headers("msg_1", &ts, "v1,AAAA"), "{}", NOW),
                Err(SignatureError::TimestampOutOfTolerance)
            );
        }
    }

    #[test]
    fn test_garbage_timestamp_is_rejected() {
        assert_eq!(
            verify_signature(SECRET, headers("msg_1", "soon", "v1,AAAA"), "{}", NOW),
            Err(SignatureError::InvalidTimestamp)
        );
    }

    #[test]
    fn test_missing_headers_are_reported() {
        let mut map = HeaderMap::new();
        map.insert("svix-id", HeaderValue::from_static("msg_1"));
        assert_eq!(
            SignatureHeaders::from_headers(&map).unwrap_err(),
            SignatureError::MissingHeader("svix-timestamp")
        );
    }

    #[test]
    fn test_parse_user_created() {
        let payload = r#"{
            "object": "event",
            "type": "user.created",
            "data": {
                "id": "user_29w83sxmDNGwOuEthce5gg56FcC",
                "email_addresses": [{"email_address": "example@example.org", "id": "idn_1"}],
                "first_name": "Example",
                "last_name": null,
                "image_url": "https://img.example.com/u.png"
            }
        }"#;
        let WebhookEvent::UserCreated(user) = WebhookEvent::parse(payload).unwrap() else {
            panic!("expected user.created");
        };
        assert_eq!(user.id, "user_29w83sxmDNGwOuEthce5gg56FcC");
        assert_eq!(user.primary_email(), Some("example@example.org"));
        let row = user.new_user().unwrap();
        assert_eq!(row.email.as_deref(), Some("example@example.org"));
        assert_eq!(row.name, "Example");
    }

    #[test]
    fn test_parse_user_without_email() {
        let payload = r#"{"type":"user.created","data":{"id":"user_1","email_addresses":[]}}"#;
        let WebhookEvent::UserCreated(user) = WebhookEvent::parse(payload).unwrap() else {
            panic!("expected user.created");
        };
        assert!(user.primary_email().is_none());
        assert!(matches!(user.new_user(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_parse_unknown_event() {
        let payload = r#"{"type":"session.created","data":{"id":"sess_1"}}"#;
        assert!(matches!(
            WebhookEvent::parse(payload).unwrap(),
            WebhookEvent::Unhandled(t) if t == "session.created"
        ));
    }
}
