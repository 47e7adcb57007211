//! Operator session
//!
//! A [`Session`] is the explicit authentication context handed to the review
//! coordinator at construction time. Re-authentication replaces the whole
//! session object instead of mutating shared client-side state.
//!
//! Access tokens are issued by the external auth provider as JWTs. The
//! payload is decoded here only to learn who the operator is and when the
//! token expires; signature verification is the backend's job.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::identifiers::UserId;

/// Errors raised while building a session from a raw access token
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Malformed access token: {0}")]
    MalformedToken(String),

    #[error("Access token has no subject")]
    MissingSubject,
}

/// Bearer token attached to every backend request
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Role of the signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    /// Parses a role claim, case-insensitively
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(UserRole::Admin),
            "user" => Some(UserRole::User),
            _ => None,
        }
    }
}

/// An authenticated operator session
#[derive(Debug, Clone)]
pub struct Session {
    user_id: UserId,
    email: Option<String>,
    role: UserRole,
    access_token: AccessToken,
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct TokenClaims {
    sub: Option<String>,
    email: Option<String>,
    exp: Option<i64>,
    role: Option<String>,
    #[serde(default)]
    user_metadata: Option<TokenMetadata>,
}

#[derive(Debug, Deserialize)]
struct TokenMetadata {
    role: Option<String>,
}

impl Session {
    /// Creates a session with no known expiry
    pub fn new(user_id: UserId, role: UserRole, access_token: AccessToken) -> Self {
        Self {
            user_id,
            email: None,
            role,
            access_token,
            expires_at: None,
        }
    }

    /// Sets the operator email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the expiry instant
    pub fn expiring_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Builds a session from a raw JWT access token.
    ///
    /// The role is taken from `user_metadata.role` when present, then from the
    /// top-level `role` claim; anything unrecognised is treated as a plain user.
    pub fn from_access_token(token: impl Into<String>) -> Result<Self, SessionError> {
        let token = token.into();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<TokenClaims>(&token, &DecodingKey::from_secret(&[]), &validation)
            .map_err(|e| SessionError::MalformedToken(e.to_string()))?;
        let claims = data.claims;

        let subject = claims
            .sub
            .filter(|s| !s.trim().is_empty())
            .ok_or(SessionError::MissingSubject)?;

        let role = claims
            .user_metadata
            .and_then(|m| m.role)
            .and_then(|r| UserRole::parse(&r))
            .or_else(|| claims.role.as_deref().and_then(UserRole::parse))
            .unwrap_or(UserRole::User);

        Ok(Self {
            user_id: UserId::new(subject),
            email: claims.email,
            role,
            access_token: AccessToken::new(token),
            expires_at: claims.exp.and_then(|exp| DateTime::from_timestamp(exp, 0)),
        })
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns true once the token's expiry has been reached
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at <= now)
    }
}
