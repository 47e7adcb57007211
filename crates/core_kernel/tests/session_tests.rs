//! Tests for session construction from access tokens

use chrono::{Duration, TimeZone, Utc};
use core_kernel::{Session, SessionError, UserRole};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

fn sign(claims: serde_json::Value) -> String {
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"provider-secret")).unwrap()
}

#[test]
fn test_session_from_admin_token() {
    let exp = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    let token = sign(json!({
        "sub": "user-123",
        "email": "admin@example.com",
        "role": "authenticated",
        "exp": exp.timestamp(),
        "user_metadata": { "role": "admin" }
    }));

    let session = Session::from_access_token(token.clone()).unwrap();

    assert_eq!(session.user_id().as_str(), "user-123");
    assert_eq!(session.email(), Some("admin@example.com"));
    assert_eq!(session.role(), UserRole::Admin);
    assert!(session.is_admin());
    assert_eq!(session.expires_at(), Some(exp));
    assert_eq!(session.access_token().as_str(), token);
}

#[test]
fn test_session_role_defaults_to_user() {
    let token = sign(json!({ "sub": "user-1", "role": "authenticated" }));

    let session = Session::from_access_token(token).unwrap();

    assert_eq!(session.role(), UserRole::User);
    assert!(session.expires_at().is_none());
}

#[test]
fn test_expired_token_still_decodes_and_reports_expired() {
    let exp = Utc::now() - Duration::hours(1);
    let token = sign(json!({ "sub": "user-1", "exp": exp.timestamp() }));

    let session = Session::from_access_token(token).unwrap();

    assert!(session.is_expired(Utc::now()));
}

#[test]
fn test_token_without_subject() {
    let token = sign(json!({ "email": "nobody@example.com" }));

    let result = Session::from_access_token(token);

    assert!(matches!(result, Err(SessionError::MissingSubject)));
}

#[test]
fn test_garbage_token() {
    let result = Session::from_access_token("not-a-jwt");

    assert!(matches!(result, Err(SessionError::MalformedToken(_))));
}
