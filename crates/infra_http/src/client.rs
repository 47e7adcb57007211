//! Shared HTTP plumbing
//!
//! [`ApiClient`] sends authenticated JSON requests and turns every failure
//! into a [`PortError`]: transport errors, non-success statuses (with the
//! backend's error detail when it sent one) and undecodable bodies.

use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use core_kernel::{AccessToken, PortError};

/// Detail keys of read endpoints
pub const READ_DETAIL_KEYS: &[&str] = &["detail", "error", "message"];
/// Detail keys of the extraction endpoint
pub const EXTRACTION_DETAIL_KEYS: &[&str] = &["details", "error"];
/// Detail keys of the document review endpoint
pub const REVIEW_DETAIL_KEYS: &[&str] = &["detail", "error"];
/// Detail keys of the policy status endpoint; `rejection_reason` may be a field error list
pub const POLICY_DETAIL_KEYS: &[&str] = &["error", "detail", "rejection_reason"];

/// Seconds to wait when a 429 carries no usable `Retry-After`
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Describes one remote call for error reporting
#[derive(Debug, Clone, Copy)]
pub struct Endpoint<'a> {
    /// Completes "Failed to ...", e.g. `review document`
    pub action: &'static str,
    pub entity_type: &'static str,
    pub entity_id: &'a str,
    /// Error body keys, first present wins
    pub detail_keys: &'static [&'static str],
}

/// JSON client for one base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Joins a path beginning with `/` onto the base URL
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        path: &str,
        endpoint: Endpoint<'_>,
    ) -> Result<T, PortError> {
        let request = self.http.get(self.url(path));
        let response = self.send(authorized(request, token), endpoint).await?;
        decode(response).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        path: &str,
        body: &B,
        endpoint: Endpoint<'_>,
    ) -> Result<T, PortError> {
        let request = self.http.post(self.url(path)).json(body);
        let response = self.send(authorized(request, token), endpoint).await?;
        decode(response).await
    }

    /// Sends a request and checks its status
    pub async fn send(&self, request: RequestBuilder, endpoint: Endpoint<'_>) -> Result<Response, PortError> {
        let response = request
            .send()
            .await
            .map_err(|err| transport_error(err, endpoint.action))?;
        check_status(response, endpoint).await
    }
}

/// Adds the bearer token and JSON content type
pub fn authorized(request: RequestBuilder, token: &AccessToken) -> RequestBuilder {
    request
        .header(AUTHORIZATION, token.bearer_header())
        .header(CONTENT_TYPE, "application/json")
}

pub fn transport_error(err: reqwest::Error, action: &str) -> PortError {
    if err.is_timeout() {
        PortError::Timeout {
            operation: action.to_string(),
        }
    } else {
        PortError::Connection {
            message: format!("Failed to {}: {}", action, err),
            source: Some(Box::new(err)),
        }
    }
}

/// Passes successful responses through and maps the rest to a `PortError`
pub async fn check_status(response: Response, endpoint: Endpoint<'_>) -> Result<Response, PortError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = retry_after_secs(response.headers());
    let body = response.json::<Value>().await.ok();
    let detail = body
        .as_ref()
        .and_then(|b| detail_message(b, endpoint.detail_keys))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    let message = format!("Failed to {}: {}", endpoint.action, detail);

    debug!(status = status.as_u16(), action = endpoint.action, %message, "Request rejected");

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::unauthorized(message),
        StatusCode::NOT_FOUND => PortError::not_found(endpoint.entity_type, endpoint.entity_id),
        StatusCode::TOO_MANY_REQUESTS => PortError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        },
        s if s.is_server_error() => PortError::ServiceUnavailable { service: message },
        s => PortError::rejected(s.as_u16(), message),
    })
}

/// Reads a JSON body, mapping decode failures to `Transformation`
pub async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, PortError> {
    response
        .json::<T>()
        .await
        .map_err(|e| PortError::transformation(format!("Unexpected response body: {}", e)))
}

/// First non-empty detail among `keys`.
///
/// Strings are used as is, arrays contribute their first element.
pub fn detail_message(body: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| body.get(*key))
        .filter_map(|value| match value {
            Value::Array(items) => items.first().and_then(scalar_text),
            other => scalar_text(other),
        })
        .find(|text| !text.trim().is_empty())
}

/// Renders a JSON scalar as text; `null`, objects and arrays yield `None`
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detail_prefers_first_key() {
        let body = json!({"error": "generic", "details": "OCR timed out"});
        assert_eq!(
            detail_message(&body, EXTRACTION_DETAIL_KEYS),
            Some("OCR timed out".to_string())
        );
    }

    #[test]
    fn test_detail_skips_empty_values() {
        let body = json!({"detail": "", "error": "Document not found"});
        assert_eq!(
            detail_message(&body, REVIEW_DETAIL_KEYS),
            Some("Document not found".to_string())
        );
    }

    #[test]
    fn test_detail_takes_first_array_element() {
        let body = json!({"rejection_reason": ["This field is required."]});
        assert_eq!(
            detail_message(&body, POLICY_DETAIL_KEYS),
            Some("This field is required.".to_string())
        );
    }

    #[test]
    fn test_detail_absent() {
        assert_eq!(detail_message(&json!({"status": "error"}), READ_DETAIL_KEYS), None);
        assert_eq!(detail_message(&json!(null), READ_DETAIL_KEYS), None);
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(&json!(42)), Some("42".to_string()));
        assert_eq!(scalar_text(&json!(true)), Some("true".to_string()));
        assert_eq!(scalar_text(&json!({"a": 1})), None);
    }

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new(reqwest::Client::new(), "http://localhost:8000/api/");
        assert_eq!(client.url("/admin/claims/"), "http://localhost:8000/api/admin/claims/");
    }
}
