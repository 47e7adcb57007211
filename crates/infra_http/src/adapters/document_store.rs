//! Document Storage Adapter
//!
//! Downloads document files for previewing. Signed URLs are fetched
//! directly; storage paths are signed against the storage service first.
//! Hosted-storage signed URLs already carry their own credentials and are
//! fetched without an `Authorization` header.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use core_kernel::{AccessToken, DomainPort, PortError};
use domain_claims::{DocumentStorePort, PreviewHandle, StorageLocator};

use crate::client::{check_status, decode, transport_error, Endpoint};
use crate::config::ServiceConfig;
use crate::error::HttpError;

const HOSTED_STORAGE_SUFFIX: &str = ".supabase.co";
const STORAGE_DETAIL_KEYS: &[&str] = &["message", "error"];

#[derive(Debug, Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL", alias = "signedUrl")]
    signed_url: String,
}

/// Returns true for signed URLs issued by hosted storage
pub fn is_hosted_storage_url(url: &Url) -> bool {
    url.host_str()
        .map(|host| host.ends_with(HOSTED_STORAGE_SUFFIX))
        .unwrap_or(false)
}

/// HTTP implementation of [`DocumentStorePort`]
#[derive(Debug, Clone)]
pub struct HttpDocumentStore {
    http: reqwest::Client,
    storage_url: Option<String>,
    api_key: Option<String>,
    signed_url_ttl_secs: u64,
}

impl HttpDocumentStore {
    pub fn new(config: &ServiceConfig) -> Result<Self, HttpError> {
        Ok(Self {
            http: config.http_client()?,
            storage_url: config.storage_base().map(str::to_string),
            api_key: config.storage_api_key.clone(),
            signed_url_ttl_secs: config.signed_url_ttl_secs,
        })
    }

    /// Exchanges a bucket path for a time-limited download URL
    #[instrument(skip(self, token))]
    async fn sign(&self, token: &AccessToken, bucket: &str, path: &str) -> Result<Url, PortError> {
        let base = self
            .storage_url
            .as_deref()
            .ok_or_else(|| PortError::validation("Storage URL is not configured; cannot sign document path"))?;

        let mut request = self
            .http
            .post(format!("{}/object/sign/{}/{}", base, bucket, path.trim_start_matches('/')))
            .header(AUTHORIZATION, token.bearer_header())
            .json(&json!({ "expiresIn": self.signed_url_ttl_secs }));
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key);
        }

        let endpoint = Endpoint {
            action: "sign document URL",
            entity_type: "Document",
            entity_id: path,
            detail_keys: STORAGE_DETAIL_KEYS,
        };
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(e, endpoint.action))?;
        let signed: SignResponse = decode(check_status(response, endpoint).await?).await?;

        let absolute = if signed.signed_url.starts_with("http://") || signed.signed_url.starts_with("https://") {
            signed.signed_url
        } else {
            format!("{}/{}", base, signed.signed_url.trim_start_matches('/'))
        };
        parse_url(&absolute)
    }

    #[instrument(skip(self, token, url), fields(host = url.host_str().unwrap_or_default()))]
    async fn download(&self, token: &AccessToken, url: Url) -> Result<PreviewHandle, PortError> {
        let hosted = is_hosted_storage_url(&url);
        let mut request = self.http.get(url);
        if !hosted {
            request = request.header(AUTHORIZATION, token.bearer_header());
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(e, "fetch document"))?;

        let status = response.status();
        if !status.is_success() {
            let message = format!("Failed to fetch document: {}", status.as_u16());
            return Err(match status.as_u16() {
                401 | 403 => PortError::unauthorized(message),
                code => PortError::rejected(code, message),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, "fetch document"))?;

        debug!(bytes = bytes.len(), hosted, "Downloaded document");
        Ok(PreviewHandle::new(content_type, bytes.to_vec()))
    }
}

fn parse_url(raw: &str) -> Result<Url, PortError> {
    Url::parse(raw).map_err(|e| PortError::validation(format!("Invalid document URL '{}': {}", raw, e)))
}

impl DomainPort for HttpDocumentStore {}

#[async_trait]
impl DocumentStorePort for HttpDocumentStore {
    async fn fetch_preview(
        &self,
        token: &AccessToken,
        locator: &StorageLocator,
    ) -> Result<PreviewHandle, PortError> {
        let url = match locator {
            StorageLocator::SignedUrl { url } => parse_url(url)?,
            StorageLocator::StoragePath { bucket, path } => self.sign(token, bucket, path).await?,
        };
        self.download(token, url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hosted_storage_detection() {
        let hosted = Url::parse("https://abcd.supabase.co/storage/v1/object/sign/pan/x.png?token=t").unwrap();
        let own = Url::parse("https://files.example.com/pan/x.png").unwrap();
        let lookalike = Url::parse("https://supabase.co.example.com/x.png").unwrap();
        assert!(is_hosted_storage_url(&hosted));
        assert!(!is_hosted_storage_url(&own));
        assert!(!is_hosted_storage_url(&lookalike));
    }

    #[test]
    fn test_invalid_url_is_validation_error() {
        assert!(matches!(parse_url("not a url"), Err(PortError::Validation { .. })));
    }
}
