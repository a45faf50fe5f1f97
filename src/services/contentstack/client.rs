//! Contentstack REST client (Content Delivery + Content Management APIs).

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::debug;

use super::envelope::{unwrap_entry, unwrap_records};
use super::{CmsError, CmsResult, ContentRepository};
use crate::config::CmsSettings;

/// Locale used for management writes.
const LOCALE: &str = "en-us";

/// HTTP client for one Contentstack stack.
///
/// Reads go to the region's delivery host with the delivery token; writes go
/// to the management host with the management token.
#[derive(Debug, Clone)]
pub struct ContentstackClient {
    http: reqwest::Client,
    settings: CmsSettings,
    delivery_base: String,
    management_base: String,
}

impl ContentstackClient {
    /// Build a client. No timeouts are set beyond reqwest's defaults.
    pub fn new(settings: CmsSettings) -> Self {
        Self::with_http_client(reqwest::Client::new(), settings)
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_http_client(http: reqwest::Client, settings: CmsSettings) -> Self {
        let delivery_base = settings.delivery_base_url();
        let management_base = settings.management_base_url();
        Self {
            http,
            settings,
            delivery_base,
            management_base,
        }
    }

    fn api_key(&self) -> CmsResult<&str> {
        self.settings
            .api_key
            .as_deref()
            .ok_or(CmsError::MissingCredential("API key"))
    }

    fn delivery_token(&self) -> CmsResult<&SecretString> {
        self.settings
            .delivery_token
            .as_ref()
            .ok_or(CmsError::MissingCredential("delivery token"))
    }

    fn management_token(&self) -> CmsResult<&SecretString> {
        self.settings
            .management_token
            .as_ref()
            .ok_or(CmsError::MissingCredential("management token"))
    }

    fn entries_path(base: &str, content_type: &str) -> String {
        format!(
            "{}/v3/content_types/{}/entries",
            base,
            urlencoding::encode(content_type)
        )
    }

    fn entry_path(base: &str, content_type: &str, uid: &str) -> String {
        format!(
            "{}/{}",
            Self::entries_path(base, content_type),
            urlencoding::encode(uid)
        )
    }

    /// Authenticated request against the delivery API.
    fn delivery_request(&self, url: &str) -> CmsResult<RequestBuilder> {
        let api_key = self.api_key()?;
        let token = self.delivery_token()?;
        Ok(self
            .http
            .get(url)
            .header("api_key", api_key)
            .header("access_token", token.expose_secret()))
    }

    /// Authenticated request against the management API.
    fn management_request(&self, method: Method, url: &str) -> CmsResult<RequestBuilder> {
        let api_key = self.api_key()?;
        let token = self.management_token()?;
        Ok(self
            .http
            .request(method, url)
            .header("api_key", api_key)
            .header("authorization", token.expose_secret()))
    }

    fn environment_query(&self) -> String {
        format!("environment={}", urlencoding::encode(&self.settings.environment))
    }

    fn publish_body(&self) -> Value {
        json!({
            "entry": {
                "environments": [self.settings.environment],
                "locales": [LOCALE],
            },
            "locale": LOCALE,
        })
    }
}

/// Read a successful body as JSON, or turn a failure status into [`CmsError::Api`].
async fn read_json(response: reqwest::Response) -> CmsResult<Value> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(CmsError::Api {
            status: status.as_u16(),
            message: error_message(status, &text),
        });
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&text).map_err(|e| CmsError::Decode(e.to_string()))
}

/// Best-effort error message from a Contentstack error body.
///
/// Looks for `error_message`, `message`, then `error`; falls back to the
/// HTTP status reason.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["error_message", "message", "error"].iter().find_map(|key| {
                v.get(*key)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        })
}

#[async_trait]
impl ContentRepository for ContentstackClient {
    async fn fetch_page(
        &self,
        content_type: &str,
        skip: usize,
        limit: usize,
    ) -> CmsResult<Vec<Value>> {
        let url = format!(
            "{}?{}&skip={}&limit={}",
            Self::entries_path(&self.delivery_base, content_type),
            self.environment_query(),
            skip,
            limit
        );
        debug!(content_type, skip, limit, "Fetching entries page");

        let response = self.delivery_request(&url)?.send().await?;
        let body = read_json(response).await?;
        Ok(unwrap_records(body))
    }

    async fn fetch_entry(&self, content_type: &str, uid: &str) -> CmsResult<Option<Value>> {
        let url = format!(
            "{}?{}",
            Self::entry_path(&self.delivery_base, content_type, uid),
            self.environment_query()
        );
        debug!(content_type, uid, "Fetching entry");

        let response = self.delivery_request(&url)?.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = read_json(response).await?;
        Ok(unwrap_entry(body))
    }

    async fn create_entry(&self, content_type: &str, fields: Value) -> CmsResult<Value> {
        let url = format!(
            "{}?locale={}",
            Self::entries_path(&self.management_base, content_type),
            LOCALE
        );
        debug!(content_type, "Creating entry");

        let response = self
            .management_request(Method::POST, &url)?
            .json(&json!({ "entry": fields }))
            .send()
            .await?;
        let body = read_json(response).await?;
        unwrap_entry(body).ok_or(CmsError::MissingUid)
    }

    async fn publish_entry(&self, content_type: &str, uid: &str) -> CmsResult<()> {
        let url = format!(
            "{}/publish",
            Self::entry_path(&self.management_base, content_type, uid)
        );
        debug!(content_type, uid, environment = %self.settings.environment, "Publishing entry");

        let response = self
            .management_request(Method::POST, &url)?
            .json(&self.publish_body())
            .send()
            .await?;
        read_json(response).await?;
        Ok(())
    }

    async fn update_entry(
        &self,
        content_type: &str,
        uid: &str,
        fields: Value,
    ) -> CmsResult<Value> {
        let url = format!(
            "{}?locale={}",
            Self::entry_path(&self.management_base, content_type, uid),
            LOCALE
        );
        debug!(content_type, uid, "Updating entry");

        let response = self
            .management_request(Method::PUT, &url)?
            .json(&json!({ "entry": fields }))
            .send()
            .await?;
        let body = read_json(response).await?;
        unwrap_entry(body).ok_or_else(|| CmsError::Decode("update returned no entry".to_string()))
    }

    async fn unpublish_entry(&self, content_type: &str, uid: &str) -> CmsResult<()> {
        let url = format!(
            "{}/unpublish",
            Self::entry_path(&self.management_base, content_type, uid)
        );
        debug!(content_type, uid, environment = %self.settings.environment, "Unpublishing entry");

        let response = self
            .management_request(Method::POST, &url)?
            .json(&self.publish_body())
            .send()
            .await?;
        read_json(response).await?;
        Ok(())
    }

    async fn delete_entry(&self, content_type: &str, uid: &str) -> CmsResult<()> {
        let url = format!(
            "{}?locale={}",
            Self::entry_path(&self.management_base, content_type, uid),
            LOCALE
        );
        debug!(content_type, uid, "Deleting entry");

        let response = self
            .management_request(Method::DELETE, &url)?
            .send()
            .await?;
        read_json(response).await?;
        Ok(())
    }
}
