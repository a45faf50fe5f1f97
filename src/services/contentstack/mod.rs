//! Contentstack content repository.
//!
//! The rest of the crate talks to the CMS only through [`ContentRepository`],
//! so handlers receive an injected handle and tests can swap in fakes.

mod client;
pub mod envelope;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info};

pub use client::ContentstackClient;

/// Errors raised by Contentstack calls.
#[derive(Debug, thiserror::Error)]
pub enum CmsError {
    /// A credential required by this call is not configured
    #[error("Contentstack {0} is not configured")]
    MissingCredential(&'static str),

    /// Transport-level failure (connection, TLS, body read)
    #[error("Contentstack request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    /// The response body could not be interpreted
    #[error("Unexpected Contentstack response: {0}")]
    Decode(String),

    /// A create call succeeded but returned no entry uid
    #[error("No UID returned for the created entry")]
    MissingUid,
}

pub type CmsResult<T> = Result<T, CmsError>;

/// Read and write access to Contentstack entries.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Fetch one page of raw records (`skip` records skipped, at most `limit` returned).
    async fn fetch_page(&self, content_type: &str, skip: usize, limit: usize)
    -> CmsResult<Vec<Value>>;

    /// Fetch a single raw record. `Ok(None)` when the CMS reports it missing.
    async fn fetch_entry(&self, content_type: &str, uid: &str) -> CmsResult<Option<Value>>;

    /// Create an entry and return the created record.
    async fn create_entry(&self, content_type: &str, fields: Value) -> CmsResult<Value>;

    /// Publish an entry to the configured environment.
    async fn publish_entry(&self, content_type: &str, uid: &str) -> CmsResult<()>;

    /// Replace the fields of an entry and return the updated record.
    async fn update_entry(&self, content_type: &str, uid: &str, fields: Value)
    -> CmsResult<Value>;

    /// Remove an entry from the configured environment.
    async fn unpublish_entry(&self, content_type: &str, uid: &str) -> CmsResult<()>;

    /// Delete an entry.
    async fn delete_entry(&self, content_type: &str, uid: &str) -> CmsResult<()>;
}

/// Create an entry and publish it, returning the new uid.
///
/// The two steps are strictly sequential. A publish failure leaves the
/// created entry unpublished; nothing is rolled back.
pub async fn create_and_publish(
    repo: &dyn ContentRepository,
    content_type: &str,
    fields: Value,
) -> CmsResult<String> {
    let created = repo
        .create_entry(content_type, fields)
        .await
        .inspect_err(|e| error!(operation = "create_entry", content_type, "Create failed: {}", e))?;

    let uid = created
        .get("uid")
        .and_then(Value::as_str)
        .filter(|uid| !uid.is_empty())
        .map(str::to_string)
        .ok_or(CmsError::MissingUid)?;

    repo.publish_entry(content_type, &uid).await.inspect_err(|e| {
        error!(
            operation = "publish_entry",
            content_type,
            uid = %uid,
            "Publish failed after create, entry left unpublished: {}",
            e
        )
    })?;

    info!(content_type, uid = %uid, "Entry created and published");
    Ok(uid)
}
