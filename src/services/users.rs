//! User registration ledger stored in the `users` content type.
//!
//! Uniqueness by email is best effort only: the check and the create are two
//! independent calls with nothing in between, and Contentstack has no unique
//! constraint to fall back on. Two concurrent first-time registrations with
//! the same email can both create a record.

use serde_json::json;
use tracing::info;

use crate::config::USER_CONTENT_TYPE;
use crate::models::UserRecord;
use crate::services::contentstack::{self, CmsResult, ContentRepository};
use crate::services::entries;

/// Find a registered user by email (case-insensitive).
///
/// Scans the whole `users` collection. Because listing fails soft, a CMS
/// read failure looks the same as "no such user".
pub async fn find_by_email(repo: &dyn ContentRepository, email: &str) -> Option<UserRecord> {
    entries::list_all(repo, USER_CONTENT_TYPE)
        .await
        .iter()
        .filter_map(UserRecord::from_value)
        .find(|user| user.has_email(email))
}

/// Create and publish a `users` entry, returning its UID.
pub async fn register(
    repo: &dyn ContentRepository,
    username: &str,
    email: &str,
) -> CmsResult<String> {
    let fields = json!({
        "title": username,
        "email": email,
    });

    let uid = contentstack::create_and_publish(repo, USER_CONTENT_TYPE, fields).await?;
    info!(uid = %uid, "User registered");
    Ok(uid)
}
