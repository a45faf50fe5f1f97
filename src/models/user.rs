//! User registration models.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// A record of the `users` content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserRecord {
    /// Display name (stored as the entry title)
    pub username: String,
    pub email: String,
}

impl UserRecord {
    /// Read a raw `users` entry. The display name comes from `title`, then
    /// `username`; records without an email are ignored.
    pub fn from_value(value: &Value) -> Option<Self> {
        let email = value
            .get("email")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|e| !e.is_empty())?;

        let username = ["title", "username"]
            .iter()
            .find_map(|key| {
                value
                    .get(*key)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or_default();

        Some(Self {
            username: username.to_string(),
            email: email.to_string(),
        })
    }

    /// Case-insensitive email comparison.
    pub fn has_email(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.trim().to_lowercase()
    }
}

/// Request body for `POST /api/user/check`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckUserRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Response body for `POST /api/user/check`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckUserResponse {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}

/// User fields returned by the existence check.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub username: String,
    pub email: String,
}

impl From<UserRecord> for UserSummary {
    fn from(u: UserRecord) -> Self {
        Self {
            username: u.username,
            email: u.email,
        }
    }
}

/// Request body for `POST /api/user`, also the registration form.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Response body for `POST /api/user`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub success: bool,
    pub entry_uid: String,
    pub message: String,
}
