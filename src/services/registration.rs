//! First-visit registration flow.
//!
//! A visitor without a usable session is asked for a username and email.
//! On submit the email is looked up in the `users` ledger: a match is adopted
//! ("welcome back"), otherwise a new record is created and published
//! ("welcome"). Visitors with a stored session skip the lookup entirely.

use serde::Serialize;
use tracing::{info, warn};

use crate::models::{CreateUserRequest, LocalSession};
use crate::services::contentstack::ContentRepository;
use crate::services::users;

/// Kind of banner shown after registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Info,
}

/// One-off banner message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn created(username: &str) -> Self {
        Self {
            message: format!(
                "Welcome to QA Dashboard, {}! Your account has been created successfully.",
                username
            ),
            kind: NoticeKind::Success,
        }
    }

    pub fn welcome_back(username: &str) -> Self {
        Self {
            message: format!(
                "Welcome back, {}! We're glad to see you again.",
                username
            ),
            kind: NoticeKind::Info,
        }
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// A new `users` entry was created and published
    Created {
        session: LocalSession,
        entry_uid: String,
    },
    /// The email was already registered
    WelcomeBack { session: LocalSession },
}

impl RegistrationOutcome {
    pub fn session(&self) -> &LocalSession {
        match self {
            Self::Created { session, .. } | Self::WelcomeBack { session } => session,
        }
    }

    pub fn notice(&self) -> Notice {
        match self {
            Self::Created { session, .. } => Notice::created(&session.username),
            Self::WelcomeBack { session } => Notice::welcome_back(&session.username),
        }
    }
}

/// Why a submission was rejected. The message is shown inside the form,
/// which stays open for another attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("{0}")]
    Invalid(&'static str),

    #[error("{0}")]
    Save(String),
}

/// Trimmed and validated registration fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub username: String,
    pub email: String,
}

/// Check a submitted form: both fields present, email shaped like `a@b.c`.
pub fn validate(form: &CreateUserRequest) -> Result<ValidRegistration, RegistrationError> {
    let username = form.username.as_deref().map(str::trim).unwrap_or_default();
    if username.is_empty() {
        return Err(RegistrationError::Invalid("Please enter your username"));
    }

    let email = form.email.as_deref().map(str::trim).unwrap_or_default();
    if email.is_empty() {
        return Err(RegistrationError::Invalid("Please enter your email"));
    }
    if !looks_like_email(email) {
        return Err(RegistrationError::Invalid(
            "Please enter a valid email address",
        ));
    }

    Ok(ValidRegistration {
        username: username.to_string(),
        email: email.to_string(),
    })
}

/// `local@domain` with no whitespace, exactly one `@`, and a dot inside the
/// domain with text on both sides.
fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Run a registration submission against the `users` ledger.
pub async fn submit(
    repo: &dyn ContentRepository,
    form: &CreateUserRequest,
) -> Result<RegistrationOutcome, RegistrationError> {
    let valid = validate(form)?;

    if let Some(existing) = users::find_by_email(repo, &valid.email).await {
        info!("Registration matched an existing user");
        let username = if existing.username.is_empty() {
            valid.username
        } else {
            existing.username
        };
        return Ok(RegistrationOutcome::WelcomeBack {
            session: LocalSession::new(username, valid.email),
        });
    }

    match users::register(repo, &valid.username, &valid.email).await {
        Ok(entry_uid) => Ok(RegistrationOutcome::Created {
            session: LocalSession::new(valid.username, valid.email),
            entry_uid,
        }),
        Err(e) => {
            warn!("Registration failed: {}", e);
            Err(RegistrationError::Save(e.to_string()))
        }
    }
}
