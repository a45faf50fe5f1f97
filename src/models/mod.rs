//! Domain models for the QA dashboard.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub mod entry;
pub mod session;
pub mod user;

// Re-export commonly used types
pub use entry::{EntryDate, TestRunEntry};
pub use session::{LocalSession, SessionState};
pub use user::{
    CheckUserRequest, CheckUserResponse, CreateUserRequest, CreateUserResponse, UserRecord,
    UserSummary,
};

/// Environment/module filter for the entry list.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct EntryFilter {
    /// Environment to keep (`N/A` selects entries without one)
    pub env: Option<String>,
    /// Module to keep (`N/A` selects entries without one)
    pub module: Option<String>,
}

impl EntryFilter {
    fn selected(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn env(&self) -> Option<&str> {
        Self::selected(&self.env)
    }

    pub fn module(&self) -> Option<&str> {
        Self::selected(&self.module)
    }

    pub fn is_active(&self) -> bool {
        self.env().is_some() || self.module().is_some()
    }

    pub fn matches(&self, entry: &TestRunEntry) -> bool {
        let env_match = self.env().is_none_or(|env| entry.display_environment() == env);
        let module_match = self.module().is_none_or(|module| entry.display_module() == module);
        env_match && module_match
    }
}

/// Response for the entry listing endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct EntryListResponse {
    pub entries: Vec<TestRunEntry>,
    /// Entries before filtering
    pub total: usize,
    /// Entries after filtering
    pub filtered: usize,
    /// Distinct environments, sorted
    pub environments: Vec<String>,
    /// Distinct modules, sorted
    pub modules: Vec<String>,
}
