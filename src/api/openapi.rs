//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "QA Dashboard Server",
        version = "0.1.0",
        description = "Dashboard for QA test-run entries stored in Contentstack, with a lightweight user registration ledger"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Entry endpoints
        api::entries::list_entries,
        api::entries::get_entry,
        // User endpoints
        api::users::check_user,
        api::users::create_user,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Entries
            models::EntryDate,
            models::TestRunEntry,
            models::EntryFilter,
            models::EntryListResponse,
            // Users
            models::CheckUserRequest,
            models::CheckUserResponse,
            models::UserSummary,
            models::CreateUserRequest,
            models::CreateUserResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Entries", description = "QA test-run entries"),
        (name = "Users", description = "User existence check and registration")
    )
)]
pub struct ApiDoc;
